//! The classic assertion rule table.
//!
//! One [`RewriteRule`] per classic assertion member. Rules are plain data;
//! a single matcher and a single rewriter interpret all of them.
//!
//! Index fields refer to the argument list of the matched call as written:
//!
//! | Rule | Classic call | Rewritten arguments |
//! |------|--------------|---------------------|
//! | `Greater` | `(a, b, msg)` | `(a, Is.GreaterThan(b), msg)` |
//! | `AreEqual` | `(expected, actual, msg)` | `(actual, Is.EqualTo(expected), msg)` |
//! | `IsTrue` | `(cond, msg)` | `(cond, Is.True, msg)` |

use serde::Serialize;

/// Where the synthesized constraint gets its operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "index", rename_all = "snake_case")]
pub enum ConstraintOperand {
    /// Invoke the constraint with the argument at this index.
    Argument(usize),
    /// The constraint is a property (`Is.True`), no operand.
    None,
}

/// A classic assertion and how to rewrite it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RewriteRule {
    /// Classic member name (`Greater`).
    pub legacy_name: &'static str,
    /// Diagnostic reported for the classic call.
    pub diagnostic_id: &'static str,
    /// Number of value arguments the classic overload requires, not
    /// counting the message.
    pub required_count: u32,
    /// Dotted constraint namespace (`Is`, `Is.Not`, `Has`).
    pub constraint_namespace: &'static str,
    /// Constraint member (`GreaterThan`).
    pub constraint_name: &'static str,
    /// Operand of the constraint.
    pub operand: ConstraintOperand,
    /// Index in the original list before which the constraint is inserted.
    pub insertion_index: usize,
    /// Original argument indices the constraint subsumes.
    pub consumed: &'static [usize],
}

impl RewriteRule {
    /// `Is.GreaterThan`
    pub fn constraint_path(&self) -> String {
        format!("{}.{}", self.constraint_namespace, self.constraint_name)
    }

    /// `(actual, expected)` becomes `(actual, <constraint>(expected))`.
    const fn comparison(
        legacy_name: &'static str,
        diagnostic_id: &'static str,
        constraint_name: &'static str,
    ) -> Self {
        RewriteRule {
            legacy_name,
            diagnostic_id,
            required_count: 2,
            constraint_namespace: "Is",
            constraint_name,
            operand: ConstraintOperand::Argument(1),
            insertion_index: 2,
            consumed: &[1],
        }
    }

    /// `(expected, actual)` becomes `(actual, <constraint>(expected))`.
    const fn expected_first(
        legacy_name: &'static str,
        diagnostic_id: &'static str,
        constraint_namespace: &'static str,
        constraint_name: &'static str,
    ) -> Self {
        RewriteRule {
            legacy_name,
            diagnostic_id,
            required_count: 2,
            constraint_namespace,
            constraint_name,
            operand: ConstraintOperand::Argument(0),
            insertion_index: 2,
            consumed: &[0],
        }
    }

    /// `(actual)` becomes `(actual, <constraint>)`.
    const fn property(
        legacy_name: &'static str,
        diagnostic_id: &'static str,
        constraint_namespace: &'static str,
        constraint_name: &'static str,
    ) -> Self {
        RewriteRule {
            legacy_name,
            diagnostic_id,
            required_count: 1,
            constraint_namespace,
            constraint_name,
            operand: ConstraintOperand::None,
            insertion_index: 1,
            consumed: &[],
        }
    }
}

/// Every classic assertion the engine knows how to migrate.
pub static CLASSIC_RULES: &[RewriteRule] = &[
    RewriteRule::property("False", "NUnit2001", "Is", "False"),
    RewriteRule::property("IsFalse", "NUnit2002", "Is", "False"),
    RewriteRule::property("IsTrue", "NUnit2003", "Is", "True"),
    RewriteRule::property("True", "NUnit2004", "Is", "True"),
    RewriteRule::expected_first("AreEqual", "NUnit2005", "Is", "EqualTo"),
    RewriteRule::expected_first("AreNotEqual", "NUnit2006", "Is.Not", "EqualTo"),
    RewriteRule::expected_first("AreSame", "NUnit2015", "Is", "SameAs"),
    RewriteRule::property("Null", "NUnit2016", "Is", "Null"),
    RewriteRule::property("IsNull", "NUnit2017", "Is", "Null"),
    RewriteRule::property("NotNull", "NUnit2018", "Is.Not", "Null"),
    RewriteRule::property("IsNotNull", "NUnit2019", "Is.Not", "Null"),
    RewriteRule::comparison("Greater", "NUnit2027", "GreaterThan"),
    RewriteRule::comparison("GreaterOrEqual", "NUnit2028", "GreaterThanOrEqualTo"),
    RewriteRule::comparison("Less", "NUnit2029", "LessThan"),
    RewriteRule::comparison("LessOrEqual", "NUnit2030", "LessThanOrEqualTo"),
    RewriteRule::expected_first("AreNotSame", "NUnit2031", "Is.Not", "SameAs"),
    RewriteRule::property("Zero", "NUnit2032", "Is", "Zero"),
    RewriteRule::property("NotZero", "NUnit2033", "Is.Not", "Zero"),
    RewriteRule::property("IsNaN", "NUnit2034", "Is", "NaN"),
    RewriteRule::property("IsEmpty", "NUnit2035", "Is", "Empty"),
    RewriteRule::property("IsNotEmpty", "NUnit2036", "Is.Not", "Empty"),
    RewriteRule::expected_first("Contains", "NUnit2037", "Has", "Member"),
    RewriteRule::expected_first("IsInstanceOf", "NUnit2038", "Is", "InstanceOf"),
    RewriteRule::expected_first("IsNotInstanceOf", "NUnit2039", "Is.Not", "InstanceOf"),
];

/// Look up the rule for a classic member name.
pub fn rule_for(legacy_name: &str) -> Option<&'static RewriteRule> {
    CLASSIC_RULES.iter().find(|r| r.legacy_name == legacy_name)
}
