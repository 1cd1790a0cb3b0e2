//! Constraint expression construction.
//!
//! Builds `Is.GreaterThan(b)` style invocations and `Is.True` style
//! properties. The operand is moved into the new node, so a side-effecting
//! argument appears exactly once in the rewritten call.

use crate::rules::{ConstraintOperand, RewriteRule};
use crate::syntax::{Argument, ArgumentList, Expr};

/// `<namespace>.<operator>(<operand>)`
pub fn build(namespace: &str, operator: &str, operand: Expr) -> Expr {
    Expr::invoke(
        Expr::member(Expr::dotted(namespace), operator),
        ArgumentList::new(vec![Argument::positional(operand)]),
    )
}

/// `<namespace>.<name>` for constraints without an operand.
pub fn build_property(namespace: &str, name: &str) -> Expr {
    Expr::member(Expr::dotted(namespace), name)
}

/// The constraint a rule synthesizes. `operand` must be present exactly
/// when the rule takes one; otherwise `None` is returned.
pub fn build_for_rule(rule: &RewriteRule, operand: Option<Expr>) -> Option<Expr> {
    match (rule.operand, operand) {
        (ConstraintOperand::Argument(_), Some(operand)) => Some(build(
            rule.constraint_namespace,
            rule.constraint_name,
            operand,
        )),
        (ConstraintOperand::None, None) => Some(build_property(
            rule.constraint_namespace,
            rule.constraint_name,
        )),
        _ => None,
    }
}
