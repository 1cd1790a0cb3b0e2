//! End-to-end tests for classic assertion migration.
//!
//! Each test builds an NUnit-shaped snapshot, resolves call-sites against
//! it, and checks the argument lists and fixes the engine produces.

mod support;

use assertshift::config::FrameworkConfig;
use assertshift::fix::{classic_assert_fix, diagnose, fixes_for_calls};
use assertshift::matcher::CallPatternMatcher;
use assertshift::rewrite::rewrite;
use assertshift::symbols::{MethodSymbol, Parameter, SymbolStore};
use assertshift::syntax::{Argument, Expr};

use support::NUnit;

// ============================================================================
// Rewriting
// ============================================================================

#[test]
fn greater_rewrites_to_constraint_call() {
    let mut nunit = NUnit::new();
    let greater = nunit.greater();
    let call = nunit.call(greater, "ClassicAssert", "Greater", &["a", "b"]);
    let config = FrameworkConfig::default();

    let rule = CallPatternMatcher::new(&nunit.store, &config)
        .match_call(&call)
        .expect("Greater should match");
    let args = rewrite(&call, rule).unwrap();

    assert_eq!(args.len(), 2);
    assert_eq!(args.get(0), call.args.get(0));
    let constraint = &args.get(1).unwrap().expr;
    assert_eq!(constraint.to_string(), "Is.GreaterThan(b)");
    assert_eq!(
        constraint.invocation_args().unwrap().get(0).unwrap().expr,
        Expr::verbatim("b")
    );
}

#[test]
fn greater_with_message_keeps_message_in_place() {
    let mut nunit = NUnit::new();
    let greater = nunit.greater_with_message();
    let call = nunit.call(greater, "ClassicAssert", "Greater", &["a", "b", "\"msg\""]);
    let config = FrameworkConfig::default();

    let fix = classic_assert_fix(&nunit.store, &config, &call)
        .unwrap()
        .unwrap();
    assert_eq!(
        fix.edit.new_text,
        r#"Assert.That(a, Is.GreaterThan(b), "msg")"#
    );
    let args = fix.replacement.invocation_args().unwrap();
    assert_eq!(args.len(), 3);
    assert_eq!(args.get(2), call.args.get(2));
}

#[test]
fn format_arguments_follow_the_message() {
    let mut nunit = NUnit::new();
    let greater = nunit.greater_with_message();
    let call = nunit.call(
        greater,
        "ClassicAssert",
        "Greater",
        &["a", "b", "\"{0} > {1}\"", "a", "b"],
    );
    let config = FrameworkConfig::default();

    let fix = classic_assert_fix(&nunit.store, &config, &call)
        .unwrap()
        .unwrap();
    assert_eq!(
        fix.edit.new_text,
        r#"Assert.That(a, Is.GreaterThan(b), "{0} > {1}", a, b)"#
    );
}

#[test]
fn are_equal_puts_actual_first() {
    let mut nunit = NUnit::new();
    let are_equal = nunit.classic(
        "AreEqual",
        vec![Parameter::regular("expected"), Parameter::regular("actual")],
    );
    let call = nunit.call(are_equal, "ClassicAssert", "AreEqual", &["42", "Answer()"]);
    let config = FrameworkConfig::default();

    let fix = classic_assert_fix(&nunit.store, &config, &call)
        .unwrap()
        .unwrap();
    assert_eq!(fix.diagnostic_id, "NUnit2005");
    assert_eq!(fix.edit.new_text, "Assert.That(Answer(), Is.EqualTo(42))");
}

#[test]
fn named_message_keeps_its_name() {
    let mut nunit = NUnit::new();
    let greater = nunit.greater_with_message();
    let call = nunit.call(greater, "ClassicAssert", "Greater", &[]).with_args(vec![
        Argument::positional(Expr::verbatim("a")),
        Argument::positional(Expr::verbatim("b")),
        Argument::named("message", Expr::string("too small")),
    ]);
    let config = FrameworkConfig::default();

    let fix = classic_assert_fix(&nunit.store, &config, &call)
        .unwrap()
        .unwrap();
    assert_eq!(
        fix.edit.new_text,
        r#"Assert.That(a, Is.GreaterThan(b), message: "too small")"#
    );
}

// ============================================================================
// Matching
// ============================================================================

#[test]
fn rewritten_call_does_not_match_again() {
    let mut nunit = NUnit::new();
    let greater = nunit.greater();
    let that = nunit.that();
    let config = FrameworkConfig::default();

    let call = nunit.call(greater, "ClassicAssert", "Greater", &["a", "b"]);
    let fix = classic_assert_fix(&nunit.store, &config, &call)
        .unwrap()
        .unwrap();

    // The host re-resolves the replacement against the modern entry point.
    let rewritten = nunit
        .call(that, "Assert", "That", &[])
        .with_args(fix.replacement.invocation_args().unwrap().clone().into_vec());
    assert!(CallPatternMatcher::new(&nunit.store, &config)
        .match_call(&rewritten)
        .is_none());
}

#[test]
fn generic_instance_of_message_overload_is_not_fixed() {
    let mut nunit = NUnit::new();
    let config = FrameworkConfig::default();
    // IsInstanceOf<T>(actual, message, params args) and its negation.
    for name in ["IsInstanceOf", "IsNotInstanceOf"] {
        let id = nunit.store.next_id();
        nunit
            .store
            .insert_method(
                MethodSymbol::new(id, nunit.classic_assert, name)
                    .with_type_arity(1)
                    .with_params(vec![
                        Parameter::regular("actual"),
                        Parameter::regular("message"),
                        Parameter::params("args"),
                    ]),
            )
            .unwrap();
        let call = nunit.call(id, "ClassicAssert", name, &["x", "\"m\""]);
        assert!(classic_assert_fix(&nunit.store, &config, &call)
            .unwrap()
            .is_none());
    }
}

#[test]
fn non_generic_instance_of_still_rewrites() {
    let mut nunit = NUnit::new();
    let is_instance_of = nunit.classic(
        "IsInstanceOf",
        vec![
            Parameter::regular("expected"),
            Parameter::regular("actual"),
            Parameter::regular("message"),
            Parameter::params("args"),
        ],
    );
    let call = nunit.call(
        is_instance_of,
        "ClassicAssert",
        "IsInstanceOf",
        &["typeof(Foo)", "x", "\"m\""],
    );
    let config = FrameworkConfig::default();

    let fix = classic_assert_fix(&nunit.store, &config, &call)
        .unwrap()
        .unwrap();
    assert_eq!(
        fix.edit.new_text,
        r#"Assert.That(x, Is.InstanceOf(typeof(Foo)), "m")"#
    );
}

#[test]
fn user_method_with_classic_name_is_ignored() {
    let mut nunit = NUnit::new();
    let helper_type = nunit.fixture("Checks");
    let greater = nunit.method_on(
        helper_type,
        "Greater",
        vec![Parameter::regular("arg1"), Parameter::regular("arg2")],
    );
    let call = nunit.call(greater, "Checks", "Greater", &["a", "b"]);
    let config = FrameworkConfig::default();
    assert!(classic_assert_fix(&nunit.store, &config, &call)
        .unwrap()
        .is_none());
}

#[test]
fn configured_legacy_class_is_matched() {
    let mut nunit = NUnit::new();
    let compat = nunit.fixture("CompatAssert");
    let less = nunit.method_on(
        compat,
        "Less",
        vec![Parameter::regular("arg1"), Parameter::regular("arg2")],
    );
    let call = nunit.call(less, "CompatAssert", "Less", &["x", "10"]);

    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("assertshift.toml");
    std::fs::write(
        &path,
        r#"
        [assertions]
        legacy_classes = ["Tests.CompatAssert"]
        "#,
    )
    .unwrap();
    let config = FrameworkConfig::load(&path).unwrap();
    let fix = classic_assert_fix(&nunit.store, &config, &call)
        .unwrap()
        .unwrap();
    assert_eq!(fix.edit.new_text, "Assert.That(x, Is.LessThan(10))");
}

// ============================================================================
// Batch
// ============================================================================

#[test]
fn batch_reports_and_fixes_only_classic_calls() {
    let mut nunit = NUnit::new();
    let greater = nunit.greater();
    let that = nunit.that();
    let calls = vec![
        nunit.call(greater, "ClassicAssert", "Greater", &["a", "b"]),
        nunit.call(that, "Assert", "That", &["a", "Is.True"]),
        nunit.call(greater, "ClassicAssert", "Greater", &["c", "d"]),
    ];
    let config = FrameworkConfig::default();

    let diagnostics = diagnose(&nunit.store, &config, &calls);
    assert_eq!(diagnostics.len(), 2);
    assert!(diagnostics.iter().all(|d| d.id == "NUnit2027"));

    let fixes = fixes_for_calls(&nunit.store, &config, &calls).unwrap();
    let texts: Vec<_> = fixes.iter().map(|f| f.edit.new_text.as_str()).collect();
    assert_eq!(
        texts,
        vec![
            "Assert.That(a, Is.GreaterThan(b))",
            "Assert.That(c, Is.GreaterThan(d))"
        ]
    );
}

#[test]
fn snapshot_survives_json_transport() {
    let mut nunit = NUnit::new();
    let greater = nunit.greater();
    let call = nunit.call(greater, "ClassicAssert", "Greater", &["a", "b"]);

    let json = serde_json::to_string(&nunit.store).unwrap();
    let store = SymbolStore::from_json_str(&json).unwrap();
    let call_json = serde_json::to_string(&call).unwrap();
    let call = serde_json::from_str(&call_json).unwrap();

    let config = FrameworkConfig::default();
    let fix = classic_assert_fix(&store, &config, &call).unwrap().unwrap();
    assert_eq!(fix.edit.new_text, "Assert.That(a, Is.GreaterThan(b))");
}
