//! Shared snapshot builders for integration tests.
//!
//! Builds a symbol store shaped like the NUnit framework assembly: the
//! classic assertion classes with their real overloads, the constraint
//! entry point, and the lifecycle attributes.

#![allow(dead_code)]

use assertshift::symbols::{
    AttributeData, MethodSymbol, Parameter, SymbolId, SymbolStore, TypeSymbol,
};
use assertshift::syntax::{Argument, CallSite, CallSiteId, Expr};
use assertshift::types::Span;

/// A snapshot with the NUnit surface the engine cares about.
pub struct NUnit {
    pub store: SymbolStore,
    pub classic_assert: SymbolId,
    pub assert: SymbolId,
    pub test: SymbolId,
    pub test_case: SymbolId,
    pub setup: SymbolId,
    pub teardown: SymbolId,
    pub one_time_setup: SymbolId,
    pub one_time_teardown: SymbolId,
    pub fixture_life_cycle: SymbolId,
    pub life_cycle: SymbolId,
    next_call: u32,
}

impl NUnit {
    pub fn new() -> Self {
        let mut store = SymbolStore::new();

        let classic_assert = add_class(&mut store, "NUnit.Framework.Legacy", "ClassicAssert");
        let assert = add_class(&mut store, "NUnit.Framework", "Assert");

        let builder = store.next_id();
        store
            .insert_type(TypeSymbol::interface(
                builder,
                "NUnit.Framework.Interfaces",
                "ISimpleTestBuilder",
            ))
            .unwrap();
        let attribute = add_class(&mut store, "System", "Attribute");
        let nunit_attribute = store.next_id();
        store
            .insert_type(
                TypeSymbol::class(nunit_attribute, "NUnit.Framework", "NUnitAttribute")
                    .with_base(attribute),
            )
            .unwrap();
        let attr = |store: &mut SymbolStore, name: &str, test_builder: bool| {
            let id = store.next_id();
            let mut ty = TypeSymbol::class(id, "NUnit.Framework", name).with_base(nunit_attribute);
            if test_builder {
                ty = ty.with_interface(builder);
            }
            store.insert_type(ty).unwrap();
            id
        };
        let test = attr(&mut store, "TestAttribute", true);
        let test_case = attr(&mut store, "TestCaseAttribute", false);
        let setup = attr(&mut store, "SetUpAttribute", false);
        let teardown = attr(&mut store, "TearDownAttribute", false);
        let one_time_setup = attr(&mut store, "OneTimeSetUpAttribute", false);
        let one_time_teardown = attr(&mut store, "OneTimeTearDownAttribute", false);
        let fixture_life_cycle = attr(&mut store, "FixtureLifeCycleAttribute", false);

        let life_cycle = store.next_id();
        store
            .insert_type(TypeSymbol::enumeration(
                life_cycle,
                "NUnit.Framework",
                "LifeCycle",
                &[("SingleInstance", 0), ("InstancePerTestCase", 1)],
            ))
            .unwrap();

        NUnit {
            store,
            classic_assert,
            assert,
            test,
            test_case,
            setup,
            teardown,
            one_time_setup,
            one_time_teardown,
            fixture_life_cycle,
            life_cycle,
            next_call: 0,
        }
    }

    /// Declare a classic overload on `ClassicAssert`.
    pub fn classic(&mut self, name: &str, params: Vec<Parameter>) -> SymbolId {
        self.method_on(self.classic_assert, name, params)
    }

    /// `Greater(arg1, arg2)`
    pub fn greater(&mut self) -> SymbolId {
        self.classic(
            "Greater",
            vec![Parameter::regular("arg1"), Parameter::regular("arg2")],
        )
    }

    /// `Greater(arg1, arg2, message, params args)`
    pub fn greater_with_message(&mut self) -> SymbolId {
        self.classic(
            "Greater",
            vec![
                Parameter::regular("arg1"),
                Parameter::regular("arg2"),
                Parameter::regular("message"),
                Parameter::params("args"),
            ],
        )
    }

    /// `Assert.That(actual, expression)`
    pub fn that(&mut self) -> SymbolId {
        self.method_on(
            self.assert,
            "That",
            vec![
                Parameter::regular("actual"),
                Parameter::regular("expression"),
                Parameter::optional("message"),
            ],
        )
    }

    pub fn method_on(&mut self, owner: SymbolId, name: &str, params: Vec<Parameter>) -> SymbolId {
        let id = self.store.next_id();
        self.store
            .insert_method(MethodSymbol::new(id, owner, name).with_params(params))
            .unwrap();
        id
    }

    /// A user class in the `Tests` namespace.
    pub fn fixture(&mut self, name: &str) -> SymbolId {
        add_class(&mut self.store, "Tests", name)
    }

    /// A method carrying the given attribute classes.
    pub fn attributed(&mut self, owner: SymbolId, name: &str, attributes: &[SymbolId]) -> SymbolId {
        let id = self.store.next_id();
        let method = attributes
            .iter()
            .fold(MethodSymbol::new(id, owner, name), |m, &a| {
                m.with_attribute(AttributeData::new(a))
            });
        self.store.insert_method(method).unwrap();
        id
    }

    /// A call-site `receiver.name(args)` resolved to `callee`.
    pub fn call(
        &mut self,
        callee: SymbolId,
        receiver: &str,
        name: &str,
        args: &[&str],
    ) -> CallSite {
        self.next_call += 1;
        let args = args
            .iter()
            .map(|text| Argument::positional(Expr::verbatim(*text)))
            .collect();
        CallSite::new(CallSiteId(self.next_call), callee, Expr::ident(receiver), name)
            .with_args(args)
            .with_span(Span::new(0, 40))
    }
}

impl Default for NUnit {
    fn default() -> Self {
        Self::new()
    }
}

fn add_class(store: &mut SymbolStore, namespace: &str, name: &str) -> SymbolId {
    let id = store.next_id();
    store
        .insert_type(TypeSymbol::class(id, namespace, name))
        .unwrap();
    id
}
