//! Test lifecycle classification from attributes.
//!
//! Answers, for one snapshot:
//! - which [`LifecycleRole`] a method plays, following override chains so
//!   that an override of a `[SetUp]` method is itself a setup method
//! - whether a type is a test fixture
//! - which [`FixtureInstancingPolicy`] a fixture's lifecycle attribute selects
//! - whether a method is the implementation dispatched for a named
//!   interface's member
//!
//! Attribute classes are recognized by metadata name, walking the attribute
//! class's base types (a subclass of `SetUpAttribute` still marks setup) and
//! its implemented interfaces (anything implementing `ITestBuilder` builds
//! tests).
//!
//! Override chains come from the host and are trusted to be acyclic.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::config::FrameworkConfig;
use crate::symbols::{AttributeData, ConstantKind, MethodSymbol, SymbolId, SymbolStore};

/// The part a method plays in running tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleRole {
    TestMethod,
    SetUp,
    TearDown,
    OneTimeSetUp,
    OneTimeTearDown,
    #[default]
    None,
}

/// How many fixture instances the framework creates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FixtureInstancingPolicy {
    /// One instance shared by every test in the fixture.
    #[default]
    Shared,
    /// A fresh instance for each test case.
    PerTestCase,
}

impl FixtureInstancingPolicy {
    pub fn is_per_test_case(self) -> bool {
        self == FixtureInstancingPolicy::PerTestCase
    }
}

/// Attribute-driven queries over one snapshot.
#[derive(Debug, Clone, Copy)]
pub struct AttributeClassifier<'a> {
    store: &'a SymbolStore,
    config: &'a FrameworkConfig,
}

impl<'a> AttributeClassifier<'a> {
    /// Create a classifier over one snapshot.
    pub fn new(store: &'a SymbolStore, config: &'a FrameworkConfig) -> Self {
        AttributeClassifier { store, config }
    }

    // ------------------------------------------------------------------------
    // Interface implementation
    // ------------------------------------------------------------------------

    /// True if `method` is what its containing type dispatches to for a
    /// same-named member of the interface `interface_full_name`.
    ///
    /// Name equality only nominates candidates; the type's implementation
    /// map decides, so a same-named method answering a different interface
    /// is not mistaken for this one.
    pub fn is_interface_implementation(
        &self,
        method: &MethodSymbol,
        interface_full_name: &str,
    ) -> bool {
        let owner = method.containing_type;
        let Some(interface) = self
            .store
            .all_interfaces(owner)
            .into_iter()
            .find(|&i| self.store.is_type(i, interface_full_name))
        else {
            return false;
        };
        self.store
            .members_of(interface)
            .filter(|candidate| candidate.name == method.name)
            .any(|candidate| {
                self.store
                    .find_implementation_for_interface_member(owner, candidate.id)
                    == Some(method.id)
            })
    }

    // ------------------------------------------------------------------------
    // Method roles
    // ------------------------------------------------------------------------

    /// True if the attribute class builds tests.
    pub fn is_test_method_attribute(&self, attribute: &AttributeData) -> bool {
        let names = &self.config.attributes;
        names
            .test_builder_interfaces
            .iter()
            .any(|iface| self.store.implements_interface(attribute.class_id, iface))
            || names
                .test_attributes
                .iter()
                .any(|name| self.store.is_or_derives_from(attribute.class_id, name))
    }

    /// The role an attribute class marks, ignoring test-building attributes.
    fn setup_teardown_role(&self, attribute: &AttributeData) -> LifecycleRole {
        let names = &self.config.attributes;
        let class = attribute.class_id;
        [
            (&names.setup, LifecycleRole::SetUp),
            (&names.teardown, LifecycleRole::TearDown),
            (&names.one_time_setup, LifecycleRole::OneTimeSetUp),
            (&names.one_time_teardown, LifecycleRole::OneTimeTearDown),
        ]
        .into_iter()
        .find(|(name, _)| self.store.is_or_derives_from(class, name))
        .map_or(LifecycleRole::None, |(_, role)| role)
    }

    /// True if the attribute class is a setup or teardown attribute.
    pub fn is_setup_or_teardown_attribute(&self, attribute: &AttributeData) -> bool {
        self.setup_teardown_role(attribute) != LifecycleRole::None
    }

    /// The role the method's own attributes give it. A test-building
    /// attribute wins over setup/teardown ones; among those, the first
    /// applied wins.
    pub fn own_role(&self, method: &MethodSymbol) -> LifecycleRole {
        if method
            .attributes
            .iter()
            .any(|a| self.is_test_method_attribute(a))
        {
            return LifecycleRole::TestMethod;
        }
        method
            .attributes
            .iter()
            .map(|a| self.setup_teardown_role(a))
            .find(|role| *role != LifecycleRole::None)
            .unwrap_or(LifecycleRole::None)
    }

    /// True if the method's own attributes mark it as test related.
    pub fn has_test_related_attributes(&self, method: &MethodSymbol) -> bool {
        self.own_role(method) != LifecycleRole::None
    }

    /// The method's role, inherited through its override chain when its own
    /// attributes give none.
    pub fn lifecycle_role(&self, method: &MethodSymbol) -> LifecycleRole {
        let role = self.own_role(method);
        if role != LifecycleRole::None {
            return role;
        }
        match method
            .overridden_method
            .and_then(|id| self.store.method(id))
        {
            Some(base) => {
                trace!(method = %method.id, base = %base.id, "following override chain");
                self.lifecycle_role(base)
            }
            None => LifecycleRole::None,
        }
    }

    /// True if the method, or any method it overrides, carries a test or
    /// setup/teardown attribute.
    pub fn is_test_related_method(&self, method: &MethodSymbol) -> bool {
        self.lifecycle_role(method) != LifecycleRole::None
    }

    // ------------------------------------------------------------------------
    // Fixtures
    // ------------------------------------------------------------------------

    /// True if any method declared directly on the type is test related.
    ///
    /// Inherited test methods that the type does not override are not
    /// seen here; classify the base type for those.
    pub fn is_test_fixture(&self, type_id: SymbolId) -> bool {
        self.store
            .members_of(type_id)
            .any(|m| self.is_test_related_method(m))
    }

    /// The instancing policy selected by the fixture lifecycle attribute.
    ///
    /// Any deviation from a single enum constant of the lifecycle enum equal
    /// to its per-test-case member yields [`FixtureInstancingPolicy::Shared`].
    pub fn fixture_instancing_policy(&self, type_id: SymbolId) -> FixtureInstancingPolicy {
        let names = &self.config.lifecycle;
        let Some(attribute) = self
            .store
            .all_attributes(type_id)
            .into_iter()
            .find(|a| self.store.is_type(a.class_id, &names.fixture_attribute))
        else {
            return FixtureInstancingPolicy::Shared;
        };

        let [argument] = attribute.constructor_args.as_slice() else {
            debug!(
                fixture = %type_id,
                args = attribute.constructor_args.len(),
                "lifecycle attribute without exactly one argument, using shared policy"
            );
            return FixtureInstancingPolicy::Shared;
        };
        let Some(enum_type) = argument
            .type_id
            .filter(|_| argument.kind == ConstantKind::Enum)
            .filter(|&t| self.store.is_type(t, &names.lifecycle_enum))
        else {
            debug!(fixture = %type_id, "lifecycle argument is not the lifecycle enum");
            return FixtureInstancingPolicy::Shared;
        };

        let per_test_case = self
            .store
            .enum_member_value(enum_type, &names.per_test_case_member)
            .unwrap_or(names.per_test_case_sentinel);
        if argument.as_int() == Some(per_test_case) {
            FixtureInstancingPolicy::PerTestCase
        } else {
            FixtureInstancingPolicy::Shared
        }
    }
}
