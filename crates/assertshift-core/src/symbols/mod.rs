//! Symbol model: the host's view of one compilation snapshot.
//!
//! This module provides the semantic data the classifiers query:
//! - [`TypeSymbol`]: classes, interfaces, structs and enums, with their base
//!   type, declared interfaces, attributes and interface-implementation map
//! - [`MethodSymbol`]: methods with their parameters, attributes and
//!   override target
//! - [`AttributeData`] / [`TypedConstant`]: applied attributes and their
//!   compile-time constructor arguments
//!
//! The [`SymbolStore`] owns all symbols and allocates their [`SymbolId`]s.
//! It is populated by the host in dependency order (a base type before the
//! types deriving from it, an overridden method before its overrides) and
//! is never mutated by the engine.
//!
//! # Acyclicity
//!
//! Base-type chains, containing-type chains and override chains are
//! assumed acyclic. Insertion order makes cycles impossible to build
//! through the `insert_*` API; snapshots deserialized from JSON are trusted
//! to uphold the same invariant.
//!
//! # Metadata Names
//!
//! Types are matched by their full metadata name: namespace segments joined
//! with `.`, nested types joined to their container with `+`, and generic
//! arity appended as `` `N ``. For example `NUnit.Framework.LifeCycle` or
//! `Outer+Inner`1`.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ShiftError, ShiftResult};

// ============================================================================
// ID Types
// ============================================================================

/// Unique identifier for a symbol within a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct SymbolId(pub u32);

impl SymbolId {
    /// Create a new symbol ID.
    pub fn new(id: u32) -> Self {
        SymbolId(id)
    }
}

impl fmt::Display for SymbolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sym_{}", self.0)
    }
}

// ============================================================================
// Enums
// ============================================================================

/// Kind of type symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TypeKind {
    #[default]
    Class,
    Interface,
    Struct,
    Enum,
}

/// Kind of a compile-time constant passed to an attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstantKind {
    /// Numbers, booleans, strings and `null`.
    Primitive,
    /// A value of an enum type.
    Enum,
    /// A `typeof(...)` argument.
    Type,
    /// An array of constants.
    Array,
    /// The host could not evaluate the argument.
    Error,
}

/// Value carried by a [`TypedConstant`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum ConstantValue {
    Null,
    Bool(bool),
    /// Integral values, including the underlying value of enum constants.
    Int(i64),
    String(String),
    /// The type named by a `typeof(...)` argument.
    Type(SymbolId),
    Array(Vec<TypedConstant>),
}

// ============================================================================
// Attribute Data
// ============================================================================

/// A compile-time constant argument of an applied attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypedConstant {
    /// How the constant was written.
    pub kind: ConstantKind,
    /// The constant's type, when the host resolved it.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub type_id: Option<SymbolId>,
    /// The constant value.
    pub value: ConstantValue,
}

impl TypedConstant {
    /// An enum constant of the given enum type with its underlying value.
    pub fn enum_value(enum_type: SymbolId, value: i64) -> Self {
        TypedConstant {
            kind: ConstantKind::Enum,
            type_id: Some(enum_type),
            value: ConstantValue::Int(value),
        }
    }

    /// An integral primitive constant.
    pub fn int(value: i64) -> Self {
        TypedConstant {
            kind: ConstantKind::Primitive,
            type_id: None,
            value: ConstantValue::Int(value),
        }
    }

    /// A string primitive constant.
    pub fn string(value: impl Into<String>) -> Self {
        TypedConstant {
            kind: ConstantKind::Primitive,
            type_id: None,
            value: ConstantValue::String(value.into()),
        }
    }

    /// A `typeof(...)` constant.
    pub fn type_of(type_id: SymbolId) -> Self {
        TypedConstant {
            kind: ConstantKind::Type,
            type_id: None,
            value: ConstantValue::Type(type_id),
        }
    }

    /// The integral value, if this constant carries one.
    pub fn as_int(&self) -> Option<i64> {
        match self.value {
            ConstantValue::Int(v) => Some(v),
            _ => None,
        }
    }
}

/// An attribute applied to a type or method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeData {
    /// The attribute class.
    pub class_id: SymbolId,
    /// Positional constructor arguments in source order.
    #[serde(default)]
    pub constructor_args: Vec<TypedConstant>,
    /// Named (property) arguments in source order.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub named_args: Vec<(String, TypedConstant)>,
}

impl AttributeData {
    /// An attribute application without arguments.
    pub fn new(class_id: SymbolId) -> Self {
        AttributeData {
            class_id,
            constructor_args: vec![],
            named_args: vec![],
        }
    }

    /// Set the constructor arguments.
    pub fn with_args(mut self, args: Vec<TypedConstant>) -> Self {
        self.constructor_args = args;
        self
    }

    /// Add a named argument.
    pub fn with_named_arg(mut self, name: impl Into<String>, value: TypedConstant) -> Self {
        self.named_args.push((name.into(), value));
        self
    }
}

// ============================================================================
// Parameters and Methods
// ============================================================================

/// A formal parameter of a method.
///
/// `is_optional` and `is_params` are independent flags as reported by the
/// host; classification decides precedence between them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    /// Parameter name.
    pub name: String,
    /// Declared type, as written by the host (informational).
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub type_name: Option<String>,
    /// The parameter has a default value.
    #[serde(skip_serializing_if = "std::ops::Not::not", default)]
    pub is_optional: bool,
    /// The parameter accepts a variable-length tail (`params T[]`).
    #[serde(skip_serializing_if = "std::ops::Not::not", default)]
    pub is_params: bool,
}

impl Parameter {
    /// A required parameter.
    pub fn regular(name: impl Into<String>) -> Self {
        Parameter {
            name: name.into(),
            type_name: None,
            is_optional: false,
            is_params: false,
        }
    }

    /// A parameter with a default value.
    pub fn optional(name: impl Into<String>) -> Self {
        Parameter {
            is_optional: true,
            ..Self::regular(name)
        }
    }

    /// A variadic parameter.
    pub fn params(name: impl Into<String>) -> Self {
        Parameter {
            is_params: true,
            ..Self::regular(name)
        }
    }

    /// Set the declared type.
    pub fn with_type(mut self, type_name: impl Into<String>) -> Self {
        self.type_name = Some(type_name.into());
        self
    }
}

/// A method symbol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodSymbol {
    /// Unique identifier.
    pub id: SymbolId,
    /// Simple name (`Greater`, `SetUp`, ...).
    pub name: String,
    /// The type declaring this method.
    pub containing_type: SymbolId,
    /// Number of generic method type parameters (`IsInstanceOf<T>` has 1).
    #[serde(default)]
    pub type_arity: u32,
    /// Parameters in declaration order.
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    /// Attributes applied directly to this method.
    #[serde(default)]
    pub attributes: Vec<AttributeData>,
    /// The base-class method this method overrides. A back-reference only.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub overridden_method: Option<SymbolId>,
}

impl MethodSymbol {
    /// Create a method with no parameters or attributes.
    pub fn new(id: SymbolId, containing_type: SymbolId, name: impl Into<String>) -> Self {
        MethodSymbol {
            id,
            name: name.into(),
            containing_type,
            type_arity: 0,
            parameters: vec![],
            attributes: vec![],
            overridden_method: None,
        }
    }

    /// Set the parameters.
    pub fn with_params(mut self, params: Vec<Parameter>) -> Self {
        self.parameters = params;
        self
    }

    /// Add an attribute.
    pub fn with_attribute(mut self, attribute: AttributeData) -> Self {
        self.attributes.push(attribute);
        self
    }

    /// Set the number of generic method type parameters.
    pub fn with_type_arity(mut self, type_arity: u32) -> Self {
        self.type_arity = type_arity;
        self
    }

    /// True if the method declares its own type parameters.
    pub fn is_generic(&self) -> bool {
        self.type_arity > 0
    }

    /// Set the overridden method.
    pub fn overriding(mut self, method: SymbolId) -> Self {
        self.overridden_method = Some(method);
        self
    }
}

// ============================================================================
// Types
// ============================================================================

/// A named enum member and its underlying value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumMember {
    pub name: String,
    pub value: i64,
}

/// One entry of a type's interface-implementation map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterfaceImpl {
    /// The interface member being implemented.
    pub interface_method: SymbolId,
    /// The method the language's dispatch rules select for it.
    pub implementation: SymbolId,
}

/// A type symbol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeSymbol {
    /// Unique identifier.
    pub id: SymbolId,
    /// Kind of type.
    pub kind: TypeKind,
    /// Simple name without arity (`List`, not ``List`1``).
    pub name: String,
    /// Dotted namespace; empty for the global namespace. Ignored for
    /// nested types, which take their container's.
    #[serde(default)]
    pub namespace: String,
    /// Number of generic type parameters.
    #[serde(skip_serializing_if = "is_zero", default)]
    pub arity: u32,
    /// Enclosing type for nested types.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub containing_type: Option<SymbolId>,
    /// Direct base class.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub base_type: Option<SymbolId>,
    /// Directly declared interfaces.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub interfaces: Vec<SymbolId>,
    /// Attributes applied directly to this type.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub attributes: Vec<AttributeData>,
    /// Declared methods, in insertion order. Maintained by the store.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub members: Vec<SymbolId>,
    /// Interface members implemented by methods of this type.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub interface_impls: Vec<InterfaceImpl>,
    /// Enum members (enums only).
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub enum_members: Vec<EnumMember>,
}

fn is_zero(n: &u32) -> bool {
    *n == 0
}

impl TypeSymbol {
    /// Create a type of the given kind.
    pub fn new(
        id: SymbolId,
        kind: TypeKind,
        namespace: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        TypeSymbol {
            id,
            kind,
            name: name.into(),
            namespace: namespace.into(),
            arity: 0,
            containing_type: None,
            base_type: None,
            interfaces: vec![],
            attributes: vec![],
            members: vec![],
            interface_impls: vec![],
            enum_members: vec![],
        }
    }

    /// Create a class.
    pub fn class(id: SymbolId, namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(id, TypeKind::Class, namespace, name)
    }

    /// Create an interface.
    pub fn interface(id: SymbolId, namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(id, TypeKind::Interface, namespace, name)
    }

    /// Create an enum with the given members.
    pub fn enumeration(
        id: SymbolId,
        namespace: impl Into<String>,
        name: impl Into<String>,
        members: &[(&str, i64)],
    ) -> Self {
        let mut ty = Self::new(id, TypeKind::Enum, namespace, name);
        ty.enum_members = members
            .iter()
            .map(|(name, value)| EnumMember {
                name: (*name).to_string(),
                value: *value,
            })
            .collect();
        ty
    }

    /// Set the base type.
    pub fn with_base(mut self, base: SymbolId) -> Self {
        self.base_type = Some(base);
        self
    }

    /// Add a directly declared interface.
    pub fn with_interface(mut self, interface: SymbolId) -> Self {
        self.interfaces.push(interface);
        self
    }

    /// Add an attribute.
    pub fn with_attribute(mut self, attribute: AttributeData) -> Self {
        self.attributes.push(attribute);
        self
    }

    /// Nest this type inside another.
    pub fn nested_in(mut self, container: SymbolId) -> Self {
        self.containing_type = Some(container);
        self
    }

    /// Set the generic arity.
    pub fn with_arity(mut self, arity: u32) -> Self {
        self.arity = arity;
        self
    }
}

// ============================================================================
// Symbol Store
// ============================================================================

/// In-memory symbol table for one compilation snapshot.
///
/// Iteration over types and methods is deterministic (ordered by id).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SymbolStore {
    /// Next id to hand out.
    next_id: u32,
    types: BTreeMap<SymbolId, TypeSymbol>,
    methods: BTreeMap<SymbolId, MethodSymbol>,
}

impl SymbolStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a store previously serialized with `serde_json`.
    pub fn from_json_str(json: &str) -> ShiftResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Allocate the next symbol id.
    pub fn next_id(&mut self) -> SymbolId {
        let id = SymbolId(self.next_id);
        self.next_id = self.next_id.saturating_add(1);
        id
    }

    // ------------------------------------------------------------------------
    // Insertion
    // ------------------------------------------------------------------------

    /// Insert a type.
    ///
    /// Its container, base type, interfaces and attribute classes must
    /// already be present (an attribute class may be the type itself).
    pub fn insert_type(&mut self, ty: TypeSymbol) -> ShiftResult<()> {
        self.check_new_id(ty.id)?;
        if let Some(container) = ty.containing_type {
            self.require_type(container, "containing type")?;
        }
        if let Some(base) = ty.base_type {
            self.require_type(base, "base type")?;
        }
        for &iface in &ty.interfaces {
            self.require_type(iface, "interface")?;
        }
        for attr in &ty.attributes {
            if attr.class_id != ty.id {
                self.require_type(attr.class_id, "attribute class")?;
            }
        }
        self.bump_past(ty.id);
        self.types.insert(ty.id, ty);
        Ok(())
    }

    /// Insert a method and register it as a member of its containing type.
    pub fn insert_method(&mut self, method: MethodSymbol) -> ShiftResult<()> {
        self.check_new_id(method.id)?;
        self.require_type(method.containing_type, "containing type")?;
        if let Some(target) = method.overridden_method {
            if !self.methods.contains_key(&target) {
                return Err(ShiftError::unknown_symbol(target, "override target"));
            }
        }
        for attr in &method.attributes {
            self.require_type(attr.class_id, "attribute class")?;
        }
        self.bump_past(method.id);
        if let Some(owner) = self.types.get_mut(&method.containing_type) {
            owner.members.push(method.id);
        }
        self.methods.insert(method.id, method);
        Ok(())
    }

    /// Record that `implementation` is the method dispatched for
    /// `interface_method` on `type_id`.
    pub fn add_interface_impl(
        &mut self,
        type_id: SymbolId,
        interface_method: SymbolId,
        implementation: SymbolId,
    ) -> ShiftResult<()> {
        for (id, context) in [
            (interface_method, "interface method"),
            (implementation, "implementation"),
        ] {
            if !self.methods.contains_key(&id) {
                return Err(ShiftError::unknown_symbol(id, context));
            }
        }
        let ty = self
            .types
            .get_mut(&type_id)
            .ok_or_else(|| ShiftError::unknown_symbol(type_id, "implementing type"))?;
        ty.interface_impls.retain(|i| i.interface_method != interface_method);
        ty.interface_impls.push(InterfaceImpl {
            interface_method,
            implementation,
        });
        Ok(())
    }

    fn require_type(&self, id: SymbolId, context: &str) -> ShiftResult<()> {
        if self.types.contains_key(&id) {
            Ok(())
        } else {
            Err(ShiftError::unknown_symbol(id, context))
        }
    }

    /// Ids must be unused. `u32::MAX` is reserved so that an exhausted
    /// `next_id` can never hand out a live id.
    fn check_new_id(&self, id: SymbolId) -> ShiftResult<()> {
        if id.0 == u32::MAX {
            return Err(ShiftError::invalid_input(format!(
                "symbol id {} is reserved",
                id
            )));
        }
        if self.types.contains_key(&id) || self.methods.contains_key(&id) {
            return Err(ShiftError::invalid_input(format!(
                "duplicate symbol id {}",
                id
            )));
        }
        Ok(())
    }

    /// Keep `next_id` ahead of ids chosen by the host.
    fn bump_past(&mut self, id: SymbolId) {
        if id.0 >= self.next_id {
            self.next_id = id.0.saturating_add(1);
        }
    }

    // ------------------------------------------------------------------------
    // Lookups
    // ------------------------------------------------------------------------

    /// Look up a type by id.
    pub fn type_symbol(&self, id: SymbolId) -> Option<&TypeSymbol> {
        self.types.get(&id)
    }

    /// Look up a method by id.
    pub fn method(&self, id: SymbolId) -> Option<&MethodSymbol> {
        self.methods.get(&id)
    }

    /// All types, ordered by id.
    pub fn types(&self) -> impl Iterator<Item = &TypeSymbol> {
        self.types.values()
    }

    /// Number of types and methods in the store.
    pub fn len(&self) -> usize {
        self.types.len() + self.methods.len()
    }

    /// True if the store holds no symbols.
    pub fn is_empty(&self) -> bool {
        self.types.is_empty() && self.methods.is_empty()
    }

    /// Methods declared directly on a type, in insertion order.
    pub fn members_of(&self, type_id: SymbolId) -> impl Iterator<Item = &MethodSymbol> {
        self.types
            .get(&type_id)
            .map(|ty| ty.members.as_slice())
            .unwrap_or_default()
            .iter()
            .filter_map(|id| self.methods.get(id))
    }

    /// The type itself followed by its base types, nearest first.
    pub fn self_and_base_types(&self, type_id: SymbolId) -> BaseTypes<'_> {
        BaseTypes {
            store: self,
            next: self.types.get(&type_id),
        }
    }

    /// Every interface the type implements, directly, through a base type,
    /// or through interface inheritance. Deduplicated, in discovery order.
    pub fn all_interfaces(&self, type_id: SymbolId) -> Vec<SymbolId> {
        let mut found = Vec::new();
        for ty in self.self_and_base_types(type_id) {
            for &iface in &ty.interfaces {
                self.collect_interface(iface, &mut found);
            }
        }
        found
    }

    fn collect_interface(&self, iface: SymbolId, found: &mut Vec<SymbolId>) {
        if found.contains(&iface) {
            return;
        }
        found.push(iface);
        if let Some(ty) = self.types.get(&iface) {
            for &parent in &ty.interfaces {
                self.collect_interface(parent, found);
            }
        }
    }

    /// The type's own attributes followed by those of its base types.
    pub fn all_attributes(&self, type_id: SymbolId) -> Vec<&AttributeData> {
        self.self_and_base_types(type_id)
            .flat_map(|ty| ty.attributes.iter())
            .collect()
    }

    /// Full metadata name of a type (`Ns.Outer+Inner`1`).
    pub fn full_metadata_name(&self, type_id: SymbolId) -> Option<String> {
        let ty = self.types.get(&type_id)?;
        let mut name = metadata_simple_name(ty);
        let mut outermost = ty;
        while let Some(container_id) = outermost.containing_type {
            let container = self.types.get(&container_id)?;
            name = format!("{}+{}", metadata_simple_name(container), name);
            outermost = container;
        }
        if outermost.namespace.is_empty() {
            Some(name)
        } else {
            Some(format!("{}.{}", outermost.namespace, name))
        }
    }

    /// Find a type by its full metadata name.
    pub fn find_type_by_metadata_name(&self, name: &str) -> Option<&TypeSymbol> {
        self.types
            .values()
            .find(|ty| self.full_metadata_name(ty.id).as_deref() == Some(name))
    }

    /// True if the type has the given metadata name.
    pub fn is_type(&self, type_id: SymbolId, metadata_name: &str) -> bool {
        self.full_metadata_name(type_id).as_deref() == Some(metadata_name)
    }

    /// True if the type, or one of its base types, has the given name.
    pub fn is_or_derives_from(&self, type_id: SymbolId, metadata_name: &str) -> bool {
        self.self_and_base_types(type_id)
            .any(|ty| self.is_type(ty.id, metadata_name))
    }

    /// True if the type implements an interface with the given name.
    pub fn implements_interface(&self, type_id: SymbolId, metadata_name: &str) -> bool {
        self.all_interfaces(type_id)
            .into_iter()
            .any(|iface| self.is_type(iface, metadata_name))
    }

    /// The method the type dispatches `interface_method` to, looking at the
    /// type's own implementation map first and then at its base types.
    pub fn find_implementation_for_interface_member(
        &self,
        type_id: SymbolId,
        interface_method: SymbolId,
    ) -> Option<SymbolId> {
        self.self_and_base_types(type_id).find_map(|ty| {
            ty.interface_impls
                .iter()
                .find(|i| i.interface_method == interface_method)
                .map(|i| i.implementation)
        })
    }

    /// Underlying value of a named enum member.
    pub fn enum_member_value(&self, enum_type: SymbolId, member: &str) -> Option<i64> {
        self.types
            .get(&enum_type)?
            .enum_members
            .iter()
            .find(|m| m.name == member)
            .map(|m| m.value)
    }
}

fn metadata_simple_name(ty: &TypeSymbol) -> String {
    if ty.arity > 0 {
        format!("{}`{}", ty.name, ty.arity)
    } else {
        ty.name.clone()
    }
}

/// Iterator over a type and its base types. See
/// [`SymbolStore::self_and_base_types`].
pub struct BaseTypes<'a> {
    store: &'a SymbolStore,
    next: Option<&'a TypeSymbol>,
}

impl<'a> Iterator for BaseTypes<'a> {
    type Item = &'a TypeSymbol;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.base_type.and_then(|b| self.store.types.get(&b));
        Some(current)
    }
}

// ============================================================================
// Tests
// ============================================================================
