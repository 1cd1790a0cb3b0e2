//! assertshift: classic-to-constraint assertion migration engine
//!
//! Rewrites fixed-arity classic assertions such as
//! `ClassicAssert.Greater(a, b)` into constraint-model calls such as
//! `Assert.That(a, Is.GreaterThan(b))`, and classifies test-lifecycle
//! methods and fixtures from their attributes.
//!
//! The host owns parsing and symbol resolution. It hands the engine a
//! [`SymbolStore`](symbols::SymbolStore) snapshot and [`CallSite`](syntax::CallSite)s
//! and gets back argument lists, fixes and classifications. Nothing here
//! mutates host syntax.

// Core data model - re-exported from assertshift-core
pub use assertshift_core::config;
pub use assertshift_core::error;
pub use assertshift_core::symbols;
pub use assertshift_core::syntax;
pub use assertshift_core::types;

// Classification
pub mod attributes;
pub mod params;

// Rewriting
pub mod constraint;
pub mod matcher;
pub mod rewrite;
pub mod rules;

// Host-facing output
pub mod fix;
pub mod logging;
