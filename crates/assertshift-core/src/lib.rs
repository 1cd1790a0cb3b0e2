//! Core data model for assertshift.
//!
//! This crate holds everything the host hands to the engine:
//! - Symbol store for types, methods, attributes and parameters
//! - Syntax fragments: expressions, arguments, call sites
//! - Framework configuration (assertion classes, attribute names)
//! - Error types and error codes
//! - Source spans

pub mod config;
pub mod error;
pub mod symbols;
pub mod syntax;
pub mod types;
