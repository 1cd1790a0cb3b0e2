//! Error types and error code constants for assertshift.
//!
//! The classification and matching queries are total and never fail. Errors
//! only come from the surfaces around them: populating a [`SymbolStore`],
//! loading a [`FrameworkConfig`], rewriting a call-site that does not have
//! the shape its rule expects, or installing the tracing subscriber.
//!
//! ## Error Code Mapping
//!
//! - `2`: Invalid input (malformed snapshot data from the host)
//! - `3`: Resolution errors (unknown symbol)
//! - `4`: Rewrite errors (argument indices out of range)
//! - `6`: Configuration errors (unreadable or unparsable config)
//! - `10`: Internal errors (bugs, unexpected state)
//!
//! [`SymbolStore`]: crate::symbols::SymbolStore
//! [`FrameworkConfig`]: crate::config::FrameworkConfig

use std::fmt;
use std::io;

use thiserror::Error;

use crate::symbols::SymbolId;

// ============================================================================
// Error Codes
// ============================================================================

/// Stable numeric codes for errors surfaced to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ErrorCode {
    /// Malformed input from the host.
    InvalidInput = 2,
    /// A referenced symbol does not exist in the snapshot.
    Resolution = 3,
    /// A rewrite could not be produced for the call-site.
    Rewrite = 4,
    /// Configuration could not be read or parsed.
    Config = 6,
    /// Bugs, unexpected state.
    Internal = 10,
}

impl ErrorCode {
    /// Get the numeric code value.
    pub fn code(&self) -> u8 {
        *self as u8
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

// ============================================================================
// Unified Error Type
// ============================================================================

/// Unified error type for assertshift.
#[derive(Debug, Error)]
pub enum ShiftError {
    /// Malformed input from the host.
    #[error("invalid input: {message}")]
    InvalidInput { message: String },

    /// A symbol id does not resolve in the store.
    #[error("unknown symbol {id} ({context})")]
    UnknownSymbol { id: SymbolId, context: String },

    /// The call-site does not hold the arguments the rule consumes.
    #[error("cannot rewrite '{rule}': {message}")]
    Rewrite { rule: String, message: String },

    /// Configuration could not be parsed.
    #[error("config error: {message}")]
    Config { message: String },

    /// IO error while reading a config or snapshot file.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Internal error (bug or unexpected state).
    #[error("internal error: {message}")]
    Internal { message: String },
}

impl From<toml::de::Error> for ShiftError {
    fn from(err: toml::de::Error) -> Self {
        ShiftError::Config {
            message: err.to_string(),
        }
    }
}

impl From<&ShiftError> for ErrorCode {
    fn from(err: &ShiftError) -> Self {
        match err {
            ShiftError::InvalidInput { .. } => ErrorCode::InvalidInput,
            ShiftError::Json(_) => ErrorCode::InvalidInput,
            ShiftError::UnknownSymbol { .. } => ErrorCode::Resolution,
            ShiftError::Rewrite { .. } => ErrorCode::Rewrite,
            ShiftError::Config { .. } => ErrorCode::Config,
            ShiftError::Io(_) => ErrorCode::Internal,
            ShiftError::Internal { .. } => ErrorCode::Internal,
        }
    }
}

// ============================================================================
// Convenience Constructors
// ============================================================================

impl ShiftError {
    /// Create an invalid input error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        ShiftError::InvalidInput {
            message: message.into(),
        }
    }

    /// Create an unknown symbol error.
    pub fn unknown_symbol(id: SymbolId, context: impl Into<String>) -> Self {
        ShiftError::UnknownSymbol {
            id,
            context: context.into(),
        }
    }

    /// Create a rewrite error for the named rule.
    pub fn rewrite(rule: impl Into<String>, message: impl Into<String>) -> Self {
        ShiftError::Rewrite {
            rule: rule.into(),
            message: message.into(),
        }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        ShiftError::Config {
            message: message.into(),
        }
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ShiftError::Internal {
            message: message.into(),
        }
    }

    /// Get the error code for this error.
    pub fn error_code(&self) -> ErrorCode {
        ErrorCode::from(self)
    }
}

/// Result alias used across assertshift.
pub type ShiftResult<T> = Result<T, ShiftError>;

// ============================================================================
// Tests
// ============================================================================
