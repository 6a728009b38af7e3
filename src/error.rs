//! Error types for critsql.

use thiserror::Error;

use crate::types::TypeTag;

/// The main error type for critsql operations.
#[derive(Debug, Error)]
pub enum CritError {
    /// A criterion was built from a value of the wrong shape.
    #[error("Invalid value for criterion on '{field}': {message}")]
    InvalidCriterionValue { field: String, message: String },

    /// Two branches of a group bind the same parameter name.
    #[error("Duplicate parameter key: '{0}'")]
    DuplicateParameterKey(String),

    /// The vendor has no type for this tag in the requested context.
    #[error("Unsupported type {tag} for {context}")]
    UnsupportedType { tag: TypeTag, context: &'static str },

    /// Failed to parse a binding or field spec.
    #[error("Parse error at position {position}: {message}")]
    Parse { position: usize, message: String },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CritError {
    /// Create a parse error at the given position.
    pub fn parse(position: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            position,
            message: message.into(),
        }
    }

    /// Create an invalid criterion value error for a field.
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidCriterionValue {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Result type alias for critsql operations.
pub type CritResult<T> = Result<T, CritError>;
