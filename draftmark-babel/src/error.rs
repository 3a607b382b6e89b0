//! Error types for format operations

use draftmark_core::ValidationError;
use std::fmt;

/// Errors that can occur during format operations
///
/// Markdown parsing is a total function and never produces an error;
/// malformed input degrades to literal text instead. Rendering fails only
/// when the input document violates the model invariants.
#[derive(Debug, Clone, PartialEq)]
pub enum FormatError {
    /// Format not found in registry
    FormatNotFound(String),
    /// Error decoding source text (raw JSON documents only)
    ParseError(String),
    /// The document fails the model's structural invariants
    InvalidDocument(ValidationError),
    /// Error during serialization
    SerializationError(String),
    /// Format does not support parsing or serialization
    NotSupported(String),
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatError::FormatNotFound(name) => write!(f, "Format '{name}' not found"),
            FormatError::ParseError(msg) => write!(f, "Parse error: {msg}"),
            FormatError::InvalidDocument(err) => write!(f, "Invalid document: {err}"),
            FormatError::SerializationError(msg) => write!(f, "Serialization error: {msg}"),
            FormatError::NotSupported(msg) => write!(f, "Operation not supported: {msg}"),
        }
    }
}

impl std::error::Error for FormatError {}

impl From<ValidationError> for FormatError {
    fn from(err: ValidationError) -> Self {
        FormatError::InvalidDocument(err)
    }
}
