//! Error types for depprov.

use std::fmt;

/// Unified error type for all provenance operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProvError {
    /// Validation error with field context
    Validation { field: String, message: String },
    /// Version string is not a valid semantic version
    InvalidVersionFormat { value: String },
    /// Unknown binding source label
    UnknownSource { value: String },
    /// No build of a shared library was published for the requested version
    SharedLibraryMissing { dependency_id: String, version: String },
    /// Configuration rejected
    Config { key: String, message: String },
    /// Serialization error
    Serialization { message: String },
}

impl fmt::Display for ProvError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation { field, message } => {
                write!(f, "validation error on '{}': {}", field, message)
            }
            Self::InvalidVersionFormat { value } => {
                write!(f, "invalid semantic version: '{}'", value)
            }
            Self::UnknownSource { value } => {
                write!(f, "unknown binding source: '{}'", value)
            }
            Self::SharedLibraryMissing { dependency_id, version } => {
                write!(f, "shared library {}@{} not loaded", dependency_id, version)
            }
            Self::Config { key, message } => {
                write!(f, "invalid configuration '{}': {}", key, message)
            }
            Self::Serialization { message } => {
                write!(f, "serialization error: {}", message)
            }
        }
    }
}

impl std::error::Error for ProvError {}

/// Result type alias for provenance operations.
pub type ProvResult<T> = Result<T, ProvError>;

impl From<serde_json::Error> for ProvError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization { message: e.to_string() }
    }
}
