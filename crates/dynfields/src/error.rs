//! Error types for dynfields.
//!
//! Selection itself never fails: missing context, malformed selectors and
//! unknown field names are all recovered while resolving. [`DynFieldsError`]
//! only covers mistakes made while *building* a schema tree or a
//! [`Config`](crate::Config).

use std::fmt;

/// Errors raised while constructing schemas or configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DynFieldsError {
    /// The same field name was declared twice on one node.
    DuplicateField { path: String, field: String },
    /// A schema nests deeper than [`MAX_DEPTH`](crate::tree::MAX_DEPTH),
    /// usually because a type refers to itself.
    SchemaTooDeep { path: String },
    /// A configuration value is unusable (empty separator, clashing names).
    InvalidConfig(String),
}

impl fmt::Display for DynFieldsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateField { path, field } => {
                if path.is_empty() {
                    write!(f, "Duplicate field '{}' at the root", field)
                } else {
                    write!(f, "Duplicate field '{}' at '{}'", field, path)
                }
            }
            Self::SchemaTooDeep { path } => {
                write!(f, "Schema nests too deeply at '{}'", path)
            }
            Self::InvalidConfig(msg) => write!(f, "Invalid configuration: {}", msg),
        }
    }
}

impl std::error::Error for DynFieldsError {}
