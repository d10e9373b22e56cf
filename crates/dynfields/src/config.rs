//! Selector configuration: parameter names and separators.
//!
//! The defaults match the conventional query interface
//! (`?fields=id,class_pet__name&omit=age`).

use serde::{Deserialize, Serialize};

use crate::error::DynFieldsError;

pub const DEFAULT_FIELDS_PARAM: &str = "fields";
pub const DEFAULT_OMIT_PARAM: &str = "omit";
pub const DEFAULT_PATH_SEPARATOR: &str = "__";
pub const DEFAULT_LIST_SEPARATOR: char = ',';

/// How selector strings are named and tokenized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Query parameter holding the include selector.
    pub fields_param: String,
    /// Query parameter holding the omit selector.
    pub omit_param: String,
    /// Separator between path segments inside one token.
    pub path_separator: String,
    /// Separator between tokens.
    pub list_separator: char,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            fields_param: DEFAULT_FIELDS_PARAM.to_string(),
            omit_param: DEFAULT_OMIT_PARAM.to_string(),
            path_separator: DEFAULT_PATH_SEPARATOR.to_string(),
            list_separator: DEFAULT_LIST_SEPARATOR,
        }
    }
}

impl Config {
    /// Check that the configuration can tokenize unambiguously.
    pub fn validate(&self) -> Result<(), DynFieldsError> {
        if self.fields_param.is_empty() || self.omit_param.is_empty() {
            return Err(DynFieldsError::InvalidConfig(
                "parameter names cannot be empty".to_string(),
            ));
        }
        if self.fields_param == self.omit_param {
            return Err(DynFieldsError::InvalidConfig(format!(
                "fields and omit both read '{}'",
                self.fields_param
            )));
        }
        if self.path_separator.is_empty() {
            return Err(DynFieldsError::InvalidConfig(
                "path separator cannot be empty".to_string(),
            ));
        }
        if self.path_separator.contains(self.list_separator) {
            return Err(DynFieldsError::InvalidConfig(format!(
                "path separator '{}' contains the list separator '{}'",
                self.path_separator, self.list_separator
            )));
        }
        Ok(())
    }

    /// Join path segments back into a single token string.
    pub fn join_path<S: AsRef<str>>(&self, segments: &[S]) -> String {
        segments
            .iter()
            .map(|s| s.as_ref())
            .collect::<Vec<_>>()
            .join(&self.path_separator)
    }
}
