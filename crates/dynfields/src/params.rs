//! Reading raw selectors from a request context.
//!
//! The request itself belongs to the surrounding web stack; all dynfields
//! needs is something that answers "what was passed for parameter X".
//! [`SelectorSource`] is that seam. Two sources ship with the crate: a parsed
//! URL query string ([`QueryParams`]) and a JSON object, for contexts that
//! carry selectors as JSON.

use std::collections::HashMap;

use serde_json::{Map, Value};

use crate::config::Config;
use crate::selector::Selectors;

/// What a source holds for one parameter name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawParam {
    Absent,
    Text(String),
    /// The parameter was given more than once; values are joined with the
    /// configured list separator.
    List(Vec<String>),
    /// Present but unusable as a selector string.
    Malformed(String),
}

/// Anything that can answer for a request's selector parameters.
pub trait SelectorSource {
    fn raw(&self, name: &str) -> RawParam;
}

/// Decoded `key=value` pairs of a URL query string, in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    /// Parse a query string, with or without its leading `?`.
    ///
    /// A bare key (`?fields`) decodes to an empty value, which keeps it
    /// distinct from an absent key.
    pub fn parse(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let pairs = url::form_urlencoded::parse(query.as_bytes())
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        Self { pairs }
    }

    /// Parse the query part of a URI. Accepts absolute URLs as well as
    /// request targets like `/api/v1/schools/?fields=id`.
    pub fn from_uri(uri: &str) -> Self {
        let without_fragment = uri.split('#').next().unwrap_or_default();
        match without_fragment.split_once('?') {
            Some((_, query)) => Self::parse(query),
            None => Self::default(),
        }
    }

    /// All values given for `name`, in order.
    pub fn get_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.pairs
            .iter()
            .filter(move |(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }
}

impl SelectorSource for QueryParams {
    fn raw(&self, name: &str) -> RawParam {
        let mut values: Vec<String> = self.get_all(name).map(str::to_string).collect();
        match values.len() {
            0 => RawParam::Absent,
            1 => RawParam::Text(values.remove(0)),
            _ => RawParam::List(values),
        }
    }
}

impl SelectorSource for Map<String, Value> {
    fn raw(&self, name: &str) -> RawParam {
        match self.get(name) {
            None | Some(Value::Null) => RawParam::Absent,
            Some(Value::String(s)) => RawParam::Text(s.clone()),
            Some(Value::Array(items)) => items
                .iter()
                .map(|v| v.as_str().map(str::to_string))
                .collect::<Option<Vec<_>>>()
                .map(RawParam::List)
                .unwrap_or_else(|| RawParam::Malformed("array with non-string items".to_string())),
            Some(other) => RawParam::Malformed(format!("expected a string, found {}", kind(other))),
        }
    }
}

impl SelectorSource for HashMap<String, String> {
    fn raw(&self, name: &str) -> RawParam {
        match self.get(name) {
            Some(v) => RawParam::Text(v.clone()),
            None => RawParam::Absent,
        }
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

impl Selectors {
    /// Read `fields` and `omit` from a request context.
    ///
    /// A malformed parameter reads as absent: no filtering for `fields`,
    /// nothing omitted for `omit`.
    pub fn from_source(source: &dyn SelectorSource, config: &Config) -> Self {
        Self {
            fields: read_param(source, &config.fields_param, config),
            omit: read_param(source, &config.omit_param, config),
        }
    }
}

fn read_param(source: &dyn SelectorSource, name: &str, config: &Config) -> Option<String> {
    match source.raw(name) {
        RawParam::Absent => None,
        RawParam::Text(text) => Some(text),
        RawParam::List(values) => Some(values.join(&config.list_separator.to_string())),
        RawParam::Malformed(reason) => {
            tracing::debug!(param = name, %reason, "ignoring malformed selector");
            None
        }
    }
}
