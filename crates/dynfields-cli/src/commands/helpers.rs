use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Args;
use dynfields::{Config, QueryParams, Selectors};

/// Input document and selectors shared by `project` and `explain`.
#[derive(Debug, Args)]
pub struct SelectorArgs {
    /// JSON document to read. Reads stdin when omitted or `-`.
    pub file: Option<PathBuf>,
    /// Fields to include (comma-separated, `__` between nesting levels).
    #[arg(short, long)]
    pub fields: Option<String>,
    /// Fields to omit (comma-separated, `__` between nesting levels).
    #[arg(short, long)]
    pub omit: Option<String>,
    /// Read selectors from a query string or URL instead (e.g. "?fields=id&omit=age").
    #[arg(short, long, conflicts_with_all = ["fields", "omit"])]
    pub query: Option<String>,
}

impl SelectorArgs {
    /// Raw selectors for this invocation.
    pub fn selectors(&self, config: &Config) -> Selectors {
        match &self.query {
            Some(query) => {
                let params = if is_request_target(query) {
                    QueryParams::from_uri(query)
                } else {
                    QueryParams::parse(query)
                };
                Selectors::from_source(&params, config)
            }
            None => Selectors {
                fields: self.fields.clone(),
                omit: self.omit.clone(),
            },
        }
    }

    /// Parse the input document.
    pub fn read_document(&self) -> anyhow::Result<serde_json::Value> {
        match self.file.as_deref() {
            Some(path) if path != Path::new("-") => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("could not read {}", path.display()))?;
                serde_json::from_str(&text)
                    .with_context(|| format!("{} is not valid JSON", path.display()))
            }
            _ => {
                let mut text = String::new();
                std::io::stdin()
                    .read_to_string(&mut text)
                    .context("could not read stdin")?;
                serde_json::from_str(&text).context("stdin is not valid JSON")
            }
        }
    }
}

/// A URL or request path (`/schools/?fields=id`, `https://host/?fields=id`,
/// `?fields=id`), as opposed to a bare query string whose values may
/// themselves contain `?`.
fn is_request_target(query: &str) -> bool {
    query.starts_with('?') || query.starts_with('/') || query.contains("://")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(fields: Option<&str>, omit: Option<&str>, query: Option<&str>) -> SelectorArgs {
        SelectorArgs {
            file: None,
            fields: fields.map(str::to_string),
            omit: omit.map(str::to_string),
            query: query.map(str::to_string),
        }
    }

    #[test]
    fn flags_become_selectors() {
        let selectors = args(Some("id"), None, None).selectors(&Config::default());
        assert_eq!(selectors, Selectors::new().fields("id"));
    }

    #[test]
    fn bare_query_string() {
        let selectors = args(None, None, Some("fields=id&omit=age")).selectors(&Config::default());
        assert_eq!(selectors, Selectors::new().fields("id").omit("age"));
    }

    #[test]
    fn question_mark_inside_a_bare_query_is_a_value() {
        let selectors =
            args(None, None, Some("fields=id&omit=a?b")).selectors(&Config::default());
        assert_eq!(selectors, Selectors::new().fields("id").omit("a?b"));
    }

    #[test]
    fn leading_question_mark_and_absolute_url() {
        let config = Config::default();
        assert_eq!(
            args(None, None, Some("?omit=age")).selectors(&config),
            Selectors::new().omit("age")
        );
        assert_eq!(
            args(None, None, Some("https://api.test/schools/?fields=id")).selectors(&config),
            Selectors::new().fields("id")
        );
    }

    #[test]
    fn query_from_url() {
        let selectors =
            args(None, None, Some("/api/v1/schools/?fields")).selectors(&Config::default());
        assert_eq!(selectors, Selectors::new().fields(""));
    }
}
