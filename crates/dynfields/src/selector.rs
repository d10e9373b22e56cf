//! Selector strings and their tokenization.
//!
//! A selector is a comma-separated list of tokens; each token is a path of
//! field names joined by the configured path separator (`__` by default):
//!
//! ```text
//! fields=id,teachers__name,teachers__class_pet__age
//!        ^^ ^^^^^^^^^^^^^^ ^^^^^^^^^^^^^^^^^^^^^^^^
//!        token             token (3 segments)
//! ```
//!
//! Parsing is done fresh for every request and never fails. Blank tokens are
//! dropped. A doubled separator cuts a token short: `a____b` still selects
//! `a` at the root, but is too broken to omit anything. Tokens that start
//! with a separator or end in one (`__a`, `a__`) are dropped.

use crate::config::Config;

/// One selector token split into its path segments.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Token {
    segments: Vec<String>,
    truncated: bool,
}

impl Token {
    /// Split a single raw token. Returns `None` for blank or malformed tokens.
    pub fn parse(raw: &str, config: &Config) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        let parts: Vec<&str> = raw.split(config.path_separator.as_str()).collect();
        let Some(cut) = parts.iter().position(|s| s.is_empty()) else {
            return Some(Self {
                segments: parts.into_iter().map(str::to_string).collect(),
                truncated: false,
            });
        };
        // An empty segment must sit between named ones.
        if cut == 0 || parts[cut..].iter().all(|s| s.is_empty()) {
            return None;
        }
        Some(Self {
            segments: parts[..cut].iter().map(|s| s.to_string()).collect(),
            truncated: true,
        })
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// False when a doubled separator cut the token short; only the
    /// segments before the cut were kept.
    pub fn is_complete(&self) -> bool {
        !self.truncated
    }

    /// Number of path segments; always at least one.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Whether the first `path.len()` segments equal `path`.
    pub fn starts_with<S: AsRef<str>>(&self, path: &[S]) -> bool {
        self.segments.len() >= path.len()
            && self
                .segments
                .iter()
                .zip(path)
                .all(|(seg, p)| seg == p.as_ref())
    }

    /// The segment at `depth`, i.e. the name this token selects at a node of
    /// that depth.
    pub fn segment(&self, depth: usize) -> Option<&str> {
        self.segments.get(depth).map(String::as_str)
    }
}

/// A parsed selector: its non-blank tokens in the order given.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectorList {
    tokens: Vec<Token>,
}

impl SelectorList {
    pub fn parse(raw: &str, config: &Config) -> Self {
        let tokens = raw
            .split(config.list_separator)
            .filter_map(|t| Token::parse(t, config))
            .collect();
        Self { tokens }
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// True when the selector held only blank or malformed tokens.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// The raw `fields` / `omit` strings of one request.
///
/// `None` means the parameter was absent; `Some("")` means it was present
/// but empty (`?fields`), which is a different request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Selectors {
    pub fields: Option<String>,
    pub omit: Option<String>,
}

impl Selectors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fields(mut self, fields: impl Into<String>) -> Self {
        self.fields = Some(fields.into());
        self
    }

    pub fn omit(mut self, omit: impl Into<String>) -> Self {
        self.omit = Some(omit.into());
        self
    }

    /// Tokenize both selectors. An absent `omit` becomes an empty list.
    pub fn parse(&self, config: &Config) -> ParsedSelectors {
        ParsedSelectors {
            fields: self
                .fields
                .as_deref()
                .map(|raw| SelectorList::parse(raw, config)),
            omit: self
                .omit
                .as_deref()
                .map(|raw| SelectorList::parse(raw, config))
                .unwrap_or_default(),
        }
    }
}

/// Tokenized selectors, ready for the path resolver.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedSelectors {
    pub fields: Option<SelectorList>,
    pub omit: SelectorList,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segs(list: &SelectorList) -> Vec<Vec<&str>> {
        list.tokens()
            .iter()
            .map(|t| t.segments().iter().map(String::as_str).collect())
            .collect()
    }

    #[test]
    fn splits_tokens_and_segments() {
        let list = SelectorList::parse("id,class_pet__name", &Config::default());
        assert_eq!(segs(&list), vec![vec!["id"], vec!["class_pet", "name"]]);
    }

    #[test]
    fn blank_selector_has_no_tokens() {
        let config = Config::default();
        assert!(SelectorList::parse("", &config).is_empty());
        assert!(SelectorList::parse(",, ,", &config).is_empty());
    }

    #[test]
    fn tokens_are_trimmed() {
        let list = SelectorList::parse(" id , name ", &Config::default());
        assert_eq!(segs(&list), vec![vec!["id"], vec!["name"]]);
    }

    #[test]
    fn dangling_separators_drop_the_token() {
        let list = SelectorList::parse("a__,__a,ok,____", &Config::default());
        assert_eq!(segs(&list), vec![vec!["ok"]]);
    }

    #[test]
    fn doubled_separator_keeps_leading_segments() {
        let list = SelectorList::parse("a____b,x__y______z", &Config::default());
        assert_eq!(segs(&list), vec![vec!["a"], vec!["x", "y"]]);
        assert!(list.tokens().iter().all(|t| !t.is_complete()));
        assert!(Token::parse("a__b", &Config::default()).unwrap().is_complete());
    }

    #[test]
    fn single_underscore_is_part_of_the_name() {
        let list = SelectorList::parse("class_pet", &Config::default());
        assert_eq!(segs(&list), vec![vec!["class_pet"]]);
    }

    #[test]
    fn dotted_paths_with_custom_separator() {
        let config = Config {
            path_separator: ".".to_string(),
            ..Config::default()
        };
        let list = SelectorList::parse("teachers.class_pet.name", &config);
        assert_eq!(segs(&list), vec![vec!["teachers", "class_pet", "name"]]);
    }

    #[test]
    fn starts_with_compares_segments() {
        let token = Token::parse("teachers__class_pet__name", &Config::default()).unwrap();
        assert!(token.starts_with::<&str>(&[]));
        assert!(token.starts_with(&["teachers"]));
        assert!(token.starts_with(&["teachers", "class_pet"]));
        assert!(!token.starts_with(&["teacher"]));
        assert!(!token.starts_with(&["teachers", "class_pet", "name", "x"]));
        assert_eq!(token.segment(1), Some("class_pet"));
        assert_eq!(token.segment(3), None);
    }

    #[test]
    fn absent_and_empty_fields_stay_distinct() {
        let config = Config::default();
        let absent = Selectors::new().parse(&config);
        assert!(absent.fields.is_none());
        let empty = Selectors::new().fields("").parse(&config);
        assert_eq!(empty.fields, Some(SelectorList::default()));
    }

    #[test]
    fn absent_omit_parses_to_empty_list() {
        let parsed = Selectors::new().fields("id").parse(&Config::default());
        assert!(parsed.omit.is_empty());
    }
}
