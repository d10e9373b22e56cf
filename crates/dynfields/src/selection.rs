//! The selection pass: run the resolver and the filter over every node.
//!
//! A [`Selection`] is computed from a tree and one request's selectors and
//! is never stored on the tree. Reusing a tree across requests is therefore
//! always safe; each request gets its own `Selection`.

use std::fmt;

use serde_json::Value;

use crate::config::Config;
use crate::filter;
use crate::params::SelectorSource;
use crate::project;
use crate::resolve;
use crate::selector::{ParsedSelectors, Selectors};
use crate::tree::{NodeId, SchemaTree};

/// Advisory conditions raised while selecting. None of them stop selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// No request context was available to read selectors from; every field
    /// was retained.
    MissingContext,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingContext => f.write_str("context does not have access to a request"),
        }
    }
}

/// Retained field names for every node of one [`SchemaTree`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    retained: Vec<Vec<String>>,
    diagnostics: Vec<Diagnostic>,
}

impl Selection {
    /// Keep every declared field.
    pub fn unfiltered(tree: &SchemaTree) -> Self {
        Self {
            retained: tree
                .iter()
                .map(|(_, node)| node.field_names().map(str::to_string).collect())
                .collect(),
            diagnostics: Vec::new(),
        }
    }

    /// Localize `selectors` to each node and filter its fields.
    pub fn resolve(tree: &SchemaTree, selectors: &ParsedSelectors) -> Self {
        let retained = tree
            .iter()
            .map(|(id, node)| {
                let path = tree.path(id);
                let local = resolve::resolve(&path, selectors);
                let declared: Vec<&str> = node.field_names().collect();
                let kept = filter::apply(&declared, &local);
                tracing::trace!(
                    path = ?path,
                    include = ?local.include,
                    omit = ?local.omit,
                    kept = ?kept,
                    "resolved node"
                );
                kept
            })
            .collect();
        Self {
            retained,
            diagnostics: Vec::new(),
        }
    }

    /// Parse raw selectors with `config` and resolve them.
    pub fn from_selectors(tree: &SchemaTree, selectors: &Selectors, config: &Config) -> Self {
        Self::resolve(tree, &selectors.parse(config))
    }

    /// Resolve the selectors of a request. Without a request every field is
    /// retained and [`Diagnostic::MissingContext`] is recorded.
    pub fn for_request(
        tree: &SchemaTree,
        source: Option<&dyn SelectorSource>,
        config: &Config,
    ) -> Self {
        match source {
            Some(source) => {
                Self::from_selectors(tree, &Selectors::from_source(source, config), config)
            }
            None => {
                tracing::warn!("{}; retaining all fields", Diagnostic::MissingContext);
                let mut selection = Self::unfiltered(tree);
                selection.diagnostics.push(Diagnostic::MissingContext);
                selection
            }
        }
    }

    /// Retained names of `id`, in declaration order.
    pub fn retained(&self, id: NodeId) -> &[String] {
        self.retained
            .get(id.index())
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn is_retained(&self, id: NodeId, name: &str) -> bool {
        self.retained(id).iter().any(|n| n == name)
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Render `value` through this selection. See [`project::project`].
    pub fn project(&self, tree: &SchemaTree, value: &Value) -> Value {
        project::project(tree, self, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::QueryParams;

    fn school_tree() -> SchemaTree {
        let mut tree = SchemaTree::new();
        let root = tree.root();
        tree.add_field(root, "id").unwrap();
        tree.add_field(root, "name").unwrap();
        let teachers = tree.add_child(root, "teachers", true).unwrap();
        tree.add_field(teachers, "id").unwrap();
        tree.add_field(teachers, "name").unwrap();
        let pet = tree.add_child(teachers, "class_pet", false).unwrap();
        tree.add_field(pet, "name").unwrap();
        tree.add_field(pet, "age").unwrap();
        tree
    }

    fn select(tree: &SchemaTree, query: &str) -> Selection {
        let params = QueryParams::parse(query);
        Selection::for_request(tree, Some(&params), &Config::default())
    }

    #[test]
    fn no_params_keeps_everything() {
        let tree = school_tree();
        assert_eq!(select(&tree, ""), Selection::unfiltered(&tree));
    }

    #[test]
    fn collection_is_one_schema_position() {
        let tree = school_tree();
        let selection = select(&tree, "fields=teachers__name");
        let teachers = tree.find(&["teachers"]).unwrap();
        assert_eq!(selection.retained(tree.root()), ["teachers"]);
        assert_eq!(selection.retained(teachers), ["name"]);
    }

    #[test]
    fn naming_a_nested_node_keeps_its_fields() {
        let tree = school_tree();
        let selection = select(&tree, "fields=name,teachers");
        let teachers = tree.find(&["teachers"]).unwrap();
        assert_eq!(selection.retained(tree.root()), ["name", "teachers"]);
        assert_eq!(selection.retained(teachers), ["id", "name", "class_pet"]);
    }

    #[test]
    fn deep_omit_reaches_grandchildren_only() {
        let tree = school_tree();
        let selection = select(&tree, "omit=teachers__class_pet__age");
        let teachers = tree.find(&["teachers"]).unwrap();
        let pet = tree.find(&["teachers", "class_pet"]).unwrap();
        assert_eq!(selection.retained(teachers), ["id", "name", "class_pet"]);
        assert_eq!(selection.retained(pet), ["name"]);
    }

    #[test]
    fn missing_context_keeps_everything_with_diagnostic() {
        let tree = school_tree();
        let selection = Selection::for_request(&tree, None, &Config::default());
        assert_eq!(selection.diagnostics(), [Diagnostic::MissingContext]);
        assert!(selection.is_retained(tree.root(), "teachers"));
        assert_eq!(
            selection.retained(tree.root()),
            Selection::unfiltered(&tree).retained(tree.root())
        );
    }

    #[test]
    fn diagnostic_message() {
        assert_eq!(
            Diagnostic::MissingContext.to_string(),
            "context does not have access to a request"
        );
    }

    #[test]
    fn reused_tree_follows_each_request() {
        let tree = school_tree();
        let first = select(&tree, "fields=id");
        let second = select(&tree, "fields=id,name");
        assert_eq!(first.retained(tree.root()), ["id"]);
        assert_eq!(second.retained(tree.root()), ["id", "name"]);
    }

    #[test]
    fn unknown_node_id_has_no_fields() {
        let tree = school_tree();
        let selection = Selection::unfiltered(&tree);
        let other = {
            let mut bigger = school_tree();
            let root = bigger.root();
            bigger.add_child(root, "extra", false).unwrap()
        };
        assert!(selection.retained(other).is_empty());
    }
}
