//! Property tests for the selection pass.

use std::collections::BTreeSet;

use dynfields::{Config, SchemaTree, Selection, Selectors};
use proptest::prelude::*;

const NAMES: &[&str] = &["id", "name", "age", "pet", "toys", "owner", "ghost"];

/// Root with up to five plain fields plus a nested `pet` node whose fields
/// are drawn from the same pool.
fn tree_strategy() -> impl Strategy<Value = SchemaTree> {
    (
        proptest::sample::subsequence(&NAMES[..6], 0..=5),
        proptest::sample::subsequence(&NAMES[..6], 0..=5),
    )
        .prop_map(|(root_fields, pet_fields)| {
            let mut tree = SchemaTree::new();
            let root = tree.root();
            for name in root_fields.iter().filter(|n| **n != "pet") {
                tree.add_field(root, name).unwrap();
            }
            let pet = tree.add_child(root, "pet", false).unwrap();
            for name in pet_fields {
                tree.add_field(pet, name).unwrap();
            }
            tree
        })
}

fn token_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        proptest::sample::select(NAMES).prop_map(str::to_string),
        proptest::sample::select(NAMES).prop_map(|n| format!("pet__{n}")),
        Just(String::new()),
        Just("pet__".to_string()),
    ]
}

fn selector_strategy() -> impl Strategy<Value = Option<String>> {
    proptest::option::of(proptest::collection::vec(token_strategy(), 0..6).prop_map(|t| t.join(",")))
}

fn select(tree: &SchemaTree, fields: Option<String>, omit: Option<String>) -> Selection {
    Selection::from_selectors(tree, &Selectors { fields, omit }, &Config::default())
}

proptest! {
    #[test]
    fn retained_is_ordered_subset_of_declared(
        tree in tree_strategy(),
        fields in selector_strategy(),
        omit in selector_strategy(),
    ) {
        let selection = select(&tree, fields, omit);
        for (id, node) in tree.iter() {
            let declared: Vec<&str> = node.field_names().collect();
            let mut cursor = declared.iter();
            for name in selection.retained(id) {
                // Each retained name appears later in the declared order.
                prop_assert!(cursor.any(|d| d == name), "{} out of order or undeclared", name);
            }
        }
    }

    #[test]
    fn absent_fields_keeps_declared_minus_omitted(
        tree in tree_strategy(),
        omit in selector_strategy(),
    ) {
        let selection = select(&tree, None, omit.clone());
        let omit = omit.unwrap_or_default();
        let tokens: Vec<&str> = omit.split(',').collect();
        let root_omits: BTreeSet<&str> =
            tokens.iter().copied().filter(|t| !t.contains("__")).collect();
        let pet_omits: BTreeSet<&str> =
            tokens.iter().filter_map(|t| t.strip_prefix("pet__")).collect();

        let root = tree.root();
        let expected: Vec<&str> = tree
            .node(root)
            .field_names()
            .filter(|n| !root_omits.contains(*n))
            .collect();
        prop_assert_eq!(selection.retained(root), expected.as_slice());

        let pet = tree.find(&["pet"]).unwrap();
        let expected: Vec<&str> = tree
            .node(pet)
            .field_names()
            .filter(|n| !pet_omits.contains(*n))
            .collect();
        prop_assert_eq!(selection.retained(pet), expected.as_slice());
    }

    #[test]
    fn omit_wins_over_include(
        tree in tree_strategy(),
        tokens in proptest::collection::vec(token_strategy(), 1..6),
    ) {
        let joined = tokens.join(",");
        let selection = select(&tree, Some(joined.clone()), Some(joined.clone()));
        let root_omits: BTreeSet<&str> = tokens
            .iter()
            .map(String::as_str)
            .filter(|t| !t.is_empty() && !t.contains("__"))
            .collect();
        for name in selection.retained(tree.root()) {
            prop_assert!(!root_omits.contains(name.as_str()));
        }
    }

    #[test]
    fn selection_is_idempotent(
        tree in tree_strategy(),
        fields in selector_strategy(),
        omit in selector_strategy(),
    ) {
        let first = select(&tree, fields.clone(), omit.clone());
        let second = select(&tree, fields, omit);
        prop_assert_eq!(first, second);
    }
}
