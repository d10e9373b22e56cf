//! Path resolver: localize global selectors to one node.
//!
//! Given the node's path from the root, every token is compared against it
//! segment by segment. Only the segment directly below the node matters
//! here; anything deeper is left for the node that owns it.

use std::collections::BTreeSet;

use crate::selector::{ParsedSelectors, SelectorList};

/// The include/omit sets that apply at exactly one node.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocalSelection {
    /// `None`: no inclusion filtering at this node.
    /// `Some(set)`: only these names pass (the set may be empty).
    pub include: Option<BTreeSet<String>>,
    /// Names removed at this node.
    pub omit: BTreeSet<String>,
    /// Depth of the node the sets were computed for (root = 0).
    pub depth: usize,
}

impl LocalSelection {
    pub fn is_root(&self) -> bool {
        self.depth == 0
    }
}

/// Localize both selectors to `current_path`.
pub fn resolve<S: AsRef<str>>(current_path: &[S], selectors: &ParsedSelectors) -> LocalSelection {
    LocalSelection {
        include: local_include(current_path, selectors.fields.as_ref()),
        omit: local_omit(current_path, &selectors.omit),
        depth: current_path.len(),
    }
}

/// Names selected directly below `current_path`.
///
/// Returns `None` when `fields` is absent, or when some token names this
/// node itself: the broader selection wins and nothing is narrowed here.
pub fn local_include<S: AsRef<str>>(
    current_path: &[S],
    fields: Option<&SelectorList>,
) -> Option<BTreeSet<String>> {
    let fields = fields?;
    let depth = current_path.len();
    let mut names = BTreeSet::new();

    for token in fields.tokens() {
        if !token.starts_with(current_path) {
            continue;
        }
        match token.segment(depth) {
            Some(name) => {
                names.insert(name.to_string());
            }
            None => return None,
        }
    }

    Some(names)
}

/// Names omitted at `current_path`. A token applies only at its terminal
/// depth, never to a whole subtree. Truncated tokens omit nothing.
pub fn local_omit<S: AsRef<str>>(current_path: &[S], omit: &SelectorList) -> BTreeSet<String> {
    let depth = current_path.len();
    omit.tokens()
        .iter()
        .filter(|token| token.is_complete())
        .filter(|token| token.len() == depth + 1 && token.starts_with(current_path))
        .filter_map(|token| token.segment(depth))
        .map(str::to_string)
        .collect()
}
