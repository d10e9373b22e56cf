//! Field filter: prune one node's declared fields with its local selection.

use std::collections::BTreeSet;

use crate::resolve::LocalSelection;

/// How the include-set is interpreted at one node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Inclusion<'a> {
    /// No `fields` filtering applies.
    Unfiltered,
    /// Below the root, no token addressed this node's children. Every field
    /// is kept so a stray `fields` value cannot blank out unrelated nodes.
    Fallback,
    /// Only these names pass. Empty at the root means nothing passes.
    Only(&'a BTreeSet<String>),
}

impl<'a> Inclusion<'a> {
    pub fn of(local: &'a LocalSelection) -> Self {
        match &local.include {
            None => Self::Unfiltered,
            Some(names) if names.is_empty() && !local.is_root() => Self::Fallback,
            Some(names) => Self::Only(names),
        }
    }

    pub fn admits(&self, name: &str) -> bool {
        match self {
            Self::Unfiltered | Self::Fallback => true,
            Self::Only(names) => names.contains(name),
        }
    }
}

/// Retained fields in declaration order. Omit wins over include; names in
/// either set that are not declared are ignored.
pub fn apply<S: AsRef<str>>(declared: &[S], local: &LocalSelection) -> Vec<String> {
    let inclusion = Inclusion::of(local);
    declared
        .iter()
        .map(AsRef::as_ref)
        .filter(|name| inclusion.admits(name) && !local.omit.contains(*name))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEACHER: &[&str] = &["id", "name", "request_info", "class_pet"];

    fn local(include: Option<&[&str]>, omit: &[&str], depth: usize) -> LocalSelection {
        LocalSelection {
            include: include.map(|names| names.iter().map(|s| s.to_string()).collect()),
            omit: omit.iter().map(|s| s.to_string()).collect(),
            depth,
        }
    }

    #[test]
    fn unfiltered_keeps_everything() {
        assert_eq!(apply(TEACHER, &local(None, &[], 0)), TEACHER);
    }

    #[test]
    fn include_keeps_declared_order() {
        let kept = apply(TEACHER, &local(Some(&["class_pet", "id"]), &[], 0));
        assert_eq!(kept, vec!["id", "class_pet"]);
    }

    #[test]
    fn empty_include_at_root_keeps_nothing() {
        assert!(apply(TEACHER, &local(Some(&[]), &[], 0)).is_empty());
    }

    #[test]
    fn empty_include_below_root_falls_back_to_all() {
        let selection = local(Some(&[]), &[], 1);
        assert_eq!(Inclusion::of(&selection), Inclusion::Fallback);
        assert_eq!(apply(TEACHER, &selection), TEACHER);
    }

    #[test]
    fn fallback_still_honours_omit() {
        let kept = apply(TEACHER, &local(Some(&[]), &["name"], 2));
        assert_eq!(kept, vec!["id", "request_info", "class_pet"]);
    }

    #[test]
    fn omit_wins_over_include() {
        let kept = apply(
            TEACHER,
            &local(Some(&["id", "request_info"]), &["request_info"], 0),
        );
        assert_eq!(kept, vec!["id"]);
    }

    #[test]
    fn unknown_names_are_ignored() {
        let kept = apply(TEACHER, &local(Some(&["id", "pretend"]), &["ghost"], 0));
        assert_eq!(kept, vec!["id"]);
    }

    #[test]
    fn omit_everything() {
        let kept = apply(
            TEACHER,
            &local(None, &["id", "name", "request_info", "class_pet"], 0),
        );
        assert!(kept.is_empty());
    }
}
