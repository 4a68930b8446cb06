//! Exclusion patterns of source and output entries

use crate::entry::Entry;
use crate::error::EntryError;
use crate::path::{normalize_path_name, PathKey};
use crate::pattern::PathPattern;
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// Insertion-ordered set of exclusion patterns
///
/// Patterns are relative to the owning entry's path. Equality and hashing
/// ignore insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExclusionSet(IndexSet<String>);

impl ExclusionSet {
    /// Create empty set
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(IndexSet::new())
    }

    /// Number of patterns
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if set is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Check whether a pattern is present
    #[inline]
    #[must_use]
    pub fn contains(&self, pattern: &str) -> bool {
        self.0.contains(pattern)
    }

    /// Add a pattern, returning `false` if it was already present
    pub fn insert(&mut self, pattern: impl Into<String>) -> bool {
        self.0.insert(pattern.into())
    }

    /// Remove a pattern, keeping the order of the rest
    pub fn remove(&mut self, pattern: &str) -> bool {
        self.0.shift_remove(pattern)
    }

    /// Iterate patterns in insertion order
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Check whether `relative` (a path below the entry) is excluded
    ///
    /// A path is excluded when it, or one of its ancestors below the entry
    /// root, matches a pattern. Patterns that fail to compile never match.
    #[must_use]
    pub fn excludes(&self, relative: &PathKey) -> bool {
        if relative.is_empty() {
            return false;
        }
        let compiled: Vec<PathPattern> = self.iter().filter_map(|p| PathPattern::new(p).ok()).collect();
        let mut probe = relative.clone();
        while !probe.is_empty() {
            if compiled.iter().any(|p| p.matches(&probe)) {
                return true;
            }
            probe = probe.parent().unwrap_or_default();
        }
        false
    }
}

impl Hash for ExclusionSet {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let mut sorted: Vec<&String> = self.0.iter().collect();
        sorted.sort();
        sorted.len().hash(state);
        for pattern in sorted {
            pattern.hash(state);
        }
    }
}

impl<S: Into<String>> FromIterator<S> for ExclusionSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// Add or remove exclusion patterns on a source/output entry
///
/// Existing patterns keep their order; added patterns are appended without
/// duplicates.
///
/// # Errors
/// - [`EntryError::ExclusionsUnsupported`] if the entry kind has no exclusions
/// - [`EntryError::EmptyExclusion`] if an added pattern addresses the entry
///   root itself
pub fn add_remove_exclusions<I, S>(entry: &Entry, paths: I, add: bool) -> Result<Entry, EntryError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut set = entry
        .exclusions()
        .cloned()
        .ok_or(EntryError::ExclusionsUnsupported(entry.kind()))?;
    for path in paths {
        let pattern = path.as_ref();
        if add {
            if PathKey::parse(pattern).is_empty() {
                return Err(EntryError::EmptyExclusion);
            }
            set.insert(pattern);
        } else {
            set.remove(pattern);
        }
    }
    entry.with_exclusions(set)
}

/// Check whether `path` lies on a source entry
///
/// True when `path` is the entry path itself, or lies below it and is not
/// excluded. Entries without exclusion support never contain paths.
#[must_use]
pub fn is_on_source_entry(path: &PathKey, entry: &Entry) -> bool {
    let Some(exclusions) = entry.exclusions() else {
        return false;
    };
    let root = PathKey::parse(&normalize_path_name(entry.name()));
    if *path == root {
        return true;
    }
    match path.relative_to(&root) {
        Ok(relative) => !exclusions.excludes(&relative),
        Err(_) => false,
    }
}

/// Check whether `path` is excluded from every entry in `entries`
#[must_use]
pub fn is_excluded(path: &PathKey, entries: &[Entry]) -> bool {
    entries.iter().all(|entry| !is_on_source_entry(path, entry))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;

    fn hash_of(set: &ExclusionSet) -> u64 {
        let mut h = DefaultHasher::new();
        set.hash(&mut h);
        h.finish()
    }

    #[test]
    fn exclusions_survive_json() {
        let entry = Entry::source_path("src", ["gen", "build/**"]);
        let json = serde_json::to_string(&entry).unwrap();
        let back: Entry = serde_json::from_str(&json).unwrap();
        assert_eq!(back, entry);

        let exclusions = back.exclusions().unwrap();
        let order: Vec<_> = exclusions.iter().collect();
        assert_eq!(order, vec!["gen", "build/**"]);
    }

    #[test]
    fn equality_ignores_order() {
        let a: ExclusionSet = ["x", "y"].into_iter().collect();
        let b: ExclusionSet = ["y", "x"].into_iter().collect();
        assert_eq!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));
    }

    #[test]
    fn excludes_subtree_of_matching_folder() {
        let set: ExclusionSet = ["test", "*.bak"].into_iter().collect();
        assert!(set.excludes(&PathKey::parse("test")));
        assert!(set.excludes(&PathKey::parse("test/unit/a.c")));
        assert!(set.excludes(&PathKey::parse("old.bak")));
        assert!(!set.excludes(&PathKey::parse("main.c")));
        assert!(!set.excludes(&PathKey::root()));
    }

    #[test]
    fn add_appends_without_duplicates() {
        let entry = Entry::source_path("src", ["a"]);
        let updated = add_remove_exclusions(&entry, ["b", "a"], true).unwrap();
        let patterns: Vec<_> = updated.exclusions().unwrap().iter().collect();
        assert_eq!(patterns, vec!["a", "b"]);
    }

    #[test]
    fn remove_keeps_remaining_order() {
        let entry = Entry::source_path("src", ["a", "b", "c"]);
        let updated = add_remove_exclusions(&entry, ["b"], false).unwrap();
        let patterns: Vec<_> = updated.exclusions().unwrap().iter().collect();
        assert_eq!(patterns, vec!["a", "c"]);
    }

    #[test]
    fn add_rejects_root_and_unsupported_kind() {
        let entry = Entry::source_path("src", Vec::<String>::new());
        assert_eq!(
            add_remove_exclusions(&entry, ["/"], true),
            Err(EntryError::EmptyExclusion)
        );

        let inc = Entry::include_path("/usr/include");
        assert!(matches!(
            add_remove_exclusions(&inc, ["x"], true),
            Err(EntryError::ExclusionsUnsupported(_))
        ));
    }

    #[test]
    fn source_entry_membership() {
        let entry = Entry::source_path("/proj/src", ["gen/"]);
        assert!(is_on_source_entry(&PathKey::parse("proj/src"), &entry));
        assert!(is_on_source_entry(&PathKey::parse("proj/src/a.c"), &entry));
        assert!(!is_on_source_entry(&PathKey::parse("proj/src/gen/b.c"), &entry));
        assert!(!is_on_source_entry(&PathKey::parse("proj/doc"), &entry));
    }

    #[test]
    fn excluded_only_when_off_every_entry() {
        let entries = vec![
            Entry::source_path("src", ["legacy"]),
            Entry::source_path("src/legacy/keep", Vec::<String>::new()),
        ];
        assert!(!is_excluded(&PathKey::parse("src/main.c"), &entries));
        assert!(is_excluded(&PathKey::parse("src/legacy/old.c"), &entries));
        assert!(!is_excluded(&PathKey::parse("src/legacy/keep/k.c"), &entries));
        assert!(is_excluded(&PathKey::parse("other/x.c"), &entries));
    }
}
