//! Child index of a trie node
//!
//! Provides [`NameMap`], which keeps exact child lookups O(1) while still
//! answering "which children match this segment" for pattern search.

use crate::node::NodeId;
use indexmap::IndexMap;
use rcset_entry::{is_double_star, is_pattern, SegmentPattern, DOUBLE_STAR};
use smallvec::SmallVec;
use tracing::warn;

/// Children of one node, keyed by segment name
///
/// Every child is reachable by its literal name. Children whose names are
/// globs (`*`, `?`) are additionally kept in a compiled pattern subset, and
/// the literal `**` child is tracked by a flag.
#[derive(Debug, Clone, Default)]
pub struct NameMap {
    exact: IndexMap<String, NodeId>,
    patterns: IndexMap<String, SegmentPattern>,
    double_star: bool,
}

impl NameMap {
    /// Create empty map
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of children
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.exact.len()
    }

    /// Check if there are no children
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.exact.is_empty()
    }

    /// Child with exactly this name
    #[inline]
    #[must_use]
    pub fn get(&self, name: &str) -> Option<NodeId> {
        self.exact.get(name).copied()
    }

    /// Check for a child with exactly this name
    #[inline]
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.exact.contains_key(name)
    }

    /// Insert or replace a child, returning the previous handle
    pub fn insert(&mut self, name: impl Into<String>, id: NodeId) -> Option<NodeId> {
        let name = name.into();
        if is_double_star(&name) {
            self.double_star = true;
        } else if is_pattern(&name) && !self.patterns.contains_key(&name) {
            match SegmentPattern::new(&name) {
                Ok(pattern) => {
                    self.patterns.insert(name.clone(), pattern);
                }
                Err(err) => warn!(name = %name, %err, "glob child indexed as literal"),
            }
        }
        self.exact.insert(name, id)
    }

    /// Remove a child by name
    pub fn remove(&mut self, name: &str) -> Option<NodeId> {
        let removed = self.exact.shift_remove(name)?;
        if is_double_star(name) {
            self.double_star = false;
        } else {
            self.patterns.shift_remove(name);
        }
        Some(removed)
    }

    /// The `**` child, if any
    #[inline]
    #[must_use]
    pub fn double_star(&self) -> Option<NodeId> {
        if self.double_star {
            self.get(DOUBLE_STAR)
        } else {
            None
        }
    }

    /// Check whether any glob-named child exists (`**` excluded)
    #[inline]
    #[must_use]
    pub fn has_patterns(&self) -> bool {
        !self.patterns.is_empty()
    }

    /// Glob-named children matching `segment` (`**` excluded)
    pub fn pattern_matches<'a>(&'a self, segment: &'a str) -> impl Iterator<Item = NodeId> + 'a {
        self.patterns
            .iter()
            .filter(move |(_, pattern)| pattern.matches(segment))
            .filter_map(|(name, _)| self.get(name))
    }

    /// Exact match plus every glob-named child matching `name`
    #[must_use]
    pub fn get_values(&self, name: &str) -> SmallVec<[NodeId; 4]> {
        let mut found: SmallVec<[NodeId; 4]> = self.get(name).into_iter().collect();
        for id in self.pattern_matches(name) {
            if !found.contains(&id) {
                found.push(id);
            }
        }
        found
    }

    /// Children in insertion order
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (&str, NodeId)> {
        self.exact.iter().map(|(name, id)| (name.as_str(), *id))
    }

    /// Child handles in insertion order
    pub fn ids(&self) -> impl DoubleEndedIterator<Item = NodeId> + '_ {
        self.exact.values().copied()
    }

    /// Child names in insertion order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.exact.keys().map(String::as_str)
    }
}
