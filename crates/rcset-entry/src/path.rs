//! Resource paths
//!
//! Provides [`PathKey`] for hierarchical addressing of resources in a
//! settings tree.

use crate::error::EntryError;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Segment separator used when parsing and displaying paths
pub const SEPARATOR: char = '/';

/// Location of a resource, or a pattern over resources, in a settings tree
///
/// Segments run from the project root down; no segments means the root
/// itself. Segments may hold glob syntax (`*.c`, `**`), which the trie
/// indexes as pattern children. Names are compared case-sensitively.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PathKey(Vec<String>);

impl PathKey {
    /// Path made of already-split segments
    #[inline]
    #[must_use]
    pub fn new(segments: Vec<String>) -> Self {
        Self(segments)
    }

    /// The project root
    #[inline]
    #[must_use]
    pub fn root() -> Self {
        Self::default()
    }

    /// Parse a `/`-delimited path
    ///
    /// Empty segments and `.` segments are dropped, so `"/a//b/./c/"`
    /// parses to `a/b/c`.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        s.split(SEPARATOR)
            .filter(|seg| !seg.is_empty() && *seg != ".")
            .map(str::to_string)
            .collect()
    }

    /// Segments, outermost folder first
    #[inline]
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Depth below the root
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check whether this is the root
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Enclosing folder; `None` at the root
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        self.0
            .split_last()
            .map(|(_, folder)| Self(folder.to_vec()))
    }

    /// File or folder name addressed by this path
    #[inline]
    #[must_use]
    pub fn last(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }

    /// Path of a direct child named `segment`
    #[must_use]
    pub fn child(&self, segment: impl Into<String>) -> Self {
        let mut segments = self.0.clone();
        segments.push(segment.into());
        Self(segments)
    }

    /// Resolve `relative` below this path
    #[must_use]
    pub fn join(&self, relative: &Self) -> Self {
        self.iter().chain(relative.iter()).map(str::to_string).collect()
    }

    /// Check whether `other` is this path or lies below it
    ///
    /// `src` covers `src/main.c` and `src` itself, but not `lib/src`.
    #[inline]
    #[must_use]
    pub fn is_prefix_of(&self, other: &Self) -> bool {
        other.0.starts_with(&self.0)
    }

    /// Check whether `other` lies strictly below this path
    #[inline]
    #[must_use]
    pub fn is_ancestor_of(&self, other: &Self) -> bool {
        self.len() < other.len() && self.is_prefix_of(other)
    }

    /// Deepest folder enclosing both paths
    #[must_use]
    pub fn common_prefix(&self, other: &Self) -> Self {
        let depth = self
            .iter()
            .zip(other.iter())
            .position(|(a, b)| a != b)
            .unwrap_or_else(|| self.len().min(other.len()));
        Self(self.0[..depth].to_vec())
    }

    /// Segments left after removing `prefix`, if this path lies under it
    #[must_use]
    pub fn strip_prefix(&self, prefix: &Self) -> Option<Self> {
        self.0.strip_prefix(prefix.0.as_slice()).map(|rest| Self(rest.to_vec()))
    }

    /// Path relative to an enclosing entry root
    ///
    /// # Errors
    /// Returns [`EntryError::NotDescendant`] if `self` is not under `root`.
    pub fn relative_to(&self, root: &Self) -> Result<Self, EntryError> {
        self.strip_prefix(root).ok_or_else(|| EntryError::NotDescendant {
            path: self.to_string(),
            ancestor: root.to_string(),
        })
    }

    /// Check if any segment carries glob metacharacters
    #[inline]
    #[must_use]
    pub fn has_pattern(&self) -> bool {
        self.0.iter().any(|seg| crate::pattern::is_pattern(seg))
    }

    /// Segments as string slices
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl FromIterator<String> for PathKey {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Display for PathKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let mut segments = self.iter();
        if let Some(first) = segments.next() {
            f.write_str(first)?;
            for seg in segments {
                write!(f, "/{seg}")?;
            }
        }
        Ok(())
    }
}

impl FromStr for PathKey {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl From<&str> for PathKey {
    fn from(s: &str) -> Self {
        Self::parse(s)
    }
}

impl From<Vec<String>> for PathKey {
    fn from(segments: Vec<String>) -> Self {
        Self(segments)
    }
}

/// Normalize a path-valued entry name
///
/// Backslashes become `/`, repeated separators and `.` segments collapse,
/// and trailing separators are dropped. A leading `/` is kept so absolute
/// and relative names stay distinct.
#[must_use]
pub fn normalize_path_name(name: &str) -> String {
    let unified = name.trim().replace('\\', "/");
    let absolute = unified.starts_with(SEPARATOR);
    let body = PathKey::parse(&unified).to_string();
    if absolute {
        format!("/{body}")
    } else {
        body
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_parse_drops_empty_and_dot_segments() {
        let path = PathKey::parse("/a//b/./c/");
        assert_eq!(path.segments(), &["a", "b", "c"]);
    }

    #[test]
    fn path_root() {
        let path = PathKey::root();
        assert!(path.is_empty());
        assert_eq!(path.len(), 0);
        assert!(path.parent().is_none());
        assert_eq!(PathKey::parse(""), path);
        assert_eq!(PathKey::parse("/"), path);
    }

    #[test]
    fn path_parent_and_child() {
        let path = PathKey::parse("a/b/c");
        assert_eq!(path.parent().unwrap(), PathKey::parse("a/b"));
        assert_eq!(PathKey::parse("a/b").child("c"), path);
        assert_eq!(path.last(), Some("c"));
    }

    #[test]
    fn path_join() {
        let base = PathKey::parse("src");
        let rel = PathKey::parse("net/io.c");
        assert_eq!(base.join(&rel).to_string(), "src/net/io.c");
    }

    #[test]
    fn path_prefix_relations() {
        let a = PathKey::parse("a/b");
        let b = PathKey::parse("a/b/c");
        assert!(a.is_prefix_of(&b));
        assert!(a.is_prefix_of(&a));
        assert!(a.is_ancestor_of(&b));
        assert!(!a.is_ancestor_of(&a));
        assert!(!b.is_prefix_of(&a));
        assert!(PathKey::root().is_prefix_of(&a));
    }

    #[test]
    fn path_common_prefix() {
        let a = PathKey::parse("a/b/c");
        let b = PathKey::parse("a/b/d");
        assert_eq!(a.common_prefix(&b).segments(), &["a", "b"]);
        assert_eq!(a.common_prefix(&PathKey::parse("a/b")), PathKey::parse("a/b"));
        assert!(a.common_prefix(&PathKey::parse("x")).is_empty());
    }

    #[test]
    fn path_strip_prefix() {
        let file = PathKey::parse("src/net/io.c");
        assert_eq!(file.strip_prefix(&PathKey::parse("src")), Some(PathKey::parse("net/io.c")));
        assert_eq!(file.strip_prefix(&PathKey::root()), Some(file.clone()));
        assert!(file.strip_prefix(&PathKey::parse("lib")).is_none());
    }

    #[test]
    fn path_relative_to() {
        let full = PathKey::parse("a/b/c/d");
        let rel = full.relative_to(&PathKey::parse("a/b")).unwrap();
        assert_eq!(rel.segments(), &["c", "d"]);

        let result = full.relative_to(&PathKey::parse("x"));
        assert!(matches!(result, Err(EntryError::NotDescendant { .. })));
    }

    #[test]
    fn path_has_pattern() {
        assert!(PathKey::parse("src/*.c").has_pattern());
        assert!(PathKey::parse("src/**").has_pattern());
        assert!(!PathKey::parse("src/main.c").has_pattern());
    }

    #[test]
    fn normalize_keeps_absolute_marker() {
        assert_eq!(normalize_path_name("/usr//include/"), "/usr/include");
        assert_eq!(normalize_path_name("inc\\sys\\"), "inc/sys");
        assert_eq!(normalize_path_name("./inc"), "inc");
    }
}
