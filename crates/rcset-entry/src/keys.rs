//! Entry identity keys
//!
//! Two equivalence relations over [`Entry`] values:
//!
//! - [`NameKey`]: *name identity*. Two entries with equal name keys describe
//!   the same setting, whatever their values; used for shadowing.
//! - [`ContentsKey`]: *contents identity*. Full-value equality; used to
//!   detect exact duplicates and no-op changes.
//!
//! Name identity is computed by a [`NameIdentity`] strategy that callers
//! pass in explicitly, so different containers may apply different naming
//! conventions (e.g. case-insensitive file systems).

use crate::entry::Entry;
use crate::kind::EntryKind;
use crate::path::normalize_path_name;
use indexmap::IndexMap;
use std::fmt::{self, Display, Formatter};

/// Name identity of an entry: kind plus normalized name
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NameKey {
    kind: EntryKind,
    name: String,
}

impl NameKey {
    /// Create key from already-normalized parts
    #[inline]
    #[must_use]
    pub fn new(kind: EntryKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
        }
    }

    /// Key of `entry` under [`DefaultNameIdentity`]
    #[inline]
    #[must_use]
    pub fn of(entry: &Entry) -> Self {
        DefaultNameIdentity::new().name_key(entry)
    }

    /// Kind part
    #[inline]
    #[must_use]
    pub fn kind(&self) -> EntryKind {
        self.kind
    }

    /// Normalized name part
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Display for NameKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.name)
    }
}

/// Strategy computing name identity of entries
pub trait NameIdentity: fmt::Debug + Send + Sync {
    /// Compute the name key of an entry
    fn name_key(&self, entry: &Entry) -> NameKey;

    /// Check whether two same-named entries carry the same value
    ///
    /// Only value-bearing kinds compare values; for name-only kinds a name
    /// match is a full match.
    fn values_match(&self, a: &Entry, b: &Entry) -> bool {
        if a.kind().has_value() {
            a.value() == b.value()
        } else {
            true
        }
    }
}

/// Default naming convention
///
/// Path-valued names are normalized (separators, `.` segments, trailing
/// `/`); macro names are trimmed. With `ignore_case` names are also
/// lowercased.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DefaultNameIdentity {
    ignore_case: bool,
}

impl DefaultNameIdentity {
    /// Case-sensitive identity
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self { ignore_case: false }
    }

    /// Case-insensitive identity
    #[inline]
    #[must_use]
    pub const fn case_insensitive() -> Self {
        Self { ignore_case: true }
    }
}

impl NameIdentity for DefaultNameIdentity {
    fn name_key(&self, entry: &Entry) -> NameKey {
        let kind = entry.kind();
        let name = if kind.name_is_path() {
            normalize_path_name(entry.name())
        } else {
            entry.name().trim().to_string()
        };
        let name = if self.ignore_case {
            name.to_lowercase()
        } else {
            name
        };
        NameKey { kind, name }
    }
}

/// Contents identity of an entry
///
/// Equality and hashing cover the whole entry: kind, name, value, flags and
/// kind payload (exclusion order is ignored).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContentsKey(Entry);

impl ContentsKey {
    /// Create key for an entry
    #[inline]
    #[must_use]
    pub fn new(entry: Entry) -> Self {
        Self(entry)
    }

    /// The keyed entry
    #[inline]
    #[must_use]
    pub fn entry(&self) -> &Entry {
        &self.0
    }

    /// Unwrap the keyed entry
    #[inline]
    #[must_use]
    pub fn into_entry(self) -> Entry {
        self.0
    }
}

impl From<Entry> for ContentsKey {
    fn from(entry: Entry) -> Self {
        Self(entry)
    }
}

impl From<&Entry> for ContentsKey {
    fn from(entry: &Entry) -> Self {
        Self(entry.clone())
    }
}

/// Index entries by name identity, last writer wins, first position kept
#[must_use]
pub fn index_by_name<'a, I>(identity: &dyn NameIdentity, entries: I) -> IndexMap<NameKey, Entry>
where
    I: IntoIterator<Item = &'a Entry>,
{
    let mut map = IndexMap::new();
    for entry in entries {
        map.insert(identity.name_key(entry), entry.clone());
    }
    map
}

/// Index entries by contents identity, dropping exact duplicates
#[must_use]
pub fn index_by_contents<'a, I>(entries: I) -> IndexMap<ContentsKey, Entry>
where
    I: IntoIterator<Item = &'a Entry>,
{
    let mut map = IndexMap::new();
    for entry in entries {
        map.insert(ContentsKey::from(entry), entry.clone());
    }
    map
}
