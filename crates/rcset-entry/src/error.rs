//! Error types for entries and kind storage

use crate::kind::{EntryKind, KindSupport};

/// Errors raised while building entries or addressing kind slots
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EntryError {
    /// Kind has no slot in a store
    #[error("{kind} is not supported by a store over {support}")]
    UnsupportedKind {
        /// Requested kind
        kind: EntryKind,
        /// Kind support of the store
        support: KindSupport,
    },

    /// Slot index past the end of a store
    #[error("slot index {index} out of range (len {len})")]
    IndexOutOfRange {
        /// Requested index
        index: usize,
        /// Number of slots
        len: usize,
    },

    /// Value-bearing entry built without value
    #[error("{kind} entry '{name}' requires a value")]
    MissingValue {
        /// Entry kind
        kind: EntryKind,
        /// Entry name
        name: String,
    },

    /// Exclusions requested on a kind that has none
    #[error("{0} entries do not carry exclusion patterns")]
    ExclusionsUnsupported(EntryKind),

    /// Exclusion addressing the entry root itself
    #[error("exclusion pattern must name a path below the entry")]
    EmptyExclusion,

    /// Glob that does not compile
    #[error("invalid pattern '{pattern}': {reason}")]
    InvalidPattern {
        /// Pattern text
        pattern: String,
        /// Compiler message
        reason: String,
    },

    /// Path is not below the given ancestor
    #[error("'{path}' is not below '{ancestor}'")]
    NotDescendant {
        /// Path that was relativized
        path: String,
        /// Expected ancestor
        ancestor: String,
    },
}

impl EntryError {
    /// Check if error was caused by addressing an unsupported kind
    #[inline]
    #[must_use]
    pub fn is_unsupported_kind(&self) -> bool {
        matches!(self, Self::UnsupportedKind { .. })
    }
}
