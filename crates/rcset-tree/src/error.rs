//! Error types for the settings tree

use rcset_entry::{EntryError, PathKey};
use rcset_layers::LayerError;
use rcset_trie::TrieError;

/// Errors raised by [`SettingsTree`](crate::SettingsTree)
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    /// Trie structure error
    #[error("trie error: {0}")]
    Trie(#[from] TrieError),

    /// Level addressing error
    #[error("layer error: {0}")]
    Layer(#[from] LayerError),

    /// Entry or kind error
    #[error("entry error: {0}")]
    Entry(#[from] EntryError),

    /// No resource stored at the path
    #[error("no resource at '{path}'")]
    ResourceNotFound {
        /// Requested path
        path: PathKey,
    },
}

impl TreeError {
    /// Create not-found error
    #[inline]
    #[must_use]
    pub fn not_found(path: &PathKey) -> Self {
        Self::ResourceNotFound { path: path.clone() }
    }
}
