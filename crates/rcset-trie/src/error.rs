//! Error types for trie operations

use crate::node::NodeId;
use rcset_entry::PathKey;

/// Errors raised by structural trie operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TrieError {
    /// Handle refers to a freed or removed node
    #[error("node handle {0} is dead")]
    DeadNode(NodeId),

    /// The root cannot be removed or moved
    #[error("the root node cannot be removed or moved")]
    RootImmutable,

    /// A node already holds a value at the target path
    #[error("path '{path}' is already occupied")]
    PathOccupied {
        /// Target path
        path: String,
    },

    /// A node with children cannot move below itself
    #[error("cannot move '{from}' with its children into its own subtree at '{to}'")]
    MoveIntoSubtree {
        /// Current path of the node
        from: String,
        /// Requested path
        to: String,
    },
}

impl TrieError {
    /// Create occupied-path error
    #[inline]
    #[must_use]
    pub fn occupied(path: &PathKey) -> Self {
        Self::PathOccupied {
            path: path.to_string(),
        }
    }

    /// Check if error was caused by a dead handle
    #[inline]
    #[must_use]
    pub fn is_dead_node(&self) -> bool {
        matches!(self, Self::DeadNode(_))
    }
}
