//! Listener and visitor contracts

use crate::node::NodeId;
use crate::trie::PathTrie;
use rcset_entry::PathKey;
use std::ops::ControlFlow;

/// Observer of structural and value changes
///
/// Listeners are registered on a node and receive events for that node and
/// every node below it. Callbacks run synchronously before the mutating call
/// returns and only see the trie through a shared reference.
pub trait TrieListener<T>: Send + Sync {
    /// A node became present
    fn added(&self, _trie: &PathTrie<T>, _node: NodeId) {}

    /// A present node is about to be removed
    fn about_to_remove(&self, _trie: &PathTrie<T>, _node: NodeId) {}

    /// The value of a present node was replaced or cleared
    fn value_changed(&self, _trie: &PathTrie<T>, _node: NodeId, _old: Option<&T>) {}

    /// A node moved from `old_path`
    fn path_changed(
        &self,
        _trie: &PathTrie<T>,
        _node: NodeId,
        _old_path: &PathKey,
        _children_moved: bool,
    ) {
    }
}

/// Pre-order visitor over present nodes
pub trait TrieVisitor<T> {
    /// Visit one node; `Break` stops the traversal
    fn visit(&mut self, trie: &PathTrie<T>, node: NodeId) -> ControlFlow<()>;
}

pub(crate) struct FnVisitor<F>(pub(crate) F);

impl<T, F> TrieVisitor<T> for FnVisitor<F>
where
    F: FnMut(&PathTrie<T>, NodeId) -> ControlFlow<()>,
{
    fn visit(&mut self, trie: &PathTrie<T>, node: NodeId) -> ControlFlow<()> {
        (self.0)(trie, node)
    }
}
