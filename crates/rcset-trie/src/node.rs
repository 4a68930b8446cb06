//! Arena nodes and generational handles

use crate::listener::TrieListener;
use crate::name_map::NameMap;
use rcset_entry::PathKey;
use std::cell::OnceCell;
use std::fmt::{self, Display, Formatter};
use std::sync::Arc;

/// Generational handle to a trie node
///
/// A handle stays valid until its node is removed or pruned. Reusing a slot
/// bumps its generation, so stale handles are reported as
/// [`TrieError::DeadNode`](crate::TrieError::DeadNode) instead of silently
/// addressing a different node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId {
    index: usize,
    generation: u32,
}

impl NodeId {
    pub(crate) const fn new(index: usize, generation: u32) -> Self {
        Self { index, generation }
    }

    /// Arena slot index
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.index
    }

    /// Slot generation this handle was issued for
    #[inline]
    #[must_use]
    pub const fn generation(self) -> u32 {
        self.generation
    }
}

impl Display for NodeId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "#{}v{}", self.index, self.generation)
    }
}

/// Value state of a trie node
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeState<T> {
    /// Placeholder created along a path, never held a value
    Unset,

    /// Placeholder left behind by a removal
    Removed,

    /// Node holds a value
    Present(T),
}

impl<T> NodeState<T> {
    /// Check whether a value is held
    #[inline]
    #[must_use]
    pub fn is_present(&self) -> bool {
        matches!(self, Self::Present(_))
    }

    /// Borrow the held value
    #[inline]
    #[must_use]
    pub fn as_ref(&self) -> Option<&T> {
        match self {
            Self::Present(value) => Some(value),
            _ => None,
        }
    }

    /// Borrow the held value mutably
    #[inline]
    pub fn as_mut(&mut self) -> Option<&mut T> {
        match self {
            Self::Present(value) => Some(value),
            _ => None,
        }
    }

    /// Consume the state, yielding the held value
    #[inline]
    #[must_use]
    pub fn into_value(self) -> Option<T> {
        match self {
            Self::Present(value) => Some(value),
            _ => None,
        }
    }
}

impl<T> Default for NodeState<T> {
    fn default() -> Self {
        Self::Unset
    }
}

pub(crate) struct Node<T> {
    pub(crate) name: String,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: NameMap,
    pub(crate) state: NodeState<T>,
    pub(crate) listeners: Vec<Arc<dyn TrieListener<T>>>,
    pub(crate) path: OnceCell<PathKey>,
}

impl<T> Node<T> {
    pub(crate) fn new(name: String, parent: Option<NodeId>, state: NodeState<T>) -> Self {
        Self {
            name,
            parent,
            children: NameMap::new(),
            state,
            listeners: Vec::new(),
            path: OnceCell::new(),
        }
    }
}

pub(crate) struct Slot<T> {
    pub(crate) generation: u32,
    pub(crate) node: Option<Node<T>>,
}
