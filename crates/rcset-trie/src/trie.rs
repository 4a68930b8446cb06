//! Path-indexed arena trie
//!
//! Provides [`PathTrie<T>`], a hierarchy of nodes keyed by path segments.
//! Nodes live in an arena and are addressed by generational [`NodeId`]s.
//! Segment names may be globs (`*`, `?`) or the recursive wildcard `**`, in
//! which case [`PathTrie::find`] with pattern search resolves a concrete
//! path to the most specific matching node.

use crate::error::TrieError;
use crate::listener::{FnVisitor, TrieListener, TrieVisitor};
use crate::name_map::NameMap;
use crate::node::{Node, NodeId, NodeState, Slot};
use rcset_entry::{is_double_star, PathKey};
use std::fmt;
use std::ops::ControlFlow;
use std::sync::Arc;
use tracing::{debug, trace};

/// Candidate terminal of a pattern search
#[derive(Debug, Clone, Copy)]
struct Match {
    node: NodeId,
    /// Non-`**` segments in the matched node's path
    concrete: usize,
    /// `**` nodes traversed on the way to the match
    expanded: usize,
}

impl Match {
    fn beats(&self, other: &Match) -> bool {
        self.concrete > other.concrete
            || (self.concrete == other.concrete && self.expanded < other.expanded)
    }

    fn keep_best(best: &mut Option<Match>, candidate: Option<Match>) {
        if let Some(candidate) = candidate {
            if best.map_or(true, |current| candidate.beats(&current)) {
                *best = Some(candidate);
            }
        }
    }
}

/// Hierarchical container keyed by path segments
///
/// Intermediate nodes created along a path are placeholders without value.
/// A placeholder that loses its last child is pruned immediately; the root
/// is never pruned.
///
/// # Example
///
/// ```rust
/// use rcset_entry::PathKey;
/// use rcset_trie::PathTrie;
///
/// let mut trie: PathTrie<u32> = PathTrie::new(None);
/// let src = trie.get_or_create_with(&PathKey::parse("src/**"), || 1);
/// trie.get_or_create_with(&PathKey::parse("src/gen/x.c"), || 2);
///
/// let hit = trie.find(&PathKey::parse("src/lib/y.c"), true, true);
/// assert_eq!(hit, Some(src));
/// ```
pub struct PathTrie<T> {
    slots: Vec<Slot<T>>,
    free: Vec<usize>,
    root: NodeId,
    present: usize,
}

impl<T> PathTrie<T> {
    /// Create trie with an optional root value
    #[must_use]
    pub fn new(root_value: Option<T>) -> Self {
        let state = root_value.map_or(NodeState::Unset, NodeState::Present);
        let present = usize::from(state.is_present());
        Self {
            slots: vec![Slot {
                generation: 0,
                node: Some(Node::new(String::new(), None, state)),
            }],
            free: Vec::new(),
            root: NodeId::new(0, 0),
            present,
        }
    }

    /// Root handle
    #[inline]
    #[must_use]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Number of present nodes
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.present
    }

    /// Check whether no node holds a value
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.present == 0
    }

    // ------------------------------------------------------------------
    // Arena
    // ------------------------------------------------------------------

    fn node(&self, id: NodeId) -> Result<&Node<T>, TrieError> {
        self.slots
            .get(id.index())
            .filter(|slot| slot.generation == id.generation())
            .and_then(|slot| slot.node.as_ref())
            .ok_or(TrieError::DeadNode(id))
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut Node<T>, TrieError> {
        self.slots
            .get_mut(id.index())
            .filter(|slot| slot.generation == id.generation())
            .and_then(|slot| slot.node.as_mut())
            .ok_or(TrieError::DeadNode(id))
    }

    fn alloc(&mut self, node: Node<T>) -> NodeId {
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index];
            slot.node = Some(node);
            NodeId::new(index, slot.generation)
        } else {
            self.slots.push(Slot {
                generation: 0,
                node: Some(node),
            });
            NodeId::new(self.slots.len() - 1, 0)
        }
    }

    /// Free a slot without touching parent or children
    fn release(&mut self, id: NodeId) -> Option<Node<T>> {
        let slot = self
            .slots
            .get_mut(id.index())
            .filter(|slot| slot.generation == id.generation())?;
        let node = slot.node.take();
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index());
        node
    }

    /// Reissue a node under a new generation, relinking parent and children
    fn rebind(&mut self, id: NodeId) -> NodeId {
        let Some(slot) = self
            .slots
            .get_mut(id.index())
            .filter(|slot| slot.generation == id.generation())
        else {
            return id;
        };
        slot.generation = slot.generation.wrapping_add(1);
        let fresh = NodeId::new(id.index(), slot.generation);
        let Some(node) = slot.node.as_ref() else {
            return fresh;
        };
        let name = node.name.clone();
        let parent = node.parent;
        let children: Vec<NodeId> = node.children.ids().collect();

        if let Some(parent) = parent {
            if let Ok(parent) = self.node_mut(parent) {
                parent.children.insert(name, fresh);
            }
        }
        for child in children {
            if let Ok(child) = self.node_mut(child) {
                child.parent = Some(fresh);
            }
        }
        fresh
    }

    fn attach_placeholder(&mut self, parent: NodeId, name: &str) -> NodeId {
        let id = self.alloc(Node::new(name.to_string(), Some(parent), NodeState::Unset));
        if let Ok(parent) = self.node_mut(parent) {
            parent.children.insert(name, id);
        }
        trace!(node = %id, name, "placeholder created");
        id
    }

    /// Walk `path` literally, creating placeholders for missing segments
    fn ensure_node(&mut self, path: &PathKey) -> NodeId {
        let mut current = self.root;
        for segment in path.iter() {
            let existing = self.node(current).ok().and_then(|n| n.children.get(segment));
            current = match existing {
                Some(child) => child,
                None => self.attach_placeholder(current, segment),
            };
        }
        current
    }

    /// Walk `path` literally without creating anything
    fn locate(&self, path: &PathKey) -> Option<NodeId> {
        let mut current = self.root;
        for segment in path.iter() {
            current = self.node(current).ok()?.children.get(segment)?;
        }
        Some(current)
    }

    /// Free empty placeholders from `id` upward, stopping at the root
    fn prune(&mut self, id: NodeId) {
        let mut current = id;
        while current != self.root {
            let Ok(node) = self.node(current) else {
                break;
            };
            if node.state.is_present() || !node.children.is_empty() {
                break;
            }
            let parent = node.parent;
            let name = node.name.clone();
            self.release(current);
            trace!(node = %current, name = %name, "placeholder pruned");
            let Some(parent) = parent else {
                break;
            };
            if let Ok(parent_node) = self.node_mut(parent) {
                parent_node.children.remove(&name);
            }
            current = parent;
        }
    }

    fn invalidate_paths(&mut self, id: NodeId) {
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Ok(node) = self.node_mut(current) {
                node.path.take();
                stack.extend(node.children.ids());
            }
        }
    }

    fn notify<F>(&self, id: NodeId, f: F)
    where
        F: Fn(&dyn TrieListener<T>, &Self),
    {
        let mut current = Some(id);
        while let Some(node_id) = current {
            let Ok(node) = self.node(node_id) else {
                break;
            };
            for listener in &node.listeners {
                f(listener.as_ref(), self);
            }
            current = node.parent;
        }
    }

    fn cached_path<'a>(&'a self, node: &'a Node<T>) -> &'a PathKey {
        node.path
            .get_or_init(|| match node.parent.and_then(|p| self.node(p).ok()) {
                Some(parent) => self.cached_path(parent).child(node.name.clone()),
                None => PathKey::root(),
            })
    }

    // ------------------------------------------------------------------
    // Creation and lookup
    // ------------------------------------------------------------------

    /// Get the node at `path`, creating it (and placeholders) if needed
    ///
    /// A node that is not yet present receives `T::default()`.
    pub fn get_or_create(&mut self, path: &PathKey) -> NodeId
    where
        T: Default,
    {
        self.get_or_create_with(path, T::default)
    }

    /// Get the node at `path`, creating it with `f` if it holds no value
    pub fn get_or_create_with<F>(&mut self, path: &PathKey, f: F) -> NodeId
    where
        F: FnOnce() -> T,
    {
        let id = self.ensure_node(path);
        let became_present = match self.node_mut(id) {
            Ok(node) if !node.state.is_present() => {
                node.state = NodeState::Present(f());
                true
            }
            _ => false,
        };
        if became_present {
            self.present += 1;
            debug!(path = %path, node = %id, "node added");
            self.notify(id, |listener, trie| listener.added(trie, id));
        }
        id
    }

    /// Find the node for `path`
    ///
    /// With `exact` the result is a present node addressed by `path` (or
    /// matching it, when `pattern_search` is set), else `None`. Without
    /// `exact` a miss falls back to the nearest present ancestor and finally
    /// to the root, so the result is always `Some`.
    #[must_use]
    pub fn find(&self, path: &PathKey, exact: bool, pattern_search: bool) -> Option<NodeId> {
        let hit = if pattern_search {
            self.search(self.root, path.segments(), 0, 0).map(|m| m.node)
        } else {
            self.locate(path).filter(|id| self.is_present(*id))
        };
        if hit.is_some() || exact {
            return hit;
        }
        Some(self.nearest(path, pattern_search))
    }

    /// Check whether a present node matches `path` exactly
    #[inline]
    #[must_use]
    pub fn contains(&self, path: &PathKey) -> bool {
        self.find(path, true, false).is_some()
    }

    fn nearest(&self, path: &PathKey, pattern_search: bool) -> NodeId {
        let segments = path.segments();
        if pattern_search {
            return (0..segments.len())
                .rev()
                .find_map(|len| self.search(self.root, &segments[..len], 0, 0))
                .map_or(self.root, |m| m.node);
        }
        let mut best = self.root;
        let mut current = self.root;
        for segment in path.iter() {
            let Some(child) = self.node(current).ok().and_then(|n| n.children.get(segment)) else {
                break;
            };
            if self.is_present(child) {
                best = child;
            }
            current = child;
        }
        best
    }

    /// Most specific present match for `segments` below `id`
    ///
    /// The exact-name child is tried first; glob and `**` children are only
    /// consulted when the exact subtree has no match.
    fn search(&self, id: NodeId, segments: &[String], concrete: usize, expanded: usize) -> Option<Match> {
        let node = self.node(id).ok()?;
        let Some((segment, rest)) = segments.split_first() else {
            if node.state.is_present() {
                return Some(Match {
                    node: id,
                    concrete,
                    expanded,
                });
            }
            return node
                .children
                .double_star()
                .and_then(|ds| self.search(ds, segments, concrete, expanded + 1));
        };

        let exact = node.children.get(segment);
        if let Some(child) = exact {
            let wild = is_double_star(segment);
            let (concrete, expanded) = if wild {
                (concrete, expanded + 1)
            } else {
                (concrete + 1, expanded)
            };
            if let Some(found) = self.search(child, rest, concrete, expanded) {
                return Some(found);
            }
        }

        let mut best = None;
        for child in node.children.pattern_matches(segment) {
            if Some(child) != exact {
                Match::keep_best(&mut best, self.search(child, rest, concrete + 1, expanded));
            }
        }
        if let Some(ds) = node.children.double_star() {
            for consumed in 0..=segments.len() {
                let candidate = self.search(ds, &segments[consumed..], concrete, expanded + 1);
                Match::keep_best(&mut best, candidate);
            }
        }
        best
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    /// Check whether a handle is still valid
    #[inline]
    #[must_use]
    pub fn is_alive(&self, id: NodeId) -> bool {
        self.node(id).is_ok()
    }

    /// Check whether a handle addresses a node holding a value
    #[inline]
    #[must_use]
    pub fn is_present(&self, id: NodeId) -> bool {
        self.node(id).is_ok_and(|n| n.state.is_present())
    }

    /// Check whether a handle is the root
    #[inline]
    #[must_use]
    pub fn is_root(&self, id: NodeId) -> bool {
        id == self.root
    }

    /// Value of a node
    ///
    /// # Errors
    /// Returns [`TrieError::DeadNode`] for stale handles.
    pub fn value(&self, id: NodeId) -> Result<Option<&T>, TrieError> {
        Ok(self.node(id)?.state.as_ref())
    }

    /// Value of a node, mutably
    ///
    /// In-place edits do not notify listeners; use [`PathTrie::set_value`]
    /// for observable changes.
    ///
    /// # Errors
    /// Returns [`TrieError::DeadNode`] for stale handles.
    pub fn value_mut(&mut self, id: NodeId) -> Result<Option<&mut T>, TrieError> {
        Ok(self.node_mut(id)?.state.as_mut())
    }

    /// State of a node
    ///
    /// # Errors
    /// Returns [`TrieError::DeadNode`] for stale handles.
    pub fn state(&self, id: NodeId) -> Result<&NodeState<T>, TrieError> {
        Ok(&self.node(id)?.state)
    }

    /// Segment name of a node (empty for the root)
    ///
    /// # Errors
    /// Returns [`TrieError::DeadNode`] for stale handles.
    pub fn name(&self, id: NodeId) -> Result<&str, TrieError> {
        Ok(&self.node(id)?.name)
    }

    /// Full path of a node
    ///
    /// # Errors
    /// Returns [`TrieError::DeadNode`] for stale handles.
    pub fn path(&self, id: NodeId) -> Result<&PathKey, TrieError> {
        let node = self.node(id)?;
        Ok(self.cached_path(node))
    }

    /// Direct structural parent
    ///
    /// # Errors
    /// Returns [`TrieError::DeadNode`] for stale handles.
    pub fn parent(&self, id: NodeId) -> Result<Option<NodeId>, TrieError> {
        Ok(self.node(id)?.parent)
    }

    /// Closest ancestor holding a value
    ///
    /// # Errors
    /// Returns [`TrieError::DeadNode`] for stale handles.
    pub fn nearest_present_parent(&self, id: NodeId) -> Result<Option<NodeId>, TrieError> {
        let mut current = self.node(id)?.parent;
        while let Some(ancestor) = current {
            let node = self.node(ancestor)?;
            if node.state.is_present() {
                return Ok(Some(ancestor));
            }
            current = node.parent;
        }
        Ok(None)
    }

    /// Child index of a node
    ///
    /// # Errors
    /// Returns [`TrieError::DeadNode`] for stale handles.
    pub fn name_map(&self, id: NodeId) -> Result<&NameMap, TrieError> {
        Ok(&self.node(id)?.children)
    }

    /// Direct structural children, placeholders included
    ///
    /// # Errors
    /// Returns [`TrieError::DeadNode`] for stale handles.
    pub fn children(&self, id: NodeId) -> Result<Vec<NodeId>, TrieError> {
        Ok(self.node(id)?.children.ids().collect())
    }

    /// Nearest present descendants, looking through placeholders
    ///
    /// # Errors
    /// Returns [`TrieError::DeadNode`] for stale handles.
    pub fn direct_present_children(&self, id: NodeId) -> Result<Vec<NodeId>, TrieError> {
        let mut found = Vec::new();
        let mut stack: Vec<NodeId> = self.node(id)?.children.ids().rev().collect();
        while let Some(current) = stack.pop() {
            let node = self.node(current)?;
            if node.state.is_present() {
                found.push(current);
            } else {
                stack.extend(node.children.ids().rev());
            }
        }
        Ok(found)
    }

    // ------------------------------------------------------------------
    // Mutation
    // ------------------------------------------------------------------

    /// Store a value, returning the previous one
    ///
    /// A placeholder becoming present fires `added`; replacing a value fires
    /// `value_changed`.
    ///
    /// # Errors
    /// Returns [`TrieError::DeadNode`] for stale handles.
    pub fn set_value(&mut self, id: NodeId, value: T) -> Result<Option<T>, TrieError> {
        let node = self.node_mut(id)?;
        let old = std::mem::replace(&mut node.state, NodeState::Present(value)).into_value();
        match &old {
            Some(previous) => {
                self.notify(id, |listener, trie| listener.value_changed(trie, id, Some(previous)));
            }
            None => {
                self.present += 1;
                self.notify(id, |listener, trie| listener.added(trie, id));
            }
        }
        Ok(old)
    }

    /// Take the value out of a node
    ///
    /// The root keeps its slot and fires `value_changed`; any other node is
    /// removed as by [`PathTrie::remove`].
    ///
    /// # Errors
    /// Returns [`TrieError::DeadNode`] for stale handles.
    pub fn take_value(&mut self, id: NodeId) -> Result<Option<T>, TrieError> {
        if id != self.root {
            return self.remove(id);
        }
        let node = self.node_mut(id)?;
        let old = std::mem::take(&mut node.state).into_value();
        if let Some(previous) = &old {
            self.present -= 1;
            self.notify(id, |listener, trie| listener.value_changed(trie, id, Some(previous)));
        }
        Ok(old)
    }

    /// Remove a node's value, returning it
    ///
    /// Fires `about_to_remove` first. The handle is dead afterwards. A node
    /// without children is freed and empty placeholders above it are pruned;
    /// a node with children stays behind as a placeholder.
    ///
    /// # Errors
    /// - [`TrieError::DeadNode`] for stale handles
    /// - [`TrieError::RootImmutable`] for the root
    pub fn remove(&mut self, id: NodeId) -> Result<Option<T>, TrieError> {
        let node = self.node(id)?;
        if id == self.root {
            return Err(TrieError::RootImmutable);
        }
        if node.state.is_present() {
            self.notify(id, |listener, trie| listener.about_to_remove(trie, id));
        }
        let node = self.node_mut(id)?;
        let old = std::mem::replace(&mut node.state, NodeState::Removed).into_value();
        let childless = node.children.is_empty();
        if old.is_some() {
            self.present -= 1;
        }
        if childless {
            self.prune(id);
        } else {
            self.rebind(id);
        }
        debug!(node = %id, childless, "node removed");
        Ok(old)
    }

    /// Move a node to `new_path`
    ///
    /// With `move_children` the whole subtree moves. Otherwise the children
    /// stay at the old path under a new placeholder and only this node
    /// relocates. A placeholder already at `new_path` is merged into the
    /// moved node, which adopts its children.
    ///
    /// # Errors
    /// - [`TrieError::DeadNode`] for stale handles
    /// - [`TrieError::RootImmutable`] when moving the root or onto the root
    /// - [`TrieError::PathOccupied`] when a present node is at `new_path`, or
    ///   an adopted child name collides with a moved child
    /// - [`TrieError::MoveIntoSubtree`] when moving a subtree below itself
    pub fn set_path(&mut self, id: NodeId, new_path: &PathKey, move_children: bool) -> Result<(), TrieError> {
        let node = self.node(id)?;
        if id == self.root || new_path.is_empty() {
            return Err(TrieError::RootImmutable);
        }
        let old_path = self.cached_path(node).clone();
        if *new_path == old_path {
            return Ok(());
        }
        if move_children && old_path.is_ancestor_of(new_path) {
            return Err(TrieError::MoveIntoSubtree {
                from: old_path.to_string(),
                to: new_path.to_string(),
            });
        }
        let has_children = !node.children.is_empty();
        if let Some(target) = self.locate(new_path) {
            let target_node = self.node(target)?;
            if target_node.state.is_present() {
                return Err(TrieError::occupied(new_path));
            }
            let collides = move_children
                && target_node
                    .children
                    .iter()
                    .any(|(name, child)| child != id && node.children.contains(name));
            if collides {
                return Err(TrieError::occupied(new_path));
            }
        }

        let old_parent = node.parent;
        let old_name = node.name.clone();

        // Detach, leaving children behind when requested
        if !move_children && has_children {
            let children = std::mem::take(&mut self.node_mut(id)?.children);
            let holder = self.alloc(Node::new(old_name.clone(), old_parent, NodeState::Unset));
            for child in children.ids() {
                self.node_mut(child)?.parent = Some(holder);
            }
            self.node_mut(holder)?.children = children;
            if let Some(parent) = old_parent {
                self.node_mut(parent)?.children.insert(old_name, holder);
            }
        } else if let Some(parent) = old_parent {
            self.node_mut(parent)?.children.remove(&old_name);
        }

        // Attach under the new parent, adopting a placeholder's children
        let parent_path = new_path.parent().unwrap_or_default();
        let new_name = new_path.last().unwrap_or_default().to_string();
        let new_parent = self.ensure_node(&parent_path);
        let existing = self.node(new_parent)?.children.get(&new_name);
        if let Some(target) = existing {
            if let Some(placeholder) = self.release(target) {
                for (child_name, child) in placeholder.children.iter() {
                    self.node_mut(child)?.parent = Some(id);
                    self.node_mut(id)?.children.insert(child_name, child);
                }
            }
        }
        {
            let node = self.node_mut(id)?;
            node.name.clone_from(&new_name);
            node.parent = Some(new_parent);
        }
        self.node_mut(new_parent)?.children.insert(new_name, id);
        self.invalidate_paths(id);
        if let Some(parent) = old_parent {
            self.prune(parent);
        }

        debug!(from = %old_path, to = %new_path, move_children, "node moved");
        self.notify(id, |listener, trie| listener.path_changed(trie, id, &old_path, move_children));
        Ok(())
    }

    // ------------------------------------------------------------------
    // Listeners and traversal
    // ------------------------------------------------------------------

    /// Register a listener on a node
    ///
    /// The listener sees events of this node and all nodes below it. It is
    /// dropped together with the node.
    ///
    /// # Errors
    /// Returns [`TrieError::DeadNode`] for stale handles.
    pub fn add_listener(&mut self, id: NodeId, listener: Arc<dyn TrieListener<T>>) -> Result<(), TrieError> {
        self.node_mut(id)?.listeners.push(listener);
        Ok(())
    }

    /// Unregister a listener, returning whether it was registered
    ///
    /// # Errors
    /// Returns [`TrieError::DeadNode`] for stale handles.
    pub fn remove_listener(&mut self, id: NodeId, listener: &Arc<dyn TrieListener<T>>) -> Result<bool, TrieError> {
        let listeners = &mut self.node_mut(id)?.listeners;
        let before = listeners.len();
        listeners.retain(|registered| !Arc::ptr_eq(registered, listener));
        Ok(listeners.len() != before)
    }

    /// Pre-order traversal over present nodes of a subtree, `id` included
    ///
    /// # Errors
    /// Returns [`TrieError::DeadNode`] for stale handles.
    pub fn accept<V>(&self, id: NodeId, visitor: &mut V) -> Result<ControlFlow<()>, TrieError>
    where
        V: TrieVisitor<T> + ?Sized,
    {
        self.node(id)?;
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let node = self.node(current)?;
            if node.state.is_present() && visitor.visit(self, current).is_break() {
                return Ok(ControlFlow::Break(()));
            }
            stack.extend(node.children.ids().rev());
        }
        Ok(ControlFlow::Continue(()))
    }

    /// [`PathTrie::accept`] with a closure visitor
    ///
    /// # Errors
    /// Returns [`TrieError::DeadNode`] for stale handles.
    pub fn visit<F>(&self, id: NodeId, f: F) -> Result<ControlFlow<()>, TrieError>
    where
        F: FnMut(&Self, NodeId) -> ControlFlow<()>,
    {
        self.accept(id, &mut FnVisitor(f))
    }
}

impl<T> Default for PathTrie<T> {
    fn default() -> Self {
        Self::new(None)
    }
}

impl<T> fmt::Debug for PathTrie<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PathTrie")
            .field("present", &self.present)
            .field("slots", &self.slots.len())
            .field("free", &self.free.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn p(s: &str) -> PathKey {
        PathKey::parse(s)
    }

    #[derive(Default)]
    struct Recorder {
        events: Mutex<Vec<String>>,
    }

    impl Recorder {
        fn take(&self) -> Vec<String> {
            std::mem::take(&mut *self.events.lock().unwrap())
        }
    }

    impl TrieListener<u32> for Recorder {
        fn added(&self, trie: &PathTrie<u32>, node: NodeId) {
            let path = trie.path(node).unwrap();
            self.events.lock().unwrap().push(format!("added {path}"));
        }

        fn about_to_remove(&self, trie: &PathTrie<u32>, node: NodeId) {
            let path = trie.path(node).unwrap();
            self.events.lock().unwrap().push(format!("remove {path}"));
        }

        fn value_changed(&self, trie: &PathTrie<u32>, node: NodeId, old: Option<&u32>) {
            let path = trie.path(node).unwrap();
            self.events.lock().unwrap().push(format!("changed {path} {old:?}"));
        }

        fn path_changed(&self, trie: &PathTrie<u32>, node: NodeId, old_path: &PathKey, moved: bool) {
            let path = trie.path(node).unwrap();
            self.events.lock().unwrap().push(format!("moved {old_path} -> {path} {moved}"));
        }
    }

    #[test]
    fn get_or_create_makes_placeholders() {
        let mut trie: PathTrie<u32> = PathTrie::new(None);
        let id = trie.get_or_create_with(&p("a/b/c"), || 7);
        assert_eq!(trie.len(), 1);
        assert_eq!(trie.value(id).unwrap(), Some(&7));

        let b = trie.parent(id).unwrap().unwrap();
        assert!(!trie.is_present(b));
        assert_eq!(trie.path(b).unwrap(), &p("a/b"));
        assert_eq!(trie.nearest_present_parent(id).unwrap(), None);
    }

    #[test]
    fn get_or_create_is_idempotent() {
        let mut trie: PathTrie<u32> = PathTrie::default();
        let first = trie.get_or_create_with(&p("x"), || 1);
        let second = trie.get_or_create_with(&p("x"), || 2);
        assert_eq!(first, second);
        assert_eq!(trie.value(first).unwrap(), Some(&1));
    }

    #[test]
    fn exact_find_requires_present_node() {
        let mut trie: PathTrie<u32> = PathTrie::new(None);
        trie.get_or_create_with(&p("a/b"), || 1);
        assert_eq!(trie.find(&p("a"), true, false), None);
        assert!(trie.find(&p("a/b"), true, false).is_some());
    }

    #[test]
    fn nearest_ancestor_fallback() {
        let mut trie: PathTrie<u32> = PathTrie::new(Some(0));
        let a = trie.get_or_create_with(&p("a"), || 1);
        trie.get_or_create_with(&p("a/b/c"), || 2);

        assert_eq!(trie.find(&p("a/b/x"), false, false), Some(a));
        assert_eq!(trie.find(&p("a/b"), false, false), Some(a));
        assert_eq!(trie.find(&p("z/y"), false, false), Some(trie.root()));
    }

    #[test]
    fn literal_beats_double_star() {
        let mut trie: PathTrie<u32> = PathTrie::new(None);
        let wide = trie.get_or_create_with(&p("a/**"), || 1);
        let literal = trie.get_or_create_with(&p("a/b/c"), || 2);

        assert_eq!(trie.find(&p("a/b/c"), true, true), Some(literal));
        assert_eq!(trie.find(&p("a/b/d"), true, true), Some(wide));
        assert_eq!(trie.find(&p("a"), true, true), Some(wide));
    }

    #[test]
    fn glob_segments_match() {
        let mut trie: PathTrie<u32> = PathTrie::new(None);
        let c_files = trie.get_or_create_with(&p("src/*.c"), || 1);
        let versioned = trie.get_or_create_with(&p("v?/lib"), || 2);

        assert_eq!(trie.find(&p("src/main.c"), true, true), Some(c_files));
        assert_eq!(trie.find(&p("src/main.h"), true, true), None);
        assert_eq!(trie.find(&p("v2/lib"), true, true), Some(versioned));
        assert_eq!(trie.find(&p("v10/lib"), true, true), None);
        assert_eq!(trie.find(&p("src/main.c"), true, false), None);
    }

    #[test]
    fn longer_concrete_path_wins() {
        let mut trie: PathTrie<u32> = PathTrie::new(None);
        trie.get_or_create_with(&p("**/x"), || 1);
        let deeper = trie.get_or_create_with(&p("*/b/**/x"), || 2);
        assert_eq!(trie.find(&p("a/b/c/x"), true, true), Some(deeper));
    }

    #[test]
    fn double_star_consumes_zero_or_more() {
        let mut trie: PathTrie<u32> = PathTrie::new(None);
        let wide = trie.get_or_create_with(&p("**/c"), || 1);
        let tight = trie.get_or_create_with(&p("a/**/c"), || 2);

        assert_eq!(trie.find(&p("a/c"), true, true), Some(tight));
        assert_eq!(trie.find(&p("a/b/b/c"), true, true), Some(tight));
        assert_eq!(trie.find(&p("x/b/c"), true, true), Some(wide));
        assert_eq!(trie.find(&p("c"), true, true), Some(wide));
        assert_eq!(trie.find(&p("a/b"), true, true), None);
    }

    #[test]
    fn fewer_double_stars_win_ties() {
        for one_first in [true, false] {
            let mut trie: PathTrie<&str> = PathTrie::new(None);
            let (one, two) = if one_first {
                let one = trie.get_or_create_with(&p("*/**/x"), || "one");
                (one, trie.get_or_create_with(&p("?/**/**/x"), || "two"))
            } else {
                let two = trie.get_or_create_with(&p("?/**/**/x"), || "two");
                (trie.get_or_create_with(&p("*/**/x"), || "one"), two)
            };

            assert_eq!(trie.find(&p("a/b/x"), true, true), Some(one));
            assert_ne!(trie.find(&p("a/b/x"), true, true), Some(two));
        }
    }

    #[test]
    fn pattern_fallback_uses_matching_prefix() {
        let mut trie: PathTrie<u32> = PathTrie::new(Some(0));
        let dir = trie.get_or_create_with(&p("src/*"), || 1);
        assert_eq!(trie.find(&p("src/lib/x.c"), false, true), Some(dir));
        assert_eq!(trie.find(&p("doc/x"), false, true), Some(trie.root()));
    }

    #[test]
    fn remove_prunes_up_to_root() {
        let mut trie: PathTrie<u32> = PathTrie::new(None);
        let leaf = trie.get_or_create_with(&p("a/b/c"), || 1);
        let b = trie.parent(leaf).unwrap().unwrap();
        let a = trie.parent(b).unwrap().unwrap();

        assert_eq!(trie.remove(leaf).unwrap(), Some(1));
        assert!(!trie.is_alive(leaf));
        assert!(!trie.is_alive(b));
        assert!(!trie.is_alive(a));
        assert!(trie.children(trie.root()).unwrap().is_empty());
        assert!(trie.is_alive(trie.root()));
    }

    #[test]
    fn remove_with_children_leaves_placeholder() {
        let mut trie: PathTrie<u32> = PathTrie::new(None);
        let a = trie.get_or_create_with(&p("a"), || 1);
        let c = trie.get_or_create_with(&p("a/c"), || 2);

        trie.remove(a).unwrap();
        assert!(!trie.is_alive(a));
        assert_eq!(trie.value(a), Err(TrieError::DeadNode(a)));

        let holder = trie.parent(c).unwrap().unwrap();
        assert_ne!(holder, a);
        assert!(!trie.is_present(holder));
        assert_eq!(trie.path(c).unwrap(), &p("a/c"));

        trie.remove(c).unwrap();
        assert!(!trie.is_alive(holder));
    }

    #[test]
    fn root_is_immutable() {
        let mut trie: PathTrie<u32> = PathTrie::new(Some(1));
        let root = trie.root();
        assert_eq!(trie.remove(root), Err(TrieError::RootImmutable));
        assert_eq!(trie.set_path(root, &p("x"), true), Err(TrieError::RootImmutable));
        assert_eq!(trie.take_value(root).unwrap(), Some(1));
        assert!(trie.is_alive(root));
    }

    #[test]
    fn slot_reuse_kills_stale_handles() {
        let mut trie: PathTrie<u32> = PathTrie::new(None);
        let old = trie.get_or_create_with(&p("a"), || 1);
        trie.remove(old).unwrap();
        let new = trie.get_or_create_with(&p("b"), || 2);
        assert_eq!(old.index(), new.index());
        assert!(!trie.is_alive(old));
        assert!(trie.value(old).unwrap_err().is_dead_node());
    }

    #[test]
    fn set_path_moves_subtree() {
        let mut trie: PathTrie<u32> = PathTrie::new(None);
        let a = trie.get_or_create_with(&p("x/a"), || 1);
        let child = trie.get_or_create_with(&p("x/a/c"), || 2);

        trie.set_path(a, &p("y/b"), true).unwrap();
        assert_eq!(trie.path(a).unwrap(), &p("y/b"));
        assert_eq!(trie.path(child).unwrap(), &p("y/b/c"));
        assert_eq!(trie.find(&p("x/a"), false, false), Some(trie.root()));
        assert_eq!(trie.locate(&p("x")), None);
    }

    #[test]
    fn set_path_without_children_leaves_them() {
        let mut trie: PathTrie<u32> = PathTrie::new(None);
        let a = trie.get_or_create_with(&p("a"), || 1);
        let child = trie.get_or_create_with(&p("a/c"), || 2);

        trie.set_path(a, &p("b"), false).unwrap();
        assert_eq!(trie.path(a).unwrap(), &p("b"));
        assert_eq!(trie.path(child).unwrap(), &p("a/c"));
        assert!(trie.children(a).unwrap().is_empty());
        assert!(!trie.is_present(trie.parent(child).unwrap().unwrap()));
    }

    #[test]
    fn set_path_adopts_placeholder_children() {
        let mut trie: PathTrie<u32> = PathTrie::new(None);
        let a = trie.get_or_create_with(&p("a"), || 1);
        let deep = trie.get_or_create_with(&p("b/d"), || 2);

        trie.set_path(a, &p("b"), true).unwrap();
        assert_eq!(trie.parent(deep).unwrap(), Some(a));
        assert_eq!(trie.path(deep).unwrap(), &p("b/d"));
    }

    #[test]
    fn set_path_rejects_occupied_and_subtree() {
        let mut trie: PathTrie<u32> = PathTrie::new(None);
        let a = trie.get_or_create_with(&p("a"), || 1);
        trie.get_or_create_with(&p("b"), || 2);

        assert_eq!(trie.set_path(a, &p("b"), true), Err(TrieError::occupied(&p("b"))));
        assert!(matches!(
            trie.set_path(a, &p("a/x"), true),
            Err(TrieError::MoveIntoSubtree { .. })
        ));
        trie.set_path(a, &p("a/x"), false).unwrap();
        assert_eq!(trie.path(a).unwrap(), &p("a/x"));
    }

    #[test]
    fn listeners_bubble_to_ancestors() {
        let mut trie: PathTrie<u32> = PathTrie::new(None);
        let top = trie.get_or_create_with(&p("a"), || 0);
        let recorder = Arc::new(Recorder::default());
        trie.add_listener(top, recorder.clone()).unwrap();

        let leaf = trie.get_or_create_with(&p("a/b/c"), || 1);
        trie.set_value(leaf, 2).unwrap();
        trie.set_path(leaf, &p("a/d"), true).unwrap();
        trie.remove(leaf).unwrap();

        assert_eq!(
            recorder.take(),
            vec![
                "added a/b/c".to_string(),
                "changed a/b/c Some(1)".to_string(),
                "moved a/b/c -> a/d true".to_string(),
                "remove a/d".to_string(),
            ]
        );
    }

    #[test]
    fn removed_listener_stops_receiving() {
        let mut trie: PathTrie<u32> = PathTrie::new(Some(0));
        let recorder = Arc::new(Recorder::default());
        let listener: Arc<dyn TrieListener<u32>> = recorder.clone();
        let root = trie.root();
        trie.add_listener(root, listener.clone()).unwrap();
        assert!(trie.remove_listener(root, &listener).unwrap());
        trie.get_or_create_with(&p("a"), || 1);
        assert!(recorder.take().is_empty());
    }

    #[test]
    fn accept_visits_present_nodes_preorder() {
        let mut trie: PathTrie<u32> = PathTrie::new(None);
        trie.get_or_create_with(&p("a"), || 1);
        trie.get_or_create_with(&p("a/x/y"), || 2);
        trie.get_or_create_with(&p("b"), || 3);

        let mut seen = Vec::new();
        let flow = trie
            .visit(trie.root(), |t, n| {
                seen.push(*t.value(n).unwrap().unwrap());
                ControlFlow::Continue(())
            })
            .unwrap();
        assert_eq!(flow, ControlFlow::Continue(()));
        assert_eq!(seen, vec![1, 2, 3]);
    }

    #[test]
    fn accept_stops_on_break() {
        let mut trie: PathTrie<u32> = PathTrie::new(None);
        trie.get_or_create_with(&p("a"), || 1);
        trie.get_or_create_with(&p("b"), || 2);

        let mut count = 0;
        let flow = trie
            .visit(trie.root(), |_, _| {
                count += 1;
                ControlFlow::Break(())
            })
            .unwrap();
        assert_eq!(flow, ControlFlow::Break(()));
        assert_eq!(count, 1);
    }

    #[test]
    fn direct_present_children_skip_placeholders() {
        let mut trie: PathTrie<u32> = PathTrie::new(None);
        let x = trie.get_or_create_with(&p("a/x"), || 1);
        let y = trie.get_or_create_with(&p("a/b/y"), || 2);
        let z = trie.get_or_create_with(&p("c"), || 3);
        assert_eq!(trie.direct_present_children(trie.root()).unwrap(), vec![x, y, z]);
    }
}
