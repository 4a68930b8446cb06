//! Settings tree
//!
//! Provides [`SettingsTree`], which attaches a per-kind [`SettingsSet`] store
//! to resources addressed by path. Lookups resolve to the most specific
//! resource covering a path, so a `src/**` resource applies to every file
//! below `src` that has no resource of its own.

use crate::config::EngineConfig;
use crate::delta::{EntryDelta, KindDelta};
use crate::error::TreeError;
use indexmap::IndexSet;
use rcset_entry::{ContentsKey, Entry, EntryError, EntryKind, KindStore, PathKey};
use rcset_layers::SettingsSet;
use rcset_trie::{NodeId, PathTrie, TrieListener, TrieVisitor};
use std::ops::ControlFlow;
use std::sync::Arc;
use tracing::{debug, trace};

/// Per-kind settings of one resource
pub type ResourceSettings<C> = KindStore<SettingsSet<C>>;

/// Path-indexed tree of resource settings
///
/// # Example
///
/// ```rust
/// use rcset_entry::{Entry, EntryKind, PathKey};
/// use rcset_tree::{EngineConfig, SettingsTree};
///
/// let mut tree: SettingsTree = SettingsTree::new(&EngineConfig::default());
/// let src = PathKey::parse("src/**");
/// tree.apply_entries(&src, EntryKind::Macro, vec![Entry::macro_def("DEBUG", "1")])
///     .unwrap();
///
/// let file = PathKey::parse("src/net/socket.c");
/// let macros = tree.effective_entries(&file, EntryKind::Macro).unwrap();
/// assert_eq!(macros, vec![Entry::macro_def("DEBUG", "1")]);
///
/// // outside src the root settings apply
/// let other = PathKey::parse("docs/intro.md");
/// assert!(tree.effective_entries(&other, EntryKind::Macro).unwrap().is_empty());
/// ```
pub struct SettingsTree<C = ()> {
    config: EngineConfig,
    trie: PathTrie<ResourceSettings<C>>,
}

fn fresh_settings<C>(config: &EngineConfig) -> ResourceSettings<C> {
    let mut store = KindStore::new(config.kind_support);
    for mut slot in store.contents_mut() {
        slot.set(SettingsSet::from_layout(&config.layout));
    }
    store
}

impl<C> SettingsTree<C> {
    /// Create tree holding only the root resource
    #[must_use]
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            config: config.clone(),
            trie: PathTrie::new(Some(fresh_settings(config))),
        }
    }

    /// Engine configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Underlying trie
    #[inline]
    #[must_use]
    pub fn trie(&self) -> &PathTrie<ResourceSettings<C>> {
        &self.trie
    }

    /// Number of resources, the root included
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.trie.len()
    }

    /// Check if no resource holds settings
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.trie.is_empty()
    }

    /// Check whether a resource exists at exactly `path`
    #[inline]
    #[must_use]
    pub fn contains_resource(&self, path: &PathKey) -> bool {
        self.trie.contains(path)
    }

    /// Resource governing `path`
    ///
    /// The exact resource if present, else the best pattern match, else the
    /// nearest enclosing resource, else the root.
    #[must_use]
    pub fn resolve(&self, path: &PathKey) -> NodeId {
        self.trie
            .find(path, false, true)
            .unwrap_or_else(|| self.trie.root())
    }

    /// Settings of one kind governing `path`
    ///
    /// # Errors
    /// Returns [`TreeError::Entry`] for kinds outside the configured support.
    pub fn settings(&self, path: &PathKey, kind: EntryKind) -> Result<Option<&SettingsSet<C>>, TreeError> {
        let node = self.resolve(path);
        match self.trie.value(node)? {
            Some(store) => Ok(store.get(kind)?),
            None => Ok(None),
        }
    }

    /// Mutable settings of one kind governing `path`
    ///
    /// This edits the resolved resource, which may be an ancestor or a
    /// pattern resource shared with other paths. Use
    /// [`SettingsTree::resource`] first to edit `path` alone.
    ///
    /// # Errors
    /// Returns [`TreeError::Entry`] for kinds outside the configured support.
    pub fn settings_mut(&mut self, path: &PathKey, kind: EntryKind) -> Result<Option<&mut SettingsSet<C>>, TreeError> {
        let node = self.resolve(path);
        match self.trie.value_mut(node)? {
            Some(store) => Ok(store.get_mut(kind)?),
            None => Ok(None),
        }
    }

    /// Visible entries of one kind governing `path`
    ///
    /// # Errors
    /// Returns [`TreeError::Entry`] for kinds outside the configured support.
    pub fn effective_entries(&self, path: &PathKey, kind: EntryKind) -> Result<Vec<Entry>, TreeError> {
        Ok(self
            .settings(path, kind)?
            .map(|set| set.entries(false))
            .unwrap_or_default())
    }

    /// Visible entries of every kind governing `path`
    ///
    /// # Errors
    /// Returns [`TreeError::Trie`] if the resolved resource vanished.
    pub fn effective_snapshot(&self, path: &PathKey) -> Result<KindStore<Vec<Entry>>, TreeError> {
        let mut snapshot = KindStore::new(self.config.kind_support);
        if let Some(store) = self.trie.value(self.resolve(path))? {
            for (kind, set) in store.iter() {
                snapshot.put(kind, set.entries(false))?;
            }
        }
        Ok(snapshot)
    }

    /// Visible entries of one kind across all resources, without duplicates
    ///
    /// Entries are deduplicated by contents, first occurrence in pre-order
    /// wins.
    ///
    /// # Errors
    /// Returns [`TreeError::Entry`] for kinds outside the configured support.
    pub fn collect_entries(&self, kind: EntryKind) -> Result<Vec<Entry>, TreeError> {
        let support = self.config.kind_support;
        if !support.supports(kind) {
            return Err(EntryError::UnsupportedKind { kind, support }.into());
        }
        let mut collector = EntryCollector {
            kind,
            seen: IndexSet::new(),
        };
        self.trie.accept(self.trie.root(), &mut collector)?;
        Ok(collector.seen.into_iter().map(ContentsKey::into_entry).collect())
    }

    /// Paths of all resources in pre-order
    ///
    /// # Errors
    /// Returns [`TreeError::Trie`] on a corrupted trie.
    pub fn resources(&self) -> Result<Vec<PathKey>, TreeError> {
        let mut paths = Vec::with_capacity(self.trie.len());
        self.trie.visit(self.trie.root(), |trie, node| {
            if let Ok(path) = trie.path(node) {
                paths.push(path.clone());
            }
            ControlFlow::Continue(())
        })?;
        Ok(paths)
    }

    /// Remove the resource at exactly `path`, returning its settings
    ///
    /// Paths below it fall back to the next enclosing resource.
    ///
    /// # Errors
    /// Returns [`TreeError::Trie`] when `path` is the root.
    pub fn remove_resource(&mut self, path: &PathKey) -> Result<Option<ResourceSettings<C>>, TreeError> {
        let Some(id) = self.trie.find(path, true, false) else {
            trace!(path = %path, "no resource to remove");
            return Ok(None);
        };
        let removed = self.trie.remove(id)?;
        debug!(path = %path, "resource removed");
        Ok(removed)
    }

    /// Move the resource at `from`, with everything below it, to `to`
    ///
    /// # Errors
    /// - [`TreeError::ResourceNotFound`] if no resource is at `from`
    /// - [`TreeError::Trie`] if `to` is occupied or lies below `from`
    pub fn move_resource(&mut self, from: &PathKey, to: &PathKey) -> Result<(), TreeError> {
        let id = self
            .trie
            .find(from, true, false)
            .ok_or_else(|| TreeError::not_found(from))?;
        self.trie.set_path(id, to, true)?;
        debug!(from = %from, to = %to, "resource moved");
        Ok(())
    }

    /// Observe changes of the resource at `path` and everything below it
    ///
    /// # Errors
    /// Returns [`TreeError::ResourceNotFound`] if no resource is at `path`.
    pub fn add_listener(
        &mut self,
        path: &PathKey,
        listener: Arc<dyn TrieListener<ResourceSettings<C>>>,
    ) -> Result<(), TreeError> {
        let id = self
            .trie
            .find(path, true, false)
            .ok_or_else(|| TreeError::not_found(path))?;
        self.trie.add_listener(id, listener)?;
        Ok(())
    }
}

impl<C: Clone> SettingsTree<C> {
    /// Get the resource at `path`, creating it if needed
    ///
    /// A new resource starts as a copy of the settings currently governing
    /// `path`.
    ///
    /// # Errors
    /// Returns [`TreeError::Trie`] on a corrupted trie.
    pub fn resource(&mut self, path: &PathKey) -> Result<NodeId, TreeError> {
        if let Some(id) = self.trie.find(path, true, false) {
            return Ok(id);
        }
        let source = self.resolve(path);
        let from = self.trie.path(source)?.clone();
        let inherited = self
            .trie
            .value(source)?
            .map(|store| store.clone_with(|_, set| set.clone()));
        let settings = match inherited {
            Some(settings) => settings,
            None => fresh_settings(&self.config),
        };
        let id = self.trie.get_or_create_with(path, || settings);
        debug!(path = %path, from = %from, "resource created");
        Ok(id)
    }

    /// Merge `entries` into the settings of the resource at `path`
    ///
    /// Creates the resource first if needed, then returns how its visible
    /// entries of `kind` changed.
    ///
    /// # Errors
    /// Returns [`TreeError::Entry`] for kinds outside the configured support.
    pub fn apply_entries<E>(&mut self, path: &PathKey, kind: EntryKind, entries: E) -> Result<KindDelta, TreeError>
    where
        E: IntoIterator<Item = Entry>,
    {
        let id = self.resource(path)?;
        let layout = &self.config.layout;
        let store = self
            .trie
            .value_mut(id)?
            .ok_or_else(|| TreeError::not_found(path))?;
        let set = store.get_or_insert_with(kind, || SettingsSet::from_layout(layout))?;

        let before = set.entries(false);
        set.apply_entries(entries);
        let delta = KindDelta::between(&before, &set.entries(false));
        debug!(
            path = %path,
            kind = %kind,
            added = delta.added.len(),
            removed = delta.removed.len(),
            "entries applied"
        );
        Ok(delta)
    }

    /// Replace the settings of the resource at `path`
    ///
    /// Returns how the visible entries governing `path` changed.
    ///
    /// # Errors
    /// Returns [`TreeError::Trie`] on a corrupted trie.
    pub fn replace_settings(&mut self, path: &PathKey, settings: ResourceSettings<C>) -> Result<EntryDelta, TreeError> {
        let before = self.effective_snapshot(path)?;
        let id = self.resource(path)?;
        self.trie.set_value(id, settings)?;
        let after = self.effective_snapshot(path)?;
        Ok(EntryDelta::between(&before, &after))
    }
}

impl<C> std::fmt::Debug for SettingsTree<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SettingsTree")
            .field("config", &self.config)
            .field("resources", &self.trie.len())
            .finish()
    }
}

struct EntryCollector {
    kind: EntryKind,
    seen: IndexSet<ContentsKey>,
}

impl<C> TrieVisitor<ResourceSettings<C>> for EntryCollector {
    fn visit(&mut self, trie: &PathTrie<ResourceSettings<C>>, node: NodeId) -> ControlFlow<()> {
        let set = trie
            .value(node)
            .ok()
            .flatten()
            .and_then(|store| store.get(self.kind).ok().flatten());
        if let Some(set) = set {
            self.seen.extend(set.entries(false).into_iter().map(ContentsKey::new));
        }
        ControlFlow::Continue(())
    }
}
