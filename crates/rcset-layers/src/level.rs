//! A single provenance level

use crate::config::LevelConfig;
use indexmap::{IndexMap, IndexSet};
use rcset_entry::{Entry, NameIdentity, NameKey};

/// Entry stored on a level, with its override status and caller data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelEntry<C> {
    entry: Entry,
    overridden: bool,
    custom: Option<C>,
}

impl<C> LevelEntry<C> {
    /// The stored entry (level flags already applied)
    #[inline]
    #[must_use]
    pub fn entry(&self) -> &Entry {
        &self.entry
    }

    /// Check whether a higher level or a suppression masks this entry
    #[inline]
    #[must_use]
    pub fn is_overridden(&self) -> bool {
        self.overridden
    }

    /// Caller data attached to the entry
    #[inline]
    #[must_use]
    pub fn custom(&self) -> Option<&C> {
        self.custom.as_ref()
    }
}

/// Ordered entries of one provenance level
///
/// Entries are keyed by name identity; re-adding a name replaces the entry
/// in place. Flags configured on the level are applied on ingestion.
#[derive(Debug, Clone)]
pub struct SettingLevel<C> {
    config: LevelConfig,
    entries: IndexMap<NameKey, LevelEntry<C>>,
    override_names: Option<IndexSet<NameKey>>,
}

impl<C> SettingLevel<C> {
    /// Create empty level
    #[must_use]
    pub fn new(config: LevelConfig) -> Self {
        Self {
            config,
            entries: IndexMap::new(),
            override_names: None,
        }
    }

    /// Level attributes
    #[inline]
    #[must_use]
    pub fn config(&self) -> &LevelConfig {
        &self.config
    }

    /// Check whether merges leave this level untouched
    #[inline]
    #[must_use]
    pub fn is_read_only(&self) -> bool {
        self.config.read_only
    }

    /// Check whether built-ins of this level can be suppressed
    #[inline]
    #[must_use]
    pub fn supports_override(&self) -> bool {
        self.config.override_supported
    }

    /// Number of stored entries, overridden ones included
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if no entries are stored
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Stored entries in insertion order
    pub fn entries(&self) -> impl Iterator<Item = &LevelEntry<C>> {
        self.entries.values()
    }

    /// Stored entries with their name keys
    pub fn iter(&self) -> impl Iterator<Item = (&NameKey, &LevelEntry<C>)> {
        self.entries.iter()
    }

    /// Entry stored under a name key
    #[inline]
    #[must_use]
    pub fn get(&self, key: &NameKey) -> Option<&LevelEntry<C>> {
        self.entries.get(key)
    }

    /// Name keys of suppressed built-ins
    #[inline]
    #[must_use]
    pub fn override_names(&self) -> Option<&IndexSet<NameKey>> {
        self.override_names.as_ref()
    }

    pub(crate) fn set_config(&mut self, config: LevelConfig) {
        self.config = config;
    }

    fn ingest(&self, entry: &Entry) -> Entry {
        entry.with_flags_changed(self.config.flags_to_set, self.config.flags_to_clear)
    }

    /// Replace contents, applying level flags
    pub(crate) fn put<I>(&mut self, identity: &dyn NameIdentity, entries: I)
    where
        I: IntoIterator<Item = Entry>,
    {
        self.entries.clear();
        for entry in entries {
            let key = identity.name_key(&entry);
            self.add(key, &entry, None);
        }
    }

    /// Add one entry, applying level flags
    pub(crate) fn add(&mut self, key: NameKey, entry: &Entry, custom: Option<C>) {
        let entry = self.ingest(entry);
        self.entries.insert(
            key,
            LevelEntry {
                entry,
                overridden: false,
                custom,
            },
        );
    }

    /// Entry as it would be stored on this level
    pub(crate) fn flagged(&self, entry: &Entry) -> Entry {
        self.ingest(entry)
    }

    pub(crate) fn take_entries(&mut self) -> IndexMap<NameKey, LevelEntry<C>> {
        std::mem::take(&mut self.entries)
    }

    pub(crate) fn entries_mut(&mut self) -> impl Iterator<Item = (&NameKey, &mut LevelEntry<C>)> {
        self.entries.iter_mut()
    }

    pub(crate) fn custom_mut(&mut self, key: &NameKey) -> Option<&mut Option<C>> {
        self.entries.get_mut(key).map(|stored| &mut stored.custom)
    }

    pub(crate) fn set_override_names(&mut self, names: IndexSet<NameKey>) {
        self.override_names = Some(names);
    }

    pub(crate) fn suppress(&mut self, key: &NameKey) {
        self.override_names
            .get_or_insert_with(IndexSet::new)
            .insert(key.clone());
    }

    pub(crate) fn unsuppress(&mut self, key: &NameKey) {
        if let Some(names) = &mut self.override_names {
            names.shift_remove(key);
        }
    }
}

impl<C> LevelEntry<C> {
    pub(crate) fn set_overridden(&mut self, overridden: bool) {
        self.overridden = overridden;
    }

    pub(crate) fn into_custom(self) -> Option<C> {
        self.custom
    }
}
