//! Layered settings
//!
//! Provides [`SettingsSet`], a fixed stack of [`SettingLevel`]s producing
//! one conflict-resolved entry list. Level 0 has the highest priority: an
//! entry is *overridden* when a level above it holds an entry with the same
//! name identity, or when its name was suppressed on an override-capable
//! level.

use crate::config::{LevelConfig, LevelLayout};
use crate::error::LayerError;
use crate::level::{LevelEntry, SettingLevel};
use indexmap::{IndexMap, IndexSet};
use rcset_entry::{DefaultNameIdentity, Entry, NameIdentity, NameKey};
use tracing::{debug, trace, warn};

/// Entry of a settings set with its provenance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedEntry {
    /// The entry as stored on its level
    pub entry: Entry,
    /// Index of the owning level
    pub level: usize,
    /// Whether the entry is masked
    pub overridden: bool,
}

/// Ordered stack of provenance levels
///
/// `C` is opaque caller data attached to entries; it survives a merge when
/// the entry comes back unchanged. `I` computes name identity.
///
/// # Example
///
/// ```rust
/// use rcset_entry::Entry;
/// use rcset_layers::{LevelLayout, SettingsSet, DISCOVERED_LEVEL};
///
/// let mut set: SettingsSet = SettingsSet::from_layout(&LevelLayout::default());
/// set.put_entries(DISCOVERED_LEVEL, vec![Entry::macro_def("X", "1")]).unwrap();
///
/// // user redefines X: the discovered X=1 is shadowed
/// set.apply_entries(vec![Entry::macro_def("X", "2")]);
/// let visible = set.entries(false);
/// assert_eq!(visible.len(), 1);
/// assert_eq!(visible[0].value(), Some("2"));
/// ```
#[derive(Debug, Clone)]
pub struct SettingsSet<C = (), I = DefaultNameIdentity> {
    levels: Vec<SettingLevel<C>>,
    identity: I,
}

impl<C, I: NameIdentity + Default> SettingsSet<C, I> {
    /// Create set of `count` writable levels
    #[must_use]
    pub fn new(count: usize) -> Self {
        Self::with_identity(count, I::default())
    }

    /// Create set shaped by a layout
    #[must_use]
    pub fn from_layout(layout: &LevelLayout) -> Self {
        Self::from_layout_with_identity(layout, I::default())
    }
}

impl<C, I: NameIdentity> SettingsSet<C, I> {
    /// Create set of `count` writable levels with a naming strategy
    #[must_use]
    pub fn with_identity(count: usize, identity: I) -> Self {
        let levels = (0..count)
            .map(|_| SettingLevel::new(LevelConfig::writable()))
            .collect();
        Self { levels, identity }
    }

    /// Create set shaped by a layout with a naming strategy
    #[must_use]
    pub fn from_layout_with_identity(layout: &LevelLayout, identity: I) -> Self {
        let levels = layout
            .levels()
            .iter()
            .map(|spec| SettingLevel::new(spec.config))
            .collect();
        Self { levels, identity }
    }

    /// Naming strategy
    #[inline]
    #[must_use]
    pub fn identity(&self) -> &I {
        &self.identity
    }

    /// Number of levels
    #[inline]
    #[must_use]
    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    /// Access a level
    ///
    /// # Errors
    /// Returns [`LayerError::LevelOutOfRange`] for a bad index.
    pub fn level(&self, index: usize) -> Result<&SettingLevel<C>, LayerError> {
        self.levels
            .get(index)
            .ok_or_else(|| LayerError::out_of_range(index, self.levels.len()))
    }

    fn level_mut(&mut self, index: usize) -> Result<&mut SettingLevel<C>, LayerError> {
        let count = self.levels.len();
        self.levels
            .get_mut(index)
            .ok_or_else(|| LayerError::out_of_range(index, count))
    }

    /// Set the attributes of a level
    ///
    /// Intended for setup before entries are stored; stored entries keep
    /// the flags they were ingested with.
    ///
    /// # Errors
    /// Returns [`LayerError::LevelOutOfRange`] for a bad index.
    pub fn configure_level(&mut self, index: usize, config: LevelConfig) -> Result<(), LayerError> {
        self.level_mut(index)?.set_config(config);
        Ok(())
    }

    /// Replace the entries of a level
    ///
    /// # Errors
    /// Returns [`LayerError::LevelOutOfRange`] for a bad index.
    pub fn put_entries<E>(&mut self, index: usize, entries: E) -> Result<(), LayerError>
    where
        E: IntoIterator<Item = Entry>,
    {
        let count = self.levels.len();
        let identity: &dyn NameIdentity = &self.identity;
        self.levels
            .get_mut(index)
            .ok_or_else(|| LayerError::out_of_range(index, count))?
            .put(identity, entries);
        self.adjust_override_state();
        Ok(())
    }

    /// Record suppressed built-in names on a level
    ///
    /// Suppression is per name key, so a suppressed macro `FOO` leaves an
    /// include path `FOO` alone.
    ///
    /// # Errors
    /// - [`LayerError::LevelOutOfRange`] for a bad index
    /// - [`LayerError::OverrideNotSupported`] if the level has no override
    ///   support
    pub fn set_override_names<N>(&mut self, index: usize, names: N) -> Result<(), LayerError>
    where
        N: IntoIterator<Item = NameKey>,
    {
        let level = self.level_mut(index)?;
        if !level.supports_override() {
            return Err(LayerError::OverrideNotSupported { index });
        }
        level.set_override_names(names.into_iter().collect());
        self.adjust_override_state();
        Ok(())
    }

    /// Suppressed built-in names of a level
    ///
    /// # Errors
    /// Returns [`LayerError::LevelOutOfRange`] for a bad index.
    pub fn override_names(&self, index: usize) -> Result<Option<&IndexSet<NameKey>>, LayerError> {
        Ok(self.level(index)?.override_names())
    }

    /// Index of the first writable level
    #[must_use]
    pub fn default_writable_level(&self) -> Option<usize> {
        self.levels.iter().position(|level| !level.is_read_only())
    }

    /// Recompute override flags of every stored entry
    ///
    /// One pass from the highest-priority level down. Suppressed names of
    /// override-capable levels are masked everywhere; otherwise the first
    /// entry of a name is visible and later ones are overridden.
    pub fn adjust_override_state(&mut self) {
        let suppressed: IndexSet<NameKey> = self
            .levels
            .iter()
            .filter(|level| level.supports_override())
            .filter_map(SettingLevel::override_names)
            .flat_map(|names| names.iter().cloned())
            .collect();

        let mut seen: IndexSet<NameKey> = IndexSet::new();
        for level in &mut self.levels {
            for (key, stored) in level.entries_mut() {
                let masked = suppressed.contains(key) || !seen.insert(key.clone());
                stored.set_overridden(masked);
            }
        }
    }

    /// Entries of all levels in priority order
    #[must_use]
    pub fn entries(&self, include_overridden: bool) -> Vec<Entry> {
        self.levels
            .iter()
            .flat_map(SettingLevel::entries)
            .filter(|stored| include_overridden || !stored.is_overridden())
            .map(|stored| stored.entry().clone())
            .collect()
    }

    /// Every stored entry with its level and override status
    #[must_use]
    pub fn resolved_entries(&self) -> Vec<ResolvedEntry> {
        self.levels
            .iter()
            .enumerate()
            .flat_map(|(level, stored)| {
                stored.entries().map(move |stored| ResolvedEntry {
                    entry: stored.entry().clone(),
                    level,
                    overridden: stored.is_overridden(),
                })
            })
            .collect()
    }

    /// Merge a new effective entry list into the levels
    ///
    /// Writable levels are rebuilt from `entries`. An entry whose name and
    /// value match an existing entry stays on that entry's level. On a
    /// read-only level this needs the full contents to match as well, since
    /// that level keeps its stored entry; an edited one goes to the first
    /// writable level like any other entry. Caller data is carried over when an entry comes back
    /// unchanged. Built-ins of read-only, override-capable levels that are
    /// missing from `entries` are suppressed.
    pub fn apply_entries<E>(&mut self, entries: E)
    where
        E: IntoIterator<Item = Entry>,
    {
        let mut prior: IndexMap<NameKey, (usize, Entry)> = IndexMap::new();
        for (index, level) in self.levels.iter().enumerate() {
            for (key, stored) in level.iter() {
                prior
                    .entry(key.clone())
                    .or_insert_with(|| (index, stored.entry().clone()));
            }
        }

        let mut cleared: Vec<IndexMap<NameKey, LevelEntry<C>>> = self
            .levels
            .iter_mut()
            .map(|level| {
                if level.is_read_only() {
                    IndexMap::new()
                } else {
                    level.take_entries()
                }
            })
            .collect();

        let writable = self.default_writable_level();
        let mut supplied: IndexSet<NameKey> = IndexSet::new();
        let (mut kept, mut placed, mut dropped) = (0usize, 0usize, 0usize);

        for entry in entries {
            let key = self.identity.name_key(&entry);
            for level in &mut self.levels {
                level.unsuppress(&key);
            }

            let levels = &self.levels;
            let matched = prior
                .get(&key)
                .filter(|(_, old)| self.identity.values_match(old, &entry))
                .filter(|(index, old)| {
                    let level = &levels[*index];
                    !level.is_read_only() || level.flagged(&entry) == *old
                })
                .map(|(index, _)| *index);

            let target = match matched {
                Some(index) => {
                    kept += 1;
                    index
                }
                None => match writable {
                    Some(index) => {
                        placed += 1;
                        index
                    }
                    None => {
                        dropped += 1;
                        warn!(entry = %entry, "no writable level, entry dropped");
                        supplied.insert(key);
                        continue;
                    }
                },
            };

            let level = &mut self.levels[target];
            if level.is_read_only() {
                trace!(entry = %entry, level = target, "kept on read-only level");
            } else {
                let flagged = level.flagged(&entry);
                let custom = match cleared[target].shift_remove(&key) {
                    Some(old) if *old.entry() == flagged => old.into_custom(),
                    _ => None,
                };
                trace!(entry = %entry, level = target, carried = custom.is_some(), "entry placed");
                level.add(key.clone(), &entry, custom);
            }
            supplied.insert(key);
        }

        let mut suppressed = 0usize;
        for (key, (index, old)) in &prior {
            if supplied.contains(key) {
                continue;
            }
            let level = &mut self.levels[*index];
            if level.is_read_only() && level.supports_override() && old.is_builtin() {
                trace!(entry = %old, level = index, "built-in suppressed");
                level.suppress(key);
                suppressed += 1;
            }
        }

        self.adjust_override_state();
        debug!(kept, placed, dropped, suppressed, "entries applied");
    }

    /// Caller data attached to an entry on a level
    ///
    /// # Errors
    /// Returns [`LayerError::LevelOutOfRange`] for a bad index.
    pub fn custom_info(&self, level: usize, entry: &Entry) -> Result<Option<&C>, LayerError> {
        let key = self.identity.name_key(entry);
        Ok(self.level(level)?.get(&key).and_then(LevelEntry::custom))
    }

    /// Attach caller data to an entry on a level, returning the previous data
    ///
    /// # Errors
    /// - [`LayerError::LevelOutOfRange`] for a bad index
    /// - [`LayerError::EntryNotFound`] if the entry is not on the level
    pub fn set_custom_info(&mut self, level: usize, entry: &Entry, info: Option<C>) -> Result<Option<C>, LayerError> {
        let key = self.identity.name_key(entry);
        let slot = self
            .level_mut(level)?
            .custom_mut(&key)
            .ok_or_else(|| LayerError::EntryNotFound {
                level,
                name: key.to_string(),
            })?;
        Ok(std::mem::replace(slot, info))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DISCOVERED_LEVEL, USER_LEVEL};
    use pretty_assertions::assert_eq;
    use rcset_entry::{EntryFlags, EntryKind};

    fn two_tier(discovered: Vec<Entry>) -> SettingsSet<u32> {
        let mut set = SettingsSet::from_layout(&LevelLayout::default());
        set.put_entries(DISCOVERED_LEVEL, discovered).unwrap();
        set
    }

    fn values(entries: &[Entry]) -> Vec<(&str, Option<&str>)> {
        entries.iter().map(|e| (e.name(), e.value())).collect()
    }

    #[test]
    fn builtin_kept_unwanted_suppressed_new_placed() {
        let mut set = two_tier(vec![Entry::macro_def("X", "1"), Entry::macro_def("Y", "2")]);
        set.apply_entries(vec![Entry::macro_def("X", "1"), Entry::macro_def("Z", "3")]);

        let user: Vec<_> = set.level(USER_LEVEL).unwrap().entries().map(|e| e.entry().clone()).collect();
        assert_eq!(values(&user), vec![("Z", Some("3"))]);

        let discovered = set.level(DISCOVERED_LEVEL).unwrap();
        assert_eq!(discovered.len(), 2);
        assert!(discovered.override_names().unwrap().contains(&NameKey::new(EntryKind::Macro, "Y")));

        assert_eq!(values(&set.entries(false)), vec![("Z", Some("3")), ("X", Some("1"))]);
    }

    #[test]
    fn changed_value_shadows_builtin() {
        let mut set = two_tier(vec![Entry::macro_def("X", "1")]);
        set.apply_entries(vec![Entry::macro_def("X", "2")]);

        let resolved = set.resolved_entries();
        assert_eq!(resolved.len(), 2);
        assert_eq!(resolved[0].level, USER_LEVEL);
        assert!(!resolved[0].overridden);
        assert_eq!(resolved[1].level, DISCOVERED_LEVEL);
        assert!(resolved[1].overridden);
        assert!(set.override_names(DISCOVERED_LEVEL).unwrap().map_or(true, IndexSet::is_empty));
    }

    #[test]
    fn resupplied_name_is_unsuppressed() {
        let mut set = two_tier(vec![Entry::macro_def("X", "1")]);
        set.apply_entries(Vec::new());
        assert!(set.entries(false).is_empty());

        set.apply_entries(vec![Entry::macro_def("X", "1")]);
        assert_eq!(values(&set.entries(false)), vec![("X", Some("1"))]);
        assert!(set.level(USER_LEVEL).unwrap().is_empty());
    }

    #[test]
    fn merge_is_idempotent() {
        let mut set = two_tier(vec![
            Entry::macro_def("A", "1"),
            Entry::macro_def("B", "2"),
            Entry::include_path("/usr/include"),
        ]);
        set.apply_entries(vec![
            Entry::macro_def("B", "3"),
            Entry::include_path("/usr/include"),
            Entry::macro_def("C", "4"),
        ]);
        let before = set.resolved_entries();
        let visible = set.entries(false);

        set.apply_entries(visible.clone());
        assert_eq!(set.resolved_entries(), before);
        assert_eq!(set.entries(false), visible);
    }

    #[test]
    fn custom_info_survives_unchanged_entry() {
        let mut set = two_tier(Vec::new());
        set.apply_entries(vec![Entry::macro_def("A", "1"), Entry::macro_def("B", "1")]);
        set.set_custom_info(USER_LEVEL, &Entry::macro_def("A", "1"), Some(7)).unwrap();
        set.set_custom_info(USER_LEVEL, &Entry::macro_def("B", "1"), Some(8)).unwrap();

        set.apply_entries(vec![Entry::macro_def("A", "1"), Entry::macro_def("B", "2")]);
        assert_eq!(set.custom_info(USER_LEVEL, &Entry::macro_def("A", "1")).unwrap(), Some(&7));
        assert_eq!(set.custom_info(USER_LEVEL, &Entry::macro_def("B", "2")).unwrap(), None);
    }

    #[test]
    fn custom_info_on_missing_entry_fails() {
        let mut set: SettingsSet<u32> = SettingsSet::new(1);
        let err = set.set_custom_info(0, &Entry::macro_def("A", "1"), Some(1)).unwrap_err();
        assert!(matches!(err, LayerError::EntryNotFound { level: 0, .. }));
    }

    #[test]
    fn level_index_is_checked() {
        let mut set: SettingsSet = SettingsSet::new(2);
        assert_eq!(
            set.configure_level(2, LevelConfig::read_only()),
            Err(LayerError::LevelOutOfRange { index: 2, count: 2 })
        );
        assert!(set.put_entries(5, Vec::new()).is_err());
        assert_eq!(
            set.set_override_names(0, [NameKey::new(EntryKind::Macro, "X")]),
            Err(LayerError::OverrideNotSupported { index: 0 })
        );
    }

    #[test]
    fn explicit_override_names_mask_entries() {
        let mut set: SettingsSet = SettingsSet::from_layout(&LevelLayout::default());
        set.put_entries(DISCOVERED_LEVEL, vec![Entry::macro_def("X", "1"), Entry::macro_def("Y", "1")])
            .unwrap();
        set.set_override_names(DISCOVERED_LEVEL, [NameKey::new(EntryKind::Macro, "Y")])
            .unwrap();
        assert_eq!(values(&set.entries(false)), vec![("X", Some("1"))]);
        assert_eq!(set.entries(true).len(), 2);
    }

    #[test]
    fn no_writable_level_drops_new_entries() {
        let mut set: SettingsSet = SettingsSet::new(1);
        set.configure_level(0, LevelConfig::read_only()).unwrap();
        set.apply_entries(vec![Entry::macro_def("X", "1")]);
        assert!(set.entries(true).is_empty());
        assert_eq!(set.default_writable_level(), None);
    }

    #[test]
    fn non_builtin_read_only_entries_are_not_suppressed() {
        let mut set: SettingsSet = SettingsSet::new(2);
        set.configure_level(1, LevelConfig::read_only().with_override_support())
            .unwrap();
        set.put_entries(1, vec![Entry::macro_def("X", "1")]).unwrap();
        set.apply_entries(Vec::new());
        assert_eq!(set.entries(false).len(), 1);
        assert!(!set.entries(false)[0].flags().contains(EntryFlags::BUILTIN));
    }

    #[test]
    fn edited_exclusions_of_builtin_source_path_survive() {
        let mut set = two_tier(vec![Entry::source_path("src", Vec::<String>::new())]);
        let edited = Entry::source_path("src", ["gen"]);
        set.apply_entries(vec![edited.clone()]);

        assert_eq!(set.entries(false), vec![edited.clone()]);
        let resolved = set.resolved_entries();
        assert_eq!(resolved[0].level, USER_LEVEL);
        assert!(resolved[1].overridden);

        // round trip keeps the edit on the user level
        set.apply_entries(set.entries(false));
        assert_eq!(set.resolved_entries(), resolved);
    }

    #[test]
    fn unchanged_builtin_source_path_stays_discovered() {
        let mut set = two_tier(vec![Entry::source_path("src", ["gen"])]);
        set.apply_entries(vec![Entry::source_path("src", ["gen"])]);
        assert!(set.level(USER_LEVEL).unwrap().is_empty());
        assert!(set.entries(false)[0].is_builtin());
    }

    #[test]
    fn dropping_macro_keeps_include_path_of_same_name() {
        let mut set = two_tier(vec![Entry::macro_def("FOO", "1"), Entry::include_path("FOO")]);
        set.apply_entries(vec![Entry::include_path("FOO")]);

        let visible = set.entries(false);
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].kind(), EntryKind::IncludePath);

        let names = set.override_names(DISCOVERED_LEVEL).unwrap().unwrap();
        assert!(names.contains(&NameKey::new(EntryKind::Macro, "FOO")));
        assert!(!names.contains(&NameKey::new(EntryKind::IncludePath, "FOO")));
    }

    #[test]
    fn adjust_is_idempotent() {
        let mut set = two_tier(vec![Entry::macro_def("X", "1")]);
        set.apply_entries(vec![Entry::macro_def("X", "2")]);
        let before = set.resolved_entries();
        set.adjust_override_state();
        set.adjust_override_state();
        assert_eq!(set.resolved_entries(), before);
    }
}
