//! Entry deltas
//!
//! Computes which entries appeared or disappeared between two snapshots of
//! per-kind effective entries. Entries are compared by contents, so a
//! changed value or flag shows up as one removal plus one addition.

use indexmap::IndexSet;
use rcset_entry::{ContentsKey, Entry, EntryKind, KindStore};

/// Change of one kind's entry list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KindDelta {
    /// Entries present only in the new list, in new-list order
    pub added: Vec<Entry>,
    /// Entries present only in the old list, in old-list order
    pub removed: Vec<Entry>,
}

impl KindDelta {
    /// Compare two entry lists by contents
    #[must_use]
    pub fn between(old: &[Entry], new: &[Entry]) -> Self {
        let old_keys: IndexSet<ContentsKey> = old.iter().map(ContentsKey::from).collect();
        let new_keys: IndexSet<ContentsKey> = new.iter().map(ContentsKey::from).collect();

        let added = new_keys
            .iter()
            .filter(|key| !old_keys.contains(*key))
            .map(|key| key.entry().clone())
            .collect();
        let removed = old_keys
            .iter()
            .filter(|key| !new_keys.contains(*key))
            .map(|key| key.entry().clone())
            .collect();
        Self { added, removed }
    }

    /// Check if nothing changed
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// Per-kind changes between two snapshots
///
/// Only kinds that actually changed hold a [`KindDelta`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryDelta {
    kinds: KindStore<KindDelta>,
}

impl EntryDelta {
    /// Compare two snapshots
    ///
    /// The result covers the kinds of `new`; kinds missing from `old`
    /// compare against an empty list.
    #[must_use]
    pub fn between(old: &KindStore<Vec<Entry>>, new: &KindStore<Vec<Entry>>) -> Self {
        let mut kinds = KindStore::new(new.support());
        for mut slot in kinds.contents_mut() {
            let kind = slot.kind();
            let before = old.get(kind).ok().flatten().map_or(&[][..], Vec::as_slice);
            let after = new.get(kind).ok().flatten().map_or(&[][..], Vec::as_slice);
            let delta = KindDelta::between(before, after);
            if !delta.is_empty() {
                slot.set(delta);
            }
        }
        Self { kinds }
    }

    /// Check if no kind changed
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    /// Kinds that changed
    pub fn kinds(&self) -> impl Iterator<Item = EntryKind> + '_ {
        self.kinds.iter().map(|(kind, _)| kind)
    }

    /// Change of one kind, if any
    #[must_use]
    pub fn get(&self, kind: EntryKind) -> Option<&KindDelta> {
        self.kinds.get(kind).ok().flatten()
    }

    /// Iterate changed kinds with their deltas
    pub fn iter(&self) -> impl Iterator<Item = (EntryKind, &KindDelta)> {
        self.kinds.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rcset_entry::KindSupport;

    fn snapshot(pairs: &[(EntryKind, Vec<Entry>)]) -> KindStore<Vec<Entry>> {
        let mut store = KindStore::new(KindSupport::Language);
        for (kind, entries) in pairs {
            store.put(*kind, entries.clone()).unwrap();
        }
        store
    }

    #[test]
    fn test_kind_delta_value_change() {
        let old = vec![Entry::macro_def("A", "1"), Entry::macro_def("B", "2")];
        let new = vec![Entry::macro_def("A", "1"), Entry::macro_def("B", "3")];
        let delta = KindDelta::between(&old, &new);
        assert_eq!(delta.added, vec![Entry::macro_def("B", "3")]);
        assert_eq!(delta.removed, vec![Entry::macro_def("B", "2")]);
    }

    #[test]
    fn test_kind_delta_ignores_order() {
        let old = vec![Entry::include_path("/a"), Entry::include_path("/b")];
        let new = vec![Entry::include_path("/b"), Entry::include_path("/a")];
        assert!(KindDelta::between(&old, &new).is_empty());
    }

    #[test]
    fn test_entry_delta_reports_changed_kinds_only() {
        let old = snapshot(&[
            (EntryKind::Macro, vec![Entry::macro_def("A", "1")]),
            (EntryKind::IncludePath, vec![Entry::include_path("/inc")]),
        ]);
        let new = snapshot(&[
            (EntryKind::Macro, vec![Entry::macro_def("A", "1")]),
            (EntryKind::IncludePath, vec![]),
        ]);

        let delta = EntryDelta::between(&old, &new);
        assert!(!delta.is_empty());
        assert_eq!(delta.kinds().collect::<Vec<_>>(), vec![EntryKind::IncludePath]);
        assert!(delta.get(EntryKind::Macro).is_none());

        let includes = delta.get(EntryKind::IncludePath).unwrap();
        assert!(includes.added.is_empty());
        assert_eq!(includes.removed, vec![Entry::include_path("/inc")]);
    }

    #[test]
    fn test_identical_snapshots() {
        let store = snapshot(&[(EntryKind::Macro, vec![Entry::macro_def("A", "1")])]);
        assert!(EntryDelta::between(&store, &store).is_empty());
    }
}
