use proptest::prelude::*;
use rcset_entry::{
    index_by_name, ContentsKey, DefaultNameIdentity, Entry, EntryFlags, EntryKind, KindStore,
    KindSupport, NameKey, PathKey,
};

fn segment() -> impl Strategy<Value = String> {
    "[a-z0-9_]{1,6}"
}

fn any_kind() -> impl Strategy<Value = EntryKind> {
    proptest::sample::select(EntryKind::ALL.to_vec())
}

proptest! {
    #[test]
    fn prop_path_display_parse_roundtrip(segs in proptest::collection::vec(segment(), 0..6)) {
        let path = PathKey::new(segs);
        prop_assert_eq!(PathKey::parse(&path.to_string()), path);
    }

    #[test]
    fn prop_kind_index_bijection(kind in any_kind()) {
        let store: KindStore<()> = KindStore::new(KindSupport::All);
        let index = store.kind_to_index(kind).unwrap();
        prop_assert_eq!(store.index_to_kind(index).unwrap(), kind);
    }

    #[test]
    fn prop_flags_apply_clear_wins(flags in 0u16..64, set in 0u16..64, clear in 0u16..64) {
        let flags = EntryFlags::from_bits_truncate(flags);
        let set = EntryFlags::from_bits_truncate(set);
        let clear = EntryFlags::from_bits_truncate(clear);
        let out = flags.apply(set, clear);
        prop_assert!(!out.intersects(clear));
        prop_assert!(out.contains(set.difference(clear)));
    }

    #[test]
    fn prop_name_key_ignores_flags_and_value(
        name in segment(),
        v1 in "[0-9]{0,3}",
        v2 in "[0-9]{0,3}",
        bits in 0u16..64,
    ) {
        let a = Entry::macro_def(name.clone(), v1.clone());
        let b = Entry::macro_def(name, v2.clone()).with_flags(EntryFlags::from_bits_truncate(bits));
        prop_assert_eq!(NameKey::of(&a), NameKey::of(&b));
        if v1 != v2 {
            prop_assert_ne!(ContentsKey::from(&a), ContentsKey::from(&b));
        }
    }

    #[test]
    fn prop_index_by_name_is_unique(names in proptest::collection::vec(segment(), 0..12)) {
        let entries: Vec<Entry> = names.iter().map(Entry::include_path).collect();
        let index = index_by_name(&DefaultNameIdentity::new(), &entries);
        let mut distinct = names.clone();
        distinct.sort();
        distinct.dedup();
        prop_assert_eq!(index.len(), distinct.len());
    }
}

#[test]
fn test_language_store_has_six_slots() {
    let store: KindStore<u8> = KindStore::language();
    assert_eq!(store.capacity(), 6);
    assert!(store.kind_to_index(EntryKind::SourcePath).unwrap_err().is_unsupported_kind());
}
