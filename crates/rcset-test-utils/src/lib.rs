//! Testing utilities for the rcset workspace
//!
//! Shared fixtures, proptest strategies and tracing setup.

#![allow(missing_docs)]

use proptest::prelude::*;
use rcset_entry::{Entry, EntryFlags, PathKey};
use rcset_layers::{LevelLayout, SettingsSet, DISCOVERED_LEVEL};
use std::sync::Once;
use tracing_subscriber::EnvFilter;

static TRACING: Once = Once::new();

/// Install a test-writer subscriber honouring `RUST_LOG`
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

pub fn path(s: &str) -> PathKey {
    PathKey::parse(s)
}

pub fn builtin(entry: Entry) -> Entry {
    entry.with_flags(EntryFlags::BUILTIN | EntryFlags::READONLY)
}

/// Default two-tier set with `discovered` stored on the discovered level
pub fn two_tier_set<C>(discovered: Vec<Entry>) -> SettingsSet<C> {
    let mut set = SettingsSet::from_layout(&LevelLayout::default());
    set.put_entries(DISCOVERED_LEVEL, discovered)
        .expect("default layout has a discovered level");
    set
}

pub fn macros(pairs: &[(&str, &str)]) -> Vec<Entry> {
    pairs
        .iter()
        .map(|(name, value)| Entry::macro_def(*name, *value))
        .collect()
}

/// Name and value of each entry, for compact assertions
pub fn name_values(entries: &[Entry]) -> Vec<(String, Option<String>)> {
    entries
        .iter()
        .map(|e| (e.name().to_string(), e.value().map(str::to_string)))
        .collect()
}

pub fn segment_strategy() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9]{0,3}"
}

/// Non-root literal paths of 1..=`max_depth` segments
pub fn path_strategy(max_depth: usize) -> impl Strategy<Value = PathKey> {
    proptest::collection::vec(segment_strategy(), 1..=max_depth.max(1)).prop_map(PathKey::new)
}

pub fn macro_strategy() -> impl Strategy<Value = Entry> {
    ("[A-E]", "[0-3]").prop_map(|(name, value)| Entry::macro_def(name, value))
}

pub fn include_strategy() -> impl Strategy<Value = Entry> {
    "/inc/[a-d]".prop_map(Entry::include_path)
}

pub fn entry_list_strategy(max: usize) -> impl Strategy<Value = Vec<Entry>> {
    proptest::collection::vec(prop_oneof![macro_strategy(), include_strategy()], 0..=max)
}
