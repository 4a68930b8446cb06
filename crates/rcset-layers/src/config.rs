//! Level configuration
//!
//! Provides [`LevelConfig`], the attributes of one provenance level, and
//! [`LevelLayout`], an ordered, named list of levels a
//! [`SettingsSet`](crate::SettingsSet) is built from.

use rcset_entry::EntryFlags;
use serde::{Deserialize, Serialize};

/// Index of the user level in the default layout
pub const USER_LEVEL: usize = 0;

/// Index of the discovered level in the default layout
pub const DISCOVERED_LEVEL: usize = 1;

/// Attributes of one level
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelConfig {
    /// Entries are never replaced by a merge
    pub read_only: bool,

    /// Builtin entries dropped by a merge are recorded as suppressed
    pub override_supported: bool,

    /// Flags set on every ingested entry
    pub flags_to_set: EntryFlags,

    /// Flags cleared on every ingested entry (wins over `flags_to_set`)
    pub flags_to_clear: EntryFlags,
}

impl LevelConfig {
    /// Writable level without flag adjustments
    #[inline]
    #[must_use]
    pub const fn writable() -> Self {
        Self {
            read_only: false,
            override_supported: false,
            flags_to_set: EntryFlags::empty(),
            flags_to_clear: EntryFlags::empty(),
        }
    }

    /// Read-only level without flag adjustments
    #[inline]
    #[must_use]
    pub const fn read_only() -> Self {
        Self {
            read_only: true,
            ..Self::writable()
        }
    }

    /// Enable override support
    #[inline]
    #[must_use]
    pub const fn with_override_support(mut self) -> Self {
        self.override_supported = true;
        self
    }

    /// Set flags applied on ingestion
    #[inline]
    #[must_use]
    pub const fn with_flags_to_set(mut self, flags: EntryFlags) -> Self {
        self.flags_to_set = flags;
        self
    }

    /// Set flags cleared on ingestion
    #[inline]
    #[must_use]
    pub const fn with_flags_to_clear(mut self, flags: EntryFlags) -> Self {
        self.flags_to_clear = flags;
        self
    }
}

/// Named level in a layout
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelSpec {
    /// Display name
    pub name: String,

    /// Level attributes
    #[serde(flatten)]
    pub config: LevelConfig,
}

/// Ordered list of levels, highest priority first
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LevelLayout {
    levels: Vec<LevelSpec>,
}

impl LevelLayout {
    /// Create empty layout
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self { levels: Vec::new() }
    }

    /// Append a level (lowest priority so far)
    #[must_use]
    pub fn with_level(mut self, name: impl Into<String>, config: LevelConfig) -> Self {
        self.levels.push(LevelSpec {
            name: name.into(),
            config,
        });
        self
    }

    /// Levels in priority order
    #[inline]
    #[must_use]
    pub fn levels(&self) -> &[LevelSpec] {
        &self.levels
    }

    /// Number of levels
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    /// Check if layout has no levels
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Index of the level called `name`
    #[must_use]
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.levels.iter().position(|level| level.name == name)
    }
}

impl Default for LevelLayout {
    /// User-authored entries over tool-discovered built-ins
    fn default() -> Self {
        Self::new().with_level("user", LevelConfig::writable()).with_level(
            "discovered",
            LevelConfig::read_only()
                .with_override_support()
                .with_flags_to_set(EntryFlags::BUILTIN | EntryFlags::READONLY),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn default_layout_is_two_tier() {
        let layout = LevelLayout::default();
        assert_eq!(layout.len(), 2);
        assert_eq!(layout.index_of("user"), Some(USER_LEVEL));
        assert_eq!(layout.index_of("discovered"), Some(DISCOVERED_LEVEL));

        let discovered = layout.levels()[DISCOVERED_LEVEL].config;
        assert!(discovered.read_only);
        assert!(discovered.override_supported);
        assert!(discovered.flags_to_set.contains(EntryFlags::BUILTIN));
        assert!(!layout.levels()[USER_LEVEL].config.read_only);
    }

    #[test]
    fn layout_deserializes_with_defaults() {
        let json = r#"[
            {"name": "project"},
            {"name": "toolchain", "read_only": true, "override_supported": true, "flags_to_set": 3}
        ]"#;
        let layout: LevelLayout = serde_json::from_str(json).unwrap();
        assert_eq!(layout.len(), 2);
        assert_eq!(layout.levels()[0].config, LevelConfig::writable());
        assert_eq!(
            layout.levels()[1].config,
            LevelConfig::read_only()
                .with_override_support()
                .with_flags_to_set(EntryFlags::BUILTIN | EntryFlags::READONLY)
        );
    }
}
