//! Engine configuration

use rcset_entry::KindSupport;
use rcset_layers::{LevelConfig, LevelLayout};
use serde::{Deserialize, Serialize};

/// Shape of every resource's settings
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Levels of each per-kind settings set
    pub layout: LevelLayout,

    /// Kinds each resource tracks
    pub kind_support: KindSupport,
}

impl EngineConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With a replacement level layout
    #[inline]
    #[must_use]
    pub fn with_layout(mut self, layout: LevelLayout) -> Self {
        self.layout = layout;
        self
    }

    /// With one more level appended to the layout
    #[must_use]
    pub fn with_level(mut self, name: impl Into<String>, config: LevelConfig) -> Self {
        self.layout = self.layout.with_level(name, config);
        self
    }

    /// With kind support
    #[inline]
    #[must_use]
    pub fn with_kind_support(mut self, support: KindSupport) -> Self {
        self.kind_support = support;
        self
    }
}
