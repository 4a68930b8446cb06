//! Error types for layered settings

/// Errors raised when addressing levels of a settings set
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LayerError {
    /// Level index past the last level
    #[error("level {index} out of range ({count} levels)")]
    LevelOutOfRange {
        /// Requested index
        index: usize,
        /// Number of levels
        count: usize,
    },

    /// Override names on a level without override support
    #[error("level {index} does not support overrides")]
    OverrideNotSupported {
        /// Level index
        index: usize,
    },

    /// Entry not stored on the level
    #[error("no entry '{name}' on level {level}")]
    EntryNotFound {
        /// Level index
        level: usize,
        /// Entry name key
        name: String,
    },
}

impl LayerError {
    /// Create out-of-range error
    #[inline]
    #[must_use]
    pub fn out_of_range(index: usize, count: usize) -> Self {
        Self::LevelOutOfRange { index, count }
    }
}
