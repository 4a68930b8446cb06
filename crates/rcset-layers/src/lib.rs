//! Resource Settings Layers
//!
//! Override-aware stack of provenance levels.
//!
//! # Core Concepts
//!
//! - [`SettingsSet`]: Fixed stack of levels producing one effective entry list
//! - [`SettingLevel`]: Entries of one provenance tier, keyed by name identity
//! - [`LevelConfig`] / [`LevelLayout`]: Level attributes and named layouts
//!
//! Level 0 has the highest priority. Higher levels shadow same-named entries
//! of lower levels; built-ins of read-only levels are never edited, only
//! suppressed.

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod config;
mod error;
mod level;
mod set;

pub use config::{LevelConfig, LevelLayout, LevelSpec, DISCOVERED_LEVEL, USER_LEVEL};
pub use error::LayerError;
pub use level::{LevelEntry, SettingLevel};
pub use set::{ResolvedEntry, SettingsSet};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
