//! Resource Settings Tree
//!
//! Attaches layered, per-kind settings to resources addressed by path.
//!
//! # Core Concepts
//!
//! - [`SettingsTree`]: Path trie of per-resource [`ResourceSettings`]
//! - [`EngineConfig`]: Level layout and kind support shared by all resources
//! - [`EntryDelta`] / [`KindDelta`]: What changed between two entry snapshots
//!
//! Lookups resolve to the most specific resource: an exact path first, then
//! glob and `**` resources, then the nearest enclosing resource.

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod config;
mod delta;
mod error;
mod tree;

pub use config::EngineConfig;
pub use delta::{EntryDelta, KindDelta};
pub use error::TreeError;
pub use tree::{ResourceSettings, SettingsTree};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
