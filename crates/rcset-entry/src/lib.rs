//! Resource Settings Entries
//!
//! Value types shared by every layer of the settings engine.
//!
//! # Core Concepts
//!
//! - [`Entry`]: A single setting (include path, macro, library, source root...)
//! - [`EntryKind`]: Closed set of setting categories with dense ordinals
//! - [`EntryFlags`]: Attribute bits (builtin, readonly, resolved...)
//! - [`NameKey`] / [`ContentsKey`]: The two identities of an entry
//! - [`KindStore<T>`]: One slot per supported kind
//! - [`PathKey`]: Segment path addressing a resource
//!
//! # Example
//!
//! ```rust
//! use rcset_entry::{Entry, EntryFlags, EntryKind, KindStore, NameKey};
//!
//! let a = Entry::macro_def("DEBUG", "1");
//! let b = Entry::macro_def("DEBUG", "0").with_flags(EntryFlags::BUILTIN);
//! assert_eq!(NameKey::of(&a), NameKey::of(&b));
//!
//! let mut store: KindStore<Vec<Entry>> = KindStore::language();
//! store.put(EntryKind::Macro, vec![a, b]).unwrap();
//! assert_eq!(store.get(EntryKind::Macro).unwrap().map(Vec::len), Some(2));
//! ```

#![warn(unreachable_pub)]

mod entry;
mod error;
mod exclusion;
mod flags;
mod keys;
mod kind;
mod path;
mod pattern;
mod store;

pub use entry::{Entry, EntryData, LibraryAttachment};
pub use error::EntryError;
pub use exclusion::{add_remove_exclusions, is_excluded, is_on_source_entry, ExclusionSet};
pub use flags::EntryFlags;
pub use keys::{
    index_by_contents, index_by_name, ContentsKey, DefaultNameIdentity, NameIdentity, NameKey,
};
pub use kind::{EntryKind, KindSupport};
pub use path::{normalize_path_name, PathKey, SEPARATOR};
pub use pattern::{is_double_star, is_pattern, PathPattern, SegmentPattern, DOUBLE_STAR};
pub use store::{KindSlot, KindStore};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
