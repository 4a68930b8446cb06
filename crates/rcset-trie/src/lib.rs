//! Resource Settings Trie
//!
//! Path-indexed container with glob lookup.
//!
//! # Overview
//!
//! - **PathTrie**: Arena of nodes keyed by path segments, addressed by
//!   generational [`NodeId`] handles
//! - **NameMap**: Per-node child index with a compiled glob subset
//! - **TrieListener**: Synchronous change notification bubbling to ancestors
//! - **TrieVisitor**: Pre-order traversal with early exit
//!
//! # Example
//!
//! ```rust
//! use rcset_entry::PathKey;
//! use rcset_trie::PathTrie;
//!
//! let mut trie: PathTrie<&str> = PathTrie::new(Some("project"));
//! let src = trie.get_or_create_with(&PathKey::parse("src"), || "sources");
//!
//! // Exact lookup misses, nearest lookup falls back to the closest ancestor
//! let file = PathKey::parse("src/main.c");
//! assert_eq!(trie.find(&file, true, false), None);
//! assert_eq!(trie.find(&file, false, false), Some(src));
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod error;
mod listener;
mod name_map;
mod node;
mod trie;

pub use error::TrieError;
pub use listener::{TrieListener, TrieVisitor};
pub use name_map::NameMap;
pub use node::{NodeId, NodeState};
pub use trie::PathTrie;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
