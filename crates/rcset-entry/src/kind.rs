//! Setting entry kinds
//!
//! Provides [`EntryKind`], the closed set of setting categories, and
//! [`KindSupport`], which selects how many of them a store recognises.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// Category of a setting entry
///
/// The declaration order is the dense index order used by
/// [`KindStore`](crate::KindStore): the six language kinds come first,
/// followed by the two project-layout kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    /// Directory searched for `#include` directives
    IncludePath,

    /// Header force-included into every translation unit
    IncludeFile,

    /// Preprocessor macro definition (`NAME=value`)
    Macro,

    /// File whose macro definitions are imported
    MacroFile,

    /// Directory searched by the linker
    LibraryPath,

    /// Library linked into the output
    LibraryFile,

    /// Source root, with exclusion patterns
    SourcePath,

    /// Output root, with exclusion patterns
    OutputPath,
}

impl EntryKind {
    /// Every kind in dense index order
    pub const ALL: [EntryKind; 8] = [
        EntryKind::IncludePath,
        EntryKind::IncludeFile,
        EntryKind::Macro,
        EntryKind::MacroFile,
        EntryKind::LibraryPath,
        EntryKind::LibraryFile,
        EntryKind::SourcePath,
        EntryKind::OutputPath,
    ];

    /// Language setting kinds in dense index order
    pub const LANGUAGE: [EntryKind; 6] = [
        EntryKind::IncludePath,
        EntryKind::IncludeFile,
        EntryKind::Macro,
        EntryKind::MacroFile,
        EntryKind::LibraryPath,
        EntryKind::LibraryFile,
    ];

    /// Dense index of this kind within [`EntryKind::ALL`]
    #[inline]
    #[must_use]
    pub const fn ordinal(self) -> usize {
        self as usize
    }

    /// Whether this is one of the language setting kinds
    #[inline]
    #[must_use]
    pub const fn is_language_kind(self) -> bool {
        !matches!(self, EntryKind::SourcePath | EntryKind::OutputPath)
    }

    /// Whether entries of this kind carry a value besides their name
    #[inline]
    #[must_use]
    pub const fn has_value(self) -> bool {
        matches!(self, EntryKind::Macro)
    }

    /// Whether entries of this kind carry exclusion patterns
    #[inline]
    #[must_use]
    pub const fn supports_exclusions(self) -> bool {
        matches!(self, EntryKind::SourcePath | EntryKind::OutputPath)
    }

    /// Whether the entry name is a filesystem path
    #[inline]
    #[must_use]
    pub const fn name_is_path(self) -> bool {
        !matches!(self, EntryKind::Macro)
    }

    /// Stable lowercase identifier
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            EntryKind::IncludePath => "include_path",
            EntryKind::IncludeFile => "include_file",
            EntryKind::Macro => "macro",
            EntryKind::MacroFile => "macro_file",
            EntryKind::LibraryPath => "library_path",
            EntryKind::LibraryFile => "library_file",
            EntryKind::SourcePath => "source_path",
            EntryKind::OutputPath => "output_path",
        }
    }
}

impl Display for EntryKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which kinds a [`KindStore`](crate::KindStore) recognises
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KindSupport {
    /// Language setting kinds only
    #[default]
    Language,

    /// Language kinds plus source and output paths
    All,
}

impl KindSupport {
    /// Supported kinds in dense index order
    #[inline]
    #[must_use]
    pub fn kinds(self) -> &'static [EntryKind] {
        match self {
            KindSupport::Language => &EntryKind::LANGUAGE,
            KindSupport::All => &EntryKind::ALL,
        }
    }

    /// Number of supported kinds
    #[inline]
    #[must_use]
    pub fn len(self) -> usize {
        self.kinds().len()
    }

    /// Check whether `kind` is recognised
    #[inline]
    #[must_use]
    pub fn supports(self, kind: EntryKind) -> bool {
        kind.ordinal() < self.len()
    }
}

impl Display for KindSupport {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            KindSupport::Language => f.write_str("language kinds"),
            KindSupport::All => f.write_str("all kinds"),
        }
    }
}
