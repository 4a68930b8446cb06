//! Setting entries
//!
//! Provides [`Entry`], a single build setting contributed at some provenance
//! level, and [`EntryData`], the kind-specific payload it carries.

use crate::error::EntryError;
use crate::exclusion::ExclusionSet;
use crate::flags::EntryFlags;
use crate::kind::EntryKind;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// Source attachment of a library file
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LibraryAttachment {
    /// Path of the attached sources
    pub source_path: Option<String>,
    /// Root of the attached sources
    pub root_path: Option<String>,
    /// Prefix mapping applied when resolving attached sources
    pub prefix_mapping: Option<String>,
}

/// Kind-specific payload of an [`Entry`]
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EntryData {
    /// Include search directory
    IncludePath,
    /// Force-included header
    IncludeFile,
    /// Macro definition
    Macro {
        /// Macro value (may be empty)
        value: String,
    },
    /// Macro definitions file
    MacroFile,
    /// Library search directory
    LibraryPath,
    /// Linked library
    LibraryFile {
        /// Optional source attachment
        #[serde(default, skip_serializing_if = "Option::is_none")]
        attachment: Option<LibraryAttachment>,
    },
    /// Source root
    SourcePath {
        /// Patterns excluded below the root
        #[serde(default)]
        exclusions: ExclusionSet,
    },
    /// Output root
    OutputPath {
        /// Patterns excluded below the root
        #[serde(default)]
        exclusions: ExclusionSet,
    },
}

impl EntryData {
    /// Kind of this payload
    #[must_use]
    pub const fn kind(&self) -> EntryKind {
        match self {
            EntryData::IncludePath => EntryKind::IncludePath,
            EntryData::IncludeFile => EntryKind::IncludeFile,
            EntryData::Macro { .. } => EntryKind::Macro,
            EntryData::MacroFile => EntryKind::MacroFile,
            EntryData::LibraryPath => EntryKind::LibraryPath,
            EntryData::LibraryFile { .. } => EntryKind::LibraryFile,
            EntryData::SourcePath { .. } => EntryKind::SourcePath,
            EntryData::OutputPath { .. } => EntryKind::OutputPath,
        }
    }
}

/// A single setting entry
///
/// Entries are immutable values; the `with_*` builders return modified
/// copies.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Entry {
    name: String,
    #[serde(default)]
    flags: EntryFlags,
    #[serde(flatten)]
    data: EntryData,
}

impl Entry {
    /// Create entry from name, flags and payload
    #[inline]
    #[must_use]
    pub fn from_parts(name: impl Into<String>, flags: EntryFlags, data: EntryData) -> Self {
        Self {
            name: name.into(),
            flags,
            data,
        }
    }

    /// Create entry of any kind
    ///
    /// `value` is only used by macros; `exclusions` only by source/output
    /// paths.
    ///
    /// # Errors
    /// Returns [`EntryError::MissingValue`] for a macro without value.
    pub fn new<I, S>(
        kind: EntryKind,
        name: impl Into<String>,
        value: Option<&str>,
        exclusions: I,
        flags: EntryFlags,
    ) -> Result<Self, EntryError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let name = name.into();
        let data = match kind {
            EntryKind::IncludePath => EntryData::IncludePath,
            EntryKind::IncludeFile => EntryData::IncludeFile,
            EntryKind::Macro => EntryData::Macro {
                value: value
                    .ok_or_else(|| EntryError::MissingValue {
                        kind,
                        name: name.clone(),
                    })?
                    .to_string(),
            },
            EntryKind::MacroFile => EntryData::MacroFile,
            EntryKind::LibraryPath => EntryData::LibraryPath,
            EntryKind::LibraryFile => EntryData::LibraryFile { attachment: None },
            EntryKind::SourcePath => EntryData::SourcePath {
                exclusions: exclusions.into_iter().collect(),
            },
            EntryKind::OutputPath => EntryData::OutputPath {
                exclusions: exclusions.into_iter().collect(),
            },
        };
        Ok(Self { name, flags, data })
    }

    /// Include search directory
    #[must_use]
    pub fn include_path(name: impl Into<String>) -> Self {
        Self::from_parts(name, EntryFlags::empty(), EntryData::IncludePath)
    }

    /// Force-included header
    #[must_use]
    pub fn include_file(name: impl Into<String>) -> Self {
        Self::from_parts(name, EntryFlags::empty(), EntryData::IncludeFile)
    }

    /// Macro definition
    #[must_use]
    pub fn macro_def(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::from_parts(
            name,
            EntryFlags::empty(),
            EntryData::Macro {
                value: value.into(),
            },
        )
    }

    /// Macro definitions file
    #[must_use]
    pub fn macro_file(name: impl Into<String>) -> Self {
        Self::from_parts(name, EntryFlags::empty(), EntryData::MacroFile)
    }

    /// Library search directory
    #[must_use]
    pub fn library_path(name: impl Into<String>) -> Self {
        Self::from_parts(name, EntryFlags::empty(), EntryData::LibraryPath)
    }

    /// Linked library
    #[must_use]
    pub fn library_file(name: impl Into<String>) -> Self {
        Self::from_parts(
            name,
            EntryFlags::empty(),
            EntryData::LibraryFile { attachment: None },
        )
    }

    /// Source root with exclusion patterns
    #[must_use]
    pub fn source_path<I, S>(name: impl Into<String>, exclusions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::from_parts(
            name,
            EntryFlags::empty(),
            EntryData::SourcePath {
                exclusions: exclusions.into_iter().collect(),
            },
        )
    }

    /// Output root with exclusion patterns
    #[must_use]
    pub fn output_path<I, S>(name: impl Into<String>, exclusions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::from_parts(
            name,
            EntryFlags::empty(),
            EntryData::OutputPath {
                exclusions: exclusions.into_iter().collect(),
            },
        )
    }

    /// Entry name (path for path kinds, macro name for macros)
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Entry kind
    #[inline]
    #[must_use]
    pub fn kind(&self) -> EntryKind {
        self.data.kind()
    }

    /// Entry value, present for value-bearing kinds only
    #[inline]
    #[must_use]
    pub fn value(&self) -> Option<&str> {
        match &self.data {
            EntryData::Macro { value } => Some(value),
            _ => None,
        }
    }

    /// Entry flags
    #[inline]
    #[must_use]
    pub fn flags(&self) -> EntryFlags {
        self.flags
    }

    /// Kind-specific payload
    #[inline]
    #[must_use]
    pub fn data(&self) -> &EntryData {
        &self.data
    }

    /// Exclusion patterns of source/output entries
    #[inline]
    #[must_use]
    pub fn exclusions(&self) -> Option<&ExclusionSet> {
        match &self.data {
            EntryData::SourcePath { exclusions } | EntryData::OutputPath { exclusions } => {
                Some(exclusions)
            }
            _ => None,
        }
    }

    /// Source attachment of library files
    #[inline]
    #[must_use]
    pub fn attachment(&self) -> Option<&LibraryAttachment> {
        match &self.data {
            EntryData::LibraryFile { attachment } => attachment.as_ref(),
            _ => None,
        }
    }

    /// Check the builtin flag
    #[inline]
    #[must_use]
    pub fn is_builtin(&self) -> bool {
        self.flags.contains(EntryFlags::BUILTIN)
    }

    /// Check the readonly flag
    #[inline]
    #[must_use]
    pub fn is_read_only(&self) -> bool {
        self.flags.contains(EntryFlags::READONLY)
    }

    /// Check the resolved flag
    #[inline]
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.flags.contains(EntryFlags::RESOLVED)
    }

    /// Copy with flags replaced
    #[inline]
    #[must_use]
    pub fn with_flags(&self, flags: EntryFlags) -> Self {
        Self {
            flags,
            ..self.clone()
        }
    }

    /// Copy with `(flags | set) & !clear`
    #[inline]
    #[must_use]
    pub fn with_flags_changed(&self, set: EntryFlags, clear: EntryFlags) -> Self {
        self.with_flags(self.flags.apply(set, clear))
    }

    /// Copy with a library source attachment
    ///
    /// Entries of other kinds are returned unchanged.
    #[must_use]
    pub fn with_attachment(&self, attachment: LibraryAttachment) -> Self {
        match self.data {
            EntryData::LibraryFile { .. } => Self {
                data: EntryData::LibraryFile {
                    attachment: Some(attachment),
                },
                ..self.clone()
            },
            _ => self.clone(),
        }
    }

    /// Copy with exclusion patterns replaced
    ///
    /// # Errors
    /// Returns [`EntryError::ExclusionsUnsupported`] for kinds without
    /// exclusions.
    pub fn with_exclusions(&self, exclusions: ExclusionSet) -> Result<Self, EntryError> {
        let data = match self.data {
            EntryData::SourcePath { .. } => EntryData::SourcePath { exclusions },
            EntryData::OutputPath { .. } => EntryData::OutputPath { exclusions },
            _ => return Err(EntryError::ExclusionsUnsupported(self.kind())),
        };
        Ok(Self {
            data,
            ..self.clone()
        })
    }
}

impl Display for Entry {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind(), self.name)?;
        if let Some(value) = self.value() {
            write!(f, "={value}")?;
        }
        if !self.flags.is_empty() {
            write!(f, " [{}]", self.flags)?;
        }
        Ok(())
    }
}
