//! Entry flag bitset

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use std::ops::{BitAnd, BitOr, BitOrAssign, Not};

/// Attribute bits attached to a setting entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryFlags(u16);

impl EntryFlags {
    /// Contributed by the toolchain rather than authored by the user
    pub const BUILTIN: Self = Self(1);
    /// Cannot be edited in place
    pub const READONLY: Self = Self(1 << 1);
    /// Applies to the owning resource only, not its children
    pub const LOCAL: Self = Self(1 << 2);
    /// The value is a workspace-relative path
    pub const VALUE_WORKSPACE_PATH: Self = Self(1 << 3);
    /// Variables in name and value have been substituted
    pub const RESOLVED: Self = Self(1 << 4);
    /// The macro is explicitly undefined
    pub const UNDEFINED: Self = Self(1 << 5);

    const NAMES: [(Self, &'static str); 6] = [
        (Self::BUILTIN, "builtin"),
        (Self::READONLY, "readonly"),
        (Self::LOCAL, "local"),
        (Self::VALUE_WORKSPACE_PATH, "workspace"),
        (Self::RESOLVED, "resolved"),
        (Self::UNDEFINED, "undefined"),
    ];

    const MASK: u16 = (1 << 6) - 1;

    /// No flags set
    #[inline]
    #[must_use]
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Build from raw bits, discarding unknown ones
    #[inline]
    #[must_use]
    pub const fn from_bits_truncate(bits: u16) -> Self {
        Self(bits & Self::MASK)
    }

    /// Raw bits
    #[inline]
    #[must_use]
    pub const fn bits(self) -> u16 {
        self.0
    }

    /// Check whether no flag is set
    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Check whether every flag in `other` is set
    #[inline]
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Check whether any flag in `other` is set
    #[inline]
    #[must_use]
    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    /// Union of both sets
    #[inline]
    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Flags of `self` not in `other`
    #[inline]
    #[must_use]
    pub const fn difference(self, other: Self) -> Self {
        Self(self.0 & !other.0)
    }

    /// `(self | set) & !clear`
    #[inline]
    #[must_use]
    pub const fn apply(self, set: Self, clear: Self) -> Self {
        self.union(set).difference(clear)
    }

    /// Set the flags in `other`
    #[inline]
    pub fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }

    /// Clear the flags in `other`
    #[inline]
    pub fn remove(&mut self, other: Self) {
        self.0 &= !other.0;
    }
}

impl BitOr for EntryFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

impl BitOrAssign for EntryFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.insert(rhs);
    }
}

impl BitAnd for EntryFlags {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

impl Not for EntryFlags {
    type Output = Self;

    fn not(self) -> Self {
        Self(!self.0 & Self::MASK)
    }
}

impl Display for EntryFlags {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (flag, name) in Self::NAMES {
            if self.contains(flag) {
                if !first {
                    f.write_str("|")?;
                }
                f.write_str(name)?;
                first = false;
            }
        }
        Ok(())
    }
}
