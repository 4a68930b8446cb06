//! Kind-indexed slot storage
//!
//! Provides [`KindStore<T>`], a fixed array with one slot per supported
//! [`EntryKind`]. Lookups go through the kind's dense ordinal, so there is
//! no hashing.

use crate::error::EntryError;
use crate::kind::{EntryKind, KindSupport};

/// One slot per supported entry kind
///
/// `Clone` copies every slot. When the slot contents are containers that
/// must be copied differently (for example trimmed or re-flagged), use
/// [`KindStore::clone_with`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KindStore<T> {
    support: KindSupport,
    slots: Vec<Option<T>>,
}

impl<T> KindStore<T> {
    /// Create empty store for the given kind support
    #[must_use]
    pub fn new(support: KindSupport) -> Self {
        let mut slots = Vec::with_capacity(support.len());
        slots.resize_with(support.len(), || None);
        Self { support, slots }
    }

    /// Store over the language kinds
    #[inline]
    #[must_use]
    pub fn language() -> Self {
        Self::new(KindSupport::Language)
    }

    /// Store over all kinds
    #[inline]
    #[must_use]
    pub fn all() -> Self {
        Self::new(KindSupport::All)
    }

    /// Kind support of this store
    #[inline]
    #[must_use]
    pub fn support(&self) -> KindSupport {
        self.support
    }

    /// Supported kinds in slot order
    #[inline]
    #[must_use]
    pub fn kinds(&self) -> &'static [EntryKind] {
        self.support.kinds()
    }

    /// Number of slots
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Slot index of a kind
    ///
    /// # Errors
    /// Returns [`EntryError::UnsupportedKind`] if the store has no slot for
    /// `kind`.
    #[inline]
    pub fn kind_to_index(&self, kind: EntryKind) -> Result<usize, EntryError> {
        if self.support.supports(kind) {
            Ok(kind.ordinal())
        } else {
            Err(EntryError::UnsupportedKind {
                kind,
                support: self.support,
            })
        }
    }

    /// Kind stored at a slot index
    ///
    /// # Errors
    /// Returns [`EntryError::IndexOutOfRange`] past the last slot.
    #[inline]
    pub fn index_to_kind(&self, index: usize) -> Result<EntryKind, EntryError> {
        self.kinds()
            .get(index)
            .copied()
            .ok_or(EntryError::IndexOutOfRange {
                index,
                len: self.slots.len(),
            })
    }

    /// Get the value for a kind
    ///
    /// # Errors
    /// Returns [`EntryError::UnsupportedKind`] for kinds without a slot.
    #[inline]
    pub fn get(&self, kind: EntryKind) -> Result<Option<&T>, EntryError> {
        let index = self.kind_to_index(kind)?;
        Ok(self.slots[index].as_ref())
    }

    /// Get the value for a kind mutably
    ///
    /// # Errors
    /// Returns [`EntryError::UnsupportedKind`] for kinds without a slot.
    #[inline]
    pub fn get_mut(&mut self, kind: EntryKind) -> Result<Option<&mut T>, EntryError> {
        let index = self.kind_to_index(kind)?;
        Ok(self.slots[index].as_mut())
    }

    /// Store a value, returning the previous one
    ///
    /// # Errors
    /// Returns [`EntryError::UnsupportedKind`] for kinds without a slot.
    #[inline]
    pub fn put(&mut self, kind: EntryKind, value: T) -> Result<Option<T>, EntryError> {
        let index = self.kind_to_index(kind)?;
        Ok(self.slots[index].replace(value))
    }

    /// Remove and return the value for a kind
    ///
    /// # Errors
    /// Returns [`EntryError::UnsupportedKind`] for kinds without a slot.
    #[inline]
    pub fn take(&mut self, kind: EntryKind) -> Result<Option<T>, EntryError> {
        let index = self.kind_to_index(kind)?;
        Ok(self.slots[index].take())
    }

    /// Get the value for a kind, inserting one if the slot is empty
    ///
    /// # Errors
    /// Returns [`EntryError::UnsupportedKind`] for kinds without a slot.
    pub fn get_or_insert_with<F>(&mut self, kind: EntryKind, f: F) -> Result<&mut T, EntryError>
    where
        F: FnOnce() -> T,
    {
        let index = self.kind_to_index(kind)?;
        Ok(self.slots[index].get_or_insert_with(f))
    }

    /// Iterate occupied slots
    pub fn iter(&self) -> impl Iterator<Item = (EntryKind, &T)> {
        self.kinds()
            .iter()
            .zip(&self.slots)
            .filter_map(|(kind, slot)| slot.as_ref().map(|v| (*kind, v)))
    }

    /// Every slot, occupied or not, in kind order
    pub fn contents(&self) -> impl Iterator<Item = (EntryKind, Option<&T>)> {
        self.kinds()
            .iter()
            .zip(&self.slots)
            .map(|(kind, slot)| (*kind, slot.as_ref()))
    }

    /// Every slot as a mutable handle, in kind order
    pub fn contents_mut(&mut self) -> impl Iterator<Item = KindSlot<'_, T>> {
        self.support
            .kinds()
            .iter()
            .zip(self.slots.iter_mut())
            .map(|(kind, slot)| KindSlot { kind: *kind, slot })
    }

    /// Copy the store, delegating per-slot copying to `f`
    #[must_use]
    pub fn clone_with<F>(&self, mut f: F) -> Self
    where
        F: FnMut(EntryKind, &T) -> T,
    {
        let slots = self
            .kinds()
            .iter()
            .zip(&self.slots)
            .map(|(kind, slot)| slot.as_ref().map(|v| f(*kind, v)))
            .collect();
        Self {
            support: self.support,
            slots,
        }
    }

    /// Empty every slot
    pub fn clear(&mut self) {
        self.slots.iter_mut().for_each(|slot| *slot = None);
    }

    /// Check whether every slot is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }
}

impl<T> Default for KindStore<T> {
    fn default() -> Self {
        Self::language()
    }
}

/// Mutable handle on one [`KindStore`] slot
#[derive(Debug)]
pub struct KindSlot<'a, T> {
    kind: EntryKind,
    slot: &'a mut Option<T>,
}

impl<T> KindSlot<'_, T> {
    /// Kind of this slot
    #[inline]
    #[must_use]
    pub fn kind(&self) -> EntryKind {
        self.kind
    }

    /// Current value
    #[inline]
    #[must_use]
    pub fn get(&self) -> Option<&T> {
        self.slot.as_ref()
    }

    /// Current value, mutably
    #[inline]
    pub fn get_mut(&mut self) -> Option<&mut T> {
        self.slot.as_mut()
    }

    /// Replace the value, returning the previous one
    #[inline]
    pub fn set(&mut self, value: T) -> Option<T> {
        self.slot.replace(value)
    }

    /// Empty the slot
    #[inline]
    pub fn take(&mut self) -> Option<T> {
        self.slot.take()
    }
}
