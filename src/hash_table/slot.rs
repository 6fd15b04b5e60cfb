use std::mem::replace;

/// Occupancy state of a single slot.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum SlotState {
    /// Never written since the slot array was allocated.
    Virgin,

    /// Holds a live key-value pair.
    Occupied,

    /// Held a key-value pair that has since been removed.
    Tombstone,
}

/// A single storage cell of a [`HashTable`](super::HashTable).
///
/// A virgin slot terminates any key search, whereas a tombstone only terminates insertion.
#[derive(Clone, Debug)]
pub(crate) enum Slot<K, V> {
    Virgin,
    Occupied(K, V),
    Tombstone,
}

impl<K, V> Slot<K, V> {
    /// Returns the occupancy state of the slot.
    #[inline]
    pub(crate) const fn state(&self) -> SlotState {
        match self {
            Slot::Virgin => SlotState::Virgin,
            Slot::Occupied(..) => SlotState::Occupied,
            Slot::Tombstone => SlotState::Tombstone,
        }
    }

    #[inline]
    pub(crate) const fn is_occupied(&self) -> bool {
        matches!(self, Slot::Occupied(..))
    }

    /// Returns references to the key and value if the slot is occupied.
    #[inline]
    pub(crate) const fn entry(&self) -> Option<(&K, &V)> {
        match self {
            Slot::Occupied(k, v) => Some((k, v)),
            _ => None,
        }
    }

    #[inline]
    pub(crate) fn value_mut(&mut self) -> Option<&mut V> {
        match self {
            Slot::Occupied(_, v) => Some(v),
            _ => None,
        }
    }

    /// Takes the key-value pair out of an occupied slot, leaving a tombstone behind.
    ///
    /// Returns `None` and leaves the slot untouched if it is not occupied.
    #[inline]
    pub(crate) fn take(&mut self) -> Option<(K, V)> {
        if !self.is_occupied() {
            return None;
        }
        self.replace(Slot::Tombstone).into_entry()
    }

    #[inline]
    pub(crate) fn replace(&mut self, slot: Slot<K, V>) -> Slot<K, V> {
        replace(self, slot)
    }

    #[inline]
    pub(crate) fn into_entry(self) -> Option<(K, V)> {
        match self {
            Slot::Occupied(k, v) => Some((k, v)),
            _ => None,
        }
    }
}

impl<K, V> Default for Slot<K, V> {
    #[inline]
    fn default() -> Self {
        Slot::Virgin
    }
}
