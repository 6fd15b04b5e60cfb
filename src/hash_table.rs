//! [`HashTable`] is an open-addressing hash table with linear probing.

mod probe;
mod slot;

pub use slot::SlotState;

use super::Error;
use equivalent::Equivalent;
use log::{debug, error, trace};
use probe::{fold_hash, start_index, ProbeSeq};
use slot::Slot;
use std::collections::hash_map::DefaultHasher;
use std::fmt::{self, Debug};
use std::hash::{Hash, Hasher};
use std::iter::FusedIterator;
use std::slice;

/// Number of slots a [`HashTable`] is created with by default.
pub const INITIAL_CAPACITY: usize = 16;

/// Load factor the [`HashTable`] never exceeds after an insertion.
pub const MAX_LOAD_FACTOR: f64 = 0.6;

/// Largest capacity a [`HashTable`] can grow to.
const MAXIMUM_CAPACITY: usize = 1_usize << (usize::BITS - 1);

/// Open-addressing hash table.
///
/// [`HashTable`] stores every key-value pair directly in a fixed-length slot array and resolves
/// collisions by linear probing: a key whose home slot is taken goes into the next free slot,
/// wrapping at the end of the array.
///
/// ## Slots
///
/// Each slot is either virgin, occupied, or a tombstone. Removing a key turns its slot into a
/// tombstone rather than a virgin slot, since keys inserted after it may have probed past it.
/// Searches continue through tombstones and stop at the first virgin slot, and insertions reuse
/// the first tombstone on the probe path of a key that is not present.
///
/// ## Resize
///
/// The capacity doubles whenever inserting a new key would push the load factor above
/// [`MAX_LOAD_FACTOR`]. Resizing allocates a new slot array, relocates every live pair, and
/// drops all tombstones. The capacity never shrinks.
///
/// ## Hashing
///
/// Keys are hashed with a fixed-key [`DefaultHasher`], so the slot a key starts probing from
/// only depends on the key and the capacity.
#[derive(Clone)]
pub struct HashTable<K, V> {
    slots: Box<[Slot<K, V>]>,
    count: usize,
}

/// An iterator over the entries of a [`HashTable`] in storage order.
pub struct Iter<'t, K, V> {
    slots: slice::Iter<'t, Slot<K, V>>,
    remaining: usize,
}

/// Outcome of probing for an insertion.
enum Probe {
    /// The key is present at the index.
    Found(usize),

    /// The key is absent and can be written at the index.
    Vacant(usize),
}

impl<K, V> HashTable<K, V> {
    /// Creates an empty [`HashTable`] with [`INITIAL_CAPACITY`] slots.
    ///
    /// # Examples
    ///
    /// ```
    /// use lptable::HashTable;
    ///
    /// let table: HashTable<u64, u32> = HashTable::new();
    /// assert_eq!(table.capacity(), 16);
    /// ```
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(INITIAL_CAPACITY)
    }

    /// Creates an empty [`HashTable`] with the specified number of slots.
    ///
    /// A table has at least one slot.
    ///
    /// # Examples
    ///
    /// ```
    /// use lptable::HashTable;
    ///
    /// let table: HashTable<u64, u32> = HashTable::with_capacity(100);
    /// assert_eq!(table.capacity(), 100);
    ///
    /// let table: HashTable<u64, u32> = HashTable::with_capacity(0);
    /// assert_eq!(table.capacity(), 1);
    /// ```
    #[inline]
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Self::virgin_slots(capacity.clamp(1, MAXIMUM_CAPACITY)),
            count: 0,
        }
    }

    /// Returns the number of entries.
    ///
    /// # Examples
    ///
    /// ```
    /// use lptable::HashTable;
    ///
    /// let mut table: HashTable<u64, u32> = HashTable::new();
    ///
    /// assert!(!table.add(1, 0));
    /// assert_eq!(table.count(), 1);
    /// ```
    #[inline]
    pub const fn count(&self) -> usize {
        self.count
    }

    /// Returns the number of entries.
    ///
    /// It is an alias of [`HashTable::count`].
    #[inline]
    pub const fn len(&self) -> usize {
        self.count
    }

    /// Returns `true` if the [`HashTable`] holds no entries.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Returns the number of slots.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Returns the ratio of occupied slots to the capacity.
    ///
    /// # Examples
    ///
    /// ```
    /// use lptable::HashTable;
    ///
    /// let mut table: HashTable<u64, u32> = HashTable::new();
    /// assert_eq!(table.load_factor(), 0.0);
    ///
    /// for key in 0..4 {
    ///     table.add(key, 0);
    /// }
    /// assert_eq!(table.load_factor(), 0.25);
    /// ```
    #[inline]
    pub fn load_factor(&self) -> f64 {
        Self::ratio(self.count, self.slots.len())
    }

    /// Returns `true` if any entry holds the value.
    ///
    /// Every slot is examined, regardless of the hash of any key.
    ///
    /// # Examples
    ///
    /// ```
    /// use lptable::HashTable;
    ///
    /// let mut table: HashTable<u64, &str> = HashTable::new();
    ///
    /// table.add(7, "seven");
    /// assert!(table.contains_value(&"seven"));
    /// assert!(!table.contains_value(&"eight"));
    /// ```
    #[inline]
    pub fn contains_value(&self, value: &V) -> bool
    where
        V: PartialEq,
    {
        self.iter().any(|(_, v)| v == value)
    }

    /// Returns the keys of all the entries in storage order.
    ///
    /// Only occupied slots contribute a key, the same as [`HashTable::get_values`]; virgin slots
    /// and tombstones are skipped.
    ///
    /// # Examples
    ///
    /// ```
    /// use lptable::HashTable;
    ///
    /// let mut table: HashTable<u64, u32> = HashTable::new();
    ///
    /// table.add(1, 10);
    /// table.add(2, 20);
    /// table.remove(&1);
    /// assert_eq!(table.get_keys(), vec![&2]);
    /// ```
    #[inline]
    pub fn get_keys(&self) -> Vec<&K> {
        self.iter().map(|(k, _)| k).collect()
    }

    /// Returns the values of all the entries in storage order.
    #[inline]
    pub fn get_values(&self) -> Vec<&V> {
        self.iter().map(|(_, v)| v).collect()
    }

    /// Returns an iterator over all the entries in storage order.
    ///
    /// # Examples
    ///
    /// ```
    /// use lptable::HashTable;
    ///
    /// let mut table: HashTable<u64, u32> = HashTable::new();
    ///
    /// table.add(3, 9);
    /// assert_eq!(table.iter().collect::<Vec<_>>(), vec![(&3, &9)]);
    /// ```
    #[inline]
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            slots: self.slots.iter(),
            remaining: self.count,
        }
    }

    /// Returns the state of every slot in storage order.
    ///
    /// # Examples
    ///
    /// ```
    /// use lptable::{HashTable, SlotState};
    ///
    /// let mut table: HashTable<u64, u32> = HashTable::with_capacity(4);
    ///
    /// table.add(1, 1);
    /// table.remove(&1);
    /// let tombstones = table
    ///     .slot_states()
    ///     .filter(|s| *s == SlotState::Tombstone)
    ///     .count();
    /// assert_eq!(tombstones, 1);
    /// ```
    #[inline]
    pub fn slot_states(&self) -> impl ExactSizeIterator<Item = SlotState> + '_ {
        self.slots.iter().map(Slot::state)
    }

    /// Removes all the entries.
    ///
    /// Every slot becomes virgin again; the capacity is retained.
    #[inline]
    pub fn clear(&mut self) {
        self.slots.iter_mut().for_each(|slot| *slot = Slot::Virgin);
        self.count = 0;
    }

    fn virgin_slots(capacity: usize) -> Box<[Slot<K, V>]> {
        (0..capacity).map(|_| Slot::default()).collect()
    }

    #[allow(clippy::cast_precision_loss)]
    fn ratio(count: usize, capacity: usize) -> f64 {
        count as f64 / capacity as f64
    }

    fn exhausted(&self) -> Error {
        let capacity = self.slots.len();
        error!("no vacant slot among {capacity} slots holding {} entries", self.count);
        Error::CapacityExhausted { capacity }
    }
}

impl<K, V> HashTable<K, V>
where
    K: Eq + Hash,
{
    /// Inserts a key-value pair, or updates the value if the key exists.
    ///
    /// Returns `true` if an existing value was updated, and `false` if a new entry was inserted.
    ///
    /// # Panics
    ///
    /// Panics if the capacity cannot be doubled or, on a broken resize policy, no vacant slot
    /// can be found. [`HashTable::try_add`] reports these conditions as errors instead.
    ///
    /// # Examples
    ///
    /// ```
    /// use lptable::HashTable;
    ///
    /// let mut table: HashTable<u64, u32> = HashTable::new();
    ///
    /// assert!(!table.add(1, 0));
    /// assert!(table.add(1, 1));
    /// assert_eq!(table.get(&1), Some(&1));
    /// assert_eq!(table.count(), 1);
    /// ```
    #[inline]
    pub fn add(&mut self, key: K, val: V) -> bool {
        match self.try_add(key, val) {
            Ok(updated) => updated,
            Err(e) => panic!("{e}"),
        }
    }

    /// Inserts a key-value pair, or updates the value if the key exists.
    ///
    /// Returns `Ok(true)` if an existing value was updated, and `Ok(false)` if a new entry was
    /// inserted. The capacity doubles first if the new entry would raise the load factor above
    /// [`MAX_LOAD_FACTOR`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::CapacityOverflow`] if the capacity cannot be doubled, and
    /// [`Error::CapacityExhausted`] if the probe sequence finds no vacant slot.
    ///
    /// # Examples
    ///
    /// ```
    /// use lptable::HashTable;
    ///
    /// let mut table: HashTable<u64, u32> = HashTable::new();
    ///
    /// assert_eq!(table.try_add(1, 0), Ok(false));
    /// assert_eq!(table.try_add(1, 1), Ok(true));
    /// ```
    pub fn try_add(&mut self, key: K, val: V) -> Result<bool, Error> {
        let hash = Self::hash(&key);
        let index = match self.probe_for_insert(&key, hash)? {
            Probe::Found(index) => {
                if let Some(v) = self.slots[index].value_mut() {
                    *v = val;
                }
                return Ok(true);
            }
            Probe::Vacant(_) if Self::ratio(self.count + 1, self.slots.len()) > MAX_LOAD_FACTOR => {
                self.resize()?;
                self.vacant_index(hash)?
            }
            Probe::Vacant(index) => index,
        };
        if self.slots[index].replace(Slot::Occupied(key, val)).state() == SlotState::Tombstone {
            trace!("reusing tombstone at slot {index}");
        }
        self.count += 1;
        Ok(false)
    }

    /// Returns `true` if the key exists.
    ///
    /// # Examples
    ///
    /// ```
    /// use lptable::HashTable;
    ///
    /// let mut table: HashTable<String, u32> = HashTable::new();
    ///
    /// assert!(!table.contains_key("one"));
    /// table.add("one".to_string(), 1);
    /// assert!(table.contains_key("one"));
    /// ```
    #[inline]
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        Q: Equivalent<K> + Hash + ?Sized,
    {
        self.find(key).is_some()
    }

    /// Returns a reference to the value associated with the key.
    ///
    /// # Examples
    ///
    /// ```
    /// use lptable::HashTable;
    ///
    /// let mut table: HashTable<u64, u32> = HashTable::new();
    ///
    /// assert!(table.get(&1).is_none());
    /// table.add(1, 10);
    /// assert_eq!(table.get(&1), Some(&10));
    /// ```
    #[inline]
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        Q: Equivalent<K> + Hash + ?Sized,
    {
        let index = self.find(key)?;
        self.slots[index].entry().map(|(_, v)| v)
    }

    /// Returns a mutable reference to the value associated with the key.
    ///
    /// # Examples
    ///
    /// ```
    /// use lptable::HashTable;
    ///
    /// let mut table: HashTable<u64, u32> = HashTable::new();
    ///
    /// table.add(1, 10);
    /// if let Some(v) = table.get_mut(&1) {
    ///     *v += 1;
    /// }
    /// assert_eq!(table.get(&1), Some(&11));
    /// ```
    #[inline]
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        Q: Equivalent<K> + Hash + ?Sized,
    {
        let index = self.find(key)?;
        self.slots[index].value_mut()
    }

    /// Removes a key and returns `true` if it existed.
    ///
    /// # Examples
    ///
    /// ```
    /// use lptable::HashTable;
    ///
    /// let mut table: HashTable<u64, u32> = HashTable::new();
    ///
    /// table.add(1, 0);
    /// assert!(table.remove(&1));
    /// assert!(!table.remove(&1));
    /// ```
    #[inline]
    pub fn remove<Q>(&mut self, key: &Q) -> bool
    where
        Q: Equivalent<K> + Hash + ?Sized,
    {
        self.remove_entry(key).is_some()
    }

    /// Removes a key and returns the key-value pair if it existed.
    ///
    /// The slot is left as a tombstone until the next resize.
    ///
    /// # Examples
    ///
    /// ```
    /// use lptable::HashTable;
    ///
    /// let mut table: HashTable<u64, u32> = HashTable::new();
    ///
    /// table.add(1, 0);
    /// assert_eq!(table.remove_entry(&1), Some((1, 0)));
    /// assert!(table.remove_entry(&1).is_none());
    /// ```
    #[inline]
    pub fn remove_entry<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        Q: Equivalent<K> + Hash + ?Sized,
    {
        let index = self.find(key)?;
        let entry = self.slots[index].take()?;
        self.count -= 1;
        Some(entry)
    }

    /// Returns the index of the slot the probe sequence of the key starts from.
    ///
    /// Two keys with the same slot index collide.
    ///
    /// # Examples
    ///
    /// ```
    /// use lptable::HashTable;
    ///
    /// let table: HashTable<u64, u32> = HashTable::new();
    ///
    /// assert!(table.slot_index(&11) < table.capacity());
    /// ```
    #[inline]
    pub fn slot_index<Q>(&self, key: &Q) -> usize
    where
        Q: Equivalent<K> + Hash + ?Sized,
    {
        start_index(Self::hash(key), self.slots.len())
    }

    /// Returns the non-negative hash value of the key.
    #[inline]
    fn hash<Q>(key: &Q) -> u64
    where
        Q: Hash + ?Sized,
    {
        let mut h = DefaultHasher::new();
        key.hash(&mut h);
        fold_hash(h.finish())
    }

    /// Returns the index of the slot holding the key.
    ///
    /// The search ends at the first virgin slot; tombstones are skipped.
    fn find<Q>(&self, key: &Q) -> Option<usize>
    where
        Q: Equivalent<K> + Hash + ?Sized,
    {
        for index in ProbeSeq::new(Self::hash(key), self.slots.len()) {
            match &self.slots[index] {
                Slot::Virgin => return None,
                Slot::Occupied(k, _) if key.equivalent(k) => return Some(index),
                Slot::Occupied(..) | Slot::Tombstone => (),
            }
        }
        None
    }

    /// Looks for either the slot holding the key or the slot the key should be written to.
    ///
    /// A key that is absent goes into the first tombstone on its probe path, or else into the
    /// virgin slot that ended the search.
    fn probe_for_insert(&self, key: &K, hash: u64) -> Result<Probe, Error> {
        let mut first_tombstone = None;
        for index in ProbeSeq::new(hash, self.slots.len()) {
            match &self.slots[index] {
                Slot::Virgin => return Ok(Probe::Vacant(first_tombstone.unwrap_or(index))),
                Slot::Occupied(k, _) if k == key => return Ok(Probe::Found(index)),
                Slot::Occupied(..) => (),
                Slot::Tombstone => {
                    first_tombstone.get_or_insert(index);
                }
            }
        }
        first_tombstone
            .map(Probe::Vacant)
            .ok_or_else(|| self.exhausted())
    }

    /// Returns the first slot on the probe path of the hash that is not occupied.
    fn vacant_index(&self, hash: u64) -> Result<usize, Error> {
        ProbeSeq::new(hash, self.slots.len())
            .find(|&index| !self.slots[index].is_occupied())
            .ok_or_else(|| self.exhausted())
    }

    /// Doubles the capacity and relocates every entry in storage order.
    fn resize(&mut self) -> Result<(), Error> {
        let capacity = self.slots.len();
        let new_capacity = capacity
            .checked_mul(2)
            .filter(|c| *c <= MAXIMUM_CAPACITY)
            .ok_or(Error::CapacityOverflow { capacity })?;
        debug!(
            "resizing from {capacity} to {new_capacity} slots, relocating {} entries",
            self.count
        );

        // Every entry is assigned a new slot before any is moved, so a failure leaves the
        // table untouched.
        let mut taken = vec![false; new_capacity];
        let mut placement = Vec::with_capacity(self.count);
        for (old_index, slot) in self.slots.iter().enumerate() {
            if let Some((key, _)) = slot.entry() {
                let new_index = ProbeSeq::new(Self::hash(key), new_capacity)
                    .find(|&index| !taken[index])
                    .ok_or_else(|| {
                        error!("no vacant slot among {new_capacity} slots while resizing");
                        Error::CapacityExhausted {
                            capacity: new_capacity,
                        }
                    })?;
                taken[new_index] = true;
                placement.push((old_index, new_index));
            }
        }

        let mut new_slots = Self::virgin_slots(new_capacity);
        for (old_index, new_index) in placement {
            new_slots[new_index] = self.slots[old_index].replace(Slot::Virgin);
        }
        self.slots = new_slots;
        Ok(())
    }
}

impl<K, V> Debug for HashTable<K, V>
where
    K: Debug,
    V: Debug,
{
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V> Default for HashTable<K, V> {
    /// Creates an empty [`HashTable`] with [`INITIAL_CAPACITY`] slots.
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> Extend<(K, V)> for HashTable<K, V>
where
    K: Eq + Hash,
{
    /// Adds every pair; later values of the same key overwrite earlier ones.
    #[inline]
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        iter.into_iter().for_each(|(k, v)| {
            self.add(k, v);
        });
    }
}

impl<K, V> FromIterator<(K, V)> for HashTable<K, V>
where
    K: Eq + Hash,
{
    #[inline]
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut table = Self::new();
        table.extend(iter);
        table
    }
}

impl<'t, K, V> IntoIterator for &'t HashTable<K, V> {
    type Item = (&'t K, &'t V);
    type IntoIter = Iter<'t, K, V>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, V> PartialEq for HashTable<K, V>
where
    K: Eq + Hash,
    V: PartialEq,
{
    /// Two tables are equal if they hold the same keys with equal values, regardless of their
    /// capacities or slot layouts.
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.count == other.count && self.iter().all(|(k, v)| other.get(k) == Some(v))
    }
}

impl<K, V> Eq for HashTable<K, V>
where
    K: Eq + Hash,
    V: Eq,
{
}

impl<'t, K, V> Iterator for Iter<'t, K, V> {
    type Item = (&'t K, &'t V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let entry = self.slots.find_map(Slot::entry)?;
        self.remaining -= 1;
        Some(entry)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<K, V> FusedIterator for Iter<'_, K, V> {}

impl<K, V> Clone for Iter<'_, K, V> {
    #[inline]
    fn clone(&self) -> Self {
        Self {
            slots: self.slots.clone(),
            remaining: self.remaining,
        }
    }
}

impl<K, V> Debug for Iter<'_, K, V>
where
    K: Debug,
    V: Debug,
{
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}
