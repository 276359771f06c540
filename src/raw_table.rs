//! RawTable: open-addressed slot array keyed by object identity.
//!
//! Every slot is `Empty`, `Occupied` or `Tombstone`. Probing starts at
//! `hash & mask` and follows a perturbed sequence (`i = 5i + perturb + 1`,
//! `perturb >>= 5`), which visits every slot once `perturb` has drained.
//! A probe stops at the first `Empty` slot (miss) or at the first
//! `Occupied` slot with the same identity (hit); tombstones are skipped
//! but remembered so an insert can reclaim the first one on its path.
//!
//! Occupied slots store their hash; rehashing never calls the hasher or
//! touches the key. The load budget is `usable(capacity) = (2c + 1) / 3`
//! occupied-or-tombstone slots, which always leaves at least one `Empty`
//! slot, so every probe terminates.
//!
//! Iterators borrow the table, so nothing can resize it under them. For
//! walks that interleave mutation, `Cursor` is detached from the borrow
//! and is invalidated by the generation counter every resize bumps.
//! Cursors and slot indices also carry the id of the table that issued
//! them; another table rejects them even at the same generation.

use crate::error::{Error, Result};
use crate::identity::{Identified, Identity};
use core::fmt;
use core::hash::BuildHasher;
use core::iter::FusedIterator;
use core::mem;
use core::sync::atomic::{AtomicU64, Ordering};
use std::collections::hash_map::RandomState;

const PERTURB_SHIFT: u32 = 5;

/// Smallest slot count a table is created or resized with.
pub const MIN_CAPACITY: usize = 4;

/// Maximum occupied-plus-tombstone slots for a table of `capacity` slots.
#[inline]
pub const fn usable(capacity: usize) -> usize {
    // (2c + 1) / 3 without overflowing for large c.
    2 * (capacity / 3) + (2 * (capacity % 3) + 1) / 3
}

static NEXT_TABLE_ID: AtomicU64 = AtomicU64::new(1);

fn next_table_id() -> u64 {
    NEXT_TABLE_ID.fetch_add(1, Ordering::Relaxed)
}

#[cold]
#[inline(never)]
fn capacity_overflow() -> ! {
    panic!("identity table capacity overflow")
}

#[derive(Clone)]
struct Bucket<K, V> {
    hash: u64,
    key: K,
    value: V,
}

#[derive(Clone)]
enum Slot<K, V> {
    Empty,
    Occupied(Bucket<K, V>),
    Tombstone,
}

impl<K, V> Slot<K, V> {
    #[inline]
    fn bucket(&self) -> Option<&Bucket<K, V>> {
        match self {
            Slot::Occupied(b) => Some(b),
            _ => None,
        }
    }

    #[inline]
    fn bucket_mut(&mut self) -> Option<&mut Bucket<K, V>> {
        match self {
            Slot::Occupied(b) => Some(b),
            _ => None,
        }
    }
}

struct ProbeSeq {
    mask: usize,
    pos: usize,
    perturb: u64,
}

impl ProbeSeq {
    #[inline]
    fn new(hash: u64, mask: usize) -> Self {
        Self {
            mask,
            pos: hash as usize & mask,
            perturb: hash,
        }
    }

    #[inline]
    fn advance(&mut self) {
        self.pos = self
            .pos
            .wrapping_mul(5)
            .wrapping_add(self.perturb as usize)
            .wrapping_add(1)
            & self.mask;
        self.perturb >>= PERTURB_SHIFT;
    }
}

/// Position of an occupied slot, valid for the table that issued it and
/// the generation it was taken at.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct SlotIndex {
    table: u64,
    index: usize,
    generation: u64,
}

impl SlotIndex {
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

pub struct RawTable<K, V, S = RandomState> {
    id: u64,
    hasher: S,
    slots: Box<[Slot<K, V>]>,
    occupied: usize,
    tombstones: usize,
    generation: u64,
}

fn empty_slots<K, V>(capacity: usize) -> Box<[Slot<K, V>]> {
    (0..capacity).map(|_| Slot::Empty).collect()
}

fn round_capacity(capacity: usize) -> usize {
    capacity.max(MIN_CAPACITY).next_power_of_two()
}

impl<K, V> RawTable<K, V> {
    pub fn new() -> Self {
        Self::with_capacity_and_hasher(MIN_CAPACITY, RandomState::new())
    }

    /// A table with at least `capacity` slots (rounded up to a power of two).
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_hasher(capacity, RandomState::new())
    }
}

impl<K, V> Default for RawTable<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, S> RawTable<K, V, S> {
    pub fn with_hasher(hasher: S) -> Self {
        Self::with_capacity_and_hasher(MIN_CAPACITY, hasher)
    }

    pub fn with_capacity_and_hasher(capacity: usize, hasher: S) -> Self {
        Self {
            id: next_table_id(),
            hasher,
            slots: empty_slots(round_capacity(capacity)),
            occupied: 0,
            tombstones: 0,
            generation: 0,
        }
    }

    pub fn hasher(&self) -> &S {
        &self.hasher
    }

    pub fn len(&self) -> usize {
        self.occupied
    }

    pub fn is_empty(&self) -> bool {
        self.occupied == 0
    }

    /// Number of slots in the backing array.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn tombstones(&self) -> usize {
        self.tombstones
    }

    /// Bumped by every resize; cursors and slot indices from an older
    /// generation are rejected.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[inline]
    fn mask(&self) -> usize {
        self.slots.len() - 1
    }

    #[inline]
    fn slot_index(&self, index: usize) -> SlotIndex {
        SlotIndex {
            table: self.id,
            index,
            generation: self.generation,
        }
    }

    /// Reject positions issued by another table or before a resize.
    fn check_issued(&self, table: u64, generation: u64) -> Result<()> {
        if table != self.id {
            return Err(Error::ForeignCursor);
        }
        if generation != self.generation {
            return Err(Error::StaleCursor {
                created: generation,
                current: self.generation,
            });
        }
        Ok(())
    }

    /// First `Empty` or `Tombstone` slot on the probe path of `hash`.
    fn find_insert_slot(&self, hash: u64) -> usize {
        let mut seq = ProbeSeq::new(hash, self.mask());
        loop {
            match self.slots[seq.pos] {
                Slot::Occupied(_) => seq.advance(),
                _ => return seq.pos,
            }
        }
    }

    /// Reallocate to `new_capacity` slots and re-place every live entry by
    /// its stored hash, in old slot order. Tombstones are dropped.
    ///
    /// Panics when `new_capacity` is not a power of two, is smaller than the
    /// current capacity, or cannot hold the live entries within the load
    /// budget.
    pub fn resize(&mut self, new_capacity: usize) {
        assert!(
            new_capacity.is_power_of_two() && new_capacity >= MIN_CAPACITY,
            "table capacity must be a power of two >= {MIN_CAPACITY}, got {new_capacity}"
        );
        assert!(
            new_capacity >= self.capacity(),
            "table capacity cannot shrink from {} to {new_capacity}",
            self.capacity()
        );
        assert!(
            usable(new_capacity) > self.occupied,
            "resize to {new_capacity} slots cannot hold {} live entries",
            self.occupied
        );
        let old_capacity = self.slots.len();
        let dropped = self.tombstones;
        let old = mem::replace(&mut self.slots, empty_slots(new_capacity));
        self.tombstones = 0;
        self.generation += 1;
        for slot in old.into_vec() {
            if let Slot::Occupied(bucket) = slot {
                let i = self.find_insert_slot(bucket.hash);
                self.slots[i] = Slot::Occupied(bucket);
            }
        }
        log::trace!(
            "identity table resized {} -> {} slots ({} live, {} tombstones dropped, generation {})",
            old_capacity,
            new_capacity,
            self.occupied,
            dropped,
            self.generation
        );
    }

    /// Make room for the next claim of a fresh `Empty` slot. Doubles when
    /// live entries fill more than half the budget; otherwise rehashes in
    /// place to flush tombstones.
    fn grow(&mut self) {
        let capacity = self.capacity();
        let new_capacity = if (self.occupied + 1) * 2 > usable(capacity) {
            capacity.checked_mul(2).unwrap_or_else(|| capacity_overflow())
        } else {
            capacity
        };
        self.resize(new_capacity);
    }

    /// Ensure `additional` more entries fit without another resize.
    ///
    /// Panics with a capacity overflow when the required slot array cannot
    /// be addressed.
    pub fn reserve(&mut self, additional: usize) {
        let needed = self
            .occupied
            .checked_add(additional)
            .unwrap_or_else(|| capacity_overflow());
        let claimed = needed
            .checked_add(self.tombstones)
            .unwrap_or_else(|| capacity_overflow());
        if claimed <= usable(self.capacity()) {
            return;
        }
        let mut new_capacity = self.capacity();
        while usable(new_capacity) <= needed {
            new_capacity = new_capacity
                .checked_mul(2)
                .unwrap_or_else(|| capacity_overflow());
        }
        let fits = new_capacity
            .checked_mul(mem::size_of::<Slot<K, V>>())
            .is_some_and(|bytes| bytes <= isize::MAX as usize);
        if !fits {
            capacity_overflow();
        }
        self.resize(new_capacity);
    }

    /// Claim the vacant slot at `index` found by a probe for `hash`,
    /// resizing first when the load budget requires it. Returns the final
    /// index.
    fn insert_vacant(&mut self, mut index: usize, hash: u64, key: K, value: V) -> usize {
        let mut reuses_tombstone = matches!(self.slots[index], Slot::Tombstone);
        if !reuses_tombstone && self.occupied + self.tombstones + 1 > usable(self.capacity()) {
            self.grow();
            index = self.find_insert_slot(hash);
            reuses_tombstone = false;
        }
        debug_assert!(self.slots[index].bucket().is_none());
        self.slots[index] = Slot::Occupied(Bucket { hash, key, value });
        self.occupied += 1;
        if reuses_tombstone {
            self.tombstones -= 1;
        }
        index
    }

    fn remove_index(&mut self, index: usize) -> Option<(K, V)> {
        if self.slots[index].bucket().is_none() {
            return None;
        }
        match mem::replace(&mut self.slots[index], Slot::Tombstone) {
            Slot::Occupied(bucket) => {
                self.occupied -= 1;
                self.tombstones += 1;
                Some((bucket.key, bucket.value))
            }
            _ => unreachable!("slot checked occupied above"),
        }
    }

    /// Remove the occupied slot at `at`. Fails when `at` was taken before a
    /// resize; returns `Ok(None)` when the slot is no longer occupied.
    pub fn remove_at(&mut self, at: SlotIndex) -> Result<Option<(K, V)>> {
        self.check_issued(at.table, at.generation)?;
        Ok(self.remove_index(at.index))
    }

    /// Remove the first live entry in slot order.
    pub fn remove_first(&mut self) -> Option<(K, V)> {
        let index = self.slots.iter().position(|s| s.bucket().is_some())?;
        self.remove_index(index)
    }

    /// Read the entry at `at` if it is still occupied in this table and
    /// generation.
    pub fn get_at(&self, at: SlotIndex) -> Option<(&K, &V)> {
        if self.check_issued(at.table, at.generation).is_err() {
            return None;
        }
        self.slots
            .get(at.index)?
            .bucket()
            .map(|b| (&b.key, &b.value))
    }

    /// Tombstone every entry for which `keep` returns false, releasing it
    /// in place. One pass in slot order; returns how many were removed.
    pub fn retain<F>(&mut self, mut keep: F) -> usize
    where
        F: FnMut(&K, &mut V) -> bool,
    {
        let mut removed = 0;
        for slot in self.slots.iter_mut() {
            let retained = match slot {
                Slot::Occupied(b) => keep(&b.key, &mut b.value),
                _ => continue,
            };
            if !retained {
                let released = mem::replace(slot, Slot::Tombstone);
                self.occupied -= 1;
                self.tombstones += 1;
                removed += 1;
                drop(released);
            }
        }
        removed
    }

    /// Release every entry in slot order. Capacity is kept.
    pub fn clear(&mut self) {
        let released = self.occupied;
        for slot in self.slots.iter_mut() {
            match mem::replace(slot, Slot::Empty) {
                Slot::Occupied(bucket) => {
                    self.occupied -= 1;
                    drop(bucket);
                }
                Slot::Tombstone => self.tombstones -= 1,
                Slot::Empty => {}
            }
        }
        if released > 0 {
            log::debug!("identity table cleared, {released} entries released");
        }
    }

    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            slots: self.slots.iter(),
            remaining: self.occupied,
        }
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        IterMut {
            slots: self.slots.iter_mut(),
            remaining: self.occupied,
        }
    }

    /// Remove every entry, yielding them in slot order. Entries the caller
    /// does not consume are released when the iterator is dropped.
    pub fn drain(&mut self) -> Drain<'_, K, V, S> {
        Drain {
            table: self,
            position: 0,
        }
    }

    /// A cursor positioned before the first slot of the current generation.
    pub fn cursor(&self) -> Cursor {
        Cursor {
            table: self.id,
            position: 0,
            generation: self.generation,
        }
    }

    #[cfg(test)]
    pub(crate) fn assert_invariants(&self) {
        let occupied = self.slots.iter().filter(|s| s.bucket().is_some()).count();
        let tombstones = self
            .slots
            .iter()
            .filter(|s| matches!(s, Slot::Tombstone))
            .count();
        assert_eq!(occupied, self.occupied, "occupied count drifted");
        assert_eq!(tombstones, self.tombstones, "tombstone count drifted");
        assert!(self.occupied + self.tombstones <= usable(self.capacity()));
        assert!(self.capacity().is_power_of_two());
    }
}

impl<K, V, S> RawTable<K, V, S>
where
    K: Identified,
    S: BuildHasher,
{
    #[inline]
    fn hash_of(&self, id: Identity) -> u64 {
        self.hasher.hash_one(id)
    }

    /// `Ok(hit)` or `Err(slot an insert should claim)`.
    fn probe(&self, hash: u64, id: Identity) -> core::result::Result<usize, usize> {
        let mut seq = ProbeSeq::new(hash, self.mask());
        let mut first_tombstone = None;
        loop {
            match &self.slots[seq.pos] {
                Slot::Empty => return Err(first_tombstone.unwrap_or(seq.pos)),
                Slot::Tombstone => {
                    first_tombstone.get_or_insert(seq.pos);
                }
                Slot::Occupied(b) => {
                    if b.hash == hash && b.key.identity() == id {
                        return Ok(seq.pos);
                    }
                }
            }
            seq.advance();
        }
    }

    pub fn find_slot(&self, id: Identity) -> Option<SlotIndex> {
        let hash = self.hash_of(id);
        self.probe(hash, id).ok().map(|i| self.slot_index(i))
    }

    pub fn contains(&self, id: Identity) -> bool {
        self.find_slot(id).is_some()
    }

    pub fn get(&self, id: Identity) -> Option<(&K, &V)> {
        let hash = self.hash_of(id);
        let i = self.probe(hash, id).ok()?;
        self.slots[i].bucket().map(|b| (&b.key, &b.value))
    }

    pub fn get_mut(&mut self, id: Identity) -> Option<(&K, &mut V)> {
        let hash = self.hash_of(id);
        let i = self.probe(hash, id).ok()?;
        self.slots[i].bucket_mut().map(|b| (&b.key, &mut b.value))
    }

    /// Insert or replace. On a hit both the stored key and value are
    /// replaced and the old pair is returned.
    pub fn insert(&mut self, key: K, value: V) -> Option<(K, V)> {
        let id = key.identity();
        let hash = self.hash_of(id);
        match self.probe(hash, id) {
            Ok(i) => {
                let b = self.slots[i]
                    .bucket_mut()
                    .expect("probe hit must land on an occupied slot");
                let old_key = mem::replace(&mut b.key, key);
                let old_value = mem::replace(&mut b.value, value);
                Some((old_key, old_value))
            }
            Err(i) => {
                self.insert_vacant(i, hash, key, value);
                None
            }
        }
    }

    pub fn remove(&mut self, id: Identity) -> Option<(K, V)> {
        let hash = self.hash_of(id);
        let i = self.probe(hash, id).ok()?;
        self.remove_index(i)
    }

    /// Probe once for `id` and expose the result for in-place update or a
    /// deferred insert.
    pub fn entry(&mut self, id: Identity) -> Entry<'_, K, V, S> {
        let hash = self.hash_of(id);
        match self.probe(hash, id) {
            Ok(index) => Entry::Occupied(OccupiedEntry { table: self, index }),
            Err(index) => Entry::Vacant(VacantEntry {
                table: self,
                hash,
                id,
                index,
            }),
        }
    }
}

impl<K: Clone, V: Clone, S: Clone> Clone for RawTable<K, V, S> {
    fn clone(&self) -> Self {
        Self {
            id: next_table_id(),
            hasher: self.hasher.clone(),
            slots: self.slots.clone(),
            occupied: self.occupied,
            tombstones: self.tombstones,
            generation: self.generation,
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug, S> fmt::Debug for RawTable<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

pub enum Entry<'a, K, V, S> {
    Occupied(OccupiedEntry<'a, K, V, S>),
    Vacant(VacantEntry<'a, K, V, S>),
}

pub struct OccupiedEntry<'a, K, V, S> {
    table: &'a mut RawTable<K, V, S>,
    index: usize,
}

impl<'a, K, V, S> OccupiedEntry<'a, K, V, S> {
    fn bucket(&self) -> &Bucket<K, V> {
        self.table.slots[self.index]
            .bucket()
            .expect("occupied entry must point at an occupied slot")
    }

    fn bucket_mut(&mut self) -> &mut Bucket<K, V> {
        self.table.slots[self.index]
            .bucket_mut()
            .expect("occupied entry must point at an occupied slot")
    }

    pub fn slot(&self) -> SlotIndex {
        self.table.slot_index(self.index)
    }

    pub fn key(&self) -> &K {
        &self.bucket().key
    }

    pub fn get(&self) -> &V {
        &self.bucket().value
    }

    pub fn get_mut(&mut self) -> &mut V {
        &mut self.bucket_mut().value
    }

    pub fn into_mut(self) -> &'a mut V {
        let table = self.table;
        &mut table.slots[self.index]
            .bucket_mut()
            .expect("occupied entry must point at an occupied slot")
            .value
    }

    /// Replace both key and value, returning the old pair.
    pub fn replace(&mut self, key: K, value: V) -> (K, V) {
        let b = self.bucket_mut();
        (mem::replace(&mut b.key, key), mem::replace(&mut b.value, value))
    }

    pub fn remove(self) -> (K, V) {
        self.table
            .remove_index(self.index)
            .expect("occupied entry must point at an occupied slot")
    }
}

pub struct VacantEntry<'a, K, V, S> {
    table: &'a mut RawTable<K, V, S>,
    hash: u64,
    id: Identity,
    index: usize,
}

impl<'a, K: Identified, V, S> VacantEntry<'a, K, V, S> {
    pub fn identity(&self) -> Identity {
        self.id
    }

    /// Claim the slot for `key`, which must carry the probed identity.
    pub fn insert(self, key: K, value: V) -> &'a mut V {
        debug_assert_eq!(key.identity(), self.id, "vacant entry filled with a different key");
        let table = self.table;
        let index = table.insert_vacant(self.index, self.hash, key, value);
        &mut table.slots[index]
            .bucket_mut()
            .expect("slot was just filled")
            .value
    }
}

/// Detached walk over a table's occupied slots.
///
/// Holds no borrow, so the table can be mutated between steps. Removals and
/// inserts that do not resize keep the cursor valid (entries inserted behind
/// the cursor are not visited); after a resize every step fails with
/// [`Error::StaleCursor`]. Stepping it over a different table fails with
/// [`Error::ForeignCursor`].
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Cursor {
    table: u64,
    position: usize,
    generation: u64,
}

impl Cursor {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Slot of the entry the last successful `advance` yielded.
    pub fn last(&self) -> Option<SlotIndex> {
        self.position.checked_sub(1).map(|index| SlotIndex {
            table: self.table,
            index,
            generation: self.generation,
        })
    }

    pub fn advance<'a, K, V, S>(
        &mut self,
        table: &'a RawTable<K, V, S>,
    ) -> Result<Option<(SlotIndex, &'a K, &'a V)>> {
        table.check_issued(self.table, self.generation)?;
        while self.position < table.slots.len() {
            let index = self.position;
            self.position += 1;
            if let Some(b) = table.slots[index].bucket() {
                return Ok(Some((table.slot_index(index), &b.key, &b.value)));
            }
        }
        Ok(None)
    }
}

/// Iterator over live entries in slot order.
pub struct Iter<'a, K, V> {
    slots: core::slice::Iter<'a, Slot<K, V>>,
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        for slot in self.slots.by_ref() {
            if let Slot::Occupied(b) = slot {
                self.remaining -= 1;
                return Some((&b.key, &b.value));
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}
impl<K, V> FusedIterator for Iter<'_, K, V> {}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            slots: self.slots.clone(),
            remaining: self.remaining,
        }
    }
}

/// Iterator over live entries in slot order with mutable values.
pub struct IterMut<'a, K, V> {
    slots: core::slice::IterMut<'a, Slot<K, V>>,
    remaining: usize,
}

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        for slot in self.slots.by_ref() {
            if let Slot::Occupied(b) = slot {
                self.remaining -= 1;
                return Some((&b.key, &mut b.value));
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for IterMut<'_, K, V> {}
impl<K, V> FusedIterator for IterMut<'_, K, V> {}

pub struct Drain<'a, K, V, S> {
    table: &'a mut RawTable<K, V, S>,
    position: usize,
}

impl<K, V, S> Iterator for Drain<'_, K, V, S> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        while self.position < self.table.slots.len() {
            let index = self.position;
            self.position += 1;
            match mem::replace(&mut self.table.slots[index], Slot::Empty) {
                Slot::Occupied(bucket) => {
                    self.table.occupied -= 1;
                    return Some((bucket.key, bucket.value));
                }
                Slot::Tombstone => self.table.tombstones -= 1,
                Slot::Empty => {}
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.table.occupied, Some(self.table.occupied))
    }
}

impl<K, V, S> ExactSizeIterator for Drain<'_, K, V, S> {}
impl<K, V, S> FusedIterator for Drain<'_, K, V, S> {}

impl<K, V, S> Drop for Drain<'_, K, V, S> {
    fn drop(&mut self) {
        self.for_each(drop);
    }
}

/// Owning iterator over live entries in slot order.
pub struct IntoIter<K, V> {
    slots: std::vec::IntoIter<Slot<K, V>>,
    remaining: usize,
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        for slot in self.slots.by_ref() {
            if let Slot::Occupied(b) = slot {
                self.remaining -= 1;
                return Some((b.key, b.value));
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {}
impl<K, V> FusedIterator for IntoIter<K, V> {}

impl<K, V, S> IntoIterator for RawTable<K, V, S> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(self) -> IntoIter<K, V> {
        IntoIter {
            remaining: self.occupied,
            slots: self.slots.into_vec().into_iter(),
        }
    }
}

impl<'a, K, V, S> IntoIterator for &'a RawTable<K, V, S> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Iter<'a, K, V> {
        self.iter()
    }
}
