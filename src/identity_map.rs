//! IdentityMap: associative container keyed by allocation identity.

use crate::error::{Error, Result};
use crate::identity::Identified;
use crate::raw_table::{self, Cursor, Entry, RawTable};
use core::fmt;
use core::hash::BuildHasher;
use core::iter::FusedIterator;
use std::collections::hash_map::RandomState;

/// A map from shared-pointer keys to values, matching keys by identity.
///
/// Two keys address the same entry only when they point at the same
/// allocation; the pointee's own `Eq`/`Hash` are ignored. Keys and values
/// are owned by the map for the lifetime of their entry.
pub struct IdentityMap<K, V, S = RandomState> {
    table: RawTable<K, V, S>,
}

impl<K, V> IdentityMap<K, V> {
    /// Slot count of a map created with [`IdentityMap::new`].
    pub const INITIAL_CAPACITY: usize = 16;

    pub fn new() -> Self {
        Self::with_capacity(Self::INITIAL_CAPACITY)
    }

    /// A map with at least `capacity` slots.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            table: RawTable::with_capacity(capacity),
        }
    }
}

impl<K, V> Default for IdentityMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, S> IdentityMap<K, V, S> {
    pub fn with_hasher(hasher: S) -> Self {
        Self::with_capacity_and_hasher(IdentityMap::<K, V>::INITIAL_CAPACITY, hasher)
    }

    pub fn with_capacity_and_hasher(capacity: usize, hasher: S) -> Self {
        Self {
            table: RawTable::with_capacity_and_hasher(capacity, hasher),
        }
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    /// Release every entry, in slot order.
    pub fn clear(&mut self) {
        self.table.clear()
    }

    pub fn reserve(&mut self, additional: usize) {
        self.table.reserve(additional)
    }

    /// Remove and return some entry (the first in slot order).
    pub fn pop_item(&mut self) -> Option<(K, V)> {
        self.table.remove_first()
    }

    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys {
            inner: self.table.iter(),
        }
    }

    pub fn values(&self) -> Values<'_, K, V> {
        Values {
            inner: self.table.iter(),
        }
    }

    pub fn values_mut(&mut self) -> ValuesMut<'_, K, V> {
        ValuesMut {
            inner: self.table.iter_mut(),
        }
    }

    /// `(key, value)` pairs in slot order; same as [`IdentityMap::iter`].
    pub fn items(&self) -> raw_table::Iter<'_, K, V> {
        self.table.iter()
    }

    pub fn iter(&self) -> raw_table::Iter<'_, K, V> {
        self.table.iter()
    }

    pub fn iter_mut(&mut self) -> raw_table::IterMut<'_, K, V> {
        self.table.iter_mut()
    }

    pub fn drain(&mut self) -> raw_table::Drain<'_, K, V, S> {
        self.table.drain()
    }

    /// Detached walk that allows `set`/`delete` between steps; see
    /// [`Cursor`].
    pub fn cursor(&self) -> Cursor {
        self.table.cursor()
    }

    pub fn cursor_next(&self, cursor: &mut Cursor) -> Result<Option<(&K, &V)>> {
        Ok(cursor.advance(&self.table)?.map(|(_, k, v)| (k, v)))
    }

    /// Remove the entry `cursor` yielded last. `Ok(None)` when the cursor has
    /// not yielded yet or that entry is already gone.
    pub fn cursor_remove(&mut self, cursor: &Cursor) -> Result<Option<(K, V)>> {
        match cursor.last() {
            Some(at) => self.table.remove_at(at),
            None => Ok(None),
        }
    }
}

impl<K, V, S> IdentityMap<K, V, S>
where
    K: Identified,
    S: BuildHasher,
{
    /// Store `value` under `key`'s identity, returning the value it replaced.
    pub fn set(&mut self, key: K, value: V) -> Option<V> {
        self.table.insert(key, value).map(|(_, old)| old)
    }

    /// The value stored under `key`, inserting `default` first when absent.
    ///
    /// On a hit the map keeps its stored key and value; `key` and `default`
    /// are dropped.
    pub fn set_default(&mut self, key: K, default: V) -> &mut V {
        self.get_or_insert_with(key, || default)
    }

    /// Like [`set_default`](Self::set_default), but builds the value only on
    /// a miss.
    pub fn get_or_insert_with<F>(&mut self, key: K, make: F) -> &mut V
    where
        F: FnOnce() -> V,
    {
        match self.table.entry(key.identity()) {
            Entry::Occupied(hit) => hit.into_mut(),
            Entry::Vacant(miss) => miss.insert(key, make()),
        }
    }

    pub fn get<Q>(&self, key: &Q) -> Result<&V>
    where
        Q: Identified + ?Sized,
    {
        self.table
            .get(key.identity())
            .map(|(_, v)| v)
            .ok_or(Error::KeyNotFound)
    }

    pub fn get_mut<Q>(&mut self, key: &Q) -> Result<&mut V>
    where
        Q: Identified + ?Sized,
    {
        self.table
            .get_mut(key.identity())
            .map(|(_, v)| v)
            .ok_or(Error::KeyNotFound)
    }

    /// The value for `key`, or `default` when absent.
    pub fn get_or<'a, Q>(&'a self, key: &Q, default: &'a V) -> &'a V
    where
        Q: Identified + ?Sized,
    {
        self.get(key).unwrap_or(default)
    }

    pub fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        Q: Identified + ?Sized,
    {
        self.table.get(key.identity())
    }

    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        Q: Identified + ?Sized,
    {
        self.table.contains(key.identity())
    }

    /// Remove the entry for `key` and release it.
    pub fn delete<Q>(&mut self, key: &Q) -> Result<()>
    where
        Q: Identified + ?Sized,
    {
        self.table
            .remove(key.identity())
            .map(drop)
            .ok_or(Error::KeyNotFound)
    }

    pub fn pop<Q>(&mut self, key: &Q) -> Result<V>
    where
        Q: Identified + ?Sized,
    {
        self.table
            .remove(key.identity())
            .map(|(_, v)| v)
            .ok_or(Error::KeyNotFound)
    }

    /// Remove and return the value for `key`, or `default` when absent.
    pub fn pop_or<Q>(&mut self, key: &Q, default: V) -> V
    where
        Q: Identified + ?Sized,
    {
        self.pop(key).unwrap_or(default)
    }
}

impl<K: Clone, V: Clone, S: Clone> Clone for IdentityMap<K, V, S> {
    fn clone(&self) -> Self {
        Self {
            table: self.table.clone(),
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug, S> fmt::Debug for IdentityMap<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.table, f)
    }
}

impl<K, V, S> Extend<(K, V)> for IdentityMap<K, V, S>
where
    K: Identified,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.set(k, v);
        }
    }
}

impl<K: Identified, V> FromIterator<(K, V)> for IdentityMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = IdentityMap::new();
        map.extend(iter);
        map
    }
}

impl<K, V, S> IntoIterator for IdentityMap<K, V, S> {
    type Item = (K, V);
    type IntoIter = raw_table::IntoIter<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.table.into_iter()
    }
}

impl<'a, K, V, S> IntoIterator for &'a IdentityMap<K, V, S> {
    type Item = (&'a K, &'a V);
    type IntoIter = raw_table::Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.table.iter()
    }
}

impl<'a, K, V, S> IntoIterator for &'a mut IdentityMap<K, V, S> {
    type Item = (&'a K, &'a mut V);
    type IntoIter = raw_table::IterMut<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.table.iter_mut()
    }
}

pub struct Keys<'a, K, V> {
    inner: raw_table::Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    #[inline]
    fn next(&mut self) -> Option<&'a K> {
        self.inner.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Keys<'_, K, V> {}
impl<K, V> FusedIterator for Keys<'_, K, V> {}

pub struct Values<'a, K, V> {
    inner: raw_table::Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    #[inline]
    fn next(&mut self) -> Option<&'a V> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Values<'_, K, V> {}
impl<K, V> FusedIterator for Values<'_, K, V> {}

pub struct ValuesMut<'a, K, V> {
    inner: raw_table::IterMut<'a, K, V>,
}

impl<'a, K, V> Iterator for ValuesMut<'a, K, V> {
    type Item = &'a mut V;

    #[inline]
    fn next(&mut self) -> Option<&'a mut V> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for ValuesMut<'_, K, V> {}
impl<K, V> FusedIterator for ValuesMut<'_, K, V> {}
