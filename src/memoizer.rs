//! Memoizer: identity-keyed cache that holds its keys weakly.
//!
//! Each slot stores a weak handle to the key and the computed value. The
//! cache never keeps a key alive. When a key dies its slot stays in the
//! table (and in `len`) until `reap` or `delete` removes it; `reap` is the
//! only sweep and it never runs the computation function.

use crate::error::{Error, Result};
use crate::identity::{Identified, StrongKey, WeakKey};
use crate::raw_table::{Entry, RawTable};
use core::fmt;
use core::hash::BuildHasher;
use std::collections::hash_map::RandomState;

/// Lazily computes one value per key instance and remembers it for as long
/// as the entry is neither deleted nor reaped.
///
/// `K` is the strong key type (`Rc<T>` or `Arc<T>`); slots hold `K::Weak`.
pub struct Memoizer<K: StrongKey, V, F, S = RandomState> {
    compute: F,
    table: RawTable<K::Weak, V, S>,
}

impl<K, V, F> Memoizer<K, V, F>
where
    K: StrongKey,
    F: FnMut(&K) -> V,
{
    /// Slot count of a freshly constructed cache.
    pub const INITIAL_CAPACITY: usize = 128;

    pub fn new(compute: F) -> Self {
        Self::with_hasher(compute, RandomState::new())
    }
}

impl<K, V, F, S> Memoizer<K, V, F, S>
where
    K: StrongKey,
    F: FnMut(&K) -> V,
    S: BuildHasher,
{
    pub fn with_hasher(compute: F, hasher: S) -> Self {
        Self {
            compute,
            table: RawTable::with_capacity_and_hasher(
                Memoizer::<K, V, F>::INITIAL_CAPACITY,
                hasher,
            ),
        }
    }

    /// The memoized value for `key`, computing it on first request.
    ///
    /// The computation runs exactly once per key instance until the entry is
    /// deleted or reaped.
    pub fn get(&mut self, key: &K) -> &V {
        match self.table.entry(key.identity()) {
            Entry::Occupied(hit) => {
                // A live key can only match its own slot: the weak handle in
                // a dead slot keeps that address from being reused.
                debug_assert!(hit.key().is_live());
                hit.into_mut()
            }
            Entry::Vacant(miss) => {
                let value = (self.compute)(key);
                miss.insert(key.downgrade(), value)
            }
        }
    }

    /// Install `value` for `key` without computing, replacing any memoized
    /// result. The slot gets a fresh weak handle.
    pub fn set(&mut self, key: &K, value: V) -> Option<V> {
        self.table
            .insert(key.downgrade(), value)
            .map(|(_, old)| old)
    }
}

impl<K, V, F, S> Memoizer<K, V, F, S>
where
    K: StrongKey,
    S: BuildHasher,
{
    /// The memoized value for `key`, without computing on a miss.
    pub fn peek<Q>(&self, key: &Q) -> Option<&V>
    where
        Q: Identified + ?Sized,
    {
        self.table.get(key.identity()).map(|(_, v)| v)
    }

    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        Q: Identified + ?Sized,
    {
        self.table.contains(key.identity())
    }

    /// Remove and release the entry for `key`.
    pub fn delete<Q>(&mut self, key: &Q) -> Result<()>
    where
        Q: Identified + ?Sized,
    {
        self.table
            .remove(key.identity())
            .map(drop)
            .ok_or(Error::KeyNotFound)
    }
}

impl<K, V, F, S> Memoizer<K, V, F, S>
where
    K: StrongKey,
{
    /// Occupied slots, including entries whose key has died but which have
    /// not been reaped yet.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Entries whose key is still alive.
    pub fn live_len(&self) -> usize {
        self.table.iter().filter(|(k, _)| k.is_live()).count()
    }

    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    /// Tombstone every entry whose key has died and release its value.
    /// Returns the number of entries removed.
    pub fn reap(&mut self) -> usize {
        let reaped = self.table.retain(|k, _| k.is_live());
        if reaped > 0 {
            log::debug!(
                "memoizer reaped {} dead entries, {} remain",
                reaped,
                self.table.len()
            );
        }
        reaped
    }

    /// Release every entry, dead or alive.
    pub fn clear(&mut self) {
        self.table.clear()
    }

    /// Live entries in slot order, each with a strong handle to its key.
    pub fn iter(&self) -> impl Iterator<Item = (K, &V)> + '_ {
        self.table
            .iter()
            .filter_map(|(k, v)| k.upgrade().map(|key| (key, v)))
    }
}

impl<K: StrongKey, V, F, S> fmt::Debug for Memoizer<K, V, F, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Memoizer")
            .field("len", &self.len())
            .field("live", &self.live_len())
            .field("capacity", &self.capacity())
            .finish_non_exhaustive()
    }
}

/// Checked construction of a [`Memoizer`].
///
/// The cache takes exactly one argument, its computation function, and no
/// named options: `build` fails with [`Error::InvalidArgument`] if the
/// function is missing or any option was supplied.
pub struct MemoizerBuilder<F> {
    compute: Option<F>,
    options: Vec<String>,
}

impl<F> MemoizerBuilder<F> {
    pub fn new() -> Self {
        Self {
            compute: None,
            options: Vec::new(),
        }
    }

    pub fn compute(mut self, compute: F) -> Self {
        self.compute = Some(compute);
        self
    }

    pub fn option(mut self, name: impl Into<String>) -> Self {
        self.options.push(name.into());
        self
    }

    pub fn build<K, V>(self) -> Result<Memoizer<K, V, F>>
    where
        K: StrongKey,
        F: FnMut(&K) -> V,
    {
        if let Some(name) = self.options.first() {
            return Err(Error::InvalidArgument(format!(
                "Memoizer accepts no options, got `{name}`"
            )));
        }
        let compute = self.compute.ok_or_else(|| {
            Error::InvalidArgument("Memoizer expects a computation function".to_string())
        })?;
        Ok(Memoizer::new(compute))
    }
}

impl<F> Default for MemoizerBuilder<F> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;
    use std::sync::Arc;

    /// Invariant: a second `get` for the same key instance is a hit and the
    /// computation runs once.
    #[test]
    fn get_computes_once_per_key() {
        let calls = Cell::new(0);
        let mut m = Memoizer::new(|k: &Rc<i32>| {
            calls.set(calls.get() + 1);
            **k + 2
        });
        let five = Rc::new(5);
        assert_eq!(*m.get(&five), 7);
        assert_eq!(*m.get(&five), 7);
        assert_eq!(calls.get(), 1);

        // Equal value, different allocation: a new entry.
        let other_five = Rc::new(5);
        assert_eq!(*m.get(&other_five), 7);
        assert_eq!(calls.get(), 2);
        assert_eq!(m.len(), 2);
    }

    /// Invariant: the cache does not keep its key alive.
    #[test]
    fn cache_holds_keys_weakly() {
        let mut m = Memoizer::new(|k: &Rc<String>| k.len());
        let k = Rc::new("abc".to_string());
        m.get(&k);
        assert_eq!(Rc::strong_count(&k), 1);
        assert_eq!(Rc::weak_count(&k), 1);
    }

    /// Invariant: a dead key's entry still counts until reaped; reap removes
    /// exactly the dead entries and releases their values.
    #[test]
    fn dead_entries_count_until_reaped() {
        let released = Rc::new(());
        let mut m = Memoizer::new(|_: &Rc<u32>| Rc::clone(&released));
        let alive = Rc::new(0);
        let doomed = Rc::new(1);
        m.get(&alive);
        m.get(&doomed);
        assert_eq!(Rc::strong_count(&released), 3);

        drop(doomed);
        assert_eq!(m.len(), 2);
        assert_eq!(m.live_len(), 1);

        assert_eq!(m.reap(), 1);
        assert_eq!(m.len(), 1);
        assert_eq!(Rc::strong_count(&released), 2);
        assert_eq!(m.reap(), 0);
        assert!(m.contains(&alive));
    }

    /// Invariant: `set` overrides a memoized result and `get` then returns
    /// the installed value without computing.
    #[test]
    fn set_overrides_memoized_value() {
        let calls = Cell::new(0);
        let mut m = Memoizer::new(|k: &Rc<i32>| {
            calls.set(calls.get() + 1);
            **k
        });
        let k = Rc::new(1);
        assert_eq!(*m.get(&k), 1);
        assert_eq!(m.set(&k, 100), Some(1));
        assert_eq!(*m.get(&k), 100);

        let fresh = Rc::new(2);
        assert_eq!(m.set(&fresh, 200), None);
        assert_eq!(*m.get(&fresh), 200);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn delete_then_get_recomputes() {
        let calls = Cell::new(0);
        let mut m = Memoizer::new(|_: &Rc<()>| {
            calls.set(calls.get() + 1);
            calls.get()
        });
        let k = Rc::new(());
        assert_eq!(*m.get(&k), 1);
        assert_eq!(m.delete(&k), Ok(()));
        assert_eq!(m.delete(&k), Err(Error::KeyNotFound));
        assert!(!m.contains(&k));
        assert_eq!(*m.get(&k), 2);
    }

    #[test]
    fn peek_does_not_compute() {
        let mut m = Memoizer::new(|k: &Rc<i32>| **k * 3);
        let k = Rc::new(4);
        assert_eq!(m.peek(&k), None);
        m.get(&k);
        assert_eq!(m.peek(&k), Some(&12));
    }

    /// Invariant: growth re-places memoized values without recomputing.
    #[test]
    fn growth_never_recomputes() {
        let calls = Cell::new(0);
        let mut m = Memoizer::new(|k: &Rc<usize>| {
            calls.set(calls.get() + 1);
            **k
        });
        let ks: Vec<Rc<usize>> = (0..128).map(Rc::new).collect();
        for k in &ks {
            m.get(k);
        }
        assert!(m.capacity() > 128);
        for k in &ks {
            assert_eq!(*m.get(k), **k);
        }
        assert_eq!(calls.get(), 128);
        assert_eq!(m.len(), 128);
    }

    #[test]
    fn iter_yields_live_keys_only() {
        let mut m = Memoizer::new(|k: &Rc<u8>| u32::from(**k));
        let keep = Rc::new(1);
        let gone = Rc::new(2);
        m.get(&keep);
        m.get(&gone);
        drop(gone);
        let live: Vec<(Rc<u8>, u32)> = m.iter().map(|(k, v)| (k, *v)).collect();
        assert_eq!(live.len(), 1);
        assert!(Rc::ptr_eq(&live[0].0, &keep));
        assert_eq!(live[0].1, 1);
    }

    #[test]
    fn arc_keys_are_supported() {
        let mut m = Memoizer::new(|k: &Arc<str>| k.len());
        let k: Arc<str> = Arc::from("four");
        assert_eq!(*m.get(&k), 4);
        drop(k);
        assert_eq!(m.reap(), 1);
        assert!(m.is_empty());
    }

    /// Invariant: the builder refuses a missing function and any option.
    #[test]
    fn builder_rejects_invalid_construction() {
        let missing = MemoizerBuilder::<fn(&Rc<i32>) -> i32>::new().build::<Rc<i32>, i32>();
        assert!(matches!(missing, Err(Error::InvalidArgument(_))));

        let with_option = MemoizerBuilder::new()
            .compute(|k: &Rc<i32>| **k)
            .option("maxsize")
            .build::<Rc<i32>, i32>();
        match with_option {
            Err(Error::InvalidArgument(msg)) => assert!(msg.contains("maxsize")),
            _ => panic!("expected InvalidArgument"),
        }

        let mut ok = MemoizerBuilder::new()
            .compute(|k: &Rc<i32>| **k + 1)
            .build::<Rc<i32>, i32>()
            .expect("valid construction");
        assert_eq!(*ok.get(&Rc::new(1)), 2);
    }

    #[test]
    fn debug_reports_counts() {
        let mut m = Memoizer::new(|k: &Rc<i32>| **k);
        let k = Rc::new(1);
        m.get(&k);
        let s = format!("{:?}", m);
        assert!(s.starts_with("Memoizer { len: 1, live: 1, capacity: 128"));
    }
}
