#![cfg(test)]

// Property tests for RawTable kept inside the crate so they can check the
// slot counters directly.

use crate::identity::{Identified, Identity};
use crate::raw_table::{usable, RawTable};
use core::hash::{BuildHasher, Hasher};
use hashbrown::HashMap;
use proptest::prelude::*;
use std::collections::hash_map::RandomState;
use std::rc::Rc;

// Every identity hashes to the same value: all keys share one probe path.
#[derive(Clone, Default)]
struct Collide;

struct CollideHasher;

impl Hasher for CollideHasher {
    fn finish(&self) -> u64 {
        0
    }
    fn write(&mut self, _bytes: &[u8]) {}
}

impl BuildHasher for Collide {
    type Hasher = CollideHasher;
    fn build_hasher(&self) -> CollideHasher {
        CollideHasher
    }
}

// Operations index into a fixed pool of keys so shrinking moves toward
// earlier keys and shorter runs.
#[derive(Clone, Debug)]
enum Op {
    Insert(usize, i32),
    EntryInsert(usize, i32),
    Remove(usize),
    Get(usize),
    Retain(i32),
    RemoveFirst,
    Reserve(usize),
    Clear,
    Iterate,
}

fn arb_ops(pool: usize) -> impl Strategy<Value = Vec<Op>> {
    let idx = 0..pool;
    let op = prop_oneof![
        4 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| Op::Insert(i, v)),
        2 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| Op::EntryInsert(i, v)),
        3 => idx.clone().prop_map(Op::Remove),
        2 => idx.prop_map(Op::Get),
        1 => any::<i32>().prop_map(Op::Retain),
        1 => Just(Op::RemoveFirst),
        1 => (0usize..40).prop_map(Op::Reserve),
        1 => Just(Op::Clear),
        1 => Just(Op::Iterate),
    ];
    proptest::collection::vec(op, 1..120)
}

fn run<S: BuildHasher>(
    mut sut: RawTable<Rc<u32>, i32, S>,
    pool: &[Rc<u32>],
    ops: Vec<Op>,
) -> Result<(), TestCaseError> {
    let mut model: HashMap<Identity, i32> = HashMap::new();
    for op in ops {
        match op {
            Op::Insert(i, v) => {
                let k = &pool[i];
                let old = sut.insert(Rc::clone(k), v).map(|(_, v)| v);
                prop_assert_eq!(old, model.insert(k.identity(), v));
            }
            Op::EntryInsert(i, v) => {
                let k = &pool[i];
                match sut.entry(k.identity()) {
                    crate::raw_table::Entry::Occupied(mut o) => {
                        prop_assert!(model.contains_key(&k.identity()));
                        *o.get_mut() = v;
                    }
                    crate::raw_table::Entry::Vacant(e) => {
                        prop_assert!(!model.contains_key(&k.identity()));
                        e.insert(Rc::clone(k), v);
                    }
                }
                model.insert(k.identity(), v);
            }
            Op::Remove(i) => {
                let id = pool[i].identity();
                let got = sut.remove(id).map(|(k, v)| (k.identity(), v));
                prop_assert_eq!(got, model.remove(&id).map(|v| (id, v)));
            }
            Op::Get(i) => {
                let id = pool[i].identity();
                prop_assert_eq!(sut.get(id).map(|(_, v)| *v), model.get(&id).copied());
                prop_assert_eq!(sut.contains(id), model.contains_key(&id));
            }
            Op::Retain(threshold) => {
                let removed = sut.retain(|_, v| *v < threshold);
                let before = model.len();
                model.retain(|_, v| *v < threshold);
                prop_assert_eq!(removed, before - model.len());
            }
            Op::RemoveFirst => match sut.remove_first() {
                Some((k, v)) => prop_assert_eq!(model.remove(&k.identity()), Some(v)),
                None => prop_assert!(model.is_empty()),
            },
            Op::Reserve(n) => {
                let generation = sut.generation();
                sut.reserve(n);
                prop_assert!(sut.len() + n <= usable(sut.capacity()));
                if sut.generation() == generation {
                    prop_assert!(sut.len() + sut.tombstones() + n <= usable(sut.capacity()));
                }
            }
            Op::Clear => {
                sut.clear();
                model.clear();
                prop_assert_eq!(sut.tombstones(), 0);
            }
            Op::Iterate => {
                let mut seen: Vec<(Identity, i32)> =
                    sut.iter().map(|(k, v)| (k.identity(), *v)).collect();
                let mut expected: Vec<(Identity, i32)> =
                    model.iter().map(|(k, v)| (*k, *v)).collect();
                seen.sort();
                expected.sort();
                prop_assert_eq!(seen, expected);
            }
        }
        sut.assert_invariants();
        prop_assert_eq!(sut.len(), model.len());
        prop_assert_eq!(sut.is_empty(), model.is_empty());
    }

    // Only the pool and the table hold keys; dropping the table leaves the
    // pool as sole owner.
    drop(sut);
    for k in pool {
        prop_assert_eq!(Rc::strong_count(k), 1);
    }
    Ok(())
}

fn key_pool(n: usize) -> Vec<Rc<u32>> {
    (0..n as u32).map(Rc::new).collect()
}

// Property: state-machine equivalence against a hashbrown model keyed by
// identity. After every operation the live and tombstone counters match a
// slot scan, the load budget holds and `len` agrees with the model.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]

    #[test]
    fn prop_state_machine_random_hasher(ops in arb_ops(24)) {
        let pool = key_pool(24);
        let sut = RawTable::with_hasher(RandomState::new());
        run(sut, &pool, ops)?;
    }

    // Same machine with every key on one probe chain, so tombstone skipping
    // and reuse are exercised on every lookup.
    #[test]
    fn prop_state_machine_colliding_hasher(ops in arb_ops(12)) {
        let pool = key_pool(12);
        let sut = RawTable::with_hasher(Collide);
        run(sut, &pool, ops)?;
    }
}

// Property: a detached cursor visits every entry that is live for the whole
// walk exactly once, even while other entries are removed between steps.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]

    #[test]
    fn prop_cursor_walk_with_removals(
        n in 1usize..40,
        victims in proptest::collection::vec(any::<bool>(), 40),
    ) {
        let pool = key_pool(n);
        let mut sut: RawTable<Rc<u32>, usize> = RawTable::with_capacity(2 * n);
        for (i, k) in pool.iter().enumerate() {
            sut.insert(Rc::clone(k), i);
        }
        let generation = sut.generation();
        let mut cursor = sut.cursor();
        let mut visited = Vec::new();
        loop {
            let step = cursor
                .advance(&sut)
                .map_err(|e| TestCaseError::fail(e.to_string()))?;
            let Some((slot, _, v)) = step else { break };
            let v = *v;
            visited.push(v);
            if victims[v] {
                prop_assert!(sut.remove_at(slot).is_ok());
            }
        }
        prop_assert_eq!(sut.generation(), generation);
        visited.sort_unstable();
        prop_assert_eq!(visited, (0..n).collect::<Vec<_>>());
        prop_assert_eq!(sut.len(), (0..n).filter(|i| !victims[*i]).count());
    }
}
