use hashbrown::HashMap;
use identity_cache::{Error, Identified, Identity, IdentityMap};
use proptest::prelude::*;
use std::rc::Rc;

// Model IdentityMap against a hashbrown map keyed by identity, and check that
// the map's strong references to the pool keys match its contents.
proptest! {
    #[test]
    fn prop_identity_map_matches_model(
        keys in 1usize..=24,
        ops in proptest::collection::vec((0u8..=6u8, 0usize..100usize, any::<i16>()), 1..150),
    ) {
        let pool: Vec<Rc<u16>> = (0..keys as u16).map(Rc::new).collect();
        let mut m: IdentityMap<Rc<u16>, i16> = IdentityMap::new();
        let mut model: HashMap<Identity, i16> = HashMap::new();

        for (op, raw_k, v) in ops {
            let k = &pool[raw_k % keys];
            let id = k.identity();
            match op {
                // set
                0 | 1 => {
                    prop_assert_eq!(m.set(Rc::clone(k), v), model.insert(id, v));
                }
                // get
                2 => {
                    let expected = model.get(&id).ok_or(Error::KeyNotFound);
                    prop_assert_eq!(m.get(k), expected);
                }
                // delete
                3 => {
                    let expected = model.remove(&id).map(drop).ok_or(Error::KeyNotFound);
                    prop_assert_eq!(m.delete(k), expected);
                }
                // pop_or
                4 => {
                    prop_assert_eq!(m.pop_or(k, v), model.remove(&id).unwrap_or(v));
                }
                // pop_item
                5 => {
                    if let Some((popped, value)) = m.pop_item() {
                        prop_assert_eq!(model.remove(&popped.identity()), Some(value));
                    } else {
                        prop_assert!(model.is_empty());
                    }
                }
                // clear, occasionally
                6 => {
                    if v % 8 == 0 {
                        m.clear();
                        model.clear();
                    }
                }
                _ => unreachable!(),
            }

            prop_assert_eq!(m.len(), model.len());
            for key in &pool {
                let held = usize::from(m.contains(key));
                prop_assert_eq!(Rc::strong_count(key), 1 + held);
            }
        }

        let mut seen: Vec<(Identity, i16)> = m.iter().map(|(k, v)| (k.identity(), *v)).collect();
        let mut expected: Vec<(Identity, i16)> = model.into_iter().collect();
        seen.sort();
        expected.sort();
        prop_assert_eq!(seen, expected);
    }
}
