use keyed_collections::{HashMap, HashSet, TreeMap, TreeSet};
use proptest::prelude::*;
use std::collections::{BTreeMap, BTreeSet};

// Public-API model checks: the hash containers against an insertion-ordered
// Vec model, the tree containers against std's BTree collections.
proptest! {
    #[test]
    fn prop_hash_map_matches_ordered_model(ops in proptest::collection::vec((0u8..=3u8, 0u32..40u32, any::<i64>()), 1..150)) {
        let mut m: HashMap<u32, i64> = HashMap::new();
        let mut model: Vec<(u32, i64)> = Vec::new();

        for (op, k, v) in ops {
            let pos = model.iter().position(|(mk, _)| *mk == k);
            match op {
                // insert / overwrite
                0 | 1 => {
                    let prev = m.insert(k, v);
                    match pos {
                        Some(i) => prop_assert_eq!(prev, Some(std::mem::replace(&mut model[i].1, v))),
                        None => {
                            prop_assert_eq!(prev, None);
                            model.push((k, v));
                        }
                    }
                }
                // erase
                2 => {
                    let got = m.remove(&k);
                    prop_assert_eq!(got, pos.map(|i| model.remove(i).1));
                }
                // index access
                3 => {
                    let got = *m.at(k);
                    match pos {
                        Some(i) => prop_assert_eq!(got, model[i].1),
                        None => {
                            prop_assert_eq!(got, 0);
                            model.push((k, 0));
                        }
                    }
                }
                _ => unreachable!(),
            }
            prop_assert_eq!(m.len(), model.len());
            prop_assert!((m.len() as f64) / (m.capacity() as f64) < 0.7);
        }
        let got: Vec<(u32, i64)> = m.iter().map(|(k, v)| (*k, *v)).collect();
        prop_assert_eq!(got, model);
    }

    #[test]
    fn prop_hash_set_keeps_first_insertion_order(xs in proptest::collection::vec(0u16..64, 0..200)) {
        let s: HashSet<u16> = xs.iter().copied().collect();
        let mut expected: Vec<u16> = Vec::new();
        for x in &xs {
            if !expected.contains(x) {
                expected.push(*x);
            }
        }
        prop_assert_eq!(s.iter().copied().collect::<Vec<_>>(), expected);
    }

    #[test]
    fn prop_tree_map_matches_btreemap(entries in proptest::collection::vec((any::<i32>(), any::<u16>()), 0..300)) {
        let mut m: TreeMap<i32, u16> = TreeMap::new();
        let mut model: BTreeMap<i32, u16> = BTreeMap::new();
        for (k, v) in entries {
            prop_assert_eq!(m.insert(k, v), model.insert(k, v));
        }
        prop_assert_eq!(m.len(), model.len());
        prop_assert!(m.iter().eq(model.iter()));
        prop_assert_eq!(m.last_key_value(), model.last_key_value());
        prop_assert_eq!(m.iter().len(), model.len());
    }

    #[test]
    fn prop_tree_set_matches_btreeset(xs in proptest::collection::vec(-50i8..50, 0..200)) {
        let s: TreeSet<i8> = xs.iter().copied().collect();
        let model: BTreeSet<i8> = xs.iter().copied().collect();
        prop_assert!(s.iter().eq(model.iter()));
        prop_assert_eq!(s.first(), model.first());
        prop_assert_eq!(s.last(), model.last());
    }
}
