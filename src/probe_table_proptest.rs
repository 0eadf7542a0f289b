#![cfg(test)]

// Property tests for ProbeTable kept inside the crate so they can reach
// the bucket array, tombstone count and consistency checker.

use crate::probe_table::{ProbeTable, DEFAULT_CAPACITY, GROWTH_FACTOR, MAX_LOAD_FACTOR};
use crate::test_support::IdentityBuildHasher;
use hashbrown::hash_map::DefaultHashBuilder;
use proptest::prelude::*;

#[derive(Clone, Debug)]
enum Op {
    Insert(u16, i32),
    InsertNew(u16, i32),
    At(u16),
    Remove(u16),
    Get(u16),
    Clear,
}

// Small key space so removes hit and tombstones pile up.
fn arb_op() -> impl Strategy<Value = Op> {
    let key = 0u16..48;
    prop_oneof![
        4 => (key.clone(), any::<i32>()).prop_map(|(k, v)| Op::Insert(k, v)),
        1 => (key.clone(), any::<i32>()).prop_map(|(k, v)| Op::InsertNew(k, v)),
        1 => key.clone().prop_map(Op::At),
        3 => key.clone().prop_map(Op::Remove),
        2 => key.prop_map(Op::Get),
        1 => Just(Op::Clear),
    ]
}

/// Insertion-ordered association list: the reference the table is
/// compared against.
#[derive(Default)]
struct Model(Vec<(u16, i32)>);

impl Model {
    fn position(&self, k: u16) -> Option<usize> {
        self.0.iter().position(|(mk, _)| *mk == k)
    }

    fn insert(&mut self, k: u16, v: i32) -> Option<i32> {
        match self.position(k) {
            Some(i) => Some(core::mem::replace(&mut self.0[i].1, v)),
            None => {
                self.0.push((k, v));
                None
            }
        }
    }

    fn remove(&mut self, k: u16) -> Option<i32> {
        self.position(k).map(|i| self.0.remove(i).1)
    }

    fn get(&self, k: u16) -> Option<i32> {
        self.position(k).map(|i| self.0[i].1)
    }
}

fn is_grown_from_default(capacity: usize) -> bool {
    let mut c = DEFAULT_CAPACITY;
    while c < capacity {
        c *= GROWTH_FACTOR;
    }
    c == capacity
}

fn run<S: core::hash::BuildHasher>(mut sut: ProbeTable<u16, i32, S>, ops: Vec<Op>) {
    let mut model = Model::default();
    let mut prev_capacity = sut.capacity();
    for op in ops {
        match op {
            Op::Insert(k, v) => assert_eq!(sut.insert(k, v), model.insert(k, v)),
            Op::InsertNew(k, v) => {
                let fresh = model.get(k).is_none();
                assert_eq!(sut.insert_new(k, v), fresh);
                if fresh {
                    model.insert(k, v);
                }
            }
            Op::At(k) => {
                let got = *sut.get_or_insert_with(k, || 0);
                if model.get(k).is_none() {
                    model.insert(k, 0);
                }
                assert_eq!(Some(got), model.get(k));
            }
            Op::Remove(k) => assert_eq!(sut.remove(&k).map(|(_, v)| v), model.remove(k)),
            Op::Get(k) => assert_eq!(sut.get_key_value(&k).map(|(_, v)| *v), model.get(k)),
            Op::Clear => {
                sut.clear();
                model.0.clear();
            }
        }

        sut.assert_consistent();
        assert_eq!(sut.len(), model.0.len());
        assert!((sut.len() as f64 / sut.capacity() as f64) < MAX_LOAD_FACTOR);
        assert!(sut.capacity() >= prev_capacity, "capacity shrank");
        assert!(is_grown_from_default(sut.capacity()));
        prev_capacity = sut.capacity();

        let seen: Vec<(u16, i32)> = sut.iter().map(|(k, v)| (*k, *v)).collect();
        assert_eq!(seen, model.0, "iteration order diverged from insertion order");
    }
}

// Property: state-machine equivalence against an insertion-ordered model.
// Invariants exercised across random operation sequences:
// - Buckets, arena and shadow sequence agree (`assert_consistent`).
// - Load factor stays strictly below 0.7 after every operation.
// - Capacity is 8 * 2^n and never shrinks, `clear` included.
// - Iteration order is first-insertion order; overwrite keeps position,
//   remove then insert moves to the end.
proptest! {
    #![proptest_config(ProptestConfig { cases: 128, .. ProptestConfig::default() })]
    #[test]
    fn prop_matches_ordered_model(ops in proptest::collection::vec(arb_op(), 1..120)) {
        run(ProbeTable::with_hasher(DefaultHashBuilder::default()), ops);
    }

    // Identity hashing over a small key space produces long runs of
    // neighbouring homes and heavy tombstone traffic.
    #[test]
    fn prop_matches_model_with_clustered_homes(ops in proptest::collection::vec(arb_op(), 1..120)) {
        run(ProbeTable::with_hasher(IdentityBuildHasher), ops);
    }
}
