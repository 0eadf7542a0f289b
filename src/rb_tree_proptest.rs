#![cfg(test)]

// Property tests for RbTree: red-black shape after every insertion and
// agreement with std's BTreeMap.

use crate::rb_tree::RbTree;
use proptest::prelude::*;
use std::collections::BTreeMap;

#[derive(Clone, Debug)]
enum Op {
    Insert(i16, u8),
    InsertNew(i16, u8),
    At(i16),
    Get(i16),
}

fn arb_op() -> impl Strategy<Value = Op> {
    let key = -200i16..200;
    prop_oneof![
        4 => (key.clone(), any::<u8>()).prop_map(|(k, v)| Op::Insert(k, v)),
        1 => (key.clone(), any::<u8>()).prop_map(|(k, v)| Op::InsertNew(k, v)),
        2 => key.clone().prop_map(Op::At),
        2 => key.prop_map(Op::Get),
    ]
}

// Property: after every operation the tree is a valid red-black tree
// (black root, no red-red edge, equal black height, strict order, intact
// parent links, correct cached max) and agrees with BTreeMap on contents,
// order, first and last.
proptest! {
    #![proptest_config(ProptestConfig { cases: 128, .. ProptestConfig::default() })]
    #[test]
    fn prop_red_black_invariants(ops in proptest::collection::vec(arb_op(), 1..200)) {
        let mut sut: RbTree<i16, u8> = RbTree::new();
        let mut model: BTreeMap<i16, u8> = BTreeMap::new();
        for op in ops {
            match op {
                Op::Insert(k, v) => prop_assert_eq!(sut.insert(k, v), model.insert(k, v)),
                Op::InsertNew(k, v) => {
                    let fresh = !model.contains_key(&k);
                    prop_assert_eq!(sut.insert_new(k, v), fresh);
                    model.entry(k).or_insert(v);
                }
                Op::At(k) => {
                    let v = sut.get_or_insert_with(k, Default::default);
                    *v = v.wrapping_add(1);
                    let m = model.entry(k).or_default();
                    *m = m.wrapping_add(1);
                }
                Op::Get(k) => prop_assert_eq!(sut.get_key_value(&k), model.get_key_value(&k)),
            }
            let black_height = sut.assert_invariants();
            // A red-black tree with n nodes has black height at most
            // log2(n + 1) + 1 (nil leaves counted).
            let bound = usize::BITS - (sut.len() + 1).leading_zeros();
            prop_assert!(black_height <= bound as usize + 1);
            prop_assert_eq!(sut.len(), model.len());
        }
        prop_assert!(sut.iter().eq(model.iter()));
        prop_assert_eq!(sut.first_key_value(), model.first_key_value());
        prop_assert_eq!(sut.last_key_value(), model.last_key_value());

        let copy = sut.clone();
        copy.assert_invariants();
        prop_assert!(copy.iter().eq(sut.iter()));
    }

    // Monotone input is the worst case for an unbalanced tree; here the
    // black height stays logarithmic.
    #[test]
    fn prop_sorted_input_stays_balanced(n in 1usize..600, descending in any::<bool>()) {
        let mut sut: RbTree<usize, ()> = RbTree::new();
        for i in 0..n {
            let k = if descending { n - i } else { i };
            sut.insert(k, ());
        }
        let black_height = sut.assert_invariants();
        let bound = usize::BITS - (n + 1).leading_zeros();
        prop_assert!(black_height <= bound as usize + 1);
        prop_assert_eq!(sut.iter().len(), n);
    }
}
