// TreeMap integration tests: ordering, insert-on-miss, cached maximum and
// deep copies.
use keyed_collections::{Error, TreeMap};

const KEYS: [i32; 11] = [200, 150, 250, 120, 160, 230, 280, 270, 90, 110, 100];
const VALUES: [i32; 11] = [7, 5, 9, 4, 6, 8, 11, 10, 1, 3, 2];

fn sample() -> TreeMap<i32, i32> {
    let mut m = TreeMap::new();
    for (k, v) in KEYS.iter().zip(VALUES) {
        m.insert(*k, v);
    }
    m
}

// Test: eleven keys inserted out of order.
// Verifies: ascending iteration with matching values, size, and indexed
// access to an existing key.
#[test]
fn iterates_in_ascending_order() {
    let mut m = sample();
    let got: Vec<(i32, i32)> = m.iter().map(|(k, v)| (*k, *v)).collect();
    assert_eq!(
        got,
        vec![
            (90, 1),
            (100, 2),
            (110, 3),
            (120, 4),
            (150, 5),
            (160, 6),
            (200, 7),
            (230, 8),
            (250, 9),
            (270, 10),
            (280, 11),
        ]
    );
    assert_eq!(m.len(), 11);
    assert_eq!(*m.at(150), 5);
    assert_eq!(m.get(&150), Some(&5));
    assert_eq!(m.len(), 11);
}

#[test]
fn at_on_miss_inserts_default() {
    let mut m = sample();
    assert_eq!(*m.at(125), 0);
    *m.at(125) = 42;
    assert_eq!(m.len(), 12);
    let keys: Vec<i32> = m.keys().copied().collect();
    assert!(keys.windows(2).all(|w| w[0] < w[1]));
    assert_eq!(m.get(&125), Some(&42));
}

#[test]
fn overwrite_returns_previous_value() {
    let mut m = sample();
    assert_eq!(m.insert(200, 70), Some(7));
    assert_eq!(m.len(), 11);
    assert_eq!(m.lookup(&200), Ok(&70));
    assert_eq!(m.lookup(&201), Err(Error::NotFound));
}

#[test]
fn last_key_value_tracks_maximum() {
    let mut m = sample();
    assert_eq!(m.last_key_value(), Some((&280, &11)));
    m.insert(275, 0);
    assert_eq!(m.last_key_value(), Some((&280, &11)));
    m.insert(300, 12);
    assert_eq!(m.last_key_value(), Some((&300, &12)));
    assert_eq!(m.first_key_value(), Some((&90, &1)));
}

#[test]
fn clone_is_independent() {
    let a = sample();
    let mut b = a.clone();
    assert_eq!(a, b);
    b.insert(1, 1);
    *b.get_mut(&90).unwrap() = -1;
    assert_eq!(a.len(), 11);
    assert_eq!(a.get(&90), Some(&1));
    assert!(!a.contains_key(&1));
    assert_eq!(b.first_key_value(), Some((&1, &1)));
    assert_eq!(b.last_key_value(), Some((&280, &11)));
}

#[test]
fn clear_then_reuse() {
    let mut m = sample();
    m.clear();
    assert!(m.is_empty());
    assert_eq!(m.iter().next(), None);
    assert_eq!(m.last_key_value(), None);
    m.insert(5, 5);
    assert_eq!(m.len(), 1);
    assert_eq!(m.last_key_value(), Some((&5, &5)));
}

#[test]
fn string_keys_with_borrowed_lookup() {
    let mut m: TreeMap<String, usize> = TreeMap::new();
    for w in "the quick brown fox jumps over the lazy dog".split(' ') {
        *m.at(w.to_string()) += 1;
    }
    assert_eq!(m.get("the"), Some(&2));
    assert_eq!(m.first_key_value().map(|(k, _)| k.as_str()), Some("brown"));
    assert_eq!(m.last_key_value().map(|(k, _)| k.as_str()), Some("the"));
    assert_eq!(m.len(), 8);
}
