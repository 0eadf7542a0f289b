// HashSet integration tests: membership, insertion order across erasures,
// and the duplicate-insert policy.
use keyed_collections::{HashSet, DEFAULT_CAPACITY};

// Test: alternating insert/erase leaves tombstones behind.
// Verifies: survivors iterate in insertion order.
#[test]
fn insert_erase_sequence() {
    let mut s: HashSet<i32> = HashSet::new();
    s.insert(1);
    s.remove(&1);
    s.insert(2);
    s.remove(&2);
    for x in [3, 4, 5] {
        s.insert(x);
    }
    assert_eq!(s.iter().copied().collect::<Vec<_>>(), vec![3, 4, 5]);
    assert_eq!(s.len(), 3);
    assert!(!s.contains(&1));
    assert!(!s.contains(&2));
}

#[test]
fn duplicates_keep_first_position() {
    let mut s: HashSet<&str> = HashSet::new();
    assert!(s.insert("b"));
    assert!(s.insert("a"));
    assert!(!s.insert("b"));
    assert_eq!(s.iter().copied().collect::<Vec<_>>(), vec!["b", "a"]);
}

#[test]
fn grows_past_default_capacity() {
    let s: HashSet<u64> = (0..100).collect();
    assert_eq!(s.len(), 100);
    assert!(s.capacity() > DEFAULT_CAPACITY);
    assert!((0..100).all(|x| s.contains(&x)));
    assert!(!s.contains(&100));
}

#[test]
fn clone_is_independent() {
    let a: HashSet<String> = ["x", "y"].iter().map(|s| s.to_string()).collect();
    let mut b = a.clone();
    b.remove("x");
    b.insert("z".to_string());
    assert!(a.contains("x"));
    assert!(!a.contains("z"));
    assert_eq!(b.iter().map(String::as_str).collect::<Vec<_>>(), vec!["y", "z"]);
}

#[test]
fn remove_absent_is_noop() {
    let mut s = HashSet::from([1u8, 2]);
    assert!(!s.remove(&9));
    assert_eq!(s.len(), 2);
}
