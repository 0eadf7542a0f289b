// TreeSet integration tests: dedup on insert and ascending iteration.
use keyed_collections::TreeSet;

#[test]
fn dedups_and_sorts() {
    let mut s: TreeSet<i32> = TreeSet::new();
    for x in [1, 2, 3, 4, 5, 6, 6, 3, 1, 1] {
        s.insert(x);
    }
    assert_eq!(s.len(), 6);
    assert!(s.insert(11));
    assert_eq!(s.iter().copied().collect::<Vec<_>>(), vec![1, 2, 3, 4, 5, 6, 11]);
    assert_eq!(s.last(), Some(&11));
}

#[test]
fn descending_input_iterates_ascending() {
    let s: TreeSet<u32> = (0..1000).rev().collect();
    assert_eq!(s.len(), 1000);
    assert!(s.iter().copied().eq(0..1000));
    assert_eq!(s.first(), Some(&0));
    assert_eq!(s.last(), Some(&999));
}

#[test]
fn clone_and_equality() {
    let a = TreeSet::from(["pear", "apple", "fig"]);
    let mut b = a.clone();
    assert_eq!(a, b);
    b.insert("kiwi");
    assert_ne!(a, b);
    assert!(!a.contains("kiwi"));
    assert_eq!(a.into_iter().collect::<Vec<_>>(), vec!["apple", "fig", "pear"]);
}
