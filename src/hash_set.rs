//! HashSet: the probe table with unit values.

use crate::error::Result;
use crate::probe_table::{self, BucketState, ProbeTable};
use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use hashbrown::hash_map::DefaultHashBuilder;

/// Set of `T` with linear probing, tombstone deletion and insertion-ordered
/// iteration.
#[derive(Clone)]
pub struct HashSet<T, S = DefaultHashBuilder> {
    table: ProbeTable<T, (), S>,
}

impl<T> HashSet<T> {
    pub fn new() -> Self {
        Self::with_hasher(DefaultHashBuilder::default())
    }

    pub fn with_capacity(capacity: usize) -> Result<Self> {
        Self::with_capacity_and_hasher(capacity, DefaultHashBuilder::default())
    }
}

impl<T, S: Default> Default for HashSet<T, S> {
    fn default() -> Self {
        Self {
            table: ProbeTable::default(),
        }
    }
}

impl<T, S> HashSet<T, S> {
    pub fn with_hasher(hasher: S) -> Self {
        Self {
            table: ProbeTable::with_hasher(hasher),
        }
    }

    pub fn with_capacity_and_hasher(capacity: usize, hasher: S) -> Result<Self> {
        Ok(Self {
            table: ProbeTable::with_capacity_and_hasher(capacity, hasher)?,
        })
    }

    pub fn hasher(&self) -> &S {
        self.table.hasher()
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

    /// Buckets currently marked as tombstones; reset to zero by a rehash.
    pub fn tombstones(&self) -> usize {
        self.table.tombstones()
    }

    pub fn bucket_state(&self, index: usize) -> Result<BucketState> {
        self.table.bucket_state(index)
    }

    pub fn bucket_states(&self) -> impl Iterator<Item = BucketState> + '_ {
        self.table.bucket_states()
    }

    pub fn clear(&mut self) {
        self.table.clear()
    }

    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            inner: self.table.iter(),
        }
    }
}

impl<T, S> HashSet<T, S>
where
    T: Eq + Hash,
    S: BuildHasher,
{
    /// Returns false when `value` was already present (the set is unchanged).
    pub fn insert(&mut self, value: T) -> bool {
        self.table.insert_new(value, ())
    }

    pub fn remove<Q>(&mut self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.table.remove(value).is_some()
    }

    /// Remove and return the stored element equal to `value`.
    pub fn take<Q>(&mut self, value: &Q) -> Option<T>
    where
        T: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.table.remove(value).map(|(t, ())| t)
    }

    pub fn contains<Q>(&self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.table.contains_key(value)
    }

    pub fn get<Q>(&self, value: &Q) -> Option<&T>
    where
        T: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.table.get_key_value(value).map(|(t, _)| t)
    }

    pub fn bucket_index<Q>(&self, value: &Q) -> Option<usize>
    where
        T: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.table.bucket_index(value)
    }
}

/// Elements in insertion order.
pub struct Iter<'a, T> {
    inner: probe_table::Iter<'a, T, ()>,
}

impl<'a, T> Clone for Iter<'a, T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    #[inline]
    fn next(&mut self) -> Option<&'a T> {
        self.inner.next().map(|(t, _)| t)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<'a, T> ExactSizeIterator for Iter<'a, T> {}

pub struct IntoIter<T> {
    inner: probe_table::IntoIter<T, ()>,
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.inner.next().map(|(t, ())| t)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}

impl<T, S> IntoIterator for HashSet<T, S> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> IntoIter<T> {
        IntoIter {
            inner: self.table.into_entries(),
        }
    }
}

impl<'a, T, S> IntoIterator for &'a HashSet<T, S> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

impl<T: fmt::Debug, S> fmt::Debug for HashSet<T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T, S> PartialEq for HashSet<T, S>
where
    T: Eq + Hash,
    S: BuildHasher,
{
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|t| other.contains(t))
    }
}

impl<T, S> Eq for HashSet<T, S>
where
    T: Eq + Hash,
    S: BuildHasher,
{
}

impl<T, S> Extend<T> for HashSet<T, S>
where
    T: Eq + Hash,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for t in iter {
            self.insert(t);
        }
    }
}

impl<T, S> FromIterator<T> for HashSet<T, S>
where
    T: Eq + Hash,
    S: BuildHasher + Default,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut set = Self {
            table: ProbeTable::sized_for(iter.size_hint().0, S::default()),
        };
        set.extend(iter);
        set
    }
}

impl<T, const N: usize> From<[T; N]> for HashSet<T>
where
    T: Eq + Hash,
{
    fn from(arr: [T; N]) -> Self {
        arr.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::test_support::IdentityBuildHasher;

    #[test]
    fn duplicate_insert_reports_false() {
        let mut s: HashSet<String> = HashSet::new();
        assert!(s.insert("a".to_string()));
        assert!(!s.insert("a".to_string()));
        assert_eq!(s.len(), 1);
    }

    #[test]
    fn zero_capacity_is_invalid_argument() {
        assert!(matches!(
            HashSet::<u8>::with_capacity(0),
            Err(Error::InvalidArgument(_))
        ));
    }

    /// Erase-then-insert of colliding keys: each new key is found through
    /// (or in place of) the tombstones left behind.
    #[test]
    fn colliding_keys_after_erase_are_found() {
        let mut s: HashSet<u64, IdentityBuildHasher> = HashSet::with_hasher(IdentityBuildHasher);
        s.insert(1);
        s.insert(9); // home 1 -> bucket 2
        assert!(s.remove(&1));
        assert!(s.contains(&9));
        assert!(s.insert(17)); // home 1, reuses tombstone
        assert_eq!(s.bucket_index(&17), Some(1));
        assert!(s.contains(&9));
        assert_eq!(s.iter().copied().collect::<Vec<_>>(), vec![9, 17]);
    }

    #[test]
    fn take_and_get_return_stored_element() {
        let mut s: HashSet<String> = HashSet::from(["x".to_string(), "y".to_string()]);
        assert_eq!(s.get("x").map(String::as_str), Some("x"));
        assert_eq!(s.take("x"), Some("x".to_string()));
        assert_eq!(s.take("x"), None);
        assert_eq!(s.len(), 1);
    }

    #[test]
    fn equality_and_debug() {
        let a: HashSet<i32> = HashSet::from([3, 1, 2]);
        let b: HashSet<i32> = [1, 2, 3].into_iter().collect();
        assert_eq!(a, b);
        assert_eq!(format!("{:?}", a), "{3, 1, 2}");
        assert_eq!(a.into_iter().collect::<Vec<_>>(), vec![3, 1, 2]);
    }
}
