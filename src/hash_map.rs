//! HashMap: open-addressing map that iterates in insertion order.

use crate::error::{Error, Result};
use crate::probe_table::ProbeTable;
use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use hashbrown::hash_map::DefaultHashBuilder;

pub use crate::probe_table::{BucketState, IntoIter, Iter};

/// Map from `K` to `V` with linear probing and tombstone deletion.
///
/// Iteration yields entries in the order their keys were first inserted;
/// overwriting a value keeps the position, removing and re-inserting a key
/// moves it to the end. Order is unaffected by rehashing.
///
/// Indexed access through [`HashMap::at`] inserts `V::default()` for a
/// missing key. Use [`HashMap::get`] or [`HashMap::lookup`] for lookups
/// that must not mutate.
#[derive(Clone)]
pub struct HashMap<K, V, S = DefaultHashBuilder> {
    table: ProbeTable<K, V, S>,
}

impl<K, V> HashMap<K, V> {
    pub fn new() -> Self {
        Self::with_hasher(DefaultHashBuilder::default())
    }

    /// Map with exactly `capacity` buckets. Fails on zero.
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        Self::with_capacity_and_hasher(capacity, DefaultHashBuilder::default())
    }
}

impl<K, V, S: Default> Default for HashMap<K, V, S> {
    fn default() -> Self {
        Self {
            table: ProbeTable::default(),
        }
    }
}

impl<K, V, S> HashMap<K, V, S> {
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

    /// Number of buckets (`bucket_count`).
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

    /// Remove every entry; capacity is unchanged.
    pub fn clear(&mut self) {
        self.table.clear()
    }

    pub fn iter(&self) -> Iter<'_, K, V> {
        self.table.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.table.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl Iterator<Item = &V> + '_ {
        self.table.iter().map(|(_, v)| v)
    }
}

impl<K, V, S> HashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    /// Insert or overwrite; returns the value previously stored for `key`.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        self.table.insert(key, value)
    }

    /// Erase `key`, leaving a tombstone. No-op when absent.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.table.remove(key).map(|(_, v)| v)
    }

    pub fn remove_entry<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.table.remove(key)
    }

    /// Index access with insert-on-miss: an absent key is inserted with
    /// `V::default()` (possibly triggering a rehash) and its value returned.
    pub fn at(&mut self, key: K) -> &mut V
    where
        V: Default,
    {
        self.table.get_or_insert_with(key, V::default)
    }

    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.table.get_key_value(key).map(|(_, v)| v)
    }

    pub fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.table.get_key_value(key)
    }

    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.table.get_mut(key)
    }

    /// Strict lookup: `Error::NotFound` when `key` is absent.
    pub fn lookup<Q>(&self, key: &Q) -> Result<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.get(key).ok_or(Error::NotFound)
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.table.contains_key(key)
    }

    /// Bucket currently holding `key`, or `None` when absent.
    pub fn bucket_index<Q>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.table.bucket_index(key)
    }
}

impl<K, V, S> fmt::Debug for HashMap<K, V, S>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// Equal when both hold the same key/value pairs, regardless of order.
impl<K, V, S> PartialEq for HashMap<K, V, S>
where
    K: Eq + Hash,
    V: PartialEq,
    S: BuildHasher,
{
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|(k, v)| other.get(k) == Some(v))
    }
}

impl<K, V, S> Eq for HashMap<K, V, S>
where
    K: Eq + Hash,
    V: Eq,
    S: BuildHasher,
{
}

impl<K, V, S> Extend<(K, V)> for HashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl<K, V, S> FromIterator<(K, V)> for HashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher + Default,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut map = Self {
            table: ProbeTable::sized_for(iter.size_hint().0, S::default()),
        };
        map.extend(iter);
        map
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for HashMap<K, V>
where
    K: Eq + Hash,
{
    fn from(arr: [(K, V); N]) -> Self {
        arr.into_iter().collect()
    }
}

impl<K, V, S> IntoIterator for HashMap<K, V, S> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.table.into_entries()
    }
}

impl<'a, K, V, S> IntoIterator for &'a HashMap<K, V, S> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
