//! ProbeTable: open-addressing engine behind `HashMap` and `HashSet`.
//!
//! Layout
//! - `buckets`: flat array probed linearly from `hash % capacity`. A bucket
//!   is `Empty`, `Occupied(EntryKey)` or `Tombstone`.
//! - `entries`: `SlotMap` arena holding key, value and the precomputed hash.
//!   Rehash reuses the stored hash, so `K: Hash` never runs after insertion.
//! - `order`: shadow sequence of entry keys in insertion order; drives
//!   iteration only. Lookups always go through `buckets`.
//!
//! Every call that adds or removes an entry updates buckets, arena and
//! shadow sequence together. User code (`Hash`, `Eq`, value constructors)
//! runs before the first structural write.

use crate::error::{Error, Result};
use crate::shadow::{self, ShadowSequence};
use core::borrow::Borrow;
use core::hash::{BuildHasher, Hash};
use slotmap::{new_key_type, SlotMap};

/// Bucket count used when no explicit capacity is given.
pub const DEFAULT_CAPACITY: usize = 8;
/// Capacity multiplier applied on every rehash.
pub const GROWTH_FACTOR: usize = 2;
/// `occupied / capacity` at or above which an insert triggers a rehash.
pub const MAX_LOAD_FACTOR: f64 = 0.7;

new_key_type! {
    pub(crate) struct EntryKey;
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Bucket {
    Empty,
    Occupied(EntryKey),
    Tombstone,
}

/// Read-only view of a single bucket, for inspecting table layout.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum BucketState {
    Empty,
    Occupied,
    Tombstone,
}

impl From<Bucket> for BucketState {
    fn from(b: Bucket) -> Self {
        match b {
            Bucket::Empty => BucketState::Empty,
            Bucket::Occupied(_) => BucketState::Occupied,
            Bucket::Tombstone => BucketState::Tombstone,
        }
    }
}

#[derive(Clone, Debug)]
struct Entry<K, V> {
    key: K,
    value: V,
    hash: u64,
}

enum Probe {
    Found(usize, EntryKey),
    Vacant(usize),
    Full,
}

enum Slot {
    Live(EntryKey),
    Free(usize),
}

#[inline]
fn home(hash: u64, capacity: usize) -> usize {
    (hash % capacity as u64) as usize
}

#[derive(Clone)]
pub(crate) struct ProbeTable<K, V, S> {
    hasher: S,
    buckets: Vec<Bucket>,
    entries: SlotMap<EntryKey, Entry<K, V>>,
    order: ShadowSequence<EntryKey>,
    tombstones: usize,
}

impl<K, V, S: Default> Default for ProbeTable<K, V, S> {
    fn default() -> Self {
        Self::with_hasher(S::default())
    }
}

impl<K, V, S> ProbeTable<K, V, S> {
    pub(crate) fn with_hasher(hasher: S) -> Self {
        Self::with_buckets(DEFAULT_CAPACITY, hasher)
    }

    pub(crate) fn with_capacity_and_hasher(capacity: usize, hasher: S) -> Result<Self> {
        if capacity == 0 {
            return Err(Error::InvalidArgument("capacity must be greater than 0"));
        }
        Ok(Self::with_buckets(capacity, hasher))
    }

    /// Table sized for `n` initial entries, never below `DEFAULT_CAPACITY`.
    pub(crate) fn sized_for(n: usize, hasher: S) -> Self {
        Self::with_buckets(n.max(DEFAULT_CAPACITY), hasher)
    }

    fn with_buckets(capacity: usize, hasher: S) -> Self {
        Self {
            hasher,
            buckets: vec![Bucket::Empty; capacity],
            entries: SlotMap::with_key(),
            order: ShadowSequence::new(),
            tombstones: 0,
        }
    }

    pub(crate) fn hasher(&self) -> &S {
        &self.hasher
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn capacity(&self) -> usize {
        self.buckets.len()
    }

    pub(crate) fn tombstones(&self) -> usize {
        self.tombstones
    }

    pub(crate) fn load_factor(&self) -> f64 {
        self.entries.len() as f64 / self.buckets.len() as f64
    }

    pub(crate) fn bucket_state(&self, index: usize) -> Result<BucketState> {
        self.buckets
            .get(index)
            .map(|&b| BucketState::from(b))
            .ok_or(Error::OutOfRange {
                index,
                len: self.buckets.len(),
            })
    }

    pub(crate) fn bucket_states(&self) -> impl Iterator<Item = BucketState> + '_ {
        self.buckets.iter().map(|&b| BucketState::from(b))
    }

    /// Drop every entry. Capacity is kept; all buckets become `Empty`.
    pub(crate) fn clear(&mut self) {
        let dropped = self.entries.len();
        self.order.clear();
        self.buckets.fill(Bucket::Empty);
        self.tombstones = 0;
        self.entries.clear();
        tracing::debug!(capacity = self.buckets.len(), dropped, "probe table cleared");
    }

    /// Move every occupied entry into a table `GROWTH_FACTOR` times larger.
    /// Tombstones are discarded; the shadow sequence is left untouched.
    fn rehash(&mut self) {
        let old_capacity = self.buckets.len();
        let new_capacity = old_capacity * GROWTH_FACTOR;
        let old = core::mem::replace(&mut self.buckets, vec![Bucket::Empty; new_capacity]);
        let tombstones_dropped = core::mem::take(&mut self.tombstones);

        for bucket in old {
            let Bucket::Occupied(k) = bucket else {
                continue;
            };
            let Some(hash) = self.entries.get(k).map(|e| e.hash) else {
                continue;
            };
            let mut idx = home(hash, new_capacity);
            while self.buckets[idx] != Bucket::Empty {
                idx = (idx + 1) % new_capacity;
            }
            self.buckets[idx] = Bucket::Occupied(k);
        }

        tracing::debug!(
            old_capacity,
            new_capacity,
            live = self.entries.len(),
            tombstones_dropped,
            "probe table rehashed"
        );
    }

    /// Store a new entry at `bucket` (empty or tombstone) and grow if the
    /// load factor reached the threshold.
    fn place_new(&mut self, bucket: usize, key: K, value: V, hash: u64) -> EntryKey {
        if self.buckets[bucket] == Bucket::Tombstone {
            self.tombstones -= 1;
        }
        let k = self.entries.insert(Entry { key, value, hash });
        self.buckets[bucket] = Bucket::Occupied(k);
        self.order.push_back(k);
        if self.load_factor() >= MAX_LOAD_FACTOR {
            self.rehash();
        }
        k
    }

    pub(crate) fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            order: self.order.iter(),
            entries: &self.entries,
        }
    }

    pub(crate) fn into_entries(self) -> IntoIter<K, V> {
        let order: Vec<EntryKey> = self.order.iter().collect();
        IntoIter {
            entries: self.entries,
            order: order.into_iter(),
        }
    }
}

impl<K, V, S> ProbeTable<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    fn make_hash<Q>(&self, q: &Q) -> u64
    where
        Q: ?Sized + Hash,
    {
        self.hasher.hash_one(q)
    }

    /// Walk the probe sequence for `q` at most one full lap.
    ///
    /// Stops at a matching live entry or at the first `Empty` bucket. The
    /// first tombstone passed is remembered as the preferred home for a new
    /// entry, but probing continues past it so a live duplicate further on
    /// is still found.
    fn probe<Q>(&self, hash: u64, q: &Q) -> Probe
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
    {
        let capacity = self.buckets.len();
        let mut idx = home(hash, capacity);
        let mut reusable = None;
        for _ in 0..capacity {
            match self.buckets[idx] {
                Bucket::Empty => return Probe::Vacant(reusable.unwrap_or(idx)),
                Bucket::Tombstone => {
                    if reusable.is_none() {
                        reusable = Some(idx);
                    }
                }
                Bucket::Occupied(k) => {
                    let hit = self
                        .entries
                        .get(k)
                        .map(|e| e.hash == hash && e.key.borrow() == q)
                        .unwrap_or(false);
                    if hit {
                        return Probe::Found(idx, k);
                    }
                }
            }
            idx = (idx + 1) % capacity;
        }
        match reusable {
            Some(idx) => Probe::Vacant(idx),
            None => Probe::Full,
        }
    }

    fn locate(&mut self, hash: u64, key: &K) -> Slot {
        loop {
            match self.probe(hash, key) {
                Probe::Found(_, k) => return Slot::Live(k),
                Probe::Vacant(idx) => return Slot::Free(idx),
                // Unreachable while the load factor stays below 1.
                Probe::Full => self.rehash(),
            }
        }
    }

    fn find<Q>(&self, q: &Q) -> Option<(usize, EntryKey)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let hash = self.make_hash(q);
        match self.probe(hash, q) {
            Probe::Found(idx, k) => Some((idx, k)),
            Probe::Vacant(_) | Probe::Full => None,
        }
    }

    /// Insert or overwrite. Returns the previous value for an existing key.
    pub(crate) fn insert(&mut self, key: K, value: V) -> Option<V> {
        let hash = self.make_hash(&key);
        match self.locate(hash, &key) {
            Slot::Live(k) => self
                .entries
                .get_mut(k)
                .map(|e| core::mem::replace(&mut e.value, value)),
            Slot::Free(bucket) => {
                self.place_new(bucket, key, value, hash);
                None
            }
        }
    }

    /// Insert only when absent. Returns false (dropping `key`/`value`)
    /// when the key is already live.
    pub(crate) fn insert_new(&mut self, key: K, value: V) -> bool {
        let hash = self.make_hash(&key);
        match self.locate(hash, &key) {
            Slot::Live(_) => false,
            Slot::Free(bucket) => {
                self.place_new(bucket, key, value, hash);
                true
            }
        }
    }

    /// Insert-on-miss access: a missing key is stored with `default()`.
    pub(crate) fn get_or_insert_with<F>(&mut self, key: K, default: F) -> &mut V
    where
        F: FnOnce() -> V,
    {
        let hash = self.make_hash(&key);
        let k = match self.locate(hash, &key) {
            Slot::Live(k) => k,
            Slot::Free(bucket) => {
                let value = default();
                self.place_new(bucket, key, value, hash)
            }
        };
        &mut self.entries[k].value
    }

    pub(crate) fn remove<Q>(&mut self, q: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let (bucket, k) = self.find(q)?;
        self.buckets[bucket] = Bucket::Tombstone;
        self.tombstones += 1;
        self.order.remove(k);
        self.entries.remove(k).map(|e| (e.key, e.value))
    }

    pub(crate) fn get_key_value<Q>(&self, q: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let (_, k) = self.find(q)?;
        self.entries.get(k).map(|e| (&e.key, &e.value))
    }

    pub(crate) fn get_mut<Q>(&mut self, q: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let (_, k) = self.find(q)?;
        self.entries.get_mut(k).map(|e| &mut e.value)
    }

    pub(crate) fn contains_key<Q>(&self, q: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.find(q).is_some()
    }

    pub(crate) fn bucket_index<Q>(&self, q: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.find(q).map(|(idx, _)| idx)
    }
}

#[cfg(test)]
impl<K, V, S> ProbeTable<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    /// Panics unless buckets, arena and shadow sequence agree and every
    /// live entry is reachable from its home bucket.
    pub(crate) fn assert_consistent(&self) {
        let occupied: Vec<EntryKey> = self
            .buckets
            .iter()
            .filter_map(|b| match b {
                Bucket::Occupied(k) => Some(*k),
                _ => None,
            })
            .collect();
        let tombstones = self
            .buckets
            .iter()
            .filter(|b| **b == Bucket::Tombstone)
            .count();
        assert_eq!(occupied.len(), self.entries.len(), "occupied != live entries");
        assert_eq!(self.order.len(), self.entries.len(), "shadow != live entries");
        assert_eq!(tombstones, self.tombstones, "tombstone count drifted");
        for k in occupied {
            assert!(self.order.contains(k), "occupied entry missing from shadow");
            let e = &self.entries[k];
            assert_eq!(self.make_hash(&e.key), e.hash, "stored hash is stale");
            assert!(self.contains_key(&e.key), "live entry not reachable by probing");
        }
        assert!(
            self.load_factor() < MAX_LOAD_FACTOR,
            "load factor {} not below threshold",
            self.load_factor()
        );
    }
}

/// Entries in insertion order.
pub struct Iter<'a, K, V> {
    order: shadow::Iter<'a, EntryKey>,
    entries: &'a SlotMap<EntryKey, Entry<K, V>>,
}

impl<'a, K, V> Clone for Iter<'a, K, V> {
    fn clone(&self) -> Self {
        Self {
            order: self.order.clone(),
            entries: self.entries,
        }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let entries = self.entries;
        self.order
            .find_map(|k| entries.get(k).map(|e| (&e.key, &e.value)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.order.size_hint()
    }
}

impl<'a, K, V> ExactSizeIterator for Iter<'a, K, V> {}

/// Owning iterator in insertion order.
pub struct IntoIter<K, V> {
    entries: SlotMap<EntryKey, Entry<K, V>>,
    order: std::vec::IntoIter<EntryKey>,
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        let entries = &mut self.entries;
        self.order
            .find_map(|k| entries.remove(k).map(|e| (e.key, e.value)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.order.size_hint()
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {}
