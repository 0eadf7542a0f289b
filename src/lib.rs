//! keyed-collections: two associative containers with their set
//! variants. One is an open-addressing hash table that iterates in
//! insertion order. The other is a red-black tree that iterates in key
//! order.
//!
//! Internal Design:
//!
//! Summary
//! - HashMap<K, V, S> / HashSet<T, S>: thin facades over `ProbeTable`.
//!   - Buckets are `Empty`, `Occupied` or `Tombstone`; collisions resolve
//!     by linear probing and deletion leaves a tombstone.
//!   - Entries live in a `SlotMap` arena, each with its precomputed hash.
//!     A bucket stores only the arena key.
//!   - A shadow sequence (a linked list keyed by the same arena keys)
//!     records insertion order. It is never touched by rehashing.
//! - TreeMap<K, V> / TreeSet<T>: thin facades over `RbTree`.
//!   - Nodes live in a `SlotMap` arena. Child keys express ownership;
//!     parent keys are plain back links.
//!   - The rightmost node is cached as `max` and marks the end of
//!     in-order traversal.
//!   - No removal: entries live until `clear` or drop.
//!
//! Growth policy
//! - A fresh table has `DEFAULT_CAPACITY` buckets (8).
//! - After each new key is placed, if `len / capacity >= MAX_LOAD_FACTOR`
//!   (0.7, compared in floating point) the bucket array grows by
//!   `GROWTH_FACTOR` (2). Surviving entries are re-placed from their
//!   stored hashes and every tombstone is discarded.
//! - Capacity never shrinks; `clear` keeps it.
//!
//! Probing
//! - A key is looked up from its home bucket `hash % capacity` until an
//!   `Empty` bucket or a full lap. Tombstones are skipped, not stops.
//! - Insertion remembers the first tombstone it passed and reuses it only
//!   after confirming the key is absent, so a key is stored at most once.
//!
//! User code
//! - `K: Hash` runs once per insertion and once per lookup. It never runs
//!   during rehash.
//! - `K: Eq` / `K: Ord` run while probing or descending, before any
//!   structural change. A panic there leaves the container as it was.
//! - `Clone` runs while copying into a fresh container, so a panic drops
//!   the partial copy and leaves the source untouched.
//!
//! Indexed access
//! - `at(key)` on both maps inserts `V::default()` on a miss and returns
//!   the value mutably. `get`/`lookup` never mutate; `lookup` reports
//!   `Error::NotFound`.
//!
//! Diagnostics
//! - Rehash and clear emit `tracing` debug events; red-black fixup steps
//!   emit trace events.
//! - `bucket_state`/`bucket_states`/`bucket_index`/`tombstones` expose
//!   the bucket layout for inspection and tests.
//!
//! Notes and non-goals
//! - Single-threaded containers; no interior mutability.
//! - Storage comes from the global allocator.
//! - No tree deletion, no tree `find` returning a cursor, no mutable
//!   iteration.

pub mod error;
pub mod hash_map;
pub mod hash_set;
mod probe_table;
mod probe_table_proptest;
mod rb_tree;
mod rb_tree_proptest;
mod shadow;
mod test_support;
pub mod tree_map;
pub mod tree_set;

// Public surface
pub use error::{Error, Result};
pub use hash_map::HashMap;
pub use hash_set::HashSet;
pub use probe_table::{BucketState, DEFAULT_CAPACITY, GROWTH_FACTOR, MAX_LOAD_FACTOR};
pub use tree_map::TreeMap;
pub use tree_set::TreeSet;
