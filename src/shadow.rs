//! ShadowSequence: insertion-ordered list of arena keys.
//!
//! The probe table looks entries up through its bucket array; this list
//! exists only to replay them in the order they were first inserted. Links
//! live in a `SecondaryMap` keyed by the same generational keys as the
//! entry arena, so push/remove are O(1) and a stale key is never linked.

use slotmap::{Key, SecondaryMap};

#[derive(Copy, Clone, Debug)]
struct Link<K> {
    prev: Option<K>,
    next: Option<K>,
}

#[derive(Clone, Debug)]
pub(crate) struct ShadowSequence<K: Key> {
    links: SecondaryMap<K, Link<K>>,
    head: Option<K>,
    tail: Option<K>,
}

impl<K: Key> ShadowSequence<K> {
    pub(crate) fn new() -> Self {
        Self {
            links: SecondaryMap::new(),
            head: None,
            tail: None,
        }
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.links.len()
    }

    #[cfg(test)]
    pub(crate) fn contains(&self, k: K) -> bool {
        self.links.contains_key(k)
    }

    /// Append `k` at the end. A key already present keeps its position.
    pub(crate) fn push_back(&mut self, k: K) {
        if self.links.contains_key(k) {
            return;
        }
        let link = Link {
            prev: self.tail,
            next: None,
        };
        match self.tail.and_then(|t| self.links.get_mut(t)) {
            Some(tail) => tail.next = Some(k),
            None => self.head = Some(k),
        }
        self.tail = Some(k);
        self.links.insert(k, link);
    }

    /// Unlink `k`. Returns false when `k` was not in the sequence.
    pub(crate) fn remove(&mut self, k: K) -> bool {
        let Some(link) = self.links.remove(k) else {
            return false;
        };
        match link.prev.and_then(|p| self.links.get_mut(p)) {
            Some(prev) => prev.next = link.next,
            None => self.head = link.next,
        }
        match link.next.and_then(|n| self.links.get_mut(n)) {
            Some(next) => next.prev = link.prev,
            None => self.tail = link.prev,
        }
        true
    }

    pub(crate) fn clear(&mut self) {
        self.links.clear();
        self.head = None;
        self.tail = None;
    }

    pub(crate) fn iter(&self) -> Iter<'_, K> {
        Iter {
            links: &self.links,
            next: self.head,
            remaining: self.links.len(),
        }
    }
}

/// Keys in insertion order.
pub(crate) struct Iter<'a, K: Key> {
    links: &'a SecondaryMap<K, Link<K>>,
    next: Option<K>,
    remaining: usize,
}

impl<'a, K: Key> Clone for Iter<'a, K> {
    fn clone(&self) -> Self {
        Self {
            links: self.links,
            next: self.next,
            remaining: self.remaining,
        }
    }
}

impl<'a, K: Key> Iterator for Iter<'a, K> {
    type Item = K;

    #[inline]
    fn next(&mut self) -> Option<K> {
        let k = self.next?;
        self.next = self.links.get(k).and_then(|l| l.next);
        self.remaining = self.remaining.saturating_sub(1);
        Some(k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, K: Key> ExactSizeIterator for Iter<'a, K> {}
