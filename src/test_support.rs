#![cfg(test)]
//! Deterministic hashers for tests that need to control bucket placement.

use core::hash::{BuildHasher, Hasher};

/// Integer keys hash to themselves (`i32` to its absolute value), so a key
/// `k` lands in bucket `k % capacity`.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct IdentityBuildHasher;

pub(crate) struct IdentityHasher(u64);

impl BuildHasher for IdentityBuildHasher {
    type Hasher = IdentityHasher;
    fn build_hasher(&self) -> Self::Hasher {
        IdentityHasher(0)
    }
}

impl Hasher for IdentityHasher {
    fn write(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.0 = self.0.rotate_left(8) ^ u64::from(b);
        }
    }
    fn write_u16(&mut self, n: u16) {
        self.0 = u64::from(n);
    }
    fn write_u64(&mut self, n: u64) {
        self.0 = n;
    }
    fn write_i32(&mut self, n: i32) {
        self.0 = u64::from(n.unsigned_abs());
    }
    fn finish(&self) -> u64 {
        self.0
    }
}

/// Every key hashes to 0: one long probe chain.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct ConstBuildHasher;

pub(crate) struct ConstHasher;

impl BuildHasher for ConstBuildHasher {
    type Hasher = ConstHasher;
    fn build_hasher(&self) -> Self::Hasher {
        ConstHasher
    }
}

impl Hasher for ConstHasher {
    fn write(&mut self, _bytes: &[u8]) {}
    fn finish(&self) -> u64 {
        0
    }
}
