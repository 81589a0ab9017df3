//! Minimal metrics primitives for chatsim.
//!
//! Provides [`Counter`], a monotonic delivery counter that the mail router
//! bumps through a shared reference and that serializes as a plain number.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// A monotonically increasing counter backed by [`AtomicU64`].
///
/// Relaxed ordering only: the counters are statistics, never used to
/// synchronize other state.
pub struct Counter(AtomicU64);

impl Counter {
    /// Create a counter starting at zero.
    pub fn new() -> Self {
        Self::starting_at(0)
    }

    /// Create a counter starting at `value`.
    pub fn starting_at(value: u64) -> Self {
        Self(AtomicU64::new(value))
    }

    pub fn inc(&self) {
        self.inc_by(1);
    }

    /// Increment by `n`.
    pub fn inc_by(&self, n: u64) {
        self.0.fetch_add(n, Ordering::Relaxed);
    }

    pub fn get(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }
}

impl Default for Counter {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for Counter {
    fn clone(&self) -> Self {
        Self::starting_at(self.get())
    }
}

impl PartialEq<u64> for Counter {
    fn eq(&self, other: &u64) -> bool {
        self.get() == *other
    }
}

impl fmt::Debug for Counter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Counter").field(&self.get()).finish()
    }
}

impl fmt::Display for Counter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.get())
    }
}

impl serde::Serialize for Counter {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.get().serialize(serializer)
    }
}

impl<'de> serde::Deserialize<'de> for Counter {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        u64::deserialize(deserializer).map(Self::starting_at)
    }
}
