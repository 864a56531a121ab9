//! Generation counters identifying loop activations

use std::sync::atomic::{AtomicU64, Ordering};

/// Monotonic tag for the current activation of one loop kind.
///
/// A loop captures the value returned by [`Generation::advance`] when it is
/// started and applies a result only while [`Generation::is_current`] holds.
#[derive(Debug, Default)]
pub struct Generation(AtomicU64);

impl Generation {
    pub fn new() -> Self {
        Self(AtomicU64::new(0))
    }

    /// Start a new activation, invalidating every earlier one
    pub fn advance(&self) -> u64 {
        self.0.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn current(&self) -> u64 {
        self.0.load(Ordering::SeqCst)
    }

    pub fn is_current(&self, generation: u64) -> bool {
        self.current() == generation
    }
}
