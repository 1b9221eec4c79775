//! Request generations for discarding stale results.
//!
//! Image acquisition happens outside the engine and may complete out of
//! order. Every request takes a [`Generation`] from a [`GenerationCounter`];
//! a response is only kept if its generation is still the latest one.

use std::sync::atomic::{AtomicU64, Ordering};

/// Identifies one request. Later requests compare greater.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u64);

impl Generation {
    pub fn value(&self) -> u64 {
        self.0
    }
}

/// Hands out strictly increasing generations.
#[derive(Debug, Default)]
pub struct GenerationCounter {
    latest: AtomicU64,
}

impl GenerationCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new request, superseding every earlier one.
    pub fn begin(&self) -> Generation {
        Generation(self.latest.fetch_add(1, Ordering::AcqRel) + 1)
    }

    /// The most recently issued generation, if any.
    pub fn latest(&self) -> Option<Generation> {
        match self.latest.load(Ordering::Acquire) {
            0 => None,
            n => Some(Generation(n)),
        }
    }

    pub fn is_current(&self, generation: Generation) -> bool {
        self.latest.load(Ordering::Acquire) == generation.0
    }

    /// Returns `value` if `generation` is still current, drops it otherwise.
    pub fn accept<T>(&self, generation: Generation, value: T) -> Option<T> {
        if self.is_current(generation) {
            Some(value)
        } else {
            tracing::debug!(
                stale = generation.0,
                latest = self.latest.load(Ordering::Acquire),
                "dropping stale result"
            );
            None
        }
    }
}
