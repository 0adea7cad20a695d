//! Global atomic counters for gameswarm observability.
//!
//! Counters are incremented silently at the call site. Call
//! [`Metrics::flush`] to emit current values as a single
//! `tracing::info!` event (e.g. after the scorecard closes).

use std::sync::atomic::{AtomicU64, Ordering};

/// Global metrics singleton.
pub static METRICS: Metrics = Metrics::new();

/// Lightweight atomic counters — no allocations, no locking.
pub struct Metrics {
    actions_taken: AtomicU64,
    units_completed: AtomicU64,
    units_failed: AtomicU64,
    scorecard_closes: AtomicU64,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    pub const fn new() -> Self {
        Self {
            actions_taken: AtomicU64::new(0),
            units_completed: AtomicU64::new(0),
            units_failed: AtomicU64::new(0),
            scorecard_closes: AtomicU64::new(0),
        }
    }

    /// Increment the actions-taken counter by one.
    pub fn inc_actions(&self) {
        self.actions_taken.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment the units-completed counter by one.
    pub fn inc_units_completed(&self) {
        self.units_completed.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment the units-failed counter by one.
    pub fn inc_units_failed(&self) {
        self.units_failed.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment the scorecard-closes counter by one.
    pub fn inc_scorecard_closes(&self) {
        self.scorecard_closes.fetch_add(1, Ordering::Relaxed);
    }

    /// Emit all current counter values as a single `info!` event.
    ///
    /// Call this at natural boundaries (after scorecard close) rather
    /// than on every increment.
    pub fn flush(&self) {
        tracing::info!(
            metric = "flush",
            actions_taken = self.actions_taken(),
            units_completed = self.units_completed(),
            units_failed = self.units_failed(),
            scorecard_closes = self.scorecard_closes(),
        );
    }

    pub fn actions_taken(&self) -> u64 {
        self.actions_taken.load(Ordering::Relaxed)
    }

    pub fn units_completed(&self) -> u64 {
        self.units_completed.load(Ordering::Relaxed)
    }

    pub fn units_failed(&self) -> u64 {
        self.units_failed.load(Ordering::Relaxed)
    }

    pub fn scorecard_closes(&self) -> u64 {
        self.scorecard_closes.load(Ordering::Relaxed)
    }

    /// Reset all counters to zero (useful in tests).
    pub fn reset(&self) {
        self.actions_taken.store(0, Ordering::Relaxed);
        self.units_completed.store(0, Ordering::Relaxed);
        self.units_failed.store(0, Ordering::Relaxed);
        self.scorecard_closes.store(0, Ordering::Relaxed);
    }
}
