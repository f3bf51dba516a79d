//! Process-wide diagnosis counters.
//!
//! Counters are bumped at the call site; [`Metrics::flush`] logs them all as
//! one `info!` event.

use std::sync::atomic::{AtomicU64, Ordering};

/// Global metrics singleton.
pub static METRICS: Metrics = Metrics::new();

pub struct Metrics {
    diagnoses_started: AtomicU64,
    diagnoses_completed: AtomicU64,
    diagnoses_cancelled: AtomicU64,
    units_salvaged: AtomicU64,
    stale_callbacks_discarded: AtomicU64,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    pub const fn new() -> Self {
        Self {
            diagnoses_started: AtomicU64::new(0),
            diagnoses_completed: AtomicU64::new(0),
            diagnoses_cancelled: AtomicU64::new(0),
            units_salvaged: AtomicU64::new(0),
            stale_callbacks_discarded: AtomicU64::new(0),
        }
    }

    pub fn inc_started(&self) {
        self.diagnoses_started.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_completed(&self) {
        self.diagnoses_completed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_cancelled(&self) {
        self.diagnoses_cancelled.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_salvaged(&self) {
        self.units_salvaged.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_stale_callbacks(&self) {
        self.stale_callbacks_discarded.fetch_add(1, Ordering::Relaxed);
    }

    /// Emit all current counter values as a single `info!` event.
    pub fn flush(&self) {
        tracing::info!(
            metric = "flush",
            diagnoses_started = self.diagnoses_started(),
            diagnoses_completed = self.diagnoses_completed(),
            diagnoses_cancelled = self.diagnoses_cancelled(),
            units_salvaged = self.units_salvaged(),
            stale_callbacks_discarded = self.stale_callbacks_discarded(),
        );
    }

    pub fn diagnoses_started(&self) -> u64 {
        self.diagnoses_started.load(Ordering::Relaxed)
    }

    pub fn diagnoses_completed(&self) -> u64 {
        self.diagnoses_completed.load(Ordering::Relaxed)
    }

    pub fn diagnoses_cancelled(&self) -> u64 {
        self.diagnoses_cancelled.load(Ordering::Relaxed)
    }

    pub fn units_salvaged(&self) -> u64 {
        self.units_salvaged.load(Ordering::Relaxed)
    }

    pub fn stale_callbacks_discarded(&self) -> u64 {
        self.stale_callbacks_discarded.load(Ordering::Relaxed)
    }

    /// Reset all counters to zero (useful in tests).
    pub fn reset(&self) {
        self.diagnoses_started.store(0, Ordering::Relaxed);
        self.diagnoses_completed.store(0, Ordering::Relaxed);
        self.diagnoses_cancelled.store(0, Ordering::Relaxed);
        self.units_salvaged.store(0, Ordering::Relaxed);
        self.stale_callbacks_discarded.store(0, Ordering::Relaxed);
    }
}
