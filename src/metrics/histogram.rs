//! Concurrent histogram accumulator
//!
//! One histogram tracks a single measured quantity: per-bucket counts, a
//! running total count, and a running sum. All slots are independent
//! relaxed atomics, so `observe()` never takes a lock and readers never
//! block writers. A reader may see the total count incremented before the
//! matching bucket increment lands; renders are best-effort-consistent,
//! never lossy.
//!
//! The sum accumulates in raw integer units (e.g. microseconds) and is
//! divided by `scale` only at render time, so high-frequency increments
//! cannot accumulate floating-point drift.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use crate::metrics::BucketSet;

/// Point-in-time view of a histogram, taken slot by slot.
#[derive(Debug, Clone)]
pub struct HistogramSnapshot {
    /// Per-bucket counts, index-aligned with the thresholds plus one final
    /// `+Inf` slot. Non-cumulative; the renderer accumulates.
    pub bucket_counts: Vec<u64>,
    /// Total number of observations.
    pub count: u64,
    /// Sum of all observations, already converted to display units.
    pub sum: f64,
}

/// Concurrent-safe histogram with fixed buckets and a scaled-integer sum.
#[derive(Debug)]
pub struct Histogram {
    buckets: BucketSet,
    counts: Vec<AtomicU64>,
    sum: AtomicU64,
    count: AtomicU64,
    /// Raw units per display unit (1_000_000 for a microsecond histogram
    /// rendered in seconds, 1 for a dimensionless one).
    scale: u64,
}

impl Histogram {
    /// Create a histogram over the given buckets.
    ///
    /// `scale` is the divisor applied to thresholds and the sum at render
    /// time; it must be non-zero.
    pub fn new(buckets: BucketSet, scale: u64) -> Self {
        debug_assert!(scale > 0, "scale divisor must be non-zero");
        let slots = buckets.len() + 1;
        let counts = (0..slots).map(|_| AtomicU64::new(0)).collect();
        Self {
            buckets,
            counts,
            sum: AtomicU64::new(0),
            count: AtomicU64::new(0),
            scale: scale.max(1),
        }
    }

    /// Record one observation, in raw units.
    ///
    /// Three independent atomic adds: the selected bucket slot, the total
    /// count, and the raw sum. Safe under unbounded concurrent callers; no
    /// observation is ever lost.
    pub fn observe(&self, raw: u64) {
        let idx = self.buckets.index_of(raw);
        self.counts[idx].fetch_add(1, Ordering::Relaxed);
        self.count.fetch_add(1, Ordering::Relaxed);
        self.sum.fetch_add(raw, Ordering::Relaxed);
    }

    /// Record a wall-clock duration as microseconds.
    ///
    /// Durations beyond `u64::MAX` microseconds (half a million years)
    /// saturate rather than wrap.
    pub fn observe_duration(&self, elapsed: Duration) {
        let micros = u64::try_from(elapsed.as_micros()).unwrap_or(u64::MAX);
        self.observe(micros);
    }

    /// The bucket boundaries this histogram was built with.
    pub fn buckets(&self) -> &BucketSet {
        &self.buckets
    }

    /// Raw units per display unit.
    pub fn scale(&self) -> u64 {
        self.scale
    }

    /// Total number of observations so far.
    pub fn count(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }

    /// Sum of observations in display units.
    pub fn sum(&self) -> f64 {
        self.sum.load(Ordering::Relaxed) as f64 / self.scale as f64
    }

    /// Take a per-slot snapshot for rendering. Each slot is read
    /// independently; no lock spans the histogram.
    pub fn snapshot(&self) -> HistogramSnapshot {
        HistogramSnapshot {
            bucket_counts: self
                .counts
                .iter()
                .map(|slot| slot.load(Ordering::Relaxed))
                .collect(),
            count: self.count(),
            sum: self.sum(),
        }
    }
}
