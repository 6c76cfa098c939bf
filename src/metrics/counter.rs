//! Counter and gauge primitives
//!
//! Counters carry a fixed label set declared at construction so label
//! cardinality is bounded at compile time in practice; an undeclared label
//! is a documented no-op rather than a new time series.

use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};

/// Monotonically increasing counter partitioned by a small, fixed label set.
///
/// One atomic slot per declared label value. `inc` on a label that was not
/// declared does nothing and returns `false`; the declared set is chosen at
/// registration time and never grows, which keeps scrape output stable and
/// rules out cardinality leaks from unexpected inputs.
#[derive(Debug)]
pub struct Counter {
    label_name: &'static str,
    labels: &'static [&'static str],
    values: Vec<AtomicU64>,
}

impl Counter {
    /// Create a counter with the given label key and declared label values.
    pub fn new(label_name: &'static str, labels: &'static [&'static str]) -> Self {
        let values = (0..labels.len()).map(|_| AtomicU64::new(0)).collect();
        Self {
            label_name,
            labels,
            values,
        }
    }

    /// Increment the slot for `label` by one.
    ///
    /// Returns `false` (and logs at debug) when the label was not declared;
    /// the counter is left untouched.
    pub fn inc(&self, label: &str) -> bool {
        match self.labels.iter().position(|&l| l == label) {
            Some(idx) => {
                self.values[idx].fetch_add(1, Ordering::Relaxed);
                true
            }
            None => {
                tracing::debug!(
                    label_name = self.label_name,
                    label,
                    "dropping increment for undeclared counter label"
                );
                false
            }
        }
    }

    /// Current value for a declared label, or `None` for an unknown one.
    pub fn get(&self, label: &str) -> Option<u64> {
        self.labels
            .iter()
            .position(|&l| l == label)
            .map(|idx| self.values[idx].load(Ordering::Relaxed))
    }

    /// Sum across every declared label.
    pub fn total(&self) -> u64 {
        self.values
            .iter()
            .map(|slot| slot.load(Ordering::Relaxed))
            .sum()
    }

    /// The label key (e.g. `"verdict"`).
    pub fn label_name(&self) -> &'static str {
        self.label_name
    }

    /// Declared label values in declaration order, paired with their
    /// current counts. Zero-valued labels are included so rendering is
    /// deterministic.
    pub fn samples(&self) -> impl Iterator<Item = (&'static str, u64)> + '_ {
        self.labels
            .iter()
            .zip(&self.values)
            .map(|(&label, slot)| (label, slot.load(Ordering::Relaxed)))
    }
}

/// Integer gauge that can move in both directions.
///
/// `add`/`dec` clamp at a floor of zero, the right behavior for inflight
/// counts where a stray double-decrement must not go negative. `set`
/// stores the value as given and is the path health flags use (0/1).
#[derive(Debug, Default)]
pub struct Gauge {
    value: AtomicI64,
}

impl Gauge {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `delta` (possibly negative), clamping the result at zero.
    pub fn add(&self, delta: i64) {
        // fetch_update retries on contention; the closure never returns
        // None so the update always lands.
        let _ = self
            .value
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |current| {
                Some(current.saturating_add(delta).max(0))
            });
    }

    pub fn inc(&self) {
        self.add(1);
    }

    pub fn dec(&self) {
        self.add(-1);
    }

    /// Store an absolute value, bypassing the floor.
    pub fn set(&self, value: i64) {
        self.value.store(value, Ordering::Relaxed);
    }

    pub fn get(&self) -> i64 {
        self.value.load(Ordering::Relaxed)
    }
}
