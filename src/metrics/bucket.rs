//! Histogram bucket boundaries
//!
//! A `BucketSet` is an immutable, validated list of upper-bound thresholds.
//! The latency and message-size histograms share this type with different
//! threshold lists.

use crate::metrics::MetricsError;

/// Maximum number of explicit thresholds a bucket set may declare.
///
/// Bucket placement is a linear scan on the hot path; keeping the list
/// short keeps `observe()` cheap and the scrape output readable.
pub const MAX_BUCKETS: usize = 16;

/// Ordered upper-bound thresholds for a histogram, in raw units.
///
/// The implicit final bucket is unbounded (`+Inf`). Thresholds never change
/// after construction.
#[derive(Debug, Clone)]
pub struct BucketSet {
    thresholds: Vec<u64>,
}

impl BucketSet {
    /// Create a bucket set from strictly increasing, non-zero thresholds.
    ///
    /// # Errors
    ///
    /// Returns `MetricsError::InvalidBuckets` if the list is empty, longer
    /// than [`MAX_BUCKETS`], contains a zero, or is not strictly increasing
    /// (duplicates included).
    pub fn new(thresholds: Vec<u64>) -> Result<Self, MetricsError> {
        if thresholds.is_empty() {
            return Err(MetricsError::InvalidBuckets(
                "bucket threshold list is empty".to_string(),
            ));
        }
        if thresholds.len() > MAX_BUCKETS {
            return Err(MetricsError::InvalidBuckets(format!(
                "{} thresholds exceeds the maximum of {}",
                thresholds.len(),
                MAX_BUCKETS
            )));
        }
        if thresholds[0] == 0 {
            return Err(MetricsError::InvalidBuckets(
                "bucket thresholds must be positive".to_string(),
            ));
        }
        for pair in thresholds.windows(2) {
            if pair[1] <= pair[0] {
                return Err(MetricsError::InvalidBuckets(format!(
                    "thresholds must be strictly increasing ({} followed by {})",
                    pair[0], pair[1]
                )));
            }
        }
        Ok(Self { thresholds })
    }

    /// Number of explicit (bounded) buckets. The histogram owns one extra
    /// slot at index `len()` for the `+Inf` bucket.
    pub fn len(&self) -> usize {
        self.thresholds.len()
    }

    /// True if no explicit thresholds exist. Construction forbids this, so
    /// a valid `BucketSet` always returns false.
    pub fn is_empty(&self) -> bool {
        self.thresholds.is_empty()
    }

    /// The raw-unit thresholds, ascending.
    pub fn thresholds(&self) -> &[u64] {
        &self.thresholds
    }

    /// Index of the bucket an observation falls into.
    ///
    /// Returns the smallest `i` with `value <= thresholds[i]`, or `len()`
    /// (the `+Inf` slot) when the value exceeds every threshold. A value
    /// exactly on a boundary lands in that bucket, not the next one.
    pub fn index_of(&self, value: u64) -> usize {
        self.thresholds
            .iter()
            .position(|&bound| value <= bound)
            .unwrap_or(self.thresholds.len())
    }
}
