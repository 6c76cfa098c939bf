//! Metric registry and Prometheus text renderer
//!
//! The registry is append-only and built once at startup, then shared
//! read-only behind an `Arc`. Because registration finishes before the
//! server accepts traffic, rendering walks a plain `Vec` with no lock at
//! all: writers touch only the per-metric atomics, so a slow scrape can
//! never stall the request path.

use std::fmt::Write as _;
use std::sync::Arc;

use thiserror::Error;

use crate::metrics::{Counter, Gauge, Histogram};

/// Failures from metric registration or construction. All of these are
/// programmer errors surfaced at startup; none can occur at request time.
#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("metric '{0}' is already registered")]
    DuplicateName(String),

    #[error("invalid histogram buckets: {0}")]
    InvalidBuckets(String),
}

/// One registered metric: a typed handle plus its exposition metadata.
enum Metric {
    Counter(Arc<Counter>),
    Gauge(Arc<Gauge>),
    Histogram(Arc<Histogram>),
}

impl Metric {
    fn type_str(&self) -> &'static str {
        match self {
            Metric::Counter(_) => "counter",
            Metric::Gauge(_) => "gauge",
            Metric::Histogram(_) => "histogram",
        }
    }
}

struct Registered {
    name: &'static str,
    help: &'static str,
    metric: Metric,
}

/// Append-only registry mapping stable names to typed metrics.
///
/// Register everything during startup, then freeze the registry inside an
/// `Arc`. Names are unique for the process lifetime and metrics are never
/// removed.
#[derive(Default)]
pub struct Registry {
    metrics: Vec<Registered>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_counter(
        &mut self,
        name: &'static str,
        help: &'static str,
        counter: Arc<Counter>,
    ) -> Result<(), MetricsError> {
        self.register(name, help, Metric::Counter(counter))
    }

    pub fn register_gauge(
        &mut self,
        name: &'static str,
        help: &'static str,
        gauge: Arc<Gauge>,
    ) -> Result<(), MetricsError> {
        self.register(name, help, Metric::Gauge(gauge))
    }

    pub fn register_histogram(
        &mut self,
        name: &'static str,
        help: &'static str,
        histogram: Arc<Histogram>,
    ) -> Result<(), MetricsError> {
        self.register(name, help, Metric::Histogram(histogram))
    }

    fn register(
        &mut self,
        name: &'static str,
        help: &'static str,
        metric: Metric,
    ) -> Result<(), MetricsError> {
        if self.metrics.iter().any(|m| m.name == name) {
            return Err(MetricsError::DuplicateName(name.to_string()));
        }
        self.metrics.push(Registered { name, help, metric });
        Ok(())
    }

    /// Render every metric in registration order as one Prometheus text
    /// exposition document, families separated by blank lines.
    ///
    /// Each sample is an independent point-in-time atomic read; there is
    /// no cross-metric (or even cross-sample) atomicity, per the
    /// eventually-consistent contract.
    pub fn render(&self) -> String {
        let mut out = String::with_capacity(1024);

        for (i, registered) in self.metrics.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            let name = registered.name;
            let _ = writeln!(out, "# HELP {} {}", name, registered.help);
            let _ = writeln!(out, "# TYPE {} {}", name, registered.metric.type_str());

            match &registered.metric {
                Metric::Counter(counter) => {
                    let key = counter.label_name();
                    for (label, value) in counter.samples() {
                        let _ = writeln!(out, "{}{{{}=\"{}\"}} {}", name, key, label, value);
                    }
                }
                Metric::Gauge(gauge) => {
                    let _ = writeln!(out, "{} {}", name, gauge.get());
                }
                Metric::Histogram(histogram) => {
                    render_histogram(&mut out, name, histogram);
                }
            }
        }

        out
    }
}

/// Emit cumulative `_bucket` lines plus `_sum` and `_count`.
fn render_histogram(out: &mut String, name: &str, histogram: &Histogram) {
    let snap = histogram.snapshot();
    let scale = histogram.scale() as f64;

    let mut cumulative = 0u64;
    for (idx, &threshold) in histogram.buckets().thresholds().iter().enumerate() {
        cumulative += snap.bucket_counts[idx];
        let _ = writeln!(
            out,
            "{}_bucket{{le=\"{}\"}} {}",
            name,
            format_number(threshold as f64 / scale),
            cumulative
        );
    }
    cumulative += snap.bucket_counts[histogram.buckets().len()];
    let _ = writeln!(out, "{}_bucket{{le=\"+Inf\"}} {}", name, cumulative);
    let _ = writeln!(out, "{}_sum {}", name, format_number(snap.sum));
    let _ = writeln!(out, "{}_count {}", name, snap.count);
}

/// Shortest round-trip decimal form: `0.01`, `5.085`, `64` (no trailing
/// `.0` on integral values).
fn format_number(value: f64) -> String {
    format!("{}", value)
}
