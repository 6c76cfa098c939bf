//! Command-line interface for spamgate
//!
//! Flags cover the server-side knobs; the backend address itself comes
//! from the `MODEL_HOST` environment variable (see `config`).

use clap::Parser;

/// SMS spam-classification edge service
#[derive(Debug, Parser)]
#[command(name = "spamgate")]
#[command(version)]
#[command(about = "SMS spam-classification edge service with Prometheus metrics")]
#[command(
    long_about = "Spamgate accepts SMS text over HTTP, forwards it to the classification \
    backend named by the MODEL_HOST environment variable, and exposes request metrics \
    in Prometheus text format at /metrics."
)]
pub struct Cli {
    /// IP address to bind to
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, default_value_t = 8080)]
    pub port: u16,

    /// Total timeout for each backend dispatch, in seconds
    #[arg(long, default_value_t = 3)]
    pub request_timeout_seconds: u64,

    /// Default log level when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    pub log_level: String,
}
