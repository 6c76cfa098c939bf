//! Configuration management for spamgate
//!
//! Configuration is environment-driven: the single required setting is
//! `MODEL_HOST`, the base address of the classification backend. Server
//! bind address, port, request timeout, and log level come from CLI flags
//! with sensible defaults. Every violation is fatal before the listener
//! binds; there is no runtime-recoverable configuration state.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

use crate::cli::Cli;

/// Environment variable naming the classification backend.
pub const MODEL_HOST_VAR: &str = "MODEL_HOST";

/// Upper bound on the dispatch timeout, in seconds.
const MAX_TIMEOUT_SECONDS: u64 = 60;

/// Configuration errors. All fatal at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("environment variable {MODEL_HOST_VAR} is not set or empty")]
    MissingModelHost,

    #[error(
        "environment variable {MODEL_HOST_VAR} is missing a protocol, like \"http://...\" (was: \"{0}\")"
    )]
    ModelHostMissingScheme(String),

    #[error("request timeout must be between 1 and {MAX_TIMEOUT_SECONDS} seconds (was: {0})")]
    TimeoutOutOfRange(u64),
}

/// Immutable runtime configuration, shared via `Arc`.
#[derive(Debug, Clone)]
pub struct Config {
    model_host: String,
    host: String,
    port: u16,
    request_timeout_seconds: u64,
    log_level: String,
}

impl Config {
    /// Build configuration from the process environment plus CLI flags.
    pub fn from_env(cli: &Cli) -> Result<Self, ConfigError> {
        let model_host = std::env::var(MODEL_HOST_VAR).unwrap_or_default();
        Self::build(&model_host, cli)
    }

    /// Core construction, separated from `std::env` so tests can drive it
    /// without mutating process-global state.
    pub fn build(model_host: &str, cli: &Cli) -> Result<Self, ConfigError> {
        let model_host = model_host.trim();
        if model_host.is_empty() {
            return Err(ConfigError::MissingModelHost);
        }
        if !model_host.contains("://") {
            return Err(ConfigError::ModelHostMissingScheme(model_host.to_string()));
        }
        if cli.request_timeout_seconds == 0 || cli.request_timeout_seconds > MAX_TIMEOUT_SECONDS {
            return Err(ConfigError::TimeoutOutOfRange(cli.request_timeout_seconds));
        }

        // Trailing slashes would double up when joining "/predict".
        let model_host = model_host.trim_end_matches('/').to_string();

        Ok(Self {
            model_host,
            host: cli.host.clone(),
            port: cli.port,
            request_timeout_seconds: cli.request_timeout_seconds,
            log_level: cli.log_level.clone(),
        })
    }

    /// Base address of the classification backend, scheme included, no
    /// trailing slash.
    pub fn model_host(&self) -> &str {
        &self.model_host
    }

    /// Bind address for the HTTP server.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Listen port.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Total timeout applied to each backend dispatch.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }

    /// Default log level when RUST_LOG is unset.
    pub fn log_level(&self) -> &str {
        &self.log_level
    }

    /// Convenience for sharing across handlers.
    pub fn into_shared(self) -> Arc<Self> {
        Arc::new(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn default_cli() -> Cli {
        Cli::parse_from(["spamgate"])
    }

    #[test]
    fn accepts_well_formed_model_host() {
        let config =
            Config::build("http://model:8081", &default_cli()).expect("config should build");
        assert_eq!(config.model_host(), "http://model:8081");
        assert_eq!(config.request_timeout(), Duration::from_secs(3));
    }

    #[test]
    fn trims_whitespace_and_trailing_slash() {
        let config =
            Config::build("  http://model:8081/  \n", &default_cli()).expect("config should build");
        assert_eq!(config.model_host(), "http://model:8081");
    }

    #[test]
    fn rejects_empty_model_host() {
        let result = Config::build("", &default_cli());
        assert!(matches!(result, Err(ConfigError::MissingModelHost)));
    }

    #[test]
    fn rejects_whitespace_only_model_host() {
        let result = Config::build("   ", &default_cli());
        assert!(matches!(result, Err(ConfigError::MissingModelHost)));
    }

    #[test]
    fn rejects_model_host_without_scheme() {
        let result = Config::build("model:8081", &default_cli());
        assert!(matches!(
            result,
            Err(ConfigError::ModelHostMissingScheme(ref host)) if host == "model:8081"
        ));
    }

    #[test]
    fn rejects_zero_timeout() {
        let cli = Cli::parse_from(["spamgate", "--request-timeout-seconds", "0"]);
        let result = Config::build("http://model:8081", &cli);
        assert!(matches!(result, Err(ConfigError::TimeoutOutOfRange(0))));
    }

    #[test]
    fn rejects_oversized_timeout() {
        let cli = Cli::parse_from(["spamgate", "--request-timeout-seconds", "61"]);
        let result = Config::build("http://model:8081", &cli);
        assert!(matches!(result, Err(ConfigError::TimeoutOutOfRange(61))));
    }

    #[test]
    fn error_messages_name_the_variable() {
        let err = Config::build("", &default_cli()).expect_err("should fail");
        assert!(err.to_string().contains("MODEL_HOST"));

        let err = Config::build("model:8081", &default_cli()).expect_err("should fail");
        assert!(err.to_string().contains("http://"));
        assert!(err.to_string().contains("model:8081"));
    }
}
