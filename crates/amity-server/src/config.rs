//! Server configuration loaded from environment variables.
//!
//! All settings have sensible defaults so the server can start with zero
//! configuration for local development.

use std::net::SocketAddr;
use std::str::FromStr;

use amity_shared::constants::{DEFAULT_HTTP_PORT, DEFAULT_MAX_CLOCK_SKEW_SECS};

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Socket address for the HTTP (axum) API server.
    /// Env: `HTTP_ADDR`
    /// Default: `0.0.0.0:8080`
    pub http_addr: SocketAddr,

    /// Human-readable name for this ledger instance.
    /// Env: `INSTANCE_NAME`
    /// Default: `"Amity Ledger"`
    pub instance_name: String,

    /// Largest accepted difference, in seconds, between a signed call's
    /// `issued_at` and the server clock. Also bounds how long call ids are
    /// remembered for replay detection.
    /// Env: `MAX_CLOCK_SKEW_SECS`
    /// Default: `300`
    pub max_clock_skew_secs: i64,

    /// Sustained requests per second allowed per client IP.
    /// Env: `RATE_LIMIT_PER_SEC`
    /// Default: `10`
    pub rate_limit_per_sec: f64,

    /// Burst size allowed per client IP.
    /// Env: `RATE_LIMIT_BURST`
    /// Default: `30`
    pub rate_limit_burst: f64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_addr: ([0, 0, 0, 0], DEFAULT_HTTP_PORT).into(),
            instance_name: "Amity Ledger".to_string(),
            max_clock_skew_secs: DEFAULT_MAX_CLOCK_SKEW_SECS,
            rate_limit_per_sec: 10.0,
            rate_limit_burst: 30.0,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from an arbitrary key/value source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(addr) = parse_var(&lookup, "HTTP_ADDR") {
            config.http_addr = addr;
        }

        if let Some(name) = lookup("INSTANCE_NAME") {
            if !name.trim().is_empty() {
                config.instance_name = name;
            }
        }

        if let Some(secs) = parse_var::<i64>(&lookup, "MAX_CLOCK_SKEW_SECS") {
            if secs > 0 {
                config.max_clock_skew_secs = secs;
            } else {
                tracing::warn!(value = secs, "MAX_CLOCK_SKEW_SECS must be positive, using default");
            }
        }

        if let Some(rate) = parse_var::<f64>(&lookup, "RATE_LIMIT_PER_SEC") {
            if rate > 0.0 {
                config.rate_limit_per_sec = rate;
            }
        }

        if let Some(burst) = parse_var::<f64>(&lookup, "RATE_LIMIT_BURST") {
            if burst >= 1.0 {
                config.rate_limit_burst = burst;
            }
        }

        // RUST_LOG is handled directly by tracing-subscriber's EnvFilter,
        // so we do not store it here.

        config
    }

    pub fn max_clock_skew(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.max_clock_skew_secs)
    }
}

fn parse_var<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    let raw = lookup(key)?;
    match raw.trim().parse::<T>() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!(key, value = %raw, "Unparsable setting, using default");
            None
        }
    }
}
