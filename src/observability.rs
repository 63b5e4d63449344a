//! Tracing initialization.
//!
//! `RUST_LOG` wins when set. Otherwise `BIPY_LOG_LEVEL` (default `info`) is
//! used, or `warn` when `BIPY_QUIET=1`. `BIPY_LOG_JSON=1` switches to JSON lines.
//! Logs go to stderr so stdout carries only the build outcome and child output.

use std::env;
use tracing_subscriber::{prelude::*, EnvFilter};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObservabilityConfig {
    pub quiet: bool,
    pub log_level: String,
    pub log_json: bool,
}

impl ObservabilityConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let flag = |key: &str| {
            lookup(key)
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(false)
        };
        Self {
            quiet: flag("BIPY_QUIET"),
            log_level: lookup("BIPY_LOG_LEVEL")
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| "info".to_string()),
            log_json: flag("BIPY_LOG_JSON"),
        }
    }

    fn filter_directive(&self) -> String {
        if self.quiet {
            "warn".to_string()
        } else {
            self.log_level.clone()
        }
    }
}

/// Initialize tracing. Call once at process startup.
pub fn init_tracing() {
    let cfg = ObservabilityConfig::from_env();
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cfg.filter_directive()));

    let _ = if cfg.log_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_writer(std::io::stderr),
            )
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .try_init()
    };
}
