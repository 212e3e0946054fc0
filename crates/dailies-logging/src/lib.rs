//! # dailies-logging
//!
//! Structured logging with `tracing`.
//!
//! - [`init_subscriber`]: human-readable compact output on stderr
//! - [`init_json_subscriber`]: one JSON object per event on stderr
//! - [`capture_logs`]: thread-local capturing subscriber for tests
//!
//! `RUST_LOG` always wins over the level passed in.

#![deny(unsafe_code)]

pub mod capture;

pub use capture::{CapturedLogs, capture_logs};

use tracing_subscriber::EnvFilter;

fn filter_for(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
}

/// Initialize the global tracing subscriber with compact stderr output.
///
/// Call once at application startup. Subsequent calls are no-ops.
///
/// # Arguments
///
/// * `level` - Filter directive used when `RUST_LOG` is unset (e.g. `"warn"`
///   or `"dailies_app=debug"`).
pub fn init_subscriber(level: &str) {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter_for(level))
        .with_target(true)
        .with_writer(std::io::stderr)
        .compact();

    // try_init fails only if a global subscriber is already set
    let _ = subscriber.try_init();
}

/// Initialize the global tracing subscriber with JSON lines on stderr.
///
/// Same filtering rules as [`init_subscriber`]; span context is included in
/// each line.
pub fn init_json_subscriber(level: &str) {
    let subscriber = tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter_for(level))
        .with_target(true)
        .with_span_list(true)
        .with_writer(std::io::stderr);

    let _ = subscriber.try_init();
}
