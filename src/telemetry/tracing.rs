// src/telemetry/tracing.rs
//! Tracing subscriber setup for hosts embedding the engine.
//!
//! The engine itself only emits `tracing` events; installing a subscriber is
//! the host's choice. This helper wires the conventional env-filtered fmt
//! subscriber and is safe to call more than once.

use tracing_subscriber::{fmt, prelude::*, EnvFilter, Registry};

/// Installs an env-filtered fmt subscriber, falling back to `default_level`
/// when `RUST_LOG` is unset. Returns quietly if a global subscriber is
/// already installed.
pub fn init(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = Registry::default()
        .with(filter)
        .with(fmt::layer())
        .try_init();
}
