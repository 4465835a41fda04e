// src/config/mod.rs
//! Engine configuration.
//!
//! All knobs are passed explicitly to the monitor's constructor rather than
//! read from ambient global state, keeping the core testable in isolation.
//! `load_from_sources` layers optional config files and `SLA__`-prefixed
//! environment variables; with neither present the defaults apply.

use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

use crate::domain::error::SlaError;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SlaEngineConfig {
    /// Minutes between monitor passes.
    pub check_interval_minutes: u64,
    /// Shortened delay after a pass fails outright.
    pub recovery_interval_minutes: u64,
    /// Fraction of the SLA window treated as the imminence buffer.
    pub buffer_fraction: f64,
    /// Outbound notification endpoint. Absent means notifications are
    /// disabled, which is a supported configuration, not an error.
    pub webhook_url: Option<String>,
    /// Whether breached tickets also trigger an alert batch, in addition to
    /// the imminent warning batch.
    pub notify_breached: bool,
    /// Whether a ticket already notified at a severity is skipped on
    /// subsequent passes until it escalates or leaves the at-risk set. Off by
    /// default: every pass renotifies.
    pub suppress_repeat_warnings: bool,
}

impl Default for SlaEngineConfig {
    fn default() -> Self {
        Self {
            check_interval_minutes: 15,
            recovery_interval_minutes: 5,
            buffer_fraction: 0.10,
            webhook_url: None,
            notify_breached: false,
            suppress_repeat_warnings: false,
        }
    }
}

impl SlaEngineConfig {
    /// Loads configuration from the given files (missing files are skipped,
    /// later files override earlier ones) and then from `SLA__*` environment
    /// variables.
    pub fn load_from_sources(config_paths: &[PathBuf]) -> Result<Self, SlaError> {
        let mut builder = Config::builder();

        for path in config_paths {
            if path.exists() {
                builder = builder.add_source(File::from(path.clone()));
                info!("loaded config file: {:?}", path);
            } else {
                info!("config file not found, skipping: {:?}", path);
            }
        }

        builder = builder.add_source(Environment::with_prefix("SLA").separator("__"));

        let cfg: SlaEngineConfig = builder
            .build()
            .map_err(|e| SlaError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| SlaError::Config(e.to_string()))?;

        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), SlaError> {
        if self.check_interval_minutes == 0 {
            return Err(SlaError::Config(
                "check_interval_minutes must be positive".into(),
            ));
        }
        if self.recovery_interval_minutes == 0 {
            return Err(SlaError::Config(
                "recovery_interval_minutes must be positive".into(),
            ));
        }
        if !(self.buffer_fraction > 0.0 && self.buffer_fraction < 1.0) {
            return Err(SlaError::Config(
                "buffer_fraction must be strictly between 0 and 1".into(),
            ));
        }
        Ok(())
    }

    pub fn check_interval(&self) -> Duration {
        Duration::from_secs(self.check_interval_minutes * 60)
    }

    pub fn recovery_interval(&self) -> Duration {
        Duration::from_secs(self.recovery_interval_minutes * 60)
    }
}
