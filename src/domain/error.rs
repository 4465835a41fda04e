// src/domain/error.rs
//! Error taxonomy for the SLA engine.
//!
//! Configuration gaps (no matching policy, no webhook endpoint) are not
//! errors at all and never appear here: they degrade gracefully with an
//! informational log. The variants below cover data anomalies, transient
//! store I/O, and config validation; all of them are isolated at the record
//! or pass boundary rather than propagated to the host.

use thiserror::Error;
use uuid::Uuid;

use crate::domain::model::ticket::{Category, Priority};

#[derive(Debug, Error)]
pub enum SlaError {
    /// Transient store access failure. Isolated to the single record being
    /// processed; the monitor pass continues with the remaining tickets.
    #[error("ticket store error: {0}")]
    Store(String),

    /// The ticket vanished between fetch and write-back. Benign race with a
    /// concurrent delete; callers log at debug level and move on.
    #[error("ticket {0} not found")]
    TicketNotFound(Uuid),

    /// A policy with a zero or negative window. Classification treats the
    /// affected ticket as untracked instead of failing.
    #[error("invalid SLA window for ({priority}, {category}): {resolution_time_minutes} minutes")]
    InvalidPolicyWindow {
        priority: Priority,
        category: Category,
        resolution_time_minutes: i64,
    },

    #[error("configuration error: {0}")]
    Config(String),
}

impl SlaError {
    /// True when the error is the benign fetch/write-back race rather than a
    /// real store failure.
    pub fn is_benign_race(&self) -> bool {
        matches!(self, SlaError::TicketNotFound(_))
    }
}
