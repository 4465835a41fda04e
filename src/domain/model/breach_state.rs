// src/domain/model/breach_state.rs

use serde::{Deserialize, Serialize};
use std::fmt;

/// A ticket's SLA state at a single evaluation instant.
///
/// Transient by design: every monitor pass recomputes it from the target
/// timestamp and the clock, so no stored state can drift. Variant order is
/// severity order, which gives `Ord` the monotonic meaning tests rely on
/// (OnTrack < Imminent < Breached).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BreachState {
    /// Inside the SLA window, or untracked (no active policy matched).
    OnTrack,
    /// Remaining time is at or below the imminence buffer; reported to the
    /// dispatcher but never persisted.
    Imminent,
    /// The target timestamp has passed while the ticket is still open.
    Breached,
}

impl fmt::Display for BreachState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BreachState::OnTrack => "on-track",
            BreachState::Imminent => "imminent",
            BreachState::Breached => "breached",
        };
        f.write_str(s)
    }
}
