// src/service/breach_classifier.rs
//! Breach classifier: pure percentage-of-time-remaining rule.
//!
//! No I/O, no ambient clock. The caller supplies `now`, which the monitor
//! loop snapshots once per pass so every ticket in a pass is judged against
//! the same instant.

use chrono::{DateTime, Utc};
use tracing::warn;

use crate::domain::model::breach_state::BreachState;
use crate::domain::model::ticket::Ticket;

/// Fraction of the total SLA window treated as the imminence buffer.
pub const DEFAULT_BUFFER_FRACTION: f64 = 0.10;

/// Classifies a ticket's SLA state at instant `now`.
///
/// Rules, in order:
/// - no target ⇒ `OnTrack` (untracked);
/// - non-positive total window ⇒ `OnTrack` with a warning, since it points
///   at a zero- or negative-minute policy;
/// - `remaining <= 0` ⇒ `Breached`;
/// - `remaining <= total_window * buffer_fraction` ⇒ `Imminent`, with the
///   boundary itself counting as imminent;
/// - otherwise `OnTrack`.
pub fn classify(ticket: &Ticket, now: DateTime<Utc>, buffer_fraction: f64) -> BreachState {
    let Some(target) = ticket.sla_target_date else {
        return BreachState::OnTrack;
    };

    let total_window = target - ticket.created_at;
    if total_window.num_seconds() <= 0 {
        warn!(
            ticket_id = %ticket.id,
            "non-positive SLA window; treating ticket as untracked"
        );
        return BreachState::OnTrack;
    }

    let remaining = target - now;
    if remaining.num_seconds() <= 0 {
        return BreachState::Breached;
    }

    let buffer_seconds = total_window.num_seconds() as f64 * buffer_fraction;
    if remaining.num_seconds() as f64 <= buffer_seconds {
        BreachState::Imminent
    } else {
        BreachState::OnTrack
    }
}

/// The persisted `is_sla_breach` value is exactly "classified as breached".
pub fn is_breached(ticket: &Ticket, now: DateTime<Utc>) -> bool {
    classify(ticket, now, DEFAULT_BUFFER_FRACTION) == BreachState::Breached
}
