// src/service/notification_dispatcher.rs
//! Notification dispatcher service
//!
//! Responsibilities:
//! - Build one batched card per monitor pass for tickets entering a risk
//!   state (imminent warning or breach alert).
//! - Deliver it through the configured `Notifier`; delivery is best-effort
//!   and never raises to the monitor loop.
//! - Degrade gracefully when no endpoint is configured (warn and skip).
//! - Optionally suppress repeat warnings for tickets already notified at the
//!   same severity.

use async_trait::async_trait;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::domain::model::breach_state::BreachState;
use crate::domain::model::ticket::Ticket;

/// MessageCard-style payload posted to the webhook endpoint: a title, a short
/// descriptive text, and one fact per ticket.
#[derive(Debug, Clone, Serialize)]
pub struct NotificationCard {
    #[serde(rename = "@type")]
    pub card_type: &'static str,
    #[serde(rename = "@context")]
    pub context: &'static str,
    #[serde(rename = "themeColor")]
    pub theme_color: &'static str,
    pub title: String,
    pub text: String,
    pub sections: Vec<CardSection>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CardSection {
    pub facts: Vec<CardFact>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CardFact {
    pub name: String,
    pub value: String,
}

impl NotificationCard {
    /// Builds the batched card. `imminent` selects the warning variant;
    /// otherwise the card announces tickets that have already breached.
    pub fn for_tickets(tickets: &[Ticket], imminent: bool) -> Self {
        let (title, theme_color) = if imminent {
            ("SLA breach warning".to_string(), "E8A33D")
        } else {
            ("SLA breach alert".to_string(), "C4314B")
        };

        let text = if imminent {
            format!(
                "{} ticket(s) are approaching their SLA resolution target.",
                tickets.len()
            )
        } else {
            format!("{} ticket(s) have breached their SLA resolution target.", tickets.len())
        };

        let facts = tickets
            .iter()
            .map(|t| CardFact {
                name: format!("Ticket #{}", t.id),
                value: format!(
                    "{}\nPriority: {} | Category: {}\nAssignee: {}\nTarget: {}",
                    t.title,
                    t.priority,
                    t.category,
                    t.assignee_display(),
                    t.sla_target_date
                        .map(|d| d.to_rfc3339())
                        .unwrap_or_else(|| "unset".into()),
                ),
            })
            .collect();

        Self {
            card_type: "MessageCard",
            context: "https://schema.org/extensions",
            theme_color,
            title,
            text,
            sections: vec![CardSection { facts }],
        }
    }
}

/// Channel-specific delivery implementation. The webhook adapter is the
/// production implementation; tests substitute recording doubles.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Sends the card, returning Err with a reason on non-success responses
    /// or transport errors.
    async fn send(&self, card: &NotificationCard) -> Result<(), String>;
}

pub struct NotificationDispatcher {
    notifier: Option<Arc<dyn Notifier>>,
    suppress_repeat_warnings: bool,
    /// Highest severity already notified per ticket. Only consulted when
    /// repeat suppression is enabled; pruned each pass so tickets that drop
    /// back to on-track can warn again later.
    notified: Mutex<HashMap<Uuid, BreachState>>,
}

impl NotificationDispatcher {
    pub fn new(notifier: Option<Arc<dyn Notifier>>, suppress_repeat_warnings: bool) -> Self {
        Self {
            notifier,
            suppress_repeat_warnings,
            notified: Mutex::new(HashMap::new()),
        }
    }

    /// Dispatcher with no endpoint configured: every notify call warns and
    /// returns.
    pub fn disabled() -> Self {
        Self::new(None, false)
    }

    /// Sends one batched message for the given tickets. No-ops silently on an
    /// empty batch. Never returns an error: a failed delivery is logged and
    /// dropped, and the next monitor pass re-evaluates and re-sends for
    /// tickets still at risk.
    pub async fn notify(&self, tickets: &[Ticket], imminent: bool) {
        if tickets.is_empty() {
            return;
        }

        let Some(notifier) = &self.notifier else {
            warn!(
                count = tickets.len(),
                "no notification endpoint configured; skipping SLA notification"
            );
            return;
        };

        let severity = if imminent {
            BreachState::Imminent
        } else {
            BreachState::Breached
        };

        let batch: Vec<Ticket> = if self.suppress_repeat_warnings {
            let notified = self.notified.lock().await;
            tickets
                .iter()
                .filter(|t| notified.get(&t.id).map_or(true, |seen| severity > *seen))
                .cloned()
                .collect()
        } else {
            tickets.to_vec()
        };

        if batch.is_empty() {
            return;
        }

        let card = NotificationCard::for_tickets(&batch, imminent);
        match notifier.send(&card).await {
            Ok(()) => {
                info!(count = batch.len(), severity = %severity, "SLA notification sent");
                metrics::increment_counter!("sla_notifications_sent");
                if self.suppress_repeat_warnings {
                    let mut notified = self.notified.lock().await;
                    for ticket in &batch {
                        notified.insert(ticket.id, severity);
                    }
                }
            }
            Err(reason) => {
                error!(count = batch.len(), %reason, "SLA notification delivery failed");
                metrics::increment_counter!("sla_notifications_failed");
            }
        }
    }

    /// Drops watermarks for tickets no longer at risk, so a ticket whose
    /// priority was lowered and later re-escalates is warned about again.
    pub async fn prune_watermarks(&self, at_risk: &HashSet<Uuid>) {
        if !self.suppress_repeat_warnings {
            return;
        }
        self.notified.lock().await.retain(|id, _| at_risk.contains(id));
    }
}
