// src/service/deadline_calculator.rs
//! Deadline calculator: policy lookup plus target write-back.
//!
//! `compute_target` is the pure part; the `recalculate*` helpers apply the
//! target and a freshly derived breach flag to the ticket record. The host
//! invokes `recalculate_and_save` on ticket creation and whenever priority or
//! category changes; the monitor loop uses `compute_target` for lazy backfill
//! of tickets created before a matching policy existed.

use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use tracing::{debug, info};

use crate::domain::error::SlaError;
use crate::domain::model::ticket::Ticket;
use crate::repository::policy_store::PolicyStore;
use crate::repository::ticket_store::TicketStore;
use crate::service::breach_classifier;

pub struct DeadlineCalculator {
    policies: Arc<dyn PolicyStore>,
    tickets: Arc<dyn TicketStore>,
}

impl DeadlineCalculator {
    pub fn new(policies: Arc<dyn PolicyStore>, tickets: Arc<dyn TicketStore>) -> Self {
        Self { policies, tickets }
    }

    /// Computes the resolution deadline for a ticket, or `None` when no
    /// active policy covers its (priority, category). Always anchored at the
    /// ticket's original `created_at`, never at the current time.
    pub async fn compute_target(&self, ticket: &Ticket) -> Result<Option<DateTime<Utc>>, SlaError> {
        let policy = self
            .policies
            .find_active_policy(ticket.priority, ticket.category)
            .await?;

        match policy {
            Some(policy) => Ok(Some(
                ticket.created_at + Duration::minutes(policy.resolution_time_minutes),
            )),
            None => {
                info!(
                    ticket_id = %ticket.id,
                    priority = %ticket.priority,
                    category = %ticket.category,
                    "no active SLA policy; ticket is untracked"
                );
                Ok(None)
            }
        }
    }

    /// Recomputes the target and breach flag in place.
    pub async fn recalculate(
        &self,
        ticket: &mut Ticket,
        now: DateTime<Utc>,
    ) -> Result<(), SlaError> {
        ticket.sla_target_date = self.compute_target(ticket).await?;
        ticket.is_sla_breach = breach_classifier::is_breached(ticket, now);
        Ok(())
    }

    /// Recomputes and persists the SLA fields. A ticket deleted since fetch
    /// is a benign race: the updated entity is still returned so the caller
    /// can keep working with it.
    pub async fn recalculate_and_save(
        &self,
        mut ticket: Ticket,
        now: DateTime<Utc>,
    ) -> Result<Ticket, SlaError> {
        self.recalculate(&mut ticket, now).await?;
        match self.tickets.save_ticket(ticket.clone()).await {
            Ok(()) => Ok(ticket),
            Err(err) if err.is_benign_race() => {
                debug!(ticket_id = %ticket.id, "ticket deleted before SLA write-back");
                Ok(ticket)
            }
            Err(err) => Err(err),
        }
    }
}
