// src/repository/ticket_store.rs
//! Ticket store abstractions.
//!
//! The engine consumes the `TicketStore` trait: list the open set, fetch one
//! record, write back the SLA fields. It must not assume exclusive write
//! access — another process may edit a ticket's priority or delete it between
//! our fetch and write-back, so `save_ticket` reports a missing record as
//! `SlaError::TicketNotFound` and callers treat that as a benign race.
//!
//! `InMemoryTicketStore` is the Tokio-lock-backed implementation for tests
//! and local development.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::error::SlaError;
use crate::domain::model::ticket::Ticket;

#[async_trait]
pub trait TicketStore: Send + Sync {
    /// Every ticket whose status is not Resolved or Closed.
    async fn list_open_tickets(&self) -> Result<Vec<Ticket>, SlaError>;

    async fn get_ticket(&self, id: Uuid) -> Result<Option<Ticket>, SlaError>;

    /// Writes the record back. Fails with `TicketNotFound` when the ticket
    /// was deleted since it was fetched.
    async fn save_ticket(&self, ticket: Ticket) -> Result<(), SlaError>;
}

#[derive(Default)]
pub struct InMemoryTicketStore {
    tickets: Arc<RwLock<HashMap<Uuid, Ticket>>>,
}

impl InMemoryTicketStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds or replaces a record, bypassing the save-must-exist rule.
    pub async fn insert(&self, ticket: Ticket) {
        self.tickets.write().await.insert(ticket.id, ticket);
    }

    pub async fn remove(&self, id: Uuid) {
        self.tickets.write().await.remove(&id);
    }
}

#[async_trait]
impl TicketStore for InMemoryTicketStore {
    async fn list_open_tickets(&self) -> Result<Vec<Ticket>, SlaError> {
        let tickets = self.tickets.read().await;
        let mut open: Vec<Ticket> = tickets
            .values()
            .filter(|t| t.status.is_open())
            .cloned()
            .collect();
        // Stable scan order for deterministic passes.
        open.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(open)
    }

    async fn get_ticket(&self, id: Uuid) -> Result<Option<Ticket>, SlaError> {
        Ok(self.tickets.read().await.get(&id).cloned())
    }

    async fn save_ticket(&self, ticket: Ticket) -> Result<(), SlaError> {
        let mut tickets = self.tickets.write().await;
        match tickets.get_mut(&ticket.id) {
            Some(existing) => {
                *existing = ticket;
                Ok(())
            }
            None => Err(SlaError::TicketNotFound(ticket.id)),
        }
    }
}
