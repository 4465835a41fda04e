// src/domain/model/ticket.rs
//! Ticket model as seen by the SLA engine.
//!
//! The ticket record is owned by the external ticket store; the engine only
//! reads it and writes back `sla_target_date` and `is_sla_breach`. All other
//! lifecycle fields (assignment, status edits) belong to the excluded CRUD
//! layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Ticket priority, one axis of the SLA policy key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Priority {
    Low,
    Medium,
    High,
    Critical,
    Emergency,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
            Priority::Critical => "Critical",
            Priority::Emergency => "Emergency",
        };
        f.write_str(s)
    }
}

/// Ticket category, the other axis of the SLA policy key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Incident,
    Access,
    NewResource,
    Change,
    Alert,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Category::Incident => "Incident",
            Category::Access => "Access",
            Category::NewResource => "New Resource",
            Category::Change => "Change",
            Category::Alert => "Alert",
        };
        f.write_str(s)
    }
}

/// Ticket workflow status. Only the open/closed distinction matters to the
/// engine: `Resolved` and `Closed` tickets are permanently exempt from SLA
/// tracking, even when their target has technically passed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TicketStatus {
    Open,
    InProgress,
    OnHold,
    Resolved,
    Closed,
}

impl TicketStatus {
    pub fn is_open(&self) -> bool {
        !matches!(self, TicketStatus::Resolved | TicketStatus::Closed)
    }
}

/// Subset of the ticket record relevant to SLA tracking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ticket {
    pub id: Uuid,
    pub title: String,
    pub priority: Priority,
    pub category: Category,
    /// Display name of the assignee, if any. Only used when formatting
    /// notifications.
    pub assignee: Option<String>,
    /// UTC creation timestamp. Deadline recalculation after a priority or
    /// category edit always starts from this value, never from the edit time.
    pub created_at: DateTime<Utc>,
    /// Computed resolution deadline. `None` means no active policy matched
    /// and the ticket is exempt from tracking.
    pub sla_target_date: Option<DateTime<Utc>>,
    /// Derived flag, persisted for querying but always re-derivable from
    /// `sla_target_date` and the clock.
    pub is_sla_breach: bool,
    pub status: TicketStatus,
}

impl Ticket {
    pub fn new(
        title: impl Into<String>,
        priority: Priority,
        category: Category,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            priority,
            category,
            assignee: None,
            created_at,
            sla_target_date: None,
            is_sla_breach: false,
            status: TicketStatus::Open,
        }
    }

    /// Assignee name for display, substituting the conventional placeholder.
    pub fn assignee_display(&self) -> &str {
        self.assignee.as_deref().unwrap_or("Unassigned")
    }
}
