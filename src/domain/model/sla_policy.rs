// src/domain/model/sla_policy.rs
//! SLA policy record: the (priority, category) → resolution-window mapping.
//!
//! Policies are created and edited by administrators through the excluded
//! CRUD layer; the engine reads them only. The external store enforces the
//! "at most one active policy per key" uniqueness constraint, but duplicates
//! may exist transiently and the engine must tolerate them (see the policy
//! store's tie-break).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::error::SlaError;
use crate::domain::model::ticket::{Category, Priority};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlaPolicy {
    pub id: Uuid,
    pub priority: Priority,
    pub category: Category,
    /// Minutes allowed for first response. Carried on the record but unused
    /// by breach tracking, which keys off the resolution window.
    pub response_time_minutes: i64,
    /// Minutes allowed for resolution; defines the ticket's SLA window.
    pub resolution_time_minutes: i64,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SlaPolicy {
    /// Builds an active policy, rejecting non-positive windows up front so a
    /// zero-minute policy never enters the table through this crate.
    pub fn new(
        priority: Priority,
        category: Category,
        response_time_minutes: i64,
        resolution_time_minutes: i64,
    ) -> Result<Self, SlaError> {
        if response_time_minutes <= 0 || resolution_time_minutes <= 0 {
            return Err(SlaError::InvalidPolicyWindow {
                priority,
                category,
                resolution_time_minutes,
            });
        }
        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            priority,
            category,
            response_time_minutes,
            resolution_time_minutes,
            active: true,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn matches(&self, priority: Priority, category: Category) -> bool {
        self.priority == priority && self.category == category
    }
}
