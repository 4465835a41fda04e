// src/repository/policy_store.rs
//! Policy table access.
//!
//! The SLA policy table lives in the external store and is read-only from the
//! engine's perspective. `PolicyStore` is the trait the engine consumes;
//! `InMemoryPolicyStore` is the concurrency-safe implementation used for
//! tests and local development.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::warn;

use crate::domain::error::SlaError;
use crate::domain::model::sla_policy::SlaPolicy;
use crate::domain::model::ticket::{Category, Priority};

#[async_trait]
pub trait PolicyStore: Send + Sync {
    /// Returns the active policy for the key, or `None` when the key is not
    /// covered. Absence is not an error: the ticket is simply exempt from
    /// tracking until a policy is added.
    ///
    /// If more than one active policy matches (a transient data-integrity
    /// anomaly; the store's uniqueness constraint should prevent it), the
    /// first in the store's natural order is returned and a warning is
    /// logged. No semantic disambiguation is attempted.
    async fn find_active_policy(
        &self,
        priority: Priority,
        category: Category,
    ) -> Result<Option<SlaPolicy>, SlaError>;

    /// Full table dump, for diagnostics.
    async fn list_policies(&self) -> Result<Vec<SlaPolicy>, SlaError>;
}

/// Insertion-ordered in-memory policy table.
#[derive(Default)]
pub struct InMemoryPolicyStore {
    policies: Arc<RwLock<Vec<SlaPolicy>>>,
}

impl InMemoryPolicyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, policy: SlaPolicy) {
        self.policies.write().await.push(policy);
    }

    pub async fn deactivate(&self, id: uuid::Uuid) {
        let mut policies = self.policies.write().await;
        if let Some(policy) = policies.iter_mut().find(|p| p.id == id) {
            policy.active = false;
            policy.updated_at = chrono::Utc::now();
        }
    }
}

#[async_trait]
impl PolicyStore for InMemoryPolicyStore {
    async fn find_active_policy(
        &self,
        priority: Priority,
        category: Category,
    ) -> Result<Option<SlaPolicy>, SlaError> {
        let policies = self.policies.read().await;
        let mut matches = policies
            .iter()
            .filter(|p| p.active && p.matches(priority, category));

        let first = matches.next().cloned();
        if first.is_some() && matches.next().is_some() {
            warn!(
                %priority, %category,
                "multiple active SLA policies match; using the first by store order"
            );
        }
        Ok(first)
    }

    async fn list_policies(&self) -> Result<Vec<SlaPolicy>, SlaError> {
        Ok(self.policies.read().await.clone())
    }
}
