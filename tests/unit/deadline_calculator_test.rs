// tests/unit/deadline_calculator_test.rs

use chrono::{Duration, TimeZone, Utc};
use sla_engine::repository::{InMemoryPolicyStore, InMemoryTicketStore, TicketStore};
use sla_engine::service::DeadlineCalculator;
use sla_engine::{Category, Priority, SlaPolicy, Ticket};
use std::sync::Arc;

async fn stores_with_policies(
    policies: Vec<SlaPolicy>,
) -> (Arc<InMemoryPolicyStore>, Arc<InMemoryTicketStore>) {
    let policy_store = Arc::new(InMemoryPolicyStore::new());
    for policy in policies {
        policy_store.insert(policy).await;
    }
    (policy_store, Arc::new(InMemoryTicketStore::new()))
}

#[tokio::test]
async fn determinism_for_fixed_inputs() {
    let (policies, tickets) = stores_with_policies(vec![
        SlaPolicy::new(Priority::Medium, Category::Change, 60, 720).unwrap(),
    ])
    .await;
    let calc = DeadlineCalculator::new(policies, tickets);

    let created = Utc.with_ymd_and_hms(2026, 4, 10, 8, 0, 0).unwrap();
    let ticket = Ticket::new("firewall change", Priority::Medium, Category::Change, created);

    let expected = created + Duration::minutes(720);
    for _ in 0..5 {
        assert_eq!(calc.compute_target(&ticket).await.unwrap(), Some(expected));
    }
}

#[tokio::test]
async fn no_policy_means_no_target_and_no_breach() {
    let (policies, tickets) = stores_with_policies(vec![]).await;
    let calc = DeadlineCalculator::new(policies, tickets.clone());

    let created = Utc.with_ymd_and_hms(2026, 4, 10, 8, 0, 0).unwrap();
    let ticket = Ticket::new("uncovered", Priority::Low, Category::Alert, created);
    tickets.insert(ticket.clone()).await;

    // Even a year later the ticket stays unset and unbreached.
    let saved = calc
        .recalculate_and_save(ticket, created + Duration::days(365))
        .await
        .unwrap();
    assert!(saved.sla_target_date.is_none());
    assert!(!saved.is_sla_breach);
}

#[tokio::test]
async fn duplicate_active_policies_pick_store_order() {
    let keep = SlaPolicy::new(Priority::High, Category::Incident, 30, 120).unwrap();
    let keep_window = keep.resolution_time_minutes;
    let (policies, tickets) = stores_with_policies(vec![
        keep,
        SlaPolicy::new(Priority::High, Category::Incident, 30, 999).unwrap(),
    ])
    .await;
    let calc = DeadlineCalculator::new(policies, tickets);

    let created = Utc.with_ymd_and_hms(2026, 4, 10, 8, 0, 0).unwrap();
    let ticket = Ticket::new("dup key", Priority::High, Category::Incident, created);
    assert_eq!(
        calc.compute_target(&ticket).await.unwrap(),
        Some(created + Duration::minutes(keep_window))
    );
}

#[tokio::test]
async fn write_back_persists_target_and_derived_flag() {
    let (policies, tickets) = stores_with_policies(vec![
        SlaPolicy::new(Priority::Critical, Category::Incident, 15, 240).unwrap(),
    ])
    .await;
    let calc = DeadlineCalculator::new(policies, tickets.clone());

    let created = Utc.with_ymd_and_hms(2026, 4, 10, 8, 0, 0).unwrap();
    let ticket = Ticket::new("sev1", Priority::Critical, Category::Incident, created);
    let id = ticket.id;
    tickets.insert(ticket.clone()).await;

    calc.recalculate_and_save(ticket, created).await.unwrap();

    let stored = tickets.get_ticket(id).await.unwrap().unwrap();
    assert_eq!(stored.sla_target_date, Some(created + Duration::minutes(240)));
    assert!(!stored.is_sla_breach);
}
