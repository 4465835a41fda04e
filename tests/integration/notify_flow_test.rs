// tests/integration/notify_flow_test.rs
//! Dispatcher behavior as seen from a full monitor pass: disabled endpoints,
//! failing deliveries, and repeat-suppression across passes.

use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, TimeZone, Utc};
use sla_engine::service::notification_dispatcher::{NotificationCard, Notifier};
use sla_engine::repository::{InMemoryPolicyStore, InMemoryTicketStore};
use sla_engine::service::NotificationDispatcher;
use sla_engine::{BreachMonitor, BreachMonitorConfig, Category, Priority, SlaPolicy, Ticket};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

struct CountingNotifier {
    sent: AtomicUsize,
    fail: bool,
}

#[async_trait]
impl Notifier for CountingNotifier {
    async fn send(&self, _card: &NotificationCard) -> Result<(), String> {
        if self.fail {
            return Err("endpoint unreachable".into());
        }
        self.sent.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

fn test_config() -> BreachMonitorConfig {
    BreachMonitorConfig {
        check_interval: Duration::from_secs(3600),
        recovery_interval: Duration::from_secs(60),
        ..BreachMonitorConfig::default()
    }
}

async fn imminent_fixture() -> (Arc<InMemoryPolicyStore>, Arc<InMemoryTicketStore>, chrono::DateTime<Utc>) {
    let policies = Arc::new(InMemoryPolicyStore::new());
    policies
        .insert(SlaPolicy::new(Priority::Critical, Category::Incident, 15, 240).unwrap())
        .await;
    let tickets = Arc::new(InMemoryTicketStore::new());

    let created = Utc.with_ymd_and_hms(2026, 4, 12, 10, 0, 0).unwrap();
    let mut ticket = Ticket::new("disk filling", Priority::Critical, Category::Incident, created);
    ticket.assignee = Some("kim".into());
    tickets.insert(ticket).await;

    // Five minutes from target, inside the 24-minute buffer.
    (policies, tickets, created + ChronoDuration::minutes(235))
}

#[tokio::test]
async fn unset_endpoint_completes_pass_without_delivery() {
    let (policies, tickets, now) = imminent_fixture().await;
    let monitor = BreachMonitor::new(
        tickets,
        policies,
        Arc::new(NotificationDispatcher::disabled()),
        test_config(),
    );

    // The pass must stay healthy: classification happens, nothing is sent,
    // and no error reaches the caller.
    let summary = monitor.run_once(now).await.unwrap();
    assert_eq!(summary.imminent, 1);
    assert_eq!(summary.failed, 0);
}

#[tokio::test]
async fn delivery_failure_never_fails_the_pass() {
    let (policies, tickets, now) = imminent_fixture().await;
    let notifier = Arc::new(CountingNotifier {
        sent: AtomicUsize::new(0),
        fail: true,
    });
    let dispatcher = Arc::new(NotificationDispatcher::new(Some(notifier.clone()), false));
    let monitor = BreachMonitor::new(tickets, policies, dispatcher, test_config());

    let summary = monitor.run_once(now).await.unwrap();
    assert_eq!(summary.imminent, 1);
    assert_eq!(notifier.sent.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn repeat_suppression_holds_across_passes_until_escalation() {
    let (policies, tickets, now) = imminent_fixture().await;
    let notifier = Arc::new(CountingNotifier {
        sent: AtomicUsize::new(0),
        fail: false,
    });
    let dispatcher = Arc::new(NotificationDispatcher::new(Some(notifier.clone()), true));
    let config = BreachMonitorConfig {
        notify_breached: true,
        ..test_config()
    };
    let monitor = BreachMonitor::new(tickets, policies, dispatcher, config);

    // Two imminent passes: only the first one notifies.
    monitor.run_once(now).await.unwrap();
    monitor.run_once(now + ChronoDuration::minutes(1)).await.unwrap();
    assert_eq!(notifier.sent.load(Ordering::SeqCst), 1);

    // Crossing into breached is an escalation and notifies again.
    monitor.run_once(now + ChronoDuration::minutes(10)).await.unwrap();
    assert_eq!(notifier.sent.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn without_suppression_each_pass_renotifies() {
    let (policies, tickets, now) = imminent_fixture().await;
    let notifier = Arc::new(CountingNotifier {
        sent: AtomicUsize::new(0),
        fail: false,
    });
    let dispatcher = Arc::new(NotificationDispatcher::new(Some(notifier.clone()), false));
    let monitor = BreachMonitor::new(tickets, policies, dispatcher, test_config());

    monitor.run_once(now).await.unwrap();
    monitor.run_once(now + ChronoDuration::minutes(1)).await.unwrap();
    assert_eq!(notifier.sent.load(Ordering::SeqCst), 2);
}
