// tests/unit/breach_classifier_test.rs

use chrono::{Duration, TimeZone, Utc};
use sla_engine::service::breach_classifier::{classify, DEFAULT_BUFFER_FRACTION};
use sla_engine::{BreachState, Category, Priority, Ticket};

fn ticket_with_target(window_minutes: i64) -> Ticket {
    let created = Utc.with_ymd_and_hms(2026, 4, 10, 8, 0, 0).unwrap();
    let mut ticket = Ticket::new("payment api down", Priority::Critical, Category::Incident, created);
    ticket.sla_target_date = Some(created + Duration::minutes(window_minutes));
    ticket
}

#[test]
fn untracked_ticket_stays_on_track_for_any_clock() {
    let created = Utc.with_ymd_and_hms(2026, 4, 10, 8, 0, 0).unwrap();
    let ticket = Ticket::new("odd combo", Priority::Emergency, Category::Alert, created);
    for days in [0, 1, 30, 365] {
        assert_eq!(
            classify(&ticket, created + Duration::days(days), DEFAULT_BUFFER_FRACTION),
            BreachState::OnTrack
        );
    }
}

#[test]
fn sixty_minute_window_six_minutes_left_is_imminent() {
    // The buffer boundary is inclusive: remaining == 10% of the window
    // already counts as imminent.
    let ticket = ticket_with_target(60);
    let now = ticket.sla_target_date.unwrap() - Duration::minutes(6);
    assert_eq!(classify(&ticket, now, 0.10), BreachState::Imminent);
}

#[test]
fn classification_is_monotonic_in_now() {
    let ticket = ticket_with_target(120);
    let created = ticket.created_at;
    let states: Vec<BreachState> = (0..=130)
        .map(|m| classify(&ticket, created + Duration::minutes(m), 0.10))
        .collect();
    for window in states.windows(2) {
        assert!(window[1] >= window[0]);
    }
    assert_eq!(states[0], BreachState::OnTrack);
    assert_eq!(*states.last().unwrap(), BreachState::Breached);
}

#[test]
fn exact_target_instant_is_breached() {
    let ticket = ticket_with_target(60);
    assert_eq!(
        classify(&ticket, ticket.sla_target_date.unwrap(), 0.10),
        BreachState::Breached
    );
}

#[test]
fn custom_buffer_fraction_widens_the_imminent_band() {
    let ticket = ticket_with_target(100);
    let created = ticket.created_at;
    // 25% buffer on a 100-minute window: 25 minutes remaining is imminent,
    // 26 is not.
    assert_eq!(
        classify(&ticket, created + Duration::minutes(75), 0.25),
        BreachState::Imminent
    );
    assert_eq!(
        classify(&ticket, created + Duration::minutes(74), 0.25),
        BreachState::OnTrack
    );
}
