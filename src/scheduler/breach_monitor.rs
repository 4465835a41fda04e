// src/scheduler/breach_monitor.rs
//! Breach monitor loop
//!
//! Responsibilities:
//! - Periodically re-evaluate every open ticket's SLA state and persist
//!   breach-flag transitions.
//! - Lazily backfill targets for tickets created before a matching policy
//!   existed.
//! - Hand the imminent batch (and, when configured, the breached batch) to
//!   the notification dispatcher.
//! - Survive per-ticket failures within a pass and pass-level failures across
//!   passes; only an explicit shutdown stops the loop.
//!
//! Usage pattern:
//! - Construct with ticket/policy stores, a dispatcher, and a config.
//! - Call `start()` to run the loop in background; it scans immediately, then
//!   sleeps `check_interval` between passes (`recovery_interval` after a
//!   failed pass).
//! - Use `handle.trigger_manual()` to request an immediate extra pass.
//! - Call `handle.shutdown().await` to stop gracefully; the signal is
//!   observed while sleeping and, best-effort, between tickets mid-scan.

use anyhow::Context;
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::{sync::mpsc, task::JoinHandle, time};
use tracing::{debug, error, info, warn};

use crate::config::SlaEngineConfig;
use crate::domain::error::SlaError;
use crate::domain::model::breach_state::BreachState;
use crate::domain::model::ticket::Ticket;
use crate::repository::policy_store::PolicyStore;
use crate::repository::ticket_store::TicketStore;
use crate::service::breach_classifier;
use crate::service::deadline_calculator::DeadlineCalculator;
use crate::service::notification_dispatcher::NotificationDispatcher;

/// Configuration for the monitor loop.
#[derive(Clone)]
pub struct BreachMonitorConfig {
    /// Sleep between successful passes.
    pub check_interval: Duration,
    /// Shortened sleep after a pass fails outright.
    pub recovery_interval: Duration,
    /// Imminence buffer fraction handed to the classifier.
    pub buffer_fraction: f64,
    /// Whether breached tickets also produce an alert batch.
    pub notify_breached: bool,
    /// Channel buffer size for manual triggers.
    pub manual_trigger_buffer: usize,
}

impl Default for BreachMonitorConfig {
    fn default() -> Self {
        Self {
            check_interval: Duration::from_secs(15 * 60),
            recovery_interval: Duration::from_secs(5 * 60),
            buffer_fraction: breach_classifier::DEFAULT_BUFFER_FRACTION,
            notify_breached: false,
            manual_trigger_buffer: 8,
        }
    }
}

impl From<&SlaEngineConfig> for BreachMonitorConfig {
    fn from(cfg: &SlaEngineConfig) -> Self {
        Self {
            check_interval: cfg.check_interval(),
            recovery_interval: cfg.recovery_interval(),
            buffer_fraction: cfg.buffer_fraction,
            notify_breached: cfg.notify_breached,
            manual_trigger_buffer: 8,
        }
    }
}

/// Outcome of a single scan over the open-ticket set.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PassSummary {
    pub evaluated: usize,
    pub on_track: usize,
    pub imminent: usize,
    pub breached: usize,
    /// Tickets skipped because their evaluation failed; the pass continued
    /// with the rest.
    pub failed: usize,
}

/// Handle returned by `start()`; allows manual trigger and shutdown.
pub struct BreachMonitorHandle {
    trigger_tx: mpsc::Sender<()>,
    shutdown_tx: mpsc::Sender<()>,
    halted: Arc<AtomicBool>,
    join_handle: JoinHandle<()>,
}

impl BreachMonitorHandle {
    /// Requests an immediate extra pass (non-blocking).
    pub fn trigger_manual(&self) -> Result<(), String> {
        self.trigger_tx
            .try_send(())
            .map_err(|e| format!("failed to send manual trigger: {e}"))
    }

    /// Stops the loop and waits for the background task to finish. The halt
    /// flag is raised first so a scan in progress bails out between tickets.
    pub async fn shutdown(self) -> anyhow::Result<()> {
        self.halted.store(true, Ordering::SeqCst);
        let _ = self.shutdown_tx.send(()).await;
        self.join_handle.await.context("breach monitor join failed")?;
        Ok(())
    }
}

pub struct BreachMonitor {
    tickets: Arc<dyn TicketStore>,
    calculator: DeadlineCalculator,
    dispatcher: Arc<NotificationDispatcher>,
    config: BreachMonitorConfig,
    halted: Arc<AtomicBool>,
}

impl BreachMonitor {
    pub fn new(
        tickets: Arc<dyn TicketStore>,
        policies: Arc<dyn PolicyStore>,
        dispatcher: Arc<NotificationDispatcher>,
        config: BreachMonitorConfig,
    ) -> Self {
        let calculator = DeadlineCalculator::new(policies, tickets.clone());
        Self {
            tickets,
            calculator,
            dispatcher,
            config,
            halted: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Wires the monitor from an engine config: a webhook notifier when an
    /// endpoint is configured, a disabled dispatcher otherwise.
    pub fn from_engine_config(
        cfg: &SlaEngineConfig,
        tickets: Arc<dyn TicketStore>,
        policies: Arc<dyn PolicyStore>,
    ) -> Self {
        let notifier = cfg.webhook_url.as_ref().map(|url| {
            Arc::new(crate::adapter::notifier::WebhookNotifier::new(url.clone()))
                as Arc<dyn crate::service::notification_dispatcher::Notifier>
        });
        let dispatcher = Arc::new(NotificationDispatcher::new(
            notifier,
            cfg.suppress_repeat_warnings,
        ));
        Self::new(tickets, policies, dispatcher, BreachMonitorConfig::from(cfg))
    }

    /// Starts the loop in background and returns a control handle. The first
    /// pass runs immediately.
    pub fn start(self: Arc<Self>) -> BreachMonitorHandle {
        let (trigger_tx, mut trigger_rx) = mpsc::channel(self.config.manual_trigger_buffer);
        let (shutdown_tx, mut shutdown_rx) = mpsc::channel(1);
        let halted = self.halted.clone();

        let monitor = self.clone();
        let join_handle = tokio::spawn(async move {
            info!(
                check_interval = ?monitor.config.check_interval,
                recovery_interval = ?monitor.config.recovery_interval,
                "breach monitor started"
            );

            loop {
                if monitor.halted.load(Ordering::SeqCst) {
                    break;
                }

                let now = Utc::now();
                let sleep_for = match monitor.run_once(now).await {
                    Ok(summary) => {
                        info!(
                            evaluated = summary.evaluated,
                            imminent = summary.imminent,
                            breached = summary.breached,
                            failed = summary.failed,
                            "SLA scan pass complete"
                        );
                        monitor.config.check_interval
                    }
                    Err(err) => {
                        error!(error = %err, "SLA scan pass failed; retrying after recovery interval");
                        metrics::increment_counter!("sla_monitor_pass_failures");
                        monitor.config.recovery_interval
                    }
                };

                tokio::select! {
                    _ = time::sleep(sleep_for) => {},
                    maybe = trigger_rx.recv() => {
                        match maybe {
                            Some(()) => info!("manual SLA scan trigger received"),
                            None => break,
                        }
                    },
                    _ = shutdown_rx.recv() => {
                        info!("breach monitor shutdown requested");
                        break;
                    }
                }
            }

            info!("breach monitor loop exiting");
        });

        BreachMonitorHandle {
            trigger_tx,
            shutdown_tx,
            halted,
            join_handle,
        }
    }

    /// Runs a single scan over all open tickets against one `now` snapshot,
    /// so a slow pass cannot judge early and late tickets against different
    /// instants.
    pub async fn run_once(&self, now: DateTime<Utc>) -> anyhow::Result<PassSummary> {
        let open = self
            .tickets
            .list_open_tickets()
            .await
            .context("listing open tickets")?;

        let mut summary = PassSummary::default();
        let mut imminent: Vec<Ticket> = Vec::new();
        let mut breached: Vec<Ticket> = Vec::new();
        let mut at_risk: HashSet<uuid::Uuid> = HashSet::new();

        for ticket in open {
            if self.halted.load(Ordering::SeqCst) {
                warn!("SLA scan interrupted by shutdown");
                break;
            }

            let ticket_id = ticket.id;
            match self.evaluate_ticket(ticket, now).await {
                Ok((ticket, state)) => {
                    summary.evaluated += 1;
                    match state {
                        BreachState::OnTrack => summary.on_track += 1,
                        BreachState::Imminent => {
                            summary.imminent += 1;
                            at_risk.insert(ticket_id);
                            imminent.push(ticket);
                        }
                        BreachState::Breached => {
                            summary.breached += 1;
                            at_risk.insert(ticket_id);
                            breached.push(ticket);
                        }
                    }
                }
                Err(err) => {
                    warn!(
                        ticket_id = %ticket_id,
                        error = %err,
                        "ticket evaluation failed; continuing pass"
                    );
                    summary.failed += 1;
                    metrics::increment_counter!("sla_monitor_ticket_failures");
                }
            }
        }

        self.dispatcher.prune_watermarks(&at_risk).await;
        self.dispatcher.notify(&imminent, true).await;
        if self.config.notify_breached {
            self.dispatcher.notify(&breached, false).await;
        }

        Ok(summary)
    }

    /// Backfills a missing target, classifies, and persists any change to the
    /// stored SLA fields. A concurrent delete between fetch and write-back is
    /// tolerated.
    async fn evaluate_ticket(
        &self,
        mut ticket: Ticket,
        now: DateTime<Utc>,
    ) -> Result<(Ticket, BreachState), SlaError> {
        let mut dirty = false;

        if ticket.sla_target_date.is_none() {
            if let Some(target) = self.calculator.compute_target(&ticket).await? {
                ticket.sla_target_date = Some(target);
                dirty = true;
            }
        }

        let state = breach_classifier::classify(&ticket, now, self.config.buffer_fraction);
        let breached = state == BreachState::Breached;
        if ticket.is_sla_breach != breached {
            ticket.is_sla_breach = breached;
            dirty = true;
        }

        if dirty {
            match self.tickets.save_ticket(ticket.clone()).await {
                Ok(()) => {}
                Err(err) if err.is_benign_race() => {
                    debug!(ticket_id = %ticket.id, "ticket deleted mid-pass; skipping write-back");
                }
                Err(err) => return Err(err),
            }
        }

        Ok((ticket, state))
    }
}
