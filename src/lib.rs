// src/lib.rs
//! SLA tracking and breach-notification engine.
//!
//! The engine wraps three small pieces of temporal logic around external
//! ticket and policy stores:
//!
//! - a deadline calculator that turns a ticket's (priority, category) and the
//!   active policy table into a resolution target timestamp;
//! - a pure breach classifier applying the percentage-of-time-remaining rule
//!   (on-track / imminent / breached, inclusive buffer boundary);
//! - a recurring monitor loop that re-evaluates every open ticket against one
//!   clock snapshot per pass, persists breach-flag transitions, and hands
//!   at-risk batches to a webhook notification dispatcher.
//!
//! The host process owns ticket CRUD, persistence, and HTTP surfaces; it
//! embeds this crate by implementing [`repository::TicketStore`] and
//! [`repository::PolicyStore`], then starting a
//! [`scheduler::BreachMonitor`]:
//!
//! ```no_run
//! use std::sync::Arc;
//! use sla_engine::config::SlaEngineConfig;
//! use sla_engine::repository::{InMemoryPolicyStore, InMemoryTicketStore};
//! use sla_engine::scheduler::BreachMonitor;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let cfg = SlaEngineConfig::default();
//! let tickets = Arc::new(InMemoryTicketStore::new());
//! let policies = Arc::new(InMemoryPolicyStore::new());
//!
//! let monitor = Arc::new(BreachMonitor::from_engine_config(&cfg, tickets, policies));
//! let handle = monitor.start();
//! // ... host runs ...
//! handle.shutdown().await?;
//! # Ok(())
//! # }
//! ```

pub mod adapter;
pub mod config;
pub mod domain;
pub mod repository;
pub mod scheduler;
pub mod service;
pub mod telemetry;

pub use config::SlaEngineConfig;
pub use domain::error::SlaError;
pub use domain::model::{BreachState, Category, Priority, SlaPolicy, Ticket, TicketStatus};
pub use scheduler::{BreachMonitor, BreachMonitorConfig, BreachMonitorHandle, PassSummary};
pub use service::{DeadlineCalculator, NotificationDispatcher, Notifier};
