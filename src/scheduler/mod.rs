// src/scheduler/mod.rs

pub mod breach_monitor;

pub use breach_monitor::{BreachMonitor, BreachMonitorConfig, BreachMonitorHandle, PassSummary};
