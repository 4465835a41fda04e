// src/service/mod.rs

pub mod breach_classifier;
pub mod deadline_calculator;
pub mod notification_dispatcher;

pub use deadline_calculator::DeadlineCalculator;
pub use notification_dispatcher::{NotificationDispatcher, Notifier};
