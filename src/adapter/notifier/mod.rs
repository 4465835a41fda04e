// src/adapter/notifier/mod.rs

pub mod webhook_notifier;

pub use webhook_notifier::WebhookNotifier;
