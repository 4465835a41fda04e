// src/adapter/notifier/webhook_notifier.rs
//! Webhook delivery channel: one HTTP POST with the card as JSON body.

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use crate::service::notification_dispatcher::{NotificationCard, Notifier};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

pub struct WebhookNotifier {
    client: Client,
    endpoint: String,
}

impl WebhookNotifier {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn send(&self, card: &NotificationCard) -> Result<(), String> {
        let response = self
            .client
            .post(&self.endpoint)
            .timeout(REQUEST_TIMEOUT)
            .json(card)
            .send()
            .await
            .map_err(|e| format!("webhook request failed: {e}"))?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(format!("webhook returned {status}: {body}"))
        }
    }
}
