use crate::application::sinks::{Notification, Notifier};
use crate::infrastructure::config::WebhookSettings;
use anyhow::{Context, Result};
use async_trait::async_trait;

/// Posts each notification as a flat JSON object to a webhook URL.
pub struct WebhookNotifier {
    client: reqwest::Client,
    url: String,
}

impl WebhookNotifier {
    /// Creates a new `WebhookNotifier`.
    ///
    /// Returns `None` when no URL is configured, so callers can fall back to
    /// a disabled notifier.
    pub fn new(settings: &WebhookSettings, client: reqwest::Client) -> Option<Self> {
        match settings.url.as_deref().map(str::trim) {
            Some(url) if !url.is_empty() => Some(Self {
                client,
                url: url.to_string(),
            }),
            _ => {
                tracing::warn!("Webhook notifier is not configured (missing url).");
                None
            }
        }
    }

    async fn post(&self, notification: &Notification) -> Result<()> {
        let response = self
            .client
            .post(&self.url)
            .json(&notification.to_json())
            .send()
            .await
            .context("Failed to send webhook request")?;

        if !response.status().is_success() {
            anyhow::bail!("Webhook returned status {}", response.status());
        }

        Ok(())
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn notify(&self, notification: Notification) {
        if let Err(e) = self.post(&notification).await {
            tracing::error!(event = %notification.event, error = %format!("{:#}", e), "Webhook notification failed");
        }
    }
}
