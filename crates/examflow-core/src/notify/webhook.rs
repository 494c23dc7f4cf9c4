//! Webhook notifier -- post reminders to a Discord-compatible webhook.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use url::Url;

use super::{Notifier, ReminderNotice};
use crate::error::NotifyError;

pub struct WebhookNotifier {
    url: Url,
    client: Client,
}

impl WebhookNotifier {
    /// Build a notifier for a user-provided webhook URL.
    pub fn new(url: &str) -> Result<Self, NotifyError> {
        let url = Url::parse(url).map_err(|e| NotifyError::InvalidWebhook(e.to_string()))?;
        if url.scheme() != "https" && url.scheme() != "http" {
            return Err(NotifyError::InvalidWebhook(format!(
                "unsupported scheme '{}'",
                url.scheme()
            )));
        }
        Ok(Self {
            url,
            client: Client::new(),
        })
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    fn name(&self) -> &str {
        "webhook"
    }

    async fn notify(&self, notice: &ReminderNotice) -> Result<(), NotifyError> {
        // "content" keeps the payload Discord-compatible; the extra
        // fields let custom receivers dedupe on the tag themselves.
        let body = json!({
            "content": format!("**{}**\n{}", notice.title, notice.body),
            "tag": notice.tag,
            "subject": notice.subject,
            "days_left": notice.days_left,
        });

        let resp = self
            .client
            .post(self.url.clone())
            .json(&body)
            .send()
            .await
            .map_err(|e| NotifyError::DeliveryFailed(e.to_string()))?;

        if resp.status().is_success() || resp.status().as_u16() == 204 {
            Ok(())
        } else {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            Err(NotifyError::DeliveryFailed(format!(
                "webhook error (HTTP {status}): {text}"
            )))
        }
    }
}
