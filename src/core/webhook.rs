//! HTTP webhook notifier
//!
//! Gated behind the `webhook` feature. The finished order is POSTed as JSON
//! to a configured URL; any non-2xx answer counts as a rejected notification.

use crate::core::error::NotificationError;
use crate::core::notify::Notifier;
use crate::core::order::Order;
use async_trait::async_trait;
use reqwest::Client;

#[derive(Clone, Debug)]
pub struct WebhookNotifier {
    url: String,
    channel: String,
    http_client: Client,
}

impl WebhookNotifier {
    pub fn new(url: impl Into<String>, channel: impl Into<String>) -> Self {
        Self::with_client(Client::new(), url, channel)
    }

    pub fn with_client(
        http_client: Client,
        url: impl Into<String>,
        channel: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            channel: channel.into(),
            http_client,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn notify(&self, order: &Order) -> Result<(), NotificationError> {
        let response = self
            .http_client
            .post(&self.url)
            .header("X-Notification-Channel", &self.channel)
            .json(order)
            .send()
            .await
            .map_err(|e| NotificationError::Unavailable {
                channel: self.channel.clone(),
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(NotificationError::Rejected {
                channel: self.channel.clone(),
                status: status.as_u16(),
            });
        }

        tracing::info!(order_id = %order.id, channel = %self.channel, "webhook notification delivered");
        Ok(())
    }

    fn channel(&self) -> &str {
        &self.channel
    }
}
