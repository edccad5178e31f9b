//! Notification port invoked when an order is finished

use crate::core::error::NotificationError;
use crate::core::events::{EventBus, EventEnvelope, OrderEvent};
use crate::core::order::Order;
use async_trait::async_trait;

/// Delivers "your order is ready" messages through some channel.
///
/// Errors are reported to the caller, which logs them; a failed notification
/// never affects the stored order.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, order: &Order) -> Result<(), NotificationError>;

    /// Name of the channel, used in logs
    fn channel(&self) -> &str;
}

/// Writes the notification to the log
#[derive(Debug, Clone)]
pub struct LogNotifier {
    channel: String,
}

impl LogNotifier {
    pub fn new(channel: impl Into<String>) -> Self {
        Self {
            channel: channel.into(),
        }
    }
}

impl Default for LogNotifier {
    fn default() -> Self {
        Self::new("whatsapp")
    }
}

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, order: &Order) -> Result<(), NotificationError> {
        tracing::info!(
            order_id = %order.id,
            channel = %self.channel,
            "send notification of order {} through client {}",
            order.id,
            self.channel
        );
        Ok(())
    }

    fn channel(&self) -> &str {
        &self.channel
    }
}

/// Publishes an [`OrderEvent::Finished`] on an [`EventBus`]
#[derive(Debug, Clone)]
pub struct EventBusNotifier {
    bus: EventBus,
    channel: String,
}

impl EventBusNotifier {
    pub fn new(bus: EventBus, channel: impl Into<String>) -> Self {
        Self {
            bus,
            channel: channel.into(),
        }
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }
}

#[async_trait]
impl Notifier for EventBusNotifier {
    async fn notify(&self, order: &Order) -> Result<(), NotificationError> {
        let envelope = EventEnvelope::new(
            self.channel.clone(),
            OrderEvent::Finished {
                order: order.clone(),
            },
        );
        let receivers = self.bus.publish(envelope);
        tracing::debug!(order_id = %order.id, receivers, "published finished order event");
        Ok(())
    }

    fn channel(&self) -> &str {
        &self.channel
    }
}
