//! In-process event bus for order notifications
//!
//! The EventBus uses `tokio::sync::broadcast` to decouple the service from
//! whoever wants to react to finished orders (a push gateway, a kitchen
//! display, a test).
//!
//! ```text
//! OrderService::update_order ──▶ EventBusNotifier ──▶ EventBus::publish() ──▶ subscribers
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! let event_bus = EventBus::new(1024);
//! let mut rx = event_bus.subscribe();
//!
//! event_bus.publish(EventEnvelope::new("whatsapp", OrderEvent::Finished { order }));
//!
//! if let Ok(envelope) = rx.recv().await {
//!     println!("order {} finished", envelope.event.order_id());
//! }
//! ```

use crate::core::order::Order;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

/// Events emitted by the order service
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum OrderEvent {
    /// An order reached the `FINISHED` status
    Finished { order: Order },
}

impl OrderEvent {
    pub fn order_id(&self) -> Uuid {
        match self {
            OrderEvent::Finished { order } => order.id,
        }
    }

    /// Get the action name
    pub fn action(&self) -> &str {
        match self {
            OrderEvent::Finished { .. } => "finished",
        }
    }
}

/// Envelope wrapping an order event with metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventEnvelope {
    /// Unique event ID
    pub id: Uuid,
    /// When the event was published
    pub timestamp: DateTime<Utc>,
    /// Notification channel the event was published for
    pub channel: String,
    pub event: OrderEvent,
}

impl EventEnvelope {
    pub fn new(channel: impl Into<String>, event: OrderEvent) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            channel: channel.into(),
            event,
        }
    }
}

/// Broadcast-based event bus
///
/// The bus is cheap to clone and can be shared across threads.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<EventEnvelope>,
}

impl EventBus {
    /// Create a new EventBus with the given channel capacity
    ///
    /// The capacity determines how many events can be buffered before
    /// slow receivers start losing events (lagged).
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an envelope to all subscribers
    ///
    /// Never blocks. If there are no subscribers the event is dropped.
    /// Returns the number of receivers that will receive the event.
    pub fn publish(&self, envelope: EventEnvelope) -> usize {
        self.sender.send(envelope).unwrap_or(0)
    }

    /// Subscribe to events published after this call
    pub fn subscribe(&self) -> broadcast::Receiver<EventEnvelope> {
        self.sender.subscribe()
    }

    /// Get the current number of active subscribers
    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(1024)
    }
}
