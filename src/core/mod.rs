//! Core module containing the order domain, its ports and the service

pub mod clock;
pub mod critical;
pub mod error;
pub mod events;
pub mod notify;
pub mod order;
pub mod priority;
pub mod service;
pub mod store;
pub mod validation;
#[cfg(feature = "webhook")]
pub mod webhook;

pub use clock::{Clock, FixedClock, SystemClock};
pub use critical::{WriteGate, WriteGuard};
pub use error::{ListScope, NotificationError, OrderError, OrderResult, StoreError, ValidationError};
pub use events::{EventBus, EventEnvelope, OrderEvent};
pub use notify::{EventBusNotifier, LogNotifier, Notifier};
pub use order::{NewOrder, Order, OrderSource, OrderStatus, OrderType};
pub use priority::{DayWindow, DayZone, PriorityPolicy, PriorityRule};
pub use service::{DispatchMode, OrderService};
pub use store::OrderStore;
pub use validation::{RequestValidator, ValidatedJson};
#[cfg(feature = "webhook")]
pub use webhook::WebhookNotifier;
