//! # order-service
//!
//! Order-management REST service for a small food-service business.
//! Clients submit orders, query active or historical orders and update their
//! status or priority; finishing an order triggers a customer notification.
//!
//! ## Features
//!
//! - **Daily priorities**: each new order gets the next number of the current
//!   calendar day, assigned inside a per-store critical section
//! - **Pluggable persistence**: in-memory store by default, PostgreSQL behind
//!   the `postgres` feature, both honoring one [`OrderStore`](core::OrderStore) contract
//! - **Finish notifications**: log, in-process event bus, or HTTP webhook
//!   (`webhook` feature), delivered inline or in the background
//! - **Typed errors**: one closed error set mapped to HTTP status codes at the edge
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use order_service::prelude::*;
//!
//! let app = ServerBuilder::new()
//!     .with_store(InMemoryOrderStore::default())
//!     .with_notifier(LogNotifier::new("whatsapp"))
//!     .build()?;
//!
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:8080").await?;
//! axum::serve(listener, app).await?;
//! ```

pub mod config;
pub mod core;
pub mod server;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Domain ===
    pub use crate::core::{
        NewOrder, Order, OrderSource, OrderStatus, OrderType,
        clock::{Clock, FixedClock, SystemClock},
        error::{OrderError, OrderResult},
        priority::{DayZone, PriorityPolicy, PriorityRule},
    };

    // === Ports & service ===
    pub use crate::core::{
        events::{EventBus, EventEnvelope, OrderEvent},
        notify::{EventBusNotifier, LogNotifier, Notifier},
        service::{DispatchMode, OrderService},
        store::OrderStore,
        validation::RequestValidator,
    };
    #[cfg(feature = "webhook")]
    pub use crate::core::webhook::WebhookNotifier;

    // === Storage ===
    pub use crate::storage::InMemoryOrderStore;
    #[cfg(feature = "postgres")]
    pub use crate::storage::PostgresOrderStore;

    // === Config & server ===
    pub use crate::config::ServiceConfig;
    pub use crate::server::{AppState, ServerBuilder};

    // === External dependencies ===
    pub use anyhow::Result;
    pub use async_trait::async_trait;
    pub use chrono::{DateTime, Utc};
    pub use uuid::Uuid;
}
