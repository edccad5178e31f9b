//! Order service orchestrating the store and the notification port

use crate::core::error::{OrderError, OrderResult, ValidationError};
use crate::core::notify::Notifier;
use crate::core::order::{NewOrder, Order, OrderSource, OrderStatus};
use crate::core::store::OrderStore;
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;
use uuid::Uuid;

/// How finish notifications are delivered relative to the request
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DispatchMode {
    /// Await the notifier before returning the updated order
    #[default]
    Inline,
    /// Hand the notification to a spawned task
    Background,
}

impl FromStr for DispatchMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "inline" => Ok(DispatchMode::Inline),
            "background" => Ok(DispatchMode::Background),
            other => Err(format!("unknown dispatch mode '{}'", other)),
        }
    }
}

/// Parse an order id taken from a request path.
///
/// An empty id is a client error; an id that is not a UUID cannot name any
/// stored order and is reported as not found.
pub fn parse_order_id(raw: &str) -> OrderResult<Uuid> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ValidationError::MissingArgument {
            argument: "ID".to_string(),
        }
        .into());
    }
    Uuid::parse_str(raw).map_err(|_| OrderError::not_found(raw))
}

/// Use-case layer between the HTTP surface and the ports
#[derive(Clone)]
pub struct OrderService {
    store: Arc<dyn OrderStore>,
    notifier: Arc<dyn Notifier>,
    dispatch: DispatchMode,
}

impl OrderService {
    pub fn new(store: Arc<dyn OrderStore>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            store,
            notifier,
            dispatch: DispatchMode::default(),
        }
    }

    pub fn with_dispatch(mut self, dispatch: DispatchMode) -> Self {
        self.dispatch = dispatch;
        self
    }

    pub fn store(&self) -> &Arc<dyn OrderStore> {
        &self.store
    }

    pub async fn add_order(&self, order: NewOrder) -> OrderResult<Order> {
        let created = self.store.create(order).await?;
        tracing::info!(
            order_id = %created.id,
            priority = created.priority,
            backend = self.store.backend(),
            "order created"
        );
        Ok(created)
    }

    pub async fn get_order(&self, id: &Uuid) -> OrderResult<Order> {
        self.store.get_by_id(id).await
    }

    /// Pending orders in fulfillment order
    pub async fn list_active_orders(&self) -> OrderResult<Vec<Order>> {
        self.store.list_active().await
    }

    /// Change status and optionally priority.
    ///
    /// When the resulting status is `FINISHED` the notifier is invoked exactly
    /// once with the updated order. Notification failures are logged only.
    pub async fn update_order(
        &self,
        id: &Uuid,
        status: OrderStatus,
        priority: Option<u32>,
    ) -> OrderResult<Order> {
        let updated = self.store.update(id, status, priority).await?;
        tracing::info!(order_id = %updated.id, status = %updated.status, "order updated");

        if updated.status == OrderStatus::Finished {
            self.dispatch_finished(&updated).await;
        }

        Ok(updated)
    }

    pub async fn cancel_order(&self, id: &Uuid) -> OrderResult<Order> {
        self.update_order(id, OrderStatus::Canceled, None).await
    }

    pub async fn get_all_orders(&self) -> OrderResult<Vec<Order>> {
        self.store.list_all().await
    }

    /// Create `count` sample orders concurrently.
    ///
    /// Order `i` (counting from 1) gets menu `Plato # i` with status and
    /// source cycled over their enumerations. Failed creations are logged and skipped; the
    /// number of stored orders is returned.
    pub async fn seed_orders(&self, count: usize) -> usize {
        let creations = (1..=count).map(|i| {
            let order = NewOrder::new(
                vec![format!("Plato # {}", i)],
                OrderStatus::ALL[i % OrderStatus::ALL.len()],
                OrderSource::ALL[i % OrderSource::ALL.len()],
            );
            self.store.create(order)
        });

        let mut created = 0;
        for result in join_all(creations).await {
            match result {
                Ok(_) => created += 1,
                Err(e) => tracing::warn!(error = %e, "failed to seed order"),
            }
        }

        tracing::info!(requested = count, created, "seeded sample orders");
        created
    }

    async fn dispatch_finished(&self, order: &Order) {
        match self.dispatch {
            DispatchMode::Inline => deliver(self.notifier.as_ref(), order).await,
            DispatchMode::Background => {
                let notifier = self.notifier.clone();
                let order = order.clone();
                tokio::spawn(async move {
                    deliver(notifier.as_ref(), &order).await;
                });
            }
        }
    }
}

async fn deliver(notifier: &dyn Notifier, order: &Order) {
    if let Err(e) = notifier.notify(order).await {
        tracing::warn!(
            order_id = %order.id,
            channel = notifier.channel(),
            error = %e,
            "failed to send finish notification"
        );
    }
}
