//! Persistence port for orders

use crate::core::error::OrderResult;
use crate::core::order::{NewOrder, Order, OrderStatus};
use async_trait::async_trait;
use std::cmp::Ordering;
use uuid::Uuid;

/// Storage contract the order service depends on.
///
/// Every implementation honors the same observable semantics:
///
/// - `create` assigns id, timestamps and priority. The priority comes from the
///   store's [`PriorityRule`](crate::core::priority::PriorityRule) applied to
///   the number of orders created in the current local day. Counting and
///   inserting happen inside one [`WriteGate`](crate::core::critical::WriteGate)
///   section.
/// - `list_active` and `list_all` are ordered by `(priority, created_at)`
///   ascending and report an empty result as
///   [`OrderError::NoOrders`](crate::core::error::OrderError::NoOrders).
/// - `update` always writes the status, writes the priority only when one is
///   supplied, and refreshes `updated_at`.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Persist a new order and return the stored projection
    async fn create(&self, order: NewOrder) -> OrderResult<Order>;

    /// Get an order by id
    async fn get_by_id(&self, id: &Uuid) -> OrderResult<Order>;

    /// All `PENDING` orders
    async fn list_active(&self) -> OrderResult<Vec<Order>>;

    /// Change the status and optionally the priority of an order
    async fn update(
        &self,
        id: &Uuid,
        status: OrderStatus,
        priority: Option<u32>,
    ) -> OrderResult<Order>;

    /// Every order regardless of status
    async fn list_all(&self) -> OrderResult<Vec<Order>>;

    /// Short backend name used in logs
    fn backend(&self) -> &'static str;
}

/// Fulfillment ordering shared by all list operations
pub fn fulfillment_order(a: &Order, b: &Order) -> Ordering {
    a.priority
        .cmp(&b.priority)
        .then_with(|| a.created_at.cmp(&b.created_at))
}
