//! In-memory implementation of OrderStore for testing and development

use crate::core::clock::{Clock, SystemClock};
use crate::core::critical::WriteGate;
use crate::core::error::{ListScope, OrderError, OrderResult, StoreError};
use crate::core::order::{NewOrder, Order, OrderStatus};
use crate::core::priority::PriorityRule;
use crate::core::store::{OrderStore, fulfillment_order};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use uuid::Uuid;

/// Orders in insertion order plus an id → position index
#[derive(Debug, Default)]
struct MemoryState {
    orders: Vec<Order>,
    index: HashMap<Uuid, usize>,
}

/// In-memory order store
///
/// Useful for testing and development. Cloning yields a handle to the same
/// underlying data and the same write gate.
#[derive(Clone)]
pub struct InMemoryOrderStore {
    state: Arc<RwLock<MemoryState>>,
    gate: Arc<WriteGate>,
    clock: Arc<dyn Clock>,
    rule: PriorityRule,
}

impl InMemoryOrderStore {
    /// Create an empty store using the system clock
    pub fn new(rule: PriorityRule) -> Self {
        Self::with_clock(rule, Arc::new(SystemClock))
    }

    pub fn with_clock(rule: PriorityRule, clock: Arc<dyn Clock>) -> Self {
        Self {
            state: Arc::new(RwLock::new(MemoryState::default())),
            gate: Arc::new(WriteGate::new()),
            clock,
            rule,
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, MemoryState>, StoreError> {
        self.state
            .read()
            .map_err(|_| StoreError::LockPoisoned("in-memory order"))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, MemoryState>, StoreError> {
        self.state
            .write()
            .map_err(|_| StoreError::LockPoisoned("in-memory order"))
    }

    async fn insert(&self, order: NewOrder, id: Uuid) -> OrderResult<Order> {
        let _guard = self.gate.enter().await;

        let now = self.clock.stamp();
        let window = self.rule.window(now);
        let mut state = self.write()?;

        if state.index.contains_key(&id) {
            tracing::error!(order_id = %id, "order already exists");
            return Err(OrderError::AlreadyExists { id });
        }

        let today = state
            .orders
            .iter()
            .filter(|o| window.contains(o.created_at))
            .count() as u64;
        let stored = order.into_order(id, now, self.rule.assign(today));

        let position = state.orders.len();
        state.orders.push(stored.clone());
        state.index.insert(id, position);

        Ok(stored)
    }

    fn sorted(mut orders: Vec<Order>, scope: ListScope) -> OrderResult<Vec<Order>> {
        if orders.is_empty() {
            return Err(OrderError::NoOrders { scope });
        }
        orders.sort_by(fulfillment_order);
        Ok(orders)
    }
}

impl Default for InMemoryOrderStore {
    fn default() -> Self {
        Self::new(PriorityRule::default())
    }
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn create(&self, order: NewOrder) -> OrderResult<Order> {
        self.insert(order, Uuid::new_v4()).await
    }

    async fn get_by_id(&self, id: &Uuid) -> OrderResult<Order> {
        let state = self.read()?;
        state
            .index
            .get(id)
            .map(|&position| state.orders[position].clone())
            .ok_or_else(|| {
                tracing::debug!(order_id = %id, "there is no order with this id");
                OrderError::not_found(id)
            })
    }

    async fn list_active(&self) -> OrderResult<Vec<Order>> {
        let pending: Vec<Order> = self
            .read()?
            .orders
            .iter()
            .filter(|o| o.is_pending())
            .cloned()
            .collect();

        Self::sorted(pending, ListScope::Active)
    }

    async fn update(
        &self,
        id: &Uuid,
        status: OrderStatus,
        priority: Option<u32>,
    ) -> OrderResult<Order> {
        let _guard = self.gate.enter().await;

        let now = self.clock.stamp();
        let mut state = self.write()?;
        let position = *state
            .index
            .get(id)
            .ok_or_else(|| OrderError::not_found(id))?;

        let order = &mut state.orders[position];
        order.status = status;
        if let Some(priority) = priority {
            order.priority = priority;
        }
        order.updated_at = now.max(order.created_at);

        Ok(order.clone())
    }

    async fn list_all(&self) -> OrderResult<Vec<Order>> {
        let all = self.read()?.orders.clone();
        Self::sorted(all, ListScope::All)
    }

    fn backend(&self) -> &'static str {
        "in-memory"
    }
}
