//! PostgreSQL storage backend using sqlx.
//!
//! Provides `PostgresOrderStore`, an [`OrderStore`] backed by a PostgreSQL
//! database via `sqlx::PgPool`.
//!
//! # Feature flag
//!
//! This module is gated behind the `postgres` feature flag:
//! ```toml
//! [dependencies]
//! order-service = { version = "0.1", features = ["postgres"] }
//! ```
//!
//! # Schema
//!
//! Orders live in a single `orders` table. The menu is stored as one TEXT
//! column holding the items joined by `,`; commas and backslashes inside an
//! item are escaped with a backslash so any item list survives a round-trip.
//! Timestamps are `TIMESTAMPTZ` and are written already truncated to
//! milliseconds.

use crate::core::clock::{Clock, SystemClock};
use crate::core::critical::WriteGate;
use crate::core::error::{ListScope, OrderError, OrderResult, StoreError};
use crate::core::order::{NewOrder, Order, OrderSource, OrderStatus, OrderType};
use crate::core::priority::PriorityRule;
use crate::core::store::OrderStore;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use uuid::Uuid;

const BACKEND: &str = "PostgreSQL";

const ORDER_COLUMNS: &str =
    "id, created_at, updated_at, menu, status, order_source, order_type, priority";

type OrderRow = (
    Uuid,
    DateTime<Utc>,
    DateTime<Utc>,
    String,
    String,
    String,
    String,
    i64,
);

// ---------------------------------------------------------------------------
// Schema management
// ---------------------------------------------------------------------------

/// Apply the `orders` table and its list index (idempotent).
///
/// Safe to call on every startup.
pub async fn ensure_schema(pool: &PgPool) -> Result<(), StoreError> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS orders (
            id UUID PRIMARY KEY,
            created_at TIMESTAMPTZ NOT NULL,
            updated_at TIMESTAMPTZ NOT NULL,
            menu TEXT NOT NULL,
            status VARCHAR(32) NOT NULL,
            order_source VARCHAR(32) NOT NULL,
            order_type VARCHAR(32) NOT NULL,
            priority BIGINT NOT NULL DEFAULT 0
        )",
    )
    .execute(pool)
    .await
    .map_err(query_error("ensure_schema"))?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_orders_status_priority
            ON orders (status, priority, created_at)",
    )
    .execute(pool)
    .await
    .map_err(query_error("ensure_schema"))?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_orders_created_at ON orders (created_at)")
        .execute(pool)
        .await
        .map_err(query_error("ensure_schema"))?;

    Ok(())
}

// ---------------------------------------------------------------------------
// Menu column codec
// ---------------------------------------------------------------------------

/// Join menu items into the stored column value
pub fn encode_menu(items: &[String]) -> String {
    let mut encoded = String::new();
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            encoded.push(',');
        }
        for c in item.chars() {
            if c == ',' || c == '\\' {
                encoded.push('\\');
            }
            encoded.push(c);
        }
    }
    encoded
}

/// Split a stored column value back into menu items
pub fn decode_menu(raw: &str) -> Vec<String> {
    if raw.is_empty() {
        return Vec::new();
    }

    let mut items = Vec::new();
    let mut current = String::new();
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                if let Some(escaped) = chars.next() {
                    current.push(escaped);
                }
            }
            ',' => items.push(std::mem::take(&mut current)),
            other => current.push(other),
        }
    }
    items.push(current);
    items
}

// ---------------------------------------------------------------------------
// Error mapping
// ---------------------------------------------------------------------------

fn query_error(operation: &'static str) -> impl Fn(sqlx::Error) -> StoreError {
    move |e| StoreError::Query {
        backend: BACKEND,
        operation,
        message: e.to_string(),
    }
}

fn insert_error(e: sqlx::Error, id: Uuid) -> OrderError {
    match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            OrderError::AlreadyExists { id }
        }
        _ => query_error("create")(e).into(),
    }
}

fn row_to_order(row: OrderRow) -> Result<Order, StoreError> {
    let (id, created_at, updated_at, menu, status, source, order_type, priority) = row;
    let integrity = |message: String| StoreError::Integrity {
        message: format!("order {}: {}", id, message),
    };

    Ok(Order {
        id,
        created_at,
        updated_at,
        menu: decode_menu(&menu),
        status: status.parse::<OrderStatus>().map_err(|e| integrity(format!("{}", e)))?,
        source: source.parse::<OrderSource>().map_err(|e| integrity(format!("{}", e)))?,
        order_type: order_type.parse::<OrderType>().map_err(|e| integrity(format!("{}", e)))?,
        priority: u32::try_from(priority)
            .map_err(|_| integrity(format!("priority {} out of range", priority)))?,
    })
}

fn rows_to_orders(rows: Vec<OrderRow>, scope: ListScope) -> OrderResult<Vec<Order>> {
    if rows.is_empty() {
        return Err(OrderError::NoOrders { scope });
    }
    rows.into_iter()
        .map(|row| row_to_order(row).map_err(OrderError::from))
        .collect()
}

// ---------------------------------------------------------------------------
// PostgresOrderStore
// ---------------------------------------------------------------------------

/// Order store backed by PostgreSQL.
///
/// # Example
///
/// ```rust,ignore
/// use order_service::storage::postgres::{PostgresOrderStore, ensure_schema};
///
/// let store = PostgresOrderStore::connect("postgres://localhost/orders", rule).await?;
/// ensure_schema(store.pool()).await?;
/// let order = store.create(new_order).await?;
/// ```
#[derive(Clone)]
pub struct PostgresOrderStore {
    pool: PgPool,
    gate: Arc<WriteGate>,
    clock: Arc<dyn Clock>,
    rule: PriorityRule,
}

impl PostgresOrderStore {
    pub fn new(pool: PgPool, rule: PriorityRule) -> Self {
        Self::with_clock(pool, rule, Arc::new(SystemClock))
    }

    pub fn with_clock(pool: PgPool, rule: PriorityRule, clock: Arc<dyn Clock>) -> Self {
        Self {
            pool,
            gate: Arc::new(WriteGate::new()),
            clock,
            rule,
        }
    }

    /// Open a connection pool against `url`
    pub async fn connect(url: &str, rule: PriorityRule) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(url)
            .await
            .map_err(|e| StoreError::Connection {
                backend: BACKEND,
                message: e.to_string(),
            })?;
        Ok(Self::new(pool, rule))
    }

    /// Get a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl OrderStore for PostgresOrderStore {
    async fn create(&self, order: NewOrder) -> OrderResult<Order> {
        let _guard = self.gate.enter().await;

        let now = self.clock.stamp();
        let window = self.rule.window(now);

        let (today,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM orders WHERE created_at >= $1 AND created_at < $2",
        )
        .bind(window.start)
        .bind(window.end)
        .fetch_one(&self.pool)
        .await
        .map_err(query_error("create"))?;

        let stored = order.into_order(
            Uuid::new_v4(),
            now,
            self.rule.assign(u64::try_from(today).unwrap_or(0)),
        );

        sqlx::query(
            "INSERT INTO orders (id, created_at, updated_at, menu, status, order_source, order_type, priority)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(stored.id)
        .bind(stored.created_at)
        .bind(stored.updated_at)
        .bind(encode_menu(&stored.menu))
        .bind(stored.status.as_str())
        .bind(stored.source.as_str())
        .bind(stored.order_type.as_str())
        .bind(i64::from(stored.priority))
        .execute(&self.pool)
        .await
        .map_err(|e| insert_error(e, stored.id))?;

        Ok(stored)
    }

    async fn get_by_id(&self, id: &Uuid) -> OrderResult<Order> {
        let sql = format!("SELECT {} FROM orders WHERE id = $1", ORDER_COLUMNS);
        let row = sqlx::query_as::<_, OrderRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(query_error("get_by_id"))?;

        match row {
            Some(row) => Ok(row_to_order(row)?),
            None => Err(OrderError::not_found(id)),
        }
    }

    async fn list_active(&self) -> OrderResult<Vec<Order>> {
        let sql = format!(
            "SELECT {} FROM orders WHERE status = $1 ORDER BY priority ASC, created_at ASC",
            ORDER_COLUMNS
        );
        let rows = sqlx::query_as::<_, OrderRow>(&sql)
            .bind(OrderStatus::Pending.as_str())
            .fetch_all(&self.pool)
            .await
            .map_err(query_error("list_active"))?;

        rows_to_orders(rows, ListScope::Active)
    }

    async fn update(
        &self,
        id: &Uuid,
        status: OrderStatus,
        priority: Option<u32>,
    ) -> OrderResult<Order> {
        let _guard = self.gate.enter().await;

        let sql = format!(
            "UPDATE orders
             SET status = $2,
                 priority = COALESCE($3, priority),
                 updated_at = GREATEST($4, created_at)
             WHERE id = $1
             RETURNING {}",
            ORDER_COLUMNS
        );
        let row = sqlx::query_as::<_, OrderRow>(&sql)
            .bind(id)
            .bind(status.as_str())
            .bind(priority.map(i64::from))
            .bind(self.clock.stamp())
            .fetch_optional(&self.pool)
            .await
            .map_err(query_error("update"))?;

        match row {
            Some(row) => Ok(row_to_order(row)?),
            None => Err(OrderError::not_found(id)),
        }
    }

    async fn list_all(&self) -> OrderResult<Vec<Order>> {
        let sql = format!(
            "SELECT {} FROM orders ORDER BY priority ASC, created_at ASC",
            ORDER_COLUMNS
        );
        let rows = sqlx::query_as::<_, OrderRow>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(query_error("list_all"))?;

        rows_to_orders(rows, ListScope::All)
    }

    fn backend(&self) -> &'static str {
        BACKEND
    }
}
