//! Order entity and its closed-set enumerations

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Lifecycle status of an order.
///
/// No transition rules are enforced: any status may be written from any
/// other status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Pending,
    InPreparation,
    Finished,
    Delivered,
    Canceled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 5] = [
        OrderStatus::Pending,
        OrderStatus::InPreparation,
        OrderStatus::Finished,
        OrderStatus::Delivered,
        OrderStatus::Canceled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "PENDING",
            OrderStatus::InPreparation => "IN_PREPARATION",
            OrderStatus::Finished => "FINISHED",
            OrderStatus::Delivered => "DELIVERED",
            OrderStatus::Canceled => "CANCELED",
        }
    }

    /// Statuses after which no further business transition is defined.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            OrderStatus::Finished | OrderStatus::Delivered | OrderStatus::Canceled
        )
    }
}

/// Channel through which an order was placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderSource {
    InPerson,
    Delivery,
    Phone,
}

impl OrderSource {
    pub const ALL: [OrderSource; 3] = [
        OrderSource::InPerson,
        OrderSource::Phone,
        OrderSource::Delivery,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderSource::InPerson => "IN_PERSON",
            OrderSource::Delivery => "DELIVERY",
            OrderSource::Phone => "PHONE",
        }
    }
}

/// Customer tier of an order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderType {
    #[default]
    Normal,
    Vip,
}

impl OrderType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderType::Normal => "NORMAL",
            OrderType::Vip => "VIP",
        }
    }
}

/// Error returned when a string is not one of an enumeration's values
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{value}' is not a valid {kind}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

macro_rules! impl_str_conversions {
    ($ty:ty, $kind:literal, [$($variant:expr),+ $(,)?]) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                [$($variant),+]
                    .into_iter()
                    .find(|v| v.as_str() == s)
                    .ok_or_else(|| UnknownVariant {
                        kind: $kind,
                        value: s.to_string(),
                    })
            }
        }
    };
}

impl_str_conversions!(
    OrderStatus,
    "order status",
    [
        OrderStatus::Pending,
        OrderStatus::InPreparation,
        OrderStatus::Finished,
        OrderStatus::Delivered,
        OrderStatus::Canceled,
    ]
);
impl_str_conversions!(
    OrderSource,
    "order source",
    [OrderSource::InPerson, OrderSource::Delivery, OrderSource::Phone]
);
impl_str_conversions!(OrderType, "order type", [OrderType::Normal, OrderType::Vip]);

/// A stored order.
///
/// `id`, `created_at` and `priority` are assigned by the store. After
/// creation only `status`, `priority` and `updated_at` ever change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub menu: Vec<String>,
    pub status: OrderStatus,
    #[serde(rename = "order_source")]
    pub source: OrderSource,
    #[serde(rename = "order_type")]
    pub order_type: OrderType,
    pub priority: u32,
}

impl Order {
    pub fn is_pending(&self) -> bool {
        self.status == OrderStatus::Pending
    }
}

/// Input to the creation operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    pub menu: Vec<String>,
    pub status: OrderStatus,
    pub source: OrderSource,
    pub order_type: OrderType,
}

impl NewOrder {
    /// Build a creation request with the default `NORMAL` type
    pub fn new(menu: Vec<String>, status: OrderStatus, source: OrderSource) -> Self {
        Self {
            menu,
            status,
            source,
            order_type: OrderType::default(),
        }
    }

    pub fn with_type(mut self, order_type: OrderType) -> Self {
        self.order_type = order_type;
        self
    }

    /// Materialize the stored projection from store-assigned values
    pub fn into_order(self, id: Uuid, now: DateTime<Utc>, priority: u32) -> Order {
        Order {
            id,
            created_at: now,
            updated_at: now,
            menu: self.menu,
            status: self.status,
            source: self.source,
            order_type: self.order_type,
            priority,
        }
    }
}
