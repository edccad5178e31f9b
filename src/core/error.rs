//! Typed error handling for the order service
//!
//! The core signals failures through a small closed set of kinds rather than
//! HTTP constructs. The REST layer maps each kind to a status code.
//!
//! # Error Categories
//!
//! - [`OrderError::Validation`]: malformed or missing request fields
//! - [`OrderError::NotFound`]: unknown order id
//! - [`OrderError::NoOrders`]: a list operation matched nothing
//! - [`OrderError::AlreadyExists`]: id collision on create
//! - [`OrderError::Store`]: the backing store failed
//!
//! [`NotificationError`] is deliberately not part of [`OrderError`]: the
//! service logs it and never returns it to callers.
//!
//! # Example
//!
//! ```rust,ignore
//! match service.get_order(&id).await {
//!     Ok(order) => println!("{} is {}", order.id, order.status),
//!     Err(OrderError::NotFound { id }) => println!("no order {}", id),
//!     Err(e) => eprintln!("{}", e),
//! }
//! ```

use serde::Serialize;
use std::fmt;
use uuid::Uuid;

/// The main error type of the order core
#[derive(Debug, thiserror::Error)]
pub enum OrderError {
    /// Request data failed validation
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// No order with this id
    #[error("order with id '{id}' not found")]
    NotFound { id: String },

    /// A list query returned no rows
    #[error("{scope}")]
    NoOrders { scope: ListScope },

    /// Generated id already present in the store
    #[error("order with id '{id}' already exists")]
    AlreadyExists { id: Uuid },

    /// Storage backend failure
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl OrderError {
    pub fn not_found(id: impl ToString) -> Self {
        OrderError::NotFound { id: id.to_string() }
    }

    /// Stable machine-readable code
    pub fn error_code(&self) -> &'static str {
        match self {
            OrderError::Validation(e) => e.error_code(),
            OrderError::NotFound { .. } => "ORDER_NOT_FOUND",
            OrderError::NoOrders { .. } => "NO_ORDERS",
            OrderError::AlreadyExists { .. } => "ORDER_ALREADY_EXISTS",
            OrderError::Store(_) => "STORE_ERROR",
        }
    }

    /// Additional structured details for clients
    pub fn details(&self) -> Option<serde_json::Value> {
        match self {
            OrderError::NotFound { id } => Some(serde_json::json!({ "id": id })),
            OrderError::AlreadyExists { id } => Some(serde_json::json!({ "id": id.to_string() })),
            OrderError::Validation(ValidationError::FieldErrors(errors)) => {
                Some(serde_json::json!({ "fields": errors }))
            }
            _ => None,
        }
    }
}

/// Which list operation came back empty
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListScope {
    Active,
    All,
}

impl fmt::Display for ListScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListScope::Active => write!(f, "there are no active orders"),
            ListScope::All => write!(f, "orders not found"),
        }
    }
}

// =============================================================================
// Validation Errors
// =============================================================================

/// Errors related to input validation
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    /// One or more fields failed their rules
    #[error("error validating model: {}", join_field_errors(.0))]
    FieldErrors(Vec<FieldValidationError>),

    /// The body could not be bound to the expected shape
    #[error("error binding order body: {message}")]
    InvalidBody { message: String },

    /// A required path or query argument was empty
    #[error("{argument} param can't be empty")]
    MissingArgument { argument: String },
}

impl ValidationError {
    pub fn error_code(&self) -> &'static str {
        match self {
            ValidationError::FieldErrors(_) => "VALIDATION_ERROR",
            ValidationError::InvalidBody { .. } => "INVALID_BODY",
            ValidationError::MissingArgument { .. } => "MISSING_ARGUMENT",
        }
    }
}

/// A single field validation error
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldValidationError {
    pub field: String,
    pub message: String,
}

fn join_field_errors(errors: &[FieldValidationError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join(", ")
}

// =============================================================================
// Storage Errors
// =============================================================================

/// Errors related to storage backends
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to connect to {backend}: {message}")]
    Connection {
        backend: &'static str,
        message: String,
    },

    #[error("{backend} query error during {operation}: {message}")]
    Query {
        backend: &'static str,
        operation: &'static str,
        message: String,
    },

    /// A stored row could not be mapped back to an order
    #[error("data integrity error: {message}")]
    Integrity { message: String },

    #[error("{0} lock poisoned")]
    LockPoisoned(&'static str),
}

// =============================================================================
// Notification Errors
// =============================================================================

/// Failures of the notification side-channel; logged, never propagated
#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    #[error("notification channel '{channel}' unavailable: {message}")]
    Unavailable { channel: String, message: String },

    #[error("notification rejected by '{channel}' with status {status}")]
    Rejected { channel: String, status: u16 },
}

/// A specialized Result type for order operations
pub type OrderResult<T> = Result<T, OrderError>;
