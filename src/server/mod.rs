//! HTTP server for the order service
//!
//! - `builder`: `ServerBuilder`, wiring store, notifier and validator into a router
//! - `exposure`: protocol exposures (REST)
//! - `handlers`: order route handlers and their shared state
//! - `dto`: request and response bodies
//! - `error`: HTTP mapping of core errors

pub mod builder;
pub mod dto;
pub mod error;
pub mod exposure;
pub mod handlers;

pub use builder::ServerBuilder;
pub use error::ErrorResponse;
pub use exposure::RestExposure;
pub use handlers::AppState;
