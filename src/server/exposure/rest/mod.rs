//! REST API exposure
//!
//! Consumes the handler state and produces an Axum `Router` with the health
//! routes, the order routes and any custom routes.

use crate::server::handlers::{self, AppState};
use axum::{
    Json, Router,
    routing::{get, post, put},
};
use serde_json::{Value, json};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// REST API exposure implementation
pub struct RestExposure;

impl RestExposure {
    /// Build the REST router
    ///
    /// `POST /order/test` is only mounted when `seed_endpoint` is true.
    pub fn build_router(state: AppState, seed_endpoint: bool, custom_routes: Vec<Router>) -> Router {
        let mut app = Self::health_routes().merge(Self::order_routes(state, seed_endpoint));

        for custom_router in custom_routes {
            app = app.merge(custom_router);
        }

        app.layer(CorsLayer::permissive())
            .layer(TraceLayer::new_for_http())
    }

    fn order_routes(state: AppState, seed_endpoint: bool) -> Router {
        let mut routes = Router::new()
            .route("/order", post(handlers::create_order))
            .route("/order/active", get(handlers::list_active_orders))
            .route("/order/all", get(handlers::list_all_orders))
            .route("/order/{id}", get(handlers::get_order))
            .route("/order/{id}/cancel", put(handlers::cancel_order))
            .route("/order/{id}/status", put(handlers::update_order_status));

        if seed_endpoint {
            tracing::warn!("seed endpoint POST /order/test is enabled");
            routes = routes.route("/order/test", post(handlers::seed_orders));
        }

        routes.with_state(state)
    }

    /// Build health check routes
    fn health_routes() -> Router {
        Router::new()
            .route("/health", get(Self::health_check))
            .route("/healthz", get(Self::health_check))
    }

    /// Health check endpoint handler
    async fn health_check() -> Json<Value> {
        Json(json!({
            "status": "ok",
            "service": "order-service"
        }))
    }
}
