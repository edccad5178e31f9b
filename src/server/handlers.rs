//! HTTP handlers for order routes

use super::dto::{CreateOrderRequest, SeedResponse, UpdateStatusRequest};
use crate::core::error::{OrderError, ValidationError};
use crate::core::order::Order;
use crate::core::service::{OrderService, parse_order_id};
use crate::core::validation::{RequestValidator, ValidatedJson};
use axum::{
    Json,
    extract::{FromRef, Path, State},
    http::StatusCode,
};

/// Number of orders created by `POST /order/test`
pub const SEED_COUNT: usize = 100;

/// Shared state for order handlers
#[derive(Clone)]
pub struct AppState {
    pub service: OrderService,
    pub validator: RequestValidator,
}

impl AppState {
    pub fn new(service: OrderService, validator: RequestValidator) -> Self {
        Self { service, validator }
    }
}

impl FromRef<AppState> for RequestValidator {
    fn from_ref(state: &AppState) -> Self {
        state.validator
    }
}

/// POST /order
pub async fn create_order(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<CreateOrderRequest>,
) -> Result<(StatusCode, Json<Order>), OrderError> {
    let created = state.service.add_order(body.into_new_order()?).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// GET /order/active
pub async fn list_active_orders(
    State(state): State<AppState>,
) -> Result<Json<Vec<Order>>, OrderError> {
    Ok(Json(state.service.list_active_orders().await?))
}

/// GET /order/all
pub async fn list_all_orders(State(state): State<AppState>) -> Result<Json<Vec<Order>>, OrderError> {
    Ok(Json(state.service.get_all_orders().await?))
}

/// GET /order/{id}
pub async fn get_order(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Order>, OrderError> {
    let id = parse_order_id(&id)?;
    Ok(Json(state.service.get_order(&id).await?))
}

/// PUT /order/{id}/cancel
pub async fn cancel_order(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Order>, OrderError> {
    let id = parse_order_id(&id)?;
    Ok(Json(state.service.cancel_order(&id).await?))
}

/// PUT /order/{id}/status
pub async fn update_order_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(body): ValidatedJson<UpdateStatusRequest>,
) -> Result<(StatusCode, Json<Order>), OrderError> {
    let id = parse_order_id(&id)?;
    let status = body.status.ok_or_else(|| {
        OrderError::from(ValidationError::MissingArgument {
            argument: "status".to_string(),
        })
    })?;

    let updated = state
        .service
        .update_order(&id, status, body.priority)
        .await?;
    Ok((StatusCode::CREATED, Json(updated)))
}

/// POST /order/test
pub async fn seed_orders(State(state): State<AppState>) -> (StatusCode, Json<SeedResponse>) {
    let created = state.service.seed_orders(SEED_COUNT).await;
    (StatusCode::CREATED, Json(SeedResponse { created }))
}
