//! Axum extractor for validated request bodies
//!
//! `ValidatedJson<T>` deserializes the JSON body and runs the injected
//! [`RequestValidator`] before the handler sees the payload.

use super::RequestValidator;
use crate::core::error::{OrderError, ValidationError};
use axum::{
    Json,
    extract::{FromRef, FromRequest, Request},
};
use serde::de::DeserializeOwned;
use validator::Validate;

/// Axum extractor that binds and validates a JSON body
///
/// # Usage
///
/// ```rust,ignore
/// pub async fn create_order(
///     State(state): State<AppState>,
///     ValidatedJson(body): ValidatedJson<CreateOrderRequest>,
/// ) -> Result<(StatusCode, Json<Order>), OrderError> {
///     // body already passed every declared rule
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

impl<T> ValidatedJson<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> std::ops::Deref for ValidatedJson<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
    RequestValidator: FromRef<S>,
{
    type Rejection = OrderError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(payload) = Json::<T>::from_request(req, state).await.map_err(|rejection| {
            tracing::debug!(error = %rejection, "failed to bind request body");
            ValidationError::InvalidBody {
                message: rejection.body_text(),
            }
        })?;

        RequestValidator::from_ref(state).validate(&payload)?;

        Ok(ValidatedJson(payload))
    }
}
