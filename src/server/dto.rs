//! Request and response bodies of the REST surface

use crate::core::error::{FieldValidationError, OrderResult, ValidationError};
use crate::core::order::{NewOrder, OrderSource, OrderStatus, OrderType};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Body of `POST /order`
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CreateOrderRequest {
    #[serde(default)]
    #[validate(
        length(min = 1, message = "must contain at least one item"),
        custom(function = "no_blank_items")
    )]
    pub menu: Vec<String>,

    #[validate(required(message = "required"))]
    pub status: Option<OrderStatus>,

    #[validate(required(message = "required"))]
    pub source: Option<OrderSource>,

    #[serde(rename = "type", default)]
    pub order_type: Option<OrderType>,
}

impl CreateOrderRequest {
    /// Convert a validated body into the creation input
    pub fn into_new_order(self) -> OrderResult<NewOrder> {
        let (Some(status), Some(source)) = (self.status, self.source) else {
            let missing = [("source", self.source.is_none()), ("status", self.status.is_none())]
                .into_iter()
                .filter(|(_, missing)| *missing)
                .map(|(field, _)| FieldValidationError {
                    field: field.to_string(),
                    message: "required".to_string(),
                })
                .collect();
            return Err(ValidationError::FieldErrors(missing).into());
        };

        Ok(NewOrder::new(self.menu, status, source).with_type(self.order_type.unwrap_or_default()))
    }
}

#[allow(clippy::ptr_arg)]
fn no_blank_items(menu: &Vec<String>) -> Result<(), validator::ValidationError> {
    if menu.iter().any(|item| item.trim().is_empty()) {
        let mut err = validator::ValidationError::new("blank_item");
        err.message = Some("items must not be blank".into());
        return Err(err);
    }
    Ok(())
}

/// Body of `PUT /order/{id}/status`
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateStatusRequest {
    #[validate(required(message = "required"))]
    pub status: Option<OrderStatus>,

    pub priority: Option<u32>,
}

/// Body returned by `POST /order/test`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedResponse {
    pub created: usize,
}
