//! Request validation
//!
//! Request bodies derive [`validator::Validate`]. A [`RequestValidator`] is
//! built once at startup and injected into the HTTP state; it turns the
//! `validator` crate's error tree into a sorted list of field errors.

pub mod extractor;

pub use extractor::ValidatedJson;

use crate::core::error::{FieldValidationError, ValidationError};
use validator::{Validate, ValidationErrors};

/// Stateless validation component shared by all handlers
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestValidator;

impl RequestValidator {
    pub fn new() -> Self {
        Self
    }

    /// Run the declared rules of `value`
    pub fn validate<T: Validate>(&self, value: &T) -> Result<(), ValidationError> {
        value
            .validate()
            .map_err(|errors| ValidationError::FieldErrors(field_errors(&errors)))
    }
}

/// Flatten `validator` errors, sorted by field name
fn field_errors(errors: &ValidationErrors) -> Vec<FieldValidationError> {
    let mut flattened: Vec<FieldValidationError> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, rule_errors)| {
            let field = field.to_string();
            rule_errors.iter().map(move |rule| FieldValidationError {
                field: field.clone(),
                message: rule
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| rule.code.to_string()),
            })
        })
        .collect();

    flattened.sort_by(|a, b| a.field.cmp(&b.field).then_with(|| a.message.cmp(&b.message)));
    flattened
}
