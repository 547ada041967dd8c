//! Application error type

use super::codes::ErrorCode;
use http::StatusCode;
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

/// Application error with structured error code and details
///
/// Local validation failures are reported with this type before any
/// network call is made. Field-level failures carry a `field` detail,
/// evidence failures carry the offending `reasons`.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct AppError {
    /// The error code identifying the type of error
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details (field-level errors, context, etc.)
    pub details: Option<HashMap<String, Value>>,
}

impl AppError {
    /// Create a new error with the default message for the error code
    pub fn new(code: ErrorCode) -> Self {
        Self {
            message: code.message().to_string(),
            code,
            details: None,
        }
    }

    /// Create a new error with a custom message
    pub fn with_message(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    /// Add a detail entry to this error
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }

    /// Get a detail entry by key
    pub fn detail(&self, key: &str) -> Option<&Value> {
        self.details.as_ref().and_then(|d| d.get(key))
    }

    /// The form field this error points at, if any
    pub fn field(&self) -> Option<&str> {
        self.detail("field").and_then(Value::as_str)
    }

    /// Get the HTTP status code for this error
    pub fn http_status(&self) -> StatusCode {
        self.code.http_status()
    }

    // ==================== Convenience constructors ====================

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::ValidationFailed, msg)
    }

    /// Create a required-field error pointing at `field`
    pub fn required_field(field: &str, msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::RequiredField, msg).with_detail("field", field)
    }

    /// Create a not found error
    pub fn not_found(resource: impl Into<String>) -> Self {
        let r = resource.into();
        Self::with_message(ErrorCode::NotFound, format!("{} not found", r))
            .with_detail("resource", r)
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::InternalError, msg)
    }

    /// Create an invalid request error
    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::InvalidRequest, msg)
    }

    /// Create an order voided error
    pub fn order_voided(order_id: impl Into<String>) -> Self {
        let id = order_id.into();
        Self::with_message(
            ErrorCode::OrderAlreadyVoided,
            format!("Order {} has been voided", id),
        )
        .with_detail("order_id", id)
    }

    /// Create a document failure error
    pub fn document(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::DocumentFailed, msg)
    }
}

/// Type alias for Result with AppError
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_new() {
        let err = AppError::new(ErrorCode::OrderNotFound);
        assert_eq!(err.code, ErrorCode::OrderNotFound);
        assert_eq!(err.message, "Order not found");
        assert!(err.details.is_none());
    }

    #[test]
    fn test_app_error_with_detail() {
        let err = AppError::validation("Missing required fields")
            .with_detail("field", "notes")
            .with_detail("reason", "required");

        assert_eq!(err.code, ErrorCode::ValidationFailed);
        assert_eq!(err.field(), Some("notes"));
        assert_eq!(err.detail("reason").unwrap(), "required");
    }

    #[test]
    fn test_required_field() {
        let err = AppError::required_field("transactionId", "Transaction ID is required");
        assert_eq!(err.code, ErrorCode::RequiredField);
        assert_eq!(err.field(), Some("transactionId"));
        assert_eq!(err.to_string(), "Transaction ID is required");
        assert_eq!(err.http_status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_convenience_constructors() {
        let err = AppError::not_found("Credit memo");
        assert_eq!(err.message, "Credit memo not found");
        assert_eq!(err.detail("resource").unwrap(), "Credit memo");

        let err = AppError::order_voided("O-7");
        assert_eq!(err.code, ErrorCode::OrderAlreadyVoided);
        assert_eq!(err.http_status(), StatusCode::CONFLICT);
    }
}
