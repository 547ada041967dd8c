//! Client error types

use shared::error::{AppError, ErrorCode, RejectionReport};
use thiserror::Error;

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Invalid response format
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Authentication required
    #[error("Authentication required")]
    Unauthorized,

    /// Permission denied
    #[error("Permission denied: {0}")]
    Forbidden(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// The server refused the mutation on business grounds
    #[error("Rejected: {}", .0.message)]
    Rejected(RejectionReport),

    /// Local validation failed, nothing was sent
    #[error("{0}")]
    Domain(#[from] AppError),

    /// Another mutation on the same target is still in flight
    #[error("Busy: {0} already has a request in flight")]
    Busy(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// File system error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ClientError {
    /// Error code used for notices and logs
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Http(e) if e.is_timeout() => ErrorCode::TimeoutError,
            Self::Http(_) => ErrorCode::NetworkError,
            Self::InvalidResponse(_) | Self::Serialization(_) => ErrorCode::InvalidFormat,
            Self::Unauthorized => ErrorCode::NotAuthenticated,
            Self::Forbidden(_) => ErrorCode::PermissionDenied,
            Self::NotFound(_) => ErrorCode::NotFound,
            Self::Rejected(_) => ErrorCode::ValidationFailed,
            Self::Domain(e) => e.code,
            Self::Busy(_) => ErrorCode::OrderBusy,
            Self::Internal(_) => ErrorCode::InternalError,
            Self::Io(_) => ErrorCode::DocumentFailed,
        }
    }

    /// Local validation failure (no request was made)
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Domain(_))
    }

    /// Message suitable for a user-visible notice
    pub fn user_message(&self) -> String {
        match self {
            Self::Rejected(report) => report.render_table(),
            Self::Domain(e) => e.message.clone(),
            Self::Http(_) | Self::Internal(_) => {
                "Something went wrong while talking to the server. Please try again.".to_string()
            }
            other => other.to_string(),
        }
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;
    use shared::error::RejectionLine;

    #[test]
    fn test_codes() {
        assert_eq!(ClientError::Busy("O-1".into()).code(), ErrorCode::OrderBusy);
        assert_eq!(ClientError::Unauthorized.code(), ErrorCode::NotAuthenticated);
        let domain: ClientError = AppError::new(ErrorCode::CreditMemoEmpty).into();
        assert_eq!(domain.code(), ErrorCode::CreditMemoEmpty);
        assert!(domain.is_validation());
    }

    #[test]
    fn test_rejection_user_message_is_table() {
        let err = ClientError::Rejected(RejectionReport {
            message: "Insufficient stock".into(),
            errors: vec![RejectionLine {
                product_name: Some("Apples".into()),
                requested: Some(serde_json::json!(5)),
                available: Some(serde_json::json!(2)),
                ..Default::default()
            }],
        });
        let msg = err.user_message();
        assert!(msg.starts_with("Insufficient stock"));
        assert!(msg.contains("Apples"));
        assert_eq!(err.to_string(), "Rejected: Insufficient stock");
    }
}
