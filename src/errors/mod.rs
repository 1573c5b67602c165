//! Unified error handling, the JSON envelope, and the read-path fallback policy.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::store::StoreError;

/// Success envelope: `{"data": ...}`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Wrap a successful result in the envelope.
    pub fn success(data: T) -> Json<Self> {
        Json(Self { data })
    }
}

/// Error envelope: `{"error": "..."}`. No structured codes, only a message.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Application error type mapping to HTTP status codes.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Unauthorized")]
    Unauthorized,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Validation error: {0}")]
    Validation(String),

    /// A store write was rejected. The message is what the client sees.
    #[error("Backend failure: {0}")]
    Backend(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Check if this error represents a not-found condition.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Check if this error represents an auth failure.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }

    /// Map a failed store write to a client-facing message, keeping connection
    /// failures as internal errors.
    pub fn on_write(message: &str) -> impl FnOnce(StoreError) -> AppError + '_ {
        move |err| match err {
            StoreError::Connection { .. } => AppError::Internal(err.to_string()),
            other => {
                tracing::warn!(error = %other, "Store write failed");
                AppError::Backend(message.to_string())
            }
        }
    }

    /// Map a failed lookup preceding a write. Query failures read as "not found".
    pub fn on_lookup(message: &str) -> impl FnOnce(StoreError) -> AppError + '_ {
        move |err| match err {
            StoreError::Connection { .. } => AppError::Internal(err.to_string()),
            other => {
                tracing::debug!(error = %other, "Lookup failed");
                AppError::NotFound(message.to_string())
            }
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Connection { .. } => AppError::Internal(err.to_string()),
            other => AppError::Backend(other.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Backend(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Internal(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Server error".to_string(),
                )
            }
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}

/// Read endpoints favour availability over correctness: any failure behind
/// them is logged and replaced by the type's default (an empty list, or
/// all-zero stats). Each endpoint names itself so the swallowed error stays
/// traceable.
pub fn read_fallback<T: Default>(endpoint: &'static str, result: Result<T, AppError>) -> T {
    match result {
        Ok(value) => value,
        Err(err) => {
            tracing::warn!(endpoint, error = %err, "Read failed, serving fallback");
            T::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_response_success() {
        let response = ApiResponse::success(vec!["hello"]);
        let json = serde_json::to_value(&response.0).unwrap();
        assert_eq!(json["data"][0], "hello");
        assert!(json.get("error").is_none());
    }

    #[test]
    fn app_error_is_not_found() {
        let err = AppError::NotFound("product".to_string());
        assert!(err.is_not_found());
        assert!(!err.is_unauthorized());
    }

    #[test]
    fn app_error_display() {
        let err = AppError::Validation("Missing productId".to_string());
        assert_eq!(err.to_string(), "Validation error: Missing productId");
    }

    #[test]
    fn status_codes() {
        let cases = [
            (AppError::Unauthorized, StatusCode::UNAUTHORIZED),
            (AppError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (AppError::Forbidden("x".into()), StatusCode::FORBIDDEN),
            (AppError::Validation("x".into()), StatusCode::BAD_REQUEST),
            (AppError::Backend("x".into()), StatusCode::BAD_REQUEST),
            (AppError::Internal("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }

    #[test]
    fn connection_failures_stay_internal_on_write() {
        let err = AppError::on_write("Insert failed")(StoreError::Connection {
            message: "pool timed out".to_string(),
        });
        assert!(matches!(err, AppError::Internal(_)));

        let err = AppError::on_write("Insert failed")(StoreError::Query {
            message: "null value in column".to_string(),
        });
        assert!(matches!(err, AppError::Backend(ref m) if m == "Insert failed"));
    }

    #[test]
    fn failed_lookup_reads_as_not_found() {
        let err = AppError::on_lookup("Product not found")(StoreError::Query {
            message: "invalid input syntax".to_string(),
        });
        assert!(err.is_not_found());
    }

    #[test]
    fn read_fallback_swallows_errors() {
        let items: Vec<u32> =
            read_fallback("test", Err(AppError::Internal("boom".to_string())));
        assert!(items.is_empty());
        assert_eq!(read_fallback("test", Ok(vec![1u32, 2])), vec![1, 2]);
    }
}
