//! Error types and conversions used by the public API layer.
//!
//! Provides a lightweight Error enum that maps engine errors into HTTP
//! responses with a consistent JSON body shape.

use crate::matcher;
use axum::response::{IntoResponse, Response};
use axum::Json;
use http::StatusCode;
use tracing::{enabled, error, Level};
use validify::ValidationErrors;

/// Machine-readable error code used in API responses.
pub type Code = String;
/// Human-readable error message used in API responses.
pub type Message = String;

/// API error which can be converted into an HTTP response.
#[derive(Debug)]
pub enum Error {
    /// Resource not found. Returns 404.
    NotFound(Code, Message),
    /// Client error. Returns 400.
    BadRequest(Code, Message),
    /// Validation error containing field-level errors. Returns 400 with structured payload.
    Validation(ValidationErrors),
    /// Unexpected internal error. Returns 500.
    Internal(Box<dyn std::error::Error>),
}

/// Convert engine-level errors into API errors.
impl From<matcher::Error> for Error {
    fn from(value: matcher::Error) -> Self {
        match value {
            matcher::Error::InvalidOrder => {
                Error::BadRequest("INVALID_ORDER".into(), value.to_string())
            }
            matcher::Error::UserNotFound(_) => {
                Error::NotFound("USER_NOT_FOUND".into(), value.to_string())
            }
            matcher::Error::InsufficientBalance(_) => {
                Error::BadRequest("INSUFFICIENT_BALANCE".into(), value.to_string())
            }
        }
    }
}

impl IntoResponse for Error {
    /// Convert Error into an Axum Response with JSON body of shape:
    /// { "error": { "code": <code>, "message"?: <message>, "errors"?: <validation> } }
    fn into_response(self) -> Response {
        let (status, code, msg) = match self {
            Error::NotFound(code, msg) => (StatusCode::NOT_FOUND, code, msg),
            Error::BadRequest(code, msg) => (StatusCode::BAD_REQUEST, code, msg),
            Error::Validation(validation_errors) => {
                let body = Json(serde_json::json!({
                    "error": { "code": "VALIDATION_ERROR", "errors": validation_errors }
                }));

                return (StatusCode::BAD_REQUEST, body).into_response();
            }
            Error::Internal(err) => {
                error!("internal error: {}", err);

                match enabled!(Level::DEBUG) {
                    true => (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL_ERROR".into(),
                        err.to_string(),
                    ),
                    false => (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL_ERROR".into(),
                        "an internal error happened during processing your request".into(),
                    ),
                }
            }
        };

        let body = Json(serde_json::json!({
            "error": { "code": code, "message": msg }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn engine_errors_map_to_codes_and_statuses() {
        let err: Error = matcher::Error::InvalidOrder.into();
        assert!(matches!(err, Error::BadRequest(ref code, _) if code == "INVALID_ORDER"));

        let err: Error = matcher::Error::UserNotFound(Uuid::new_v4()).into();
        assert!(matches!(err, Error::NotFound(ref code, _) if code == "USER_NOT_FOUND"));

        let err: Error = matcher::Error::InsufficientBalance("USD".into()).into();
        assert!(matches!(err, Error::BadRequest(ref code, _) if code == "INSUFFICIENT_BALANCE"));
    }
}
