//! Typed API error for HTTP handlers.
//!
//! Converts service errors into HTTP responses with a JSON body
//! `{"error": "message"}` and a matching status code.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use patterning_service::ServiceError;

#[derive(Debug)]
pub enum ApiError {
    /// 400 Bad Request — invalid input from caller.
    BadRequest(String),
    /// 401 Unauthorized — wrong access code, or no unlocked session.
    Unauthorized(String),
    /// 404 Not Found — the store has no such voicing.
    NotFound(String),
    /// 502 Bad Gateway — the remote store failed.
    BadGateway(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            Self::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            Self::BadGateway(msg) => (StatusCode::BAD_GATEWAY, msg),
        };
        let body = serde_json::json!({"error": message});
        (status, Json(body)).into_response()
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::GateRejected | ServiceError::Locked => Self::Unauthorized(err.to_string()),
            ServiceError::ConfirmationRequired => Self::BadRequest(err.to_string()),
            ServiceError::Delete { .. } if err.is_not_found() => Self::NotFound(err.to_string()),
            ServiceError::Fetch(_) | ServiceError::Delete { .. } => {
                Self::BadGateway(err.to_string())
            },
        }
    }
}
