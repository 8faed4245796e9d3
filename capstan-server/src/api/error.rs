//! API error handling
//!
//! The endpoint is the sole layer translating failures into HTTP
//! responses: authentication failures become 401, malformed deliveries
//! 400, and environment or pipeline failures 500 with the cause in the
//! body for diagnosability.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use capstan_runner::PipelineError;

/// API error type
#[derive(Debug)]
pub enum ApiError {
    /// Signature verification failed
    Unauthorized(String),
    /// The delivery body could not be parsed
    BadRequest(String),
    /// The working directory could not be prepared
    Environment(String),
    /// A pipeline stage failed
    Pipeline(PipelineError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Environment(msg) => {
                tracing::error!("Environment failure: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to prepare project directory".to_string(),
                )
            }
            ApiError::Pipeline(err) => {
                tracing::error!("Pipeline failure: {}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
            }
        };

        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
