//! Mapping of pipeline outcomes to service responses.
//!
//! Client faults (`InvalidInput`, `UnsupportedType`, `TooLarge`) become
//! `INVALID_ARGUMENT` with the reason spelled out. Everything else becomes `INTERNAL`
//! with a generic detail; the full cause only goes to the log.

use axum::{
    Json,
    extract::rejection::{BytesRejection, JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use super::types::ErrorResponse;
use crate::DocnormError;

pub const INVALID_ARGUMENT: &str = "INVALID_ARGUMENT";
pub const INTERNAL: &str = "INTERNAL";

/// Error returned by service handlers.
#[derive(Debug, Clone)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: &'static str,
    pub detail: String,
}

impl ApiError {
    pub fn invalid_argument(detail: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            code: INVALID_ARGUMENT,
            detail: detail.into(),
        }
    }

    pub fn internal(detail: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            code: INTERNAL,
            detail: detail.into(),
        }
    }
}

impl From<DocnormError> for ApiError {
    fn from(error: DocnormError) -> Self {
        if error.is_client_error() {
            tracing::warn!(error = %error, "rejected request");
            return Self::invalid_argument(error.to_string());
        }

        tracing::error!(error = %error, cause = ?error, "request failed");
        match error {
            DocnormError::ExtractionFailed { .. } => Self::internal("document extraction failed"),
            _ => Self::internal("internal error"),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::warn!(error = %rejection, "malformed request envelope");
        Self::invalid_argument(format!("malformed request: {}", rejection.body_text()))
    }
}

impl From<BytesRejection> for ApiError {
    fn from(rejection: BytesRejection) -> Self {
        tracing::warn!(error = %rejection, "unreadable request body");
        Self::invalid_argument(format!("unreadable request body: {}", rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            code: self.code.to_string(),
            detail: self.detail,
        };
        (self.status, Json(body)).into_response()
    }
}
