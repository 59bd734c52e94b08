//! Service request handlers.

use axum::{
    Json,
    body::Bytes,
    extract::{
        State,
        rejection::{BytesRejection, JsonRejection},
    },
    http::{HeaderMap, header::CONTENT_TYPE},
};

use super::{
    error::ApiError,
    types::{HealthResponse, InfoResponse, SanitizeRequest, SanitizeResponse, ServiceState},
};
use crate::core::validation::MAX_PAYLOAD_BYTES;
use crate::types::DocumentRequest;

/// Sanitize endpoint handler.
///
/// POST /v1/sanitize
///
/// Accepts `{ "document_data": "<base64>", "document_type": "<mime>" }` and returns
/// `{ "sanitized_content": "<markdown>" }`. The work runs on the worker pool.
pub async fn sanitize_handler(
    State(state): State<ServiceState>,
    payload: Result<Json<SanitizeRequest>, JsonRejection>,
) -> Result<Json<SanitizeResponse>, ApiError> {
    let Json(request) = payload?;
    let request = DocumentRequest::base64(request.document_data, request.document_type);
    run_pipeline(&state, request).await
}

/// Raw sanitize endpoint handler.
///
/// POST /v1/sanitize/raw
///
/// The body is the document itself and the `Content-Type` header is its type. Avoids
/// the base64 overhead for callers that can send binary bodies.
pub async fn sanitize_raw_handler(
    State(state): State<ServiceState>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<SanitizeResponse>, ApiError> {
    let body = body?;
    let content_type = headers
        .get(CONTENT_TYPE)
        .ok_or_else(|| ApiError::invalid_argument("missing Content-Type header"))?
        .to_str()
        .map_err(|_| ApiError::invalid_argument("Content-Type header is not valid ASCII"))?
        .to_string();

    run_pipeline(&state, DocumentRequest::new(body.to_vec(), content_type)).await
}

async fn run_pipeline(state: &ServiceState, request: DocumentRequest) -> Result<Json<SanitizeResponse>, ApiError> {
    let pipeline = state.pipeline.clone();
    let result = state.pool.run(move || pipeline.sanitize(&request)).await?;

    Ok(Json(SanitizeResponse {
        sanitized_content: result.markdown,
    }))
}

/// Health check endpoint handler.
///
/// GET /health
pub async fn health_handler(State(state): State<ServiceState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        embedding_backend_loaded: state.embedding_backend.is_some(),
    })
}

/// Server info endpoint handler.
///
/// GET /info
pub async fn info_handler(State(state): State<ServiceState>) -> Json<InfoResponse> {
    Json(InfoResponse {
        version: env!("CARGO_PKG_VERSION").to_string(),
        supported_types: state.pipeline.registry().content_types(),
        max_payload_bytes: MAX_PAYLOAD_BYTES,
        max_concurrent_requests: state.pool.size(),
    })
}
