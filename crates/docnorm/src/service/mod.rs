//! HTTP/JSON front-end for the normalization pipeline.
//!
//! # Endpoints
//!
//! - `POST /v1/sanitize` - base64 document in a JSON envelope
//! - `POST /v1/sanitize/raw` - raw document body, type from `Content-Type`
//! - `GET /health` - liveness and embedding backend status
//! - `GET /info` - version, supported types and limits
//!
//! Failures carry `{ "code": "INVALID_ARGUMENT" | "INTERNAL", "detail": "..." }` with
//! HTTP 400 and 500 respectively.
//!
//! # cURL Examples
//!
//! ```bash
//! curl -X POST http://localhost:50051/v1/sanitize \
//!      -H 'Content-Type: application/json' \
//!      -d "{\"document_type\":\"text/plain\",\"document_data\":\"$(base64 -w0 notes.txt)\"}"
//!
//! curl -X POST http://localhost:50051/v1/sanitize/raw \
//!      -H 'Content-Type: application/pdf' --data-binary @report.pdf
//! ```

mod error;
mod handlers;
mod pool;
mod server;
mod types;

pub use error::{ApiError, INTERNAL, INVALID_ARGUMENT};
pub use pool::{DEFAULT_WORKERS, WorkerPool};
pub use server::{create_router, serve, serve_with_state};
pub use types::{ErrorResponse, HealthResponse, InfoResponse, SanitizeRequest, SanitizeResponse, ServiceState};
