//! Service request, response and state types.

use super::pool::WorkerPool;
use crate::Result;
use crate::core::pipeline::NormalizationPipeline;
use crate::embeddings::EmbeddingBackend;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// `POST /v1/sanitize` request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SanitizeRequest {
    /// Base64-encoded document bytes.
    pub document_data: String,
    /// Declared content type, e.g. `application/pdf`.
    pub document_type: String,
}

/// Successful sanitize response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SanitizeResponse {
    pub sanitized_content: String,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    /// True only when an embedding backend was attached with
    /// [`ServiceState::with_embedding_backend`]. The bundled binary ships no model,
    /// so it always reports false.
    pub embedding_backend_loaded: bool,
}

/// Server information response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InfoResponse {
    pub version: String,
    pub supported_types: Vec<String>,
    pub max_payload_bytes: usize,
    pub max_concurrent_requests: usize,
}

/// Failure response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// `INVALID_ARGUMENT` or `INTERNAL`.
    pub code: String,
    pub detail: String,
}

/// Shared service state.
///
/// Built once at startup. Everything inside is read-only or internally synchronized,
/// so cloning per request is cheap and no request can affect another.
#[derive(Clone)]
pub struct ServiceState {
    pub pipeline: Arc<NormalizationPipeline>,
    pub pool: WorkerPool,
    pub embedding_backend: Option<Arc<dyn EmbeddingBackend>>,
}

impl ServiceState {
    pub fn new(pipeline: NormalizationPipeline, max_concurrent_requests: usize) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            pool: WorkerPool::new(max_concurrent_requests),
            embedding_backend: None,
        }
    }

    /// Attach an embedding backend, initializing it first.
    ///
    /// For applications embedding the service as a library; pass the resulting state
    /// to [`serve_with_state`](crate::service::serve_with_state) or
    /// [`create_router`](crate::service::create_router).
    pub fn with_embedding_backend(mut self, backend: Arc<dyn EmbeddingBackend>) -> Result<Self> {
        backend.initialize()?;
        tracing::info!(backend = backend.name(), "embedding backend initialized");
        self.embedding_backend = Some(backend);
        Ok(self)
    }

    /// Release extractor and backend resources.
    ///
    /// Every component is shut down even if an earlier one fails; the first error is
    /// returned.
    pub fn shutdown(&self) -> Result<()> {
        let pipeline_result = self.pipeline.shutdown();

        let backend_result = match &self.embedding_backend {
            Some(backend) => backend.shutdown(),
            None => Ok(()),
        };

        pipeline_result.and(backend_result)
    }
}
