//! Embedding backend capability.
//!
//! Normalized Markdown is usually fed to an embedding model next. The model itself
//! lives outside this crate; the service only needs to hold one, manage its
//! lifecycle and report whether it is loaded.
//!
//! # Example
//!
//! ```rust
//! use async_trait::async_trait;
//! use docnorm::embeddings::EmbeddingBackend;
//! use docnorm::plugins::Plugin;
//! use docnorm::Result;
//!
//! struct LengthEmbedder;
//!
//! impl Plugin for LengthEmbedder {
//!     fn name(&self) -> &str { "length-embedder" }
//!     fn version(&self) -> String { "1.0.0".to_string() }
//!     fn initialize(&self) -> Result<()> { Ok(()) }
//!     fn shutdown(&self) -> Result<()> { Ok(()) }
//! }
//!
//! #[async_trait]
//! impl EmbeddingBackend for LengthEmbedder {
//!     async fn embed(&self, text: &str) -> Result<Vec<f32>> {
//!         Ok(vec![text.len() as f32])
//!     }
//! }
//! ```

use crate::Result;
use crate::plugins::Plugin;
use async_trait::async_trait;

/// Turns text into a dense vector.
///
/// `embed` may block on a compute-bound model call; implementations that do so should
/// move the work off the async runtime themselves.
#[async_trait]
pub trait EmbeddingBackend: Plugin {
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Output dimensionality, if known before the first call.
    fn dimensions(&self) -> Option<usize> {
        None
    }
}
