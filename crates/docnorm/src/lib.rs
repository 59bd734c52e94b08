//! docnorm - document normalization service
//!
//! Turns PDF, DOCX and plain-text payloads into one canonical Markdown representation,
//! ready for indexing or language-model consumption.
//!
//! # Quick Start
//!
//! ```rust
//! use docnorm::{DocnormConfig, DocumentRequest, NormalizationPipeline};
//!
//! # fn main() -> docnorm::Result<()> {
//! let pipeline = NormalizationPipeline::with_defaults(&DocnormConfig::default())?;
//! let result = pipeline.sanitize(&DocumentRequest::base64("aGVsbG8=", "text/plain"))?;
//! assert_eq!(result.markdown, "```\nhello\n```");
//! # Ok(())
//! # }
//! ```
//!
//! # Architecture
//!
//! - **Core** (`core`): payload validation, content-type handling, the pipeline, config
//! - **Plugin System** (`plugins`): `FormatExtractor` trait and the content-type registry
//! - **Extractors** (`extractors`): PDF, DOCX and plain text
//! - **Extraction** (`extraction`): byte-level parsing, layout analysis, table rendering
//! - **Service** (`service`, `api` feature): HTTP/JSON front-end with a bounded worker pool
//! - **Embeddings** (`embeddings`): the embedding backend capability the service can host

#![deny(unsafe_code)]

pub mod core;
pub mod embeddings;
pub mod error;
pub mod extraction;
pub mod extractors;
pub mod plugins;
pub mod types;

#[cfg(feature = "api")]
pub mod service;

pub use error::{DocnormError, Result};
pub use types::*;

pub use core::config::{DocnormConfig, PdfConfig, ServiceConfig};
pub use core::mime::{DOCX_MIME_TYPE, PDF_MIME_TYPE, PLAIN_TEXT_MIME_TYPE, SUPPORTED_MIME_TYPES};
pub use core::pipeline::NormalizationPipeline;
pub use core::validation::{MAX_PAYLOAD_BYTES, validate};

pub use embeddings::EmbeddingBackend;
pub use plugins::{FormatExtractor, FormatExtractorRegistry, Plugin};
