//! Normalization core.
//!
//! - [`validation`]: transport decoding and the payload size cap
//! - [`mime`]: content-type constants and dispatch-key normalization
//! - [`pipeline`]: the validate, extract and render sequence
//! - [`config`]: file discovery and environment overrides

pub mod config;
pub mod mime;
pub mod pipeline;
pub mod validation;

pub use config::{DocnormConfig, PdfConfig, ServiceConfig};
pub use pipeline::{NormalizationPipeline, render_document};
pub use validation::{MAX_PAYLOAD_BYTES, validate};
