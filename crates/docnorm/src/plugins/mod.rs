//! Plugin system.
//!
//! Format support is pluggable: each document format is a [`FormatExtractor`]
//! registered in a [`FormatExtractorRegistry`] under the content types it handles.
//! Adding a format means adding an implementation and registering it; the pipeline's
//! dispatch code does not change.

pub mod extractor;
pub mod registry;
mod traits;

pub use extractor::FormatExtractor;
pub use registry::FormatExtractorRegistry;
pub use traits::Plugin;
