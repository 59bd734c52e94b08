//! Built-in format extractors.
//!
//! Each extractor adapts one byte-level parser from [`crate::extraction`] to the
//! [`FormatExtractor`](crate::plugins::FormatExtractor) plugin interface.

use crate::Result;
use crate::core::config::PdfConfig;
use crate::plugins::FormatExtractorRegistry;
use std::sync::Arc;

pub mod text;

#[cfg(feature = "pdf")]
pub mod pdf;

#[cfg(feature = "office")]
pub mod docx;

pub use text::PlainTextExtractor;

#[cfg(feature = "pdf")]
pub use pdf::PdfExtractor;

#[cfg(feature = "office")]
pub use docx::DocxExtractor;

/// Register every built-in extractor enabled at compile time.
///
/// # Example
///
/// ```rust
/// use docnorm::core::config::PdfConfig;
/// use docnorm::extractors::register_default_extractors;
/// use docnorm::plugins::FormatExtractorRegistry;
///
/// # fn main() -> docnorm::Result<()> {
/// let mut registry = FormatExtractorRegistry::new();
/// register_default_extractors(&mut registry, &PdfConfig::default())?;
/// assert!(registry.get("text/plain").is_ok());
/// # Ok(())
/// # }
/// ```
pub fn register_default_extractors(registry: &mut FormatExtractorRegistry, pdf_config: &PdfConfig) -> Result<()> {
    registry.register(Arc::new(PlainTextExtractor::new()))?;

    #[cfg(feature = "pdf")]
    registry.register(Arc::new(PdfExtractor::with_config(pdf_config.into())))?;
    #[cfg(not(feature = "pdf"))]
    let _ = pdf_config;

    #[cfg(feature = "office")]
    registry.register(Arc::new(DocxExtractor::new()))?;

    Ok(())
}
