//! PDF extractor.

use crate::Result;
use crate::core::mime::PDF_MIME_TYPE;
use crate::extraction::{LayoutConfig, extract_pdf_elements};
use crate::plugins::{FormatExtractor, Plugin};
use crate::types::NormalizedDocument;

/// PDF extractor backed by `lopdf`.
///
/// Text is read page by page; aligned runs of lines are recovered as tables
/// according to the configured [`LayoutConfig`].
pub struct PdfExtractor {
    layout: LayoutConfig,
}

impl PdfExtractor {
    pub fn new() -> Self {
        Self::with_config(LayoutConfig::default())
    }

    pub fn with_config(layout: LayoutConfig) -> Self {
        Self { layout }
    }
}

impl Default for PdfExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl Plugin for PdfExtractor {
    fn name(&self) -> &str {
        "pdf-extractor"
    }

    fn version(&self) -> String {
        env!("CARGO_PKG_VERSION").to_string()
    }

    fn initialize(&self) -> Result<()> {
        Ok(())
    }

    fn shutdown(&self) -> Result<()> {
        Ok(())
    }

    fn description(&self) -> &str {
        "Extracts page text and aligned tables from PDF documents"
    }
}

impl FormatExtractor for PdfExtractor {
    fn extract(&self, content: &[u8]) -> Result<NormalizedDocument> {
        extract_pdf_elements(content, &self.layout).map(NormalizedDocument::Elements)
    }

    fn supported_content_types(&self) -> &[&str] {
        &[PDF_MIME_TYPE]
    }
}
