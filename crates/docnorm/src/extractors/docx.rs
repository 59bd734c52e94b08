//! DOCX extractor.

use crate::Result;
use crate::core::mime::DOCX_MIME_TYPE;
use crate::extraction::extract_docx_elements;
use crate::plugins::{FormatExtractor, Plugin};
use crate::types::NormalizedDocument;

/// DOCX extractor using `zip` and `roxmltree`.
///
/// Paragraphs and tables come out in body order; heading styles become Markdown
/// headings.
pub struct DocxExtractor;

impl DocxExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DocxExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl Plugin for DocxExtractor {
    fn name(&self) -> &str {
        "docx-extractor"
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
        "Extracts paragraphs and tables from Word documents"
    }
}

impl FormatExtractor for DocxExtractor {
    fn extract(&self, content: &[u8]) -> Result<NormalizedDocument> {
        extract_docx_elements(content).map(NormalizedDocument::Elements)
    }

    fn supported_content_types(&self) -> &[&str] {
        &[DOCX_MIME_TYPE]
    }
}
