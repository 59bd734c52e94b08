//! Plain text extractor.

use crate::Result;
use crate::core::mime::PLAIN_TEXT_MIME_TYPE;
use crate::extraction::fence_plain_text;
use crate::plugins::{FormatExtractor, Plugin};
use crate::types::NormalizedDocument;

/// Plain text extractor.
///
/// Never fails: undecodable bytes become U+FFFD and the whole text is returned as one
/// fenced code block.
pub struct PlainTextExtractor;

impl PlainTextExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PlainTextExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl Plugin for PlainTextExtractor {
    fn name(&self) -> &str {
        "plain-text-extractor"
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
        "Wraps plain text in a fenced code block"
    }
}

impl FormatExtractor for PlainTextExtractor {
    fn extract(&self, content: &[u8]) -> Result<NormalizedDocument> {
        Ok(NormalizedDocument::Text(fence_plain_text(content)))
    }

    fn supported_content_types(&self) -> &[&str] {
        &[PLAIN_TEXT_MIME_TYPE]
    }
}
