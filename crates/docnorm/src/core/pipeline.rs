//! Normalization pipeline.
//!
//! `validate → resolve extractor → extract → render → trim`. The pipeline owns its
//! extractor registry; it is built once and shared read-only by every worker.

use crate::core::config::DocnormConfig;
use crate::core::validation::validate;
use crate::extraction::render_table;
use crate::extractors::register_default_extractors;
use crate::plugins::FormatExtractorRegistry;
use crate::types::{DocumentElement, DocumentRequest, NormalizedDocument, RequestStage, SanitizedResult};
use crate::{DocnormError, Result};
use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};

/// Turns document requests into canonical Markdown.
pub struct NormalizationPipeline {
    registry: FormatExtractorRegistry,
}

impl NormalizationPipeline {
    /// Pipeline over an explicitly built registry.
    pub fn new(registry: FormatExtractorRegistry) -> Self {
        Self { registry }
    }

    /// Pipeline with every built-in extractor registered.
    pub fn with_defaults(config: &DocnormConfig) -> Result<Self> {
        let mut registry = FormatExtractorRegistry::new();
        register_default_extractors(&mut registry, &config.pdf)?;
        Ok(Self::new(registry))
    }

    pub fn registry(&self) -> &FormatExtractorRegistry {
        &self.registry
    }

    /// Normalize one document.
    ///
    /// Identical `(payload, content_type, transport_encoding)` always yields
    /// byte-identical Markdown.
    ///
    /// # Errors
    ///
    /// - `InvalidInput` for malformed base64
    /// - `TooLarge` when the decoded payload exceeds the size cap
    /// - `UnsupportedType` when no extractor handles the declared type; no extractor
    ///   runs in that case
    /// - `ExtractionFailed` when the extractor fails or panics
    pub fn sanitize(&self, request: &DocumentRequest) -> Result<SanitizedResult> {
        let content_type = request.content_type.as_str();
        log_stage(RequestStage::Received, content_type);

        let result = self.run(request);
        match &result {
            Ok(sanitized) => {
                tracing::debug!(
                    stage = %RequestStage::Completed,
                    content_type,
                    markdown_bytes = sanitized.markdown.len(),
                    "request stage"
                );
            }
            Err(e) => {
                tracing::debug!(stage = %RequestStage::Failed, content_type, error = %e, "request stage");
            }
        }
        result
    }

    fn run(&self, request: &DocumentRequest) -> Result<SanitizedResult> {
        let content_type = request.content_type.as_str();

        log_stage(RequestStage::Validating, content_type);
        let content = validate(&request.payload, request.transport_encoding)?;
        let extractor = self.registry.get(content_type)?;

        log_stage(RequestStage::Extracting, content_type);
        let document = catch_unwind(AssertUnwindSafe(|| extractor.extract(&content))).map_err(|payload| {
            DocnormError::extraction_failed(format!(
                "extractor '{}' panicked: {}",
                extractor.name(),
                panic_message(payload.as_ref())
            ))
        })??;

        log_stage(RequestStage::Serializing, content_type);
        Ok(SanitizedResult {
            markdown: render_document(&document),
        })
    }

    /// Shut down every registered extractor.
    pub fn shutdown(&self) -> Result<()> {
        self.registry.shutdown_all()
    }
}

fn log_stage(stage: RequestStage, content_type: &str) {
    tracing::debug!(stage = %stage, content_type, "request stage");
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.as_str()
    } else {
        "unknown panic"
    }
}

/// Render a normalized document to its final Markdown.
///
/// Text runs are emitted verbatim and tables are framed by horizontal rules.
/// Elements are separated by one blank line and the result is trimmed.
pub fn render_document(document: &NormalizedDocument) -> String {
    match document {
        NormalizedDocument::Text(text) => text.trim().to_string(),
        NormalizedDocument::Elements(elements) => {
            let blocks: Vec<String> = elements
                .iter()
                .filter_map(|element| match element {
                    DocumentElement::TextRun { text } => Some(text.clone()),
                    DocumentElement::Table(table) => {
                        let rendered = render_table(table);
                        (!rendered.is_empty()).then(|| format!("---\n\n{}\n\n---", rendered))
                    }
                })
                .collect();
            blocks.join("\n\n").trim().to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugins::{FormatExtractor, Plugin};
    use crate::types::Table;
    use std::sync::Arc;

    struct PanickingExtractor;

    impl Plugin for PanickingExtractor {
        fn name(&self) -> &str {
            "panicking-extractor"
        }

        fn version(&self) -> String {
            "1.0.0".to_string()
        }

        fn initialize(&self) -> Result<()> {
            Ok(())
        }

        fn shutdown(&self) -> Result<()> {
            Ok(())
        }
    }

    impl FormatExtractor for PanickingExtractor {
        fn extract(&self, _content: &[u8]) -> Result<NormalizedDocument> {
            panic!("malformed cross-reference table");
        }

        fn supported_content_types(&self) -> &[&str] {
            &["application/x-crash"]
        }
    }

    fn cells(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_render_text_document_is_trimmed() {
        let document = NormalizedDocument::Text("  ```\nbody\n```\n\n".to_string());
        assert_eq!(render_document(&document), "```\nbody\n```");
    }

    #[test]
    fn test_render_elements_with_table() {
        let table = Table::new(cells(&["a", "b"]), vec![cells(&["1", "2"])]).unwrap();
        let document = NormalizedDocument::Elements(vec![
            DocumentElement::text("Intro"),
            DocumentElement::Table(table),
            DocumentElement::text("Outro"),
        ]);

        assert_eq!(
            render_document(&document),
            "Intro\n\n---\n\n| a | b |\n|---|---|\n| 1 | 2 |\n\n---\n\nOutro"
        );
    }

    #[test]
    fn test_render_skips_zero_column_tables() {
        let table = Table::new(Vec::new(), Vec::new()).unwrap();
        let document = NormalizedDocument::Elements(vec![DocumentElement::Table(table), DocumentElement::text("x")]);
        assert_eq!(render_document(&document), "x");
    }

    #[test]
    fn test_render_empty_document() {
        assert_eq!(render_document(&NormalizedDocument::Elements(Vec::new())), "");
    }

    #[test]
    fn test_plain_text_through_pipeline() {
        let pipeline = NormalizationPipeline::with_defaults(&DocnormConfig::default()).unwrap();
        let result = pipeline
            .sanitize(&DocumentRequest::base64("aGVsbG8=", "text/plain"))
            .unwrap();
        assert_eq!(result.markdown, "```\nhello\n```");
    }

    #[test]
    fn test_extractor_panic_becomes_extraction_failed() {
        let mut registry = FormatExtractorRegistry::new();
        registry.register(Arc::new(PanickingExtractor)).unwrap();
        let pipeline = NormalizationPipeline::new(registry);

        let err = pipeline
            .sanitize(&DocumentRequest::new(b"boom".to_vec(), "application/x-crash"))
            .unwrap_err();

        assert!(matches!(err, DocnormError::ExtractionFailed { .. }));
        assert!(err.to_string().contains("malformed cross-reference table"));
    }

    #[test]
    fn test_base64_checked_before_dispatch() {
        let pipeline = NormalizationPipeline::new(FormatExtractorRegistry::new());
        let err = pipeline
            .sanitize(&DocumentRequest::base64("!!!", "application/zip"))
            .unwrap_err();
        assert!(matches!(err, DocnormError::InvalidInput { .. }));
    }
}
