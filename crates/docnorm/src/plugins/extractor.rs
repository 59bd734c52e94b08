//! Format extractor plugin trait.

use crate::Result;
use crate::plugins::Plugin;
use crate::types::NormalizedDocument;

/// Converts the raw bytes of one document format into a [`NormalizedDocument`].
///
/// Extraction is synchronous and may be CPU-heavy; the service runs it on a blocking
/// worker, so implementations are free to block for the duration of the call.
///
/// # Priority System
///
/// When several extractors claim the same content type, the registry picks the one
/// with the highest priority. Built-in extractors use 50.
///
/// # Determinism
///
/// Identical input bytes must produce an identical document. Elements must come out
/// in reading order, never in hash-map iteration order.
///
/// # Example
///
/// ```rust
/// use docnorm::plugins::{FormatExtractor, Plugin};
/// use docnorm::types::{DocumentElement, NormalizedDocument};
/// use docnorm::Result;
///
/// struct CsvExtractor;
///
/// impl Plugin for CsvExtractor {
///     fn name(&self) -> &str { "csv-extractor" }
///     fn version(&self) -> String { "1.0.0".to_string() }
///     fn initialize(&self) -> Result<()> { Ok(()) }
///     fn shutdown(&self) -> Result<()> { Ok(()) }
/// }
///
/// impl FormatExtractor for CsvExtractor {
///     fn extract(&self, content: &[u8]) -> Result<NormalizedDocument> {
///         let text = String::from_utf8_lossy(content).into_owned();
///         Ok(NormalizedDocument::Elements(vec![DocumentElement::text(text)]))
///     }
///
///     fn supported_content_types(&self) -> &[&str] {
///         &["text/csv"]
///     }
/// }
/// ```
pub trait FormatExtractor: Plugin {
    /// Extract a document from its bytes.
    ///
    /// The bytes have already passed payload validation.
    ///
    /// # Errors
    ///
    /// `DocnormError::ExtractionFailed` when the document cannot be read.
    fn extract(&self, content: &[u8]) -> Result<NormalizedDocument>;

    /// Normalized content types this extractor handles.
    fn supported_content_types(&self) -> &[&str];

    fn priority(&self) -> i32 {
        50
    }
}
