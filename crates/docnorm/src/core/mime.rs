//! Content-type constants and normalization.
//!
//! The declared `document_type` of a request is the dispatch key for extractor
//! lookup. Callers frequently send parameters (`text/plain; charset=utf-8`) or odd
//! casing, so the key is normalized before it reaches the registry.

use crate::{DocnormError, Result};
use std::path::Path;

pub const PDF_MIME_TYPE: &str = "application/pdf";
pub const DOCX_MIME_TYPE: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
pub const PLAIN_TEXT_MIME_TYPE: &str = "text/plain";

/// Content types served by the built-in extractors.
pub const SUPPORTED_MIME_TYPES: &[&str] = &[PDF_MIME_TYPE, DOCX_MIME_TYPE, PLAIN_TEXT_MIME_TYPE];

/// Normalize a declared content type into a registry key.
///
/// Drops parameters after `;`, trims whitespace and lowercases the essence.
///
/// ```rust
/// use docnorm::core::mime::normalize_content_type;
///
/// assert_eq!(normalize_content_type(" Text/Plain; charset=UTF-8 "), "text/plain");
/// ```
pub fn normalize_content_type(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

/// Guess a content type from a file extension.
///
/// Only used by local tooling; RPC callers always declare the type explicitly.
pub fn content_type_from_path(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    mime_guess::from_path(path)
        .first()
        .map(|mime| mime.essence_str().to_string())
        .ok_or_else(|| {
            DocnormError::invalid_input(format!(
                "cannot determine document type from file name: {}",
                path.display()
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_parameters() {
        assert_eq!(normalize_content_type("text/plain; charset=utf-8"), PLAIN_TEXT_MIME_TYPE);
    }

    #[test]
    fn test_normalize_lowercases_and_trims() {
        assert_eq!(normalize_content_type("  APPLICATION/PDF "), PDF_MIME_TYPE);
    }

    #[test]
    fn test_normalize_empty() {
        assert_eq!(normalize_content_type(""), "");
    }

    #[test]
    fn test_content_type_from_path() {
        assert_eq!(content_type_from_path("report.pdf").unwrap(), PDF_MIME_TYPE);
        assert_eq!(content_type_from_path("notes.txt").unwrap(), PLAIN_TEXT_MIME_TYPE);
        assert_eq!(content_type_from_path("letter.docx").unwrap(), DOCX_MIME_TYPE);
    }

    #[test]
    fn test_content_type_from_path_unknown() {
        let err = content_type_from_path("no_extension").unwrap_err();
        assert!(matches!(err, DocnormError::InvalidInput { .. }));
    }
}
