//! Error types for docnorm.
//!
//! Every fallible operation in the crate returns [`DocnormError`]. The first four
//! variants form the classified outcome taxonomy that callers of the normalization
//! pipeline observe:
//!
//! - `InvalidInput` - malformed transport encoding or request envelope
//! - `UnsupportedType` - declared content type has no registered extractor
//! - `TooLarge` - decoded payload exceeds the size cap
//! - `ExtractionFailed` - the format extractor could not read the document
//!
//! `Io` and `Config` cover process-level failures (binding a socket, reading a config
//! file). They never originate inside the pipeline and are reported as internal errors
//! if they reach the service boundary.
//!
//! # Example
//!
//! ```rust
//! use docnorm::{DocnormError, Result};
//!
//! fn require_text(content: &str) -> Result<&str> {
//!     if content.is_empty() {
//!         return Err(DocnormError::invalid_input("document is empty"));
//!     }
//!     Ok(content)
//! }
//!
//! assert!(require_text("").unwrap_err().is_client_error());
//! ```
use thiserror::Error;

/// Result type alias using `DocnormError`.
pub type Result<T> = std::result::Result<T, DocnormError>;

/// Main error type for all docnorm operations.
#[derive(Debug, Error)]
pub enum DocnormError {
    #[error("invalid input: {message}")]
    InvalidInput {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("unsupported document type: {0}")]
    UnsupportedType(String),

    #[error("payload too large: {actual} bytes exceeds limit of {limit} bytes")]
    TooLarge { limit: usize, actual: usize },

    #[error("extraction failed: {message}")]
    ExtractionFailed {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("configuration error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl DocnormError {
    /// Whether the caller is at fault.
    ///
    /// Client errors are reported back with their full reason; everything else is an
    /// internal failure whose cause stays in the server logs.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidInput { .. } | Self::UnsupportedType(_) | Self::TooLarge { .. }
        )
    }
}

impl From<serde_json::Error> for DocnormError {
    fn from(err: serde_json::Error) -> Self {
        DocnormError::InvalidInput {
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }
}

impl From<base64::DecodeError> for DocnormError {
    fn from(err: base64::DecodeError) -> Self {
        DocnormError::InvalidInput {
            message: format!("invalid base64: {}", err),
            source: Some(Box::new(err)),
        }
    }
}

#[cfg(feature = "pdf")]
impl From<lopdf::Error> for DocnormError {
    fn from(err: lopdf::Error) -> Self {
        DocnormError::ExtractionFailed {
            message: format!("PDF parsing failed: {}", err),
            source: Some(Box::new(err)),
        }
    }
}

#[cfg(feature = "office")]
impl From<zip::result::ZipError> for DocnormError {
    fn from(err: zip::result::ZipError) -> Self {
        DocnormError::ExtractionFailed {
            message: format!("failed to open document container: {}", err),
            source: Some(Box::new(err)),
        }
    }
}

#[cfg(feature = "office")]
impl From<roxmltree::Error> for DocnormError {
    fn from(err: roxmltree::Error) -> Self {
        DocnormError::ExtractionFailed {
            message: format!("malformed document XML: {}", err),
            source: Some(Box::new(err)),
        }
    }
}

macro_rules! error_constructor {
    ($name:ident, $variant:ident) => {
        pastey::paste! {
            #[doc = "Create a " $variant " error"]
            pub fn $name<S: Into<String>>(message: S) -> Self {
                Self::$variant {
                    message: message.into(),
                    source: None,
                }
            }

            #[doc = "Create a " $variant " error with source"]
            pub fn [<$name _with_source>]<S: Into<String>, E: std::error::Error + Send + Sync + 'static>(
                message: S,
                source: E,
            ) -> Self {
                Self::$variant {
                    message: message.into(),
                    source: Some(Box::new(source)),
                }
            }
        }
    };
}

impl DocnormError {
    error_constructor!(invalid_input, InvalidInput);
    error_constructor!(extraction_failed, ExtractionFailed);
    error_constructor!(config, Config);
}
