//! Payload validation.
//!
//! Runs before any format-specific parsing: decodes the transport encoding and
//! enforces the decoded size cap, so an oversized or garbled payload never reaches an
//! extractor.

use crate::types::TransportEncoding;
use crate::{DocnormError, Result};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use std::borrow::Cow;

/// Maximum decoded payload size (25 MiB).
pub const MAX_PAYLOAD_BYTES: usize = 25 * 1024 * 1024;

/// Decode and size-check a payload.
///
/// Base64 input is decoded strictly: standard alphabet, canonical padding, no
/// embedded whitespace. The size limit applies to the decoded bytes, and `TooLarge`
/// reports the true decoded length.
///
/// # Errors
///
/// - `InvalidInput` if base64 decoding fails
/// - `TooLarge` if the decoded payload exceeds [`MAX_PAYLOAD_BYTES`]
pub fn validate(payload: &[u8], encoding: TransportEncoding) -> Result<Cow<'_, [u8]>> {
    validate_with_limit(payload, encoding, MAX_PAYLOAD_BYTES)
}

pub(crate) fn validate_with_limit(payload: &[u8], encoding: TransportEncoding, limit: usize) -> Result<Cow<'_, [u8]>> {
    let decoded = match encoding {
        TransportEncoding::None => Cow::Borrowed(payload),
        TransportEncoding::Base64 => Cow::Owned(STANDARD.decode(payload)?),
    };

    if decoded.len() > limit {
        return Err(DocnormError::TooLarge {
            limit,
            actual: decoded.len(),
        });
    }

    Ok(decoded)
}
