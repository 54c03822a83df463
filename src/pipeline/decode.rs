//! Payload decoding: base64 text → raw PDF bytes.
//!
//! The request carries the menu as standard (RFC 4648 alphabet) base64 so it
//! survives the JSON `body` string. Trailing `=` padding is optional. Only
//! whitespace around the blob is tolerated; anything else malformed is
//! reported as [`SuggestError::Decode`].

use crate::error::SuggestError;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine as _;
use tracing::debug;

/// Standard alphabet; padded and unpadded input both decode.
const PAYLOAD_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Decode the base64 `pdf` field of a request.
pub fn decode_document(encoded: &str) -> Result<Vec<u8>, SuggestError> {
    let bytes = PAYLOAD_ENGINE
        .decode(encoded.trim())
        .map_err(|e| SuggestError::Decode(e.to_string()))?;
    debug!("Decoded PDF payload → {} bytes", bytes.len());
    Ok(bytes)
}
