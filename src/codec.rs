//! Transport-safe payload codec.
//!
//! Generated hosts embed the setup block and script body as Base64 over
//! UTF-16LE bytes, so arbitrary Unicode script text survives being spliced
//! into generated source without escaping issues. The same encoding feeds the
//! interpreter's encoded-command argument, which expects exactly this layout.

use base64::engine::general_purpose::STANDARD as B64;
use base64::Engine;

use crate::error::DecodeError;

/// Encode plain text into its transport-safe form.
pub fn encode(text: &str) -> String {
    let mut bytes = Vec::with_capacity(text.len() * 2);
    for unit in text.encode_utf16() {
        bytes.extend_from_slice(&unit.to_le_bytes());
    }
    B64.encode(bytes)
}

/// Decode a transport-safe payload back into plain text.
///
/// Fails if the payload is not valid Base64, if the decoded byte count is not
/// a whole number of 2-byte units, or if the units are not valid UTF-16.
pub fn decode(encoded: &str) -> Result<String, DecodeError> {
    let bytes = B64.decode(encoded)?;
    if bytes.len() % 2 != 0 {
        return Err(DecodeError::OddByteCount(bytes.len()));
    }
    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .collect();
    String::from_utf16(&units).map_err(|_| DecodeError::InvalidUtf16)
}
