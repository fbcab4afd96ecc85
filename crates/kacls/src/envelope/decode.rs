//! Lenient base64 decoding of located key material.

use base64::{engine::general_purpose::STANDARD, Engine as _};

/// Decode `s` as base64, accepting either alphabet and missing padding.
///
/// Returns `None` for anything the decoder rejects; never panics.
pub fn decode(s: &str) -> Option<Vec<u8>> {
    let mut normalized: String = s
        .chars()
        .map(|c| match c {
            '-' => '+',
            '_' => '/',
            other => other,
        })
        .collect();
    while normalized.len() % 4 != 0 {
        normalized.push('=');
    }
    STANDARD.decode(normalized).ok()
}

/// Encode bytes for a response body (standard alphabet, padded).
pub fn encode(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}
