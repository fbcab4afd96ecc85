//! Request envelope normalisation.
//!
//! Callers of the client-side-encryption protocol do not agree on where key
//! material goes in a request body. This module finds it and decodes it:
//!
//! - [`locate`] walks an untyped JSON body looking for a base64-looking string,
//!   trying a list of preferred field names before a depth-first scan.
//! - [`decode`] turns the located string into bytes, tolerating URL-safe
//!   alphabets and stripped padding.
//!
//! Neither step returns an error; absence is the only failure signal and is
//! mapped to a 400 by the handlers.

pub mod decode;
pub mod locator;

pub use decode::{decode, encode};
pub use locator::{locate, LocatedField};

use serde_json::Value;

/// Field names tried, in order, for `POST /wrap`.
pub const WRAP_FIELD_NAMES: &[&str] = &[
    "key",
    "key_to_wrap_b64",
    "keyToWrapB64",
    "keyToWrap",
    "dek",
    "plaintext_b64",
    "plaintext",
    "data",
];

/// Field names tried, in order, for `POST /unwrap`.
pub const UNWRAP_FIELD_NAMES: &[&str] = &[
    "wrapped_key",
    "wrapped_key_b64",
    "wrappedKeyB64",
    "wrappedDek",
    "ciphertext_b64",
    "ciphertext",
    "data",
];

/// Top-level field names of `body`, in insertion order. Empty for non-objects.
pub fn top_level_keys(body: &Value) -> Vec<String> {
    body.as_object()
        .map(|map| map.keys().cloned().collect())
        .unwrap_or_default()
}

/// Parse a raw request body, treating anything unparseable as `{}`.
pub fn parse_body(bytes: &[u8]) -> Value {
    serde_json::from_slice(bytes).unwrap_or_else(|_| Value::Object(Default::default()))
}
