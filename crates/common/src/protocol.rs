//! Request and response bodies of the KACLS HTTP surface.
//!
//! Request bodies are deliberately untyped (`serde_json::Value`): callers put
//! key material under a number of different field names and nesting shapes.
//! Only responses have a fixed schema, and that schema is dictated by the
//! client-side-encryption protocol, so field names must not change.

use serde::{Deserialize, Serialize};

/// Operations advertised by `GET /status`.
pub const SUPPORTED_OPERATIONS: [&str; 2] = ["wrap", "unwrap"];

/// Service identity reported as `vendor_id`/`name` on `GET /status` and as the
/// telemetry `service.name`.
pub const SERVICE_NAME: &str = "kacls-svc";

/// Path of the service discovery marker.
pub const DISCOVERY_PATH: &str = "/.well-known/kacls";

// ---------------------------------------------------------------------------
// Wrap / unwrap
// ---------------------------------------------------------------------------

/// Successful response body for `POST /wrap`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WrapResponse {
    /// Standard base64 of the provider ciphertext.
    pub wrapped_key: String,
}

/// Successful response body for `POST /unwrap`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnwrapResponse {
    /// Standard base64 of the recovered key material.
    pub key: String,
}

/// Body returned when a wrap call carries a client error report instead of
/// key material.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoopResponse {
    pub ok: bool,
    pub note: String,
    pub reason: String,
}

impl NoopResponse {
    pub fn error_envelope(reason: impl Into<String>) -> Self {
        Self {
            ok: true,
            note: "noop (error envelope)".into(),
            reason: reason.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Error response
// ---------------------------------------------------------------------------

/// Error body returned on any non-2xx status.
///
/// `error` is always present. `detail` accompanies provider failures and
/// `received_keys` accompanies missing-key-material failures.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Short machine-diagnosable error tag.
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    /// Top-level field names of the rejected request body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub received_keys: Option<Vec<String>>,
}

impl ErrorResponse {
    /// Construct an [`ErrorResponse`] carrying only the error tag.
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            detail: None,
            received_keys: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn with_received_keys(mut self, keys: Vec<String>) -> Self {
        self.received_keys = Some(keys);
        self
    }
}

// ---------------------------------------------------------------------------
// Discovery
// ---------------------------------------------------------------------------

/// Response body for `GET /`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexResponse {
    pub ok: bool,
    pub tip: String,
}

impl Default for IndexResponse {
    fn default() -> Self {
        Self {
            ok: true,
            tip: "use /status, /wrap, /unwrap".into(),
        }
    }
}

/// Response body for `GET /.well-known/kacls`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoveryResponse {
    pub ok: bool,
    pub path: String,
}

impl Default for DiscoveryResponse {
    fn default() -> Self {
        Self {
            ok: true,
            path: DISCOVERY_PATH.into(),
        }
    }
}

/// Response body for `GET /status`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    /// Always `"KACLS"`.
    pub server_type: String,
    pub vendor_id: String,
    pub version: String,
    pub name: String,
    pub operations_supported: Vec<String>,
    /// Identifier of the provider key every wrap/unwrap call uses.
    pub key_resource: String,
}

impl StatusResponse {
    /// Build the fixed descriptor for a service bound to `key_resource`.
    pub fn new(version: impl Into<String>, key_resource: impl Into<String>) -> Self {
        Self {
            server_type: "KACLS".into(),
            vendor_id: SERVICE_NAME.into(),
            version: version.into(),
            name: SERVICE_NAME.into(),
            operations_supported: SUPPORTED_OPERATIONS.iter().map(|s| s.to_string()).collect(),
            key_resource: key_resource.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn error_response_omits_absent_fields() {
        let e = ErrorResponse::new("invalid base64/plaintext");
        let value = serde_json::to_value(&e).unwrap();
        assert_eq!(value, json!({"error": "invalid base64/plaintext"}));
    }

    #[test]
    fn error_response_keeps_empty_received_keys() {
        let e = ErrorResponse::new("missing DEK (base64)").with_received_keys(vec![]);
        let value = serde_json::to_value(&e).unwrap();
        assert_eq!(value, json!({"error": "missing DEK (base64)", "received_keys": []}));
    }

    #[test]
    fn noop_response_shape() {
        let value = serde_json::to_value(NoopResponse::error_envelope("client error")).unwrap();
        assert_eq!(
            value,
            json!({"ok": true, "note": "noop (error envelope)", "reason": "client error"})
        );
    }

    #[test]
    fn status_lists_operations_and_key() {
        let s = StatusResponse::new("0.1.0", "alias/cse");
        assert_eq!(s.server_type, "KACLS");
        assert_eq!(s.vendor_id, SERVICE_NAME);
        assert_eq!(s.name, SERVICE_NAME);
        assert_eq!(s.operations_supported, vec!["wrap", "unwrap"]);
        assert_eq!(s.key_resource, "alias/cse");
    }

    #[test]
    fn discovery_and_index_defaults() {
        assert_eq!(
            serde_json::to_value(DiscoveryResponse::default()).unwrap(),
            json!({"ok": true, "path": "/.well-known/kacls"})
        );
        assert_eq!(
            serde_json::to_value(IndexResponse::default()).unwrap(),
            json!({"ok": true, "tip": "use /status, /wrap, /unwrap"})
        );
    }
}
