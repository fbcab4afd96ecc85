//! Shared application state injected into every Axum handler.

use std::sync::Arc;

use crate::gateway::KeyManagement;

/// Application state shared across all request handlers.
///
/// Both fields are `Arc`-backed so Axum can clone the state per request
/// without copying. Nothing in here is mutable.
#[derive(Clone)]
pub struct AppState {
    /// Provider adapter performing the actual encrypt/decrypt.
    pub gateway: Arc<dyn KeyManagement>,
    /// Provider key every operation is bound to. Fixed for the process lifetime.
    pub key_resource: Arc<str>,
}

impl AppState {
    /// Create a new [`AppState`] bound to `key_resource`.
    pub fn new(gateway: Arc<dyn KeyManagement>, key_resource: impl Into<String>) -> Self {
        Self {
            gateway,
            key_resource: Arc::from(key_resource.into()),
        }
    }
}
