//! Key-management gateway: the seam between the HTTP handlers and the
//! external provider that actually holds the key.
//!
//! Handlers only ever see [`KeyManagement`]. The production implementation,
//! [`KmsGateway`], forwards each call to AWS KMS `Encrypt` / `Decrypt`; tests
//! substitute mocks or deterministic fakes.
//!
//! # Invariants
//!
//! - One provider round trip per call. No retries, no caching.
//! - Key material passed through here is never logged.

pub mod kms;

pub use kms::KmsGateway;

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Errors produced by a [`KeyManagement`] implementation.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The provider rejected the call or could not be reached.
    #[error("{0}")]
    Provider(String),

    /// The provider answered without the expected output blob.
    #[error("provider response contained no {0}")]
    EmptyResponse(&'static str),

    /// The provider did not answer within the configured bound.
    #[error("provider call timed out after {0:?}")]
    Timeout(Duration),
}

/// Encrypt/decrypt operations against an externally managed key.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait KeyManagement: Send + Sync {
    /// Encrypt `plaintext` under the key named by `key_resource`.
    async fn encrypt(&self, key_resource: &str, plaintext: &[u8]) -> Result<Vec<u8>, GatewayError>;

    /// Decrypt `ciphertext` previously produced by [`KeyManagement::encrypt`].
    async fn decrypt(&self, key_resource: &str, ciphertext: &[u8])
        -> Result<Vec<u8>, GatewayError>;
}

#[cfg(test)]
pub(crate) mod fake {
    use super::*;

    const MARKER: &[u8] = b"xor:";

    /// Deterministic stand-in for a provider: XORs every byte with a fixed
    /// mask behind a marker prefix, and refuses input without the marker.
    pub struct XorGateway;

    fn mask(bytes: &[u8]) -> Vec<u8> {
        bytes.iter().map(|b| b ^ 0x5a).collect()
    }

    #[async_trait]
    impl KeyManagement for XorGateway {
        async fn encrypt(&self, _key: &str, plaintext: &[u8]) -> Result<Vec<u8>, GatewayError> {
            Ok([MARKER, mask(plaintext).as_slice()].concat())
        }

        async fn decrypt(&self, _key: &str, ciphertext: &[u8]) -> Result<Vec<u8>, GatewayError> {
            ciphertext
                .strip_prefix(MARKER)
                .map(mask)
                .ok_or_else(|| GatewayError::Provider("InvalidCiphertextException".into()))
        }
    }
}
