//! [`KmsGateway`]: [`KeyManagement`] backed by AWS KMS.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use aws_sdk_kms::{error::DisplayErrorContext, primitives::Blob};
use tracing::debug;

use super::{GatewayError, KeyManagement};

/// Forwards wrap/unwrap to AWS KMS symmetric `Encrypt` / `Decrypt`.
#[derive(Clone, Debug)]
pub struct KmsGateway {
    client: aws_sdk_kms::Client,
    timeout: Option<Duration>,
}

impl KmsGateway {
    /// Create a gateway around an already configured KMS client.
    ///
    /// `timeout` bounds each provider call; `None` waits indefinitely.
    pub fn new(client: aws_sdk_kms::Client, timeout: Option<Duration>) -> Self {
        Self { client, timeout }
    }
}

/// Await `call`, giving up after `timeout` when one is set.
async fn bounded<F: Future>(timeout: Option<Duration>, call: F) -> Result<F::Output, GatewayError> {
    match timeout {
        Some(limit) => tokio::time::timeout(limit, call)
            .await
            .map_err(|_| GatewayError::Timeout(limit)),
        None => Ok(call.await),
    }
}

#[async_trait]
impl KeyManagement for KmsGateway {
    async fn encrypt(&self, key_resource: &str, plaintext: &[u8]) -> Result<Vec<u8>, GatewayError> {
        let call = self
            .client
            .encrypt()
            .key_id(key_resource)
            .plaintext(Blob::new(plaintext))
            .send();

        let resp = bounded(self.timeout, call)
            .await?
            .map_err(|e| GatewayError::Provider(DisplayErrorContext(&e).to_string()))?;

        let ciphertext = resp
            .ciphertext_blob()
            .ok_or(GatewayError::EmptyResponse("ciphertext"))?;
        debug!(len = ciphertext.as_ref().len(), "KMS encrypt succeeded");
        Ok(ciphertext.as_ref().to_vec())
    }

    async fn decrypt(
        &self,
        key_resource: &str,
        ciphertext: &[u8],
    ) -> Result<Vec<u8>, GatewayError> {
        let call = self
            .client
            .decrypt()
            .key_id(key_resource)
            .ciphertext_blob(Blob::new(ciphertext))
            .send();

        let resp = bounded(self.timeout, call)
            .await?
            .map_err(|e| GatewayError::Provider(DisplayErrorContext(&e).to_string()))?;

        let plaintext = resp
            .plaintext()
            .ok_or(GatewayError::EmptyResponse("plaintext"))?;
        debug!(len = plaintext.as_ref().len(), "KMS decrypt succeeded");
        Ok(plaintext.as_ref().to_vec())
    }
}
