//! Configuration loading and validation for the KACLS service.
//!
//! All values are read from environment variables at startup. The process will
//! exit with a clear error message if any required variable is missing or invalid.

use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Validated service configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// KMS key id, ARN, or alias used for every wrap/unwrap. **Required.**
    #[serde(default)]
    pub kms_key_id: String,

    /// Port the HTTP(S) server listens on.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Tracing log level (e.g. `"info"`, `"debug"`).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Largest accepted request body, in bytes.
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,

    /// Upper bound on a single KMS call, in seconds. `0` disables the bound.
    #[serde(default = "default_kms_timeout")]
    pub kms_timeout_secs: u64,

    /// Alternative KMS endpoint, e.g. a local emulator.
    #[serde(default)]
    pub kms_endpoint_url: Option<String>,

    /// OTLP collector endpoint. Span export is disabled when unset.
    #[serde(default)]
    pub otel_exporter_otlp_endpoint: Option<String>,

    /// PEM certificate chain. Set together with `tls_key_path` to serve HTTPS.
    #[serde(default)]
    pub tls_cert_path: Option<String>,

    /// PEM private key matching `tls_cert_path`.
    #[serde(default)]
    pub tls_key_path: Option<String>,
}

fn default_port() -> u16 {
    8080
}
fn default_log_level() -> String {
    "info".into()
}
fn default_max_body_bytes() -> usize {
    2 * 1024 * 1024
}
fn default_kms_timeout() -> u64 {
    30
}

impl Config {
    /// Load and validate configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if any required variable is absent or cannot be parsed.
    pub fn from_env() -> Result<Self> {
        let cfg = config::Config::builder()
            .add_source(config::Environment::default())
            .build()
            .context("failed to build configuration from environment")?;

        let c: Config = cfg
            .try_deserialize()
            .context("failed to deserialise configuration")?;

        c.validate()?;
        Ok(c)
    }

    /// Validate all fields, returning a descriptive error on the first failure.
    fn validate(&self) -> Result<()> {
        ensure_non_empty(&self.kms_key_id, "KMS_KEY_ID")?;

        if self.max_body_bytes == 0 {
            anyhow::bail!("MAX_BODY_BYTES must be > 0");
        }
        match (non_empty(&self.tls_cert_path), non_empty(&self.tls_key_path)) {
            (Some(_), None) => anyhow::bail!("TLS_KEY_PATH is required when TLS_CERT_PATH is set"),
            (None, Some(_)) => anyhow::bail!("TLS_CERT_PATH is required when TLS_KEY_PATH is set"),
            _ => {}
        }
        Ok(())
    }

    /// Per-call KMS timeout, if one is configured.
    pub fn kms_timeout(&self) -> Option<Duration> {
        (self.kms_timeout_secs > 0).then(|| Duration::from_secs(self.kms_timeout_secs))
    }

    /// Certificate and key paths when TLS is enabled.
    pub fn tls_paths(&self) -> Option<(&str, &str)> {
        Some((non_empty(&self.tls_cert_path)?, non_empty(&self.tls_key_path)?))
    }

    pub fn kms_endpoint_url(&self) -> Option<&str> {
        non_empty(&self.kms_endpoint_url)
    }

    pub fn otlp_endpoint(&self) -> Option<&str> {
        non_empty(&self.otel_exporter_otlp_endpoint)
    }
}

fn ensure_non_empty(value: &str, name: &str) -> Result<()> {
    if value.trim().is_empty() {
        anyhow::bail!("{name} is required and must not be empty");
    }
    Ok(())
}

/// Treat blank optional variables the same as unset ones.
fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}
