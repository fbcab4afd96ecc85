//! AWS SDK client initialisation.
//!
//! Only KMS is used: the service holds no secrets of its own and every
//! cryptographic operation is a KMS call made with the process credentials.

pub mod clients;

pub use clients::kms_client;
