//! Error taxonomy shared across crates.

use thiserror::Error;

use crate::protocol::ErrorResponse;

/// Which side of the protocol a request belongs to.
///
/// Determines the error tags and messages reported to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Wrap,
    Unwrap,
}

impl Operation {
    fn missing_message(self) -> &'static str {
        match self {
            Operation::Wrap => "missing DEK (base64)",
            Operation::Unwrap => "missing wrapped_key/ciphertext (base64)",
        }
    }

    fn invalid_message(self) -> &'static str {
        match self {
            Operation::Wrap => "invalid base64/plaintext",
            Operation::Unwrap => "invalid base64/ciphertext",
        }
    }

    fn failure_tag(self) -> &'static str {
        match self {
            Operation::Wrap => "wrap_failed",
            Operation::Unwrap => "unwrap_failed",
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operation::Wrap => f.write_str("wrap"),
            Operation::Unwrap => f.write_str("unwrap"),
        }
    }
}

/// Top-level service error type.
///
/// Variants map to HTTP status codes returned to callers:
/// - [`ServiceError::MissingKeyMaterial`] → 400
/// - [`ServiceError::InvalidBase64`] → 400
/// - [`ServiceError::ProviderFailure`] → 500
/// - [`ServiceError::NotFound`] → 404
/// - [`ServiceError::BodyRejected`] → status chosen by the body reader (413 when oversized)
#[derive(Debug, Error)]
pub enum ServiceError {
    /// No plausible base64 value was found anywhere in the body.
    #[error("{}", .operation.missing_message())]
    MissingKeyMaterial {
        operation: Operation,
        received_keys: Vec<String>,
    },

    /// A candidate was found but does not decode as base64.
    #[error("{}", .0.invalid_message())]
    InvalidBase64(Operation),

    /// The key-management provider rejected or failed the call.
    #[error("{}: {detail}", .operation.failure_tag())]
    ProviderFailure { operation: Operation, detail: String },

    /// No route matches the request.
    #[error("not_found")]
    NotFound,

    /// The request body could not be read, typically because it exceeds the size cap.
    #[error("request body rejected: {detail}")]
    BodyRejected { status: u16, detail: String },
}

impl ServiceError {
    /// Returns the HTTP status code that should be sent for this error.
    pub fn http_status(&self) -> u16 {
        match self {
            ServiceError::MissingKeyMaterial { .. } => 400,
            ServiceError::InvalidBase64(_) => 400,
            ServiceError::ProviderFailure { .. } => 500,
            ServiceError::NotFound => 404,
            ServiceError::BodyRejected { status, .. } => *status,
        }
    }

    /// Render the JSON body sent alongside [`ServiceError::http_status`].
    pub fn to_response(&self) -> ErrorResponse {
        match self {
            ServiceError::MissingKeyMaterial {
                operation,
                received_keys,
            } => ErrorResponse::new(operation.missing_message())
                .with_received_keys(received_keys.clone()),
            ServiceError::InvalidBase64(operation) => {
                ErrorResponse::new(operation.invalid_message())
            }
            ServiceError::ProviderFailure { operation, detail } => {
                ErrorResponse::new(operation.failure_tag()).with_detail(detail.clone())
            }
            ServiceError::NotFound => ErrorResponse::new("not_found"),
            ServiceError::BodyRejected { detail, .. } => {
                ErrorResponse::new("request_body_rejected").with_detail(detail.clone())
            }
        }
    }
}
