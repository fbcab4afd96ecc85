//! Axum request handlers for all service endpoints.

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use common::protocol::{
    DiscoveryResponse, IndexResponse, NoopResponse, StatusResponse, UnwrapResponse, WrapResponse,
};
use common::{Operation, ServiceError};
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use super::state::AppState;
use crate::envelope::{self, UNWRAP_FIELD_NAMES, WRAP_FIELD_NAMES};

/// Convert a [`ServiceError`] into its status code and JSON body.
fn error_response(err: ServiceError) -> Response {
    let status = StatusCode::from_u16(err.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(err.to_response())).into_response()
}

/// Read the body as JSON, or report why it could not be read at all.
fn read_envelope(body: Result<Bytes, BytesRejection>) -> Result<Value, ServiceError> {
    match body {
        Ok(bytes) => Ok(envelope::parse_body(&bytes)),
        Err(rejection) => Err(ServiceError::BodyRejected {
            status: rejection.status().as_u16(),
            detail: rejection.body_text(),
        }),
    }
}

/// `GET /`: usage hint.
pub async fn index() -> Json<IndexResponse> {
    Json(IndexResponse::default())
}

/// `GET /status`: capability descriptor polled by the client.
pub async fn status(State(state): State<AppState>) -> Json<StatusResponse> {
    Json(StatusResponse::new(
        env!("CARGO_PKG_VERSION"),
        state.key_resource.as_ref(),
    ))
}

/// `GET /.well-known/kacls`: discovery marker.
pub async fn discovery() -> Json<DiscoveryResponse> {
    Json(DiscoveryResponse::default())
}

/// `POST /wrap`: encrypt a data-encryption key with the provider key.
///
/// Error-report envelopes (a string `reason` and no key material) are
/// acknowledged with a 200 no-op so the client's reporting path cannot fail.
#[instrument(skip_all, fields(op = "wrap"))]
pub async fn wrap(State(state): State<AppState>, body: Result<Bytes, BytesRejection>) -> Response {
    let envelope = match read_envelope(body) {
        Ok(v) => v,
        Err(e) => return error_response(e),
    };
    let reason = envelope
        .get("reason")
        .and_then(Value::as_str)
        .map(str::to_owned);

    match (transform(&state, &envelope, Operation::Wrap).await, reason) {
        (Ok(wrapped_key), _) => {
            (StatusCode::OK, Json(WrapResponse { wrapped_key })).into_response()
        }
        (Err(ServiceError::MissingKeyMaterial { .. }), Some(reason)) => {
            info!("error envelope acknowledged as no-op");
            (StatusCode::OK, Json(NoopResponse::error_envelope(reason))).into_response()
        }
        (Err(e), _) => error_response(e),
    }
}

/// `POST /unwrap`: decrypt a previously wrapped key.
#[instrument(skip_all, fields(op = "unwrap"))]
pub async fn unwrap(State(state): State<AppState>, body: Result<Bytes, BytesRejection>) -> Response {
    let envelope = match read_envelope(body) {
        Ok(v) => v,
        Err(e) => return error_response(e),
    };

    match transform(&state, &envelope, Operation::Unwrap).await {
        Ok(key) => (StatusCode::OK, Json(UnwrapResponse { key })).into_response(),
        Err(e) => error_response(e),
    }
}

/// Catch-all 404 handler.
pub async fn not_found() -> Response {
    error_response(ServiceError::NotFound)
}

/// Locate, decode, and run one provider call; returns the base64 result.
async fn transform(
    state: &AppState,
    envelope: &Value,
    operation: Operation,
) -> Result<String, ServiceError> {
    let names = match operation {
        Operation::Wrap => WRAP_FIELD_NAMES,
        Operation::Unwrap => UNWRAP_FIELD_NAMES,
    };

    let located = envelope::locate(envelope, names).ok_or_else(|| {
        ServiceError::MissingKeyMaterial {
            operation,
            received_keys: envelope::top_level_keys(envelope),
        }
    })?;
    debug!(field = %located.field_name, path = %located.path, "located key material");

    let input = envelope::decode(&located.raw_value)
        .ok_or(ServiceError::InvalidBase64(operation))?;

    let output = match operation {
        Operation::Wrap => state.gateway.encrypt(&state.key_resource, &input).await,
        Operation::Unwrap => state.gateway.decrypt(&state.key_resource, &input).await,
    }
    .map_err(|e| {
        warn!(%operation, error = %e, "key-management call failed");
        let detail = e.to_string();
        ServiceError::ProviderFailure {
            operation,
            detail: if detail.is_empty() {
                "key-management provider error".into()
            } else {
                detail
            },
        }
    })?;

    Ok(envelope::encode(&output))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::fake::XorGateway;
    use crate::gateway::{GatewayError, MockKeyManagement};
    use axum::{body::Body, http::Request, routing::post, Router};
    use serde_json::json;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn state() -> AppState {
        AppState::new(Arc::new(XorGateway), "alias/test")
    }

    async fn run(op: Operation, state: &AppState, body: Value) -> Result<String, ServiceError> {
        transform(state, &body, op).await
    }

    #[tokio::test]
    async fn wrap_then_unwrap_restores_input() {
        let st = state();
        let wrapped = run(Operation::Wrap, &st, json!({"key": "SGVsbG8="})).await.unwrap();
        assert_ne!(wrapped, "SGVsbG8=");
        let key = run(Operation::Unwrap, &st, json!({"wrapped_key": wrapped}))
            .await
            .unwrap();
        assert_eq!(key, "SGVsbG8=");
    }

    #[tokio::test]
    async fn url_safe_unpadded_input_is_accepted() {
        let st = state();
        let wrapped = run(Operation::Wrap, &st, json!({"dek": "-_-_-_-_"})).await.unwrap();
        let key = run(Operation::Unwrap, &st, json!({"ciphertext": wrapped}))
            .await
            .unwrap();
        assert_eq!(key, "+/+/+/+/");
    }

    #[tokio::test]
    async fn missing_reports_received_keys() {
        let err = run(Operation::Unwrap, &state(), json!({"foo": 1, "bar": "x"}))
            .await
            .unwrap_err();
        match err {
            ServiceError::MissingKeyMaterial {
                operation,
                received_keys,
            } => {
                assert_eq!(operation, Operation::Unwrap);
                assert_eq!(received_keys, vec!["foo", "bar"]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn undecodable_candidate_is_client_error() {
        let err = run(Operation::Wrap, &state(), json!({"key": "AAAAAAAAA"}))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidBase64(Operation::Wrap)));
        assert_eq!(err.http_status(), 400);
    }

    #[tokio::test]
    async fn provider_error_is_not_retried() {
        let mut mock = MockKeyManagement::new();
        mock.expect_decrypt()
            .times(1)
            .returning(|_, _| Err(GatewayError::Provider("InvalidCiphertextException".into())));
        let st = AppState::new(Arc::new(mock), "alias/test");
        let err = run(Operation::Unwrap, &st, json!({"wrapped_key": "AAAAAAAAAAAA"}))
            .await
            .unwrap_err();
        assert_eq!(err.http_status(), 500);
        let body = err.to_response();
        assert_eq!(body.error, "unwrap_failed");
        assert_eq!(body.detail.as_deref(), Some("InvalidCiphertextException"));
    }

    #[tokio::test]
    async fn empty_provider_message_gets_generic_detail() {
        let mut mock = MockKeyManagement::new();
        mock.expect_encrypt()
            .returning(|_, _| Err(GatewayError::Provider(String::new())));
        let st = AppState::new(Arc::new(mock), "alias/test");
        let err = run(Operation::Wrap, &st, json!({"key": "SGVsbG8="}))
            .await
            .unwrap_err();
        assert!(!err.to_response().detail.unwrap().is_empty());
    }

    #[tokio::test]
    async fn oversized_body_is_rejected_as_json() {
        let app = Router::new()
            .route("/wrap", post(wrap))
            .layer(axum::extract::DefaultBodyLimit::max(16))
            .with_state(state());
        let req = Request::builder()
            .method("POST")
            .uri("/wrap")
            .body(Body::from(format!(r#"{{"key":"{}"}}"#, "A".repeat(64))))
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "request_body_rejected");
    }
}
