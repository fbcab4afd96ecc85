//! Cross-origin gate applied in front of every route.
//!
//! The calling client runs inside a browser page served from a Google origin,
//! so every response carries CORS headers and preflight requests are answered
//! here without reaching a handler.

use axum::{
    extract::Request,
    http::{
        header::{
            ACCESS_CONTROL_ALLOW_CREDENTIALS, ACCESS_CONTROL_ALLOW_HEADERS,
            ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN, ACCESS_CONTROL_MAX_AGE,
            ACCESS_CONTROL_REQUEST_HEADERS, ORIGIN, VARY,
        },
        HeaderMap, HeaderValue, Method, StatusCode,
    },
    middleware::Next,
    response::{IntoResponse, Response},
};

/// Origin assumed when the request does not send one.
pub const DEFAULT_ORIGIN: &str = "https://client-side-encryption.google.com";

pub const ALLOWED_METHODS: &str = "GET,POST,OPTIONS,HEAD";

/// Allowed request headers when the preflight does not list any.
pub const DEFAULT_ALLOWED_HEADERS: &str =
    "Content-Type, Authorization, X-Requested-With, X-Goog-AuthAssertion, X-Goog-Api-Client, X-Client-Data";

/// Preflight cache lifetime, in seconds.
pub const MAX_AGE_SECS: &str = "86400";

/// Attach CORS headers; answer `OPTIONS` and `HEAD` with an empty 204.
pub async fn cors_gate(req: Request, next: Next) -> Response {
    let origin = req
        .headers()
        .get(ORIGIN)
        .cloned()
        .unwrap_or_else(|| HeaderValue::from_static(DEFAULT_ORIGIN));
    let allow_headers = req
        .headers()
        .get(ACCESS_CONTROL_REQUEST_HEADERS)
        .cloned()
        .unwrap_or_else(|| HeaderValue::from_static(DEFAULT_ALLOWED_HEADERS));

    let mut resp = if req.method() == Method::OPTIONS || req.method() == Method::HEAD {
        StatusCode::NO_CONTENT.into_response()
    } else {
        next.run(req).await
    };

    apply_cors_headers(resp.headers_mut(), origin, allow_headers);
    resp
}

fn apply_cors_headers(headers: &mut HeaderMap, origin: HeaderValue, allow_headers: HeaderValue) {
    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, origin);
    headers.insert(
        ACCESS_CONTROL_ALLOW_CREDENTIALS,
        HeaderValue::from_static("true"),
    );
    // Allow-Origin depends on the request, caches must key on it.
    headers.append(VARY, HeaderValue::from_static("Origin"));
    headers.insert(
        ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(ALLOWED_METHODS),
    );
    headers.insert(ACCESS_CONTROL_MAX_AGE, HeaderValue::from_static(MAX_AGE_SECS));
    headers.insert(ACCESS_CONTROL_ALLOW_HEADERS, allow_headers);
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::Request,
        routing::{get, post},
        Router,
    };
    use tower::ServiceExt;

    fn app() -> Router {
        Router::new()
            .route("/wrap", post(|| async { "wrapped" }))
            .route("/status", get(|| async { "up" }))
            .layer(axum::middleware::from_fn(cors_gate))
    }

    #[tokio::test]
    async fn preflight_short_circuits_with_echoed_origin() {
        let req = Request::builder()
            .method(Method::OPTIONS)
            .uri("/wrap")
            .header(ORIGIN, "https://example.com")
            .body(Body::empty())
            .unwrap();
        let resp = app().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);
        assert_eq!(
            resp.headers()[ACCESS_CONTROL_ALLOW_ORIGIN],
            "https://example.com"
        );
        assert_eq!(resp.headers()[ACCESS_CONTROL_ALLOW_CREDENTIALS], "true");
        assert_eq!(resp.headers()[ACCESS_CONTROL_ALLOW_METHODS], ALLOWED_METHODS);
        assert_eq!(resp.headers()[ACCESS_CONTROL_MAX_AGE], "86400");
        assert_eq!(resp.headers()[VARY], "Origin");
        let body = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn head_short_circuits() {
        let req = Request::builder()
            .method(Method::HEAD)
            .uri("/status")
            .body(Body::empty())
            .unwrap();
        let resp = app().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);
        assert_eq!(resp.headers()[ACCESS_CONTROL_ALLOW_ORIGIN], DEFAULT_ORIGIN);
    }

    #[tokio::test]
    async fn requested_headers_are_echoed() {
        let req = Request::builder()
            .method(Method::OPTIONS)
            .uri("/wrap")
            .header(ACCESS_CONTROL_REQUEST_HEADERS, "content-type,x-custom")
            .body(Body::empty())
            .unwrap();
        let resp = app().oneshot(req).await.unwrap();
        assert_eq!(
            resp.headers()[ACCESS_CONTROL_ALLOW_HEADERS],
            "content-type,x-custom"
        );
    }

    #[tokio::test]
    async fn default_headers_without_request_list() {
        let req = Request::builder()
            .method(Method::OPTIONS)
            .uri("/wrap")
            .body(Body::empty())
            .unwrap();
        let resp = app().oneshot(req).await.unwrap();
        assert_eq!(
            resp.headers()[ACCESS_CONTROL_ALLOW_HEADERS],
            DEFAULT_ALLOWED_HEADERS
        );
        assert_eq!(resp.headers()[ACCESS_CONTROL_ALLOW_ORIGIN], DEFAULT_ORIGIN);
    }

    #[tokio::test]
    async fn other_methods_reach_handler_with_headers() {
        let req = Request::builder()
            .method(Method::POST)
            .uri("/wrap")
            .header(ORIGIN, "https://docs.google.com")
            .body(Body::empty())
            .unwrap();
        let resp = app().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers()[ACCESS_CONTROL_ALLOW_ORIGIN],
            "https://docs.google.com"
        );
        let body = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"wrapped");
    }
}
