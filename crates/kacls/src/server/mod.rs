//! Axum HTTP(S) server, routing, and middleware.
//!
//! # Responsibilities
//! - Define the Axum router with the protocol endpoints and shared middleware.
//! - Answer CORS preflights before routing.
//! - Inject shared application state (`AppState`) into handlers.
//! - Optionally terminate TLS (rustls) when certificate paths are configured.

pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;
pub mod tls;
