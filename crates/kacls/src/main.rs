//! `kacls-svc`: service binary entry point.
//!
//! Startup sequence:
//! 1. Load and validate [`Config`] from environment variables.
//! 2. Initialise the telemetry pipeline (JSON logs, optional OTLP).
//! 3. Build the AWS KMS client and the [`KmsGateway`].
//! 4. Build the Axum router and serve it over HTTP, or HTTPS when TLS paths are set.

mod aws;
mod config;
mod envelope;
mod gateway;
mod server;
mod telemetry;

use std::sync::Arc;

use anyhow::Result;
use tracing::{info, warn};

use config::Config;
use gateway::KmsGateway;
use server::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // -----------------------------------------------------------------------
    // 1. Configuration
    // -----------------------------------------------------------------------
    let cfg = Config::from_env().map_err(|e| {
        // Telemetry is not yet up; write to stderr directly.
        eprintln!("ERROR: configuration invalid: {e:#}");
        e
    })?;

    // -----------------------------------------------------------------------
    // 2. Telemetry
    // -----------------------------------------------------------------------
    telemetry::init_telemetry(cfg.otlp_endpoint(), &cfg.log_level)?;
    info!(
        version = env!("CARGO_PKG_VERSION"),
        port = cfg.port,
        key_resource = %cfg.kms_key_id,
        tls = cfg.tls_paths().is_some(),
        "kacls-svc starting"
    );
    warn!("caller authentication and authorization are not enforced; add them before production use");

    // -----------------------------------------------------------------------
    // 3. Key-management gateway
    // -----------------------------------------------------------------------
    let kms = aws::kms_client(cfg.kms_endpoint_url()).await;
    let gateway = KmsGateway::new(kms, cfg.kms_timeout());

    // -----------------------------------------------------------------------
    // 4. HTTP server
    // -----------------------------------------------------------------------
    let state = AppState::new(Arc::new(gateway), cfg.kms_key_id.clone());
    let router = server::router::build(state, cfg.max_body_bytes);

    let tls = cfg
        .tls_paths()
        .map(|(cert, key)| server::tls::load_server_config(cert, key))
        .transpose()?;

    let addr: std::net::SocketAddr = ([0, 0, 0, 0], cfg.port).into();
    let listener = tokio::net::TcpListener::bind(addr).await?;

    match tls {
        Some(tls) => {
            info!(addr = %addr, "listening (https)");
            server::tls::serve(listener, tls, router).await?;
        }
        None => {
            info!(addr = %addr, "listening (http)");
            axum::serve(listener, router).await?;
        }
    }

    Ok(())
}
