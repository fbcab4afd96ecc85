//! Structured logging and optional OpenTelemetry export.
//!
//! # Telemetry invariants
//!
//! - **No key material** (raw or decoded) may appear in any span attribute or
//!   log field. Field names, locator paths and byte lengths are fine.
//! - Log level is configurable via `LOG_LEVEL` (default: `info`).

pub mod init;

pub use init::init_telemetry;
