//! Common wire types and errors shared across `kacls-svc` crates.

pub mod error;
pub mod protocol;

pub use error::{Operation, ServiceError};
