//! Infrastructure adapters and runtime bootstrap.

pub mod error;
pub mod http;
pub mod key_store;
pub mod telemetry;
