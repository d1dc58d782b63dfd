//! Runtime bootstrap: error types and telemetry installation.

pub mod error;
pub mod telemetry;
