//! Error types for the control plane simulator.

use thiserror::Error;

/// Errors that can occur in the simulator.
#[derive(Error, Debug)]
pub enum SimulatorError {
    /// Server failed to start.
    #[error("Failed to start server: {0}")]
    ServerStart(String),

    /// Failed to bind to address.
    #[error("Failed to bind to address: {0}")]
    BindError(String),

    /// Timeout waiting for an operation.
    #[error("Timeout occurred: {0}")]
    Timeout(String),
}

/// Result type for simulator operations.
pub type SimulatorResult<T> = Result<T, SimulatorError>;
