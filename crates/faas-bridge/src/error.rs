//! Error types for the invocation bridge.

use http::StatusCode;
use thiserror::Error;

/// Errors raised while talking to the FaaS control plane.
///
/// These are transient: the invocation loop logs them, backs off, and keeps
/// polling. Nothing here terminates the process.
#[derive(Error, Debug)]
pub enum ClientError {
    /// The HTTP request to the control plane failed outright.
    #[error("control plane request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The control plane answered a poll with a status other than 200 OK.
    #[error("control plane returned unexpected status: {0}")]
    UnexpectedStatus(StatusCode),

    /// A completion payload could not be serialized.
    #[error("completion payload encoding failed: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Errors raised while interpreting the provider configuration.
#[derive(Error, Debug)]
pub enum ProviderError {
    /// The provider name matched neither supported platform.
    #[error("unknown serverless provider: {0:?}")]
    Unknown(String),
}

/// Boxed error type returned by gateway handlers.
///
/// A handler failure is contained to its invocation: the loop logs the
/// error and moves on to the next poll.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;

/// Result type for control-plane operations.
pub type ClientResult<T> = Result<T, ClientError>;
