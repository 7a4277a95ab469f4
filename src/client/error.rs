//! Client-side error types.

use thiserror::Error;

/// Client-specific errors
#[derive(Debug, Error)]
pub enum ClientError {
    /// The server refused the credentials or the token
    #[error("authentication failed: {0}")]
    AuthFailed(String),

    /// Connection error
    #[error("connection error: {0}")]
    ConnectionError(String),
}
