//! Error types for the use case layer.

use thiserror::Error;

use crate::domain::{PayloadError, RegistryError};

/// Connection registration errors
#[derive(Debug, Error)]
pub enum ConnectError {
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// Message routing errors.
///
/// These are logged by the connection handler and dropped without a reply to
/// the sender; a malformed payload never produces a broadcast.
#[derive(Debug, Error)]
pub enum RouteMessageError {
    #[error("malformed client message: {0}")]
    Malformed(String),
    #[error(transparent)]
    Payload(#[from] PayloadError),
}
