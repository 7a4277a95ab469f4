//! Validation and normalization of inbound chat payloads.

use thiserror::Error;

use super::event::ClientMessage;

/// Errors produced while validating an inbound payload
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PayloadError {
    #[error("text content must not be empty")]
    EmptyText,
    #[error("image content is not a usable url: '{0}'")]
    InvalidImageUrl(String),
}

/// A validated chat payload, ready to be stamped and broadcast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatPayload {
    Text(String),
    Image(String),
}

impl ChatPayload {
    /// Validate a parsed client message.
    ///
    /// Text must be non-empty after trimming. Image content must look like a
    /// URL (absolute http(s) or a site-relative path); the bytes behind it
    /// were already validated by the upload pipeline and are not re-checked
    /// here.
    pub fn from_client_message(message: ClientMessage) -> Result<Self, PayloadError> {
        match message {
            ClientMessage::Text { content } => {
                if content.trim().is_empty() {
                    Err(PayloadError::EmptyText)
                } else {
                    Ok(ChatPayload::Text(content))
                }
            }
            ClientMessage::Image { content } => {
                if is_plausible_url(&content) {
                    Ok(ChatPayload::Image(content))
                } else {
                    Err(PayloadError::InvalidImageUrl(content))
                }
            }
        }
    }
}

fn is_plausible_url(candidate: &str) -> bool {
    if candidate.is_empty()
        || candidate
            .chars()
            .any(|c| c.is_whitespace() || c.is_control())
    {
        return false;
    }
    candidate.starts_with("http://")
        || candidate.starts_with("https://")
        || (candidate.starts_with('/') && candidate.len() > 1)
}
