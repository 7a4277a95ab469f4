//! Authenticated identity value object.

use std::fmt;

use thiserror::Error;

/// Maximum accepted username length, in characters.
pub const MAX_USERNAME_LEN: usize = 64;

/// Errors produced when constructing a [`Username`]
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IdentityError {
    #[error("username must not be empty")]
    Empty,
    #[error("username too long ({0} characters, max {MAX_USERNAME_LEN})")]
    TooLong(usize),
}

/// The authenticated name bound to a credential.
///
/// A username names a participant, not a connection: the same username may
/// hold several simultaneous connections.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Username(String);

impl Username {
    /// Validate and wrap a raw username string.
    pub fn new(raw: String) -> Result<Self, IdentityError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(IdentityError::Empty);
        }
        let len = trimmed.chars().count();
        if len > MAX_USERNAME_LEN {
            return Err(IdentityError::TooLong(len));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
