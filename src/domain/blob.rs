//! Blob store interface consumed by the image upload pipeline.
//!
//! The store validates content type and size before accepting bytes; the
//! message router trusts URLs minted here and never re-validates the bytes.

use async_trait::async_trait;
use thiserror::Error;

/// Blob store errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BlobError {
    #[error("unsupported content type '{0}'")]
    RejectedType(String),
    #[error("image too large ({size} bytes, max {max})")]
    TooLarge { size: usize, max: usize },
}

/// A stored blob, addressable by the returned URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredBlob {
    pub url: String,
}

/// Content-addressed storage for uploaded images.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Validate and store one image, returning a retrievable URL.
    async fn store(&self, bytes: Vec<u8>, content_type: &str) -> Result<StoredBlob, BlobError>;

    /// Fetch stored bytes and their content type by blob name.
    async fn fetch(&self, name: &str) -> Option<(Vec<u8>, String)>;
}
