//! In-memory blob store for uploaded images.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::domain::{BlobError, BlobStore, StoredBlob};

/// Maximum accepted image size: 5 MiB.
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

/// Accepted image content types and the file extension each maps to.
pub const ALLOWED_IMAGE_TYPES: &[(&str, &str)] = &[
    ("image/jpeg", "jpg"),
    ("image/png", "png"),
    ("image/gif", "gif"),
    ("image/webp", "webp"),
];

fn extension_for(content_type: &str) -> Option<&'static str> {
    ALLOWED_IMAGE_TYPES
        .iter()
        .find(|(mime, _)| *mime == content_type)
        .map(|(_, ext)| *ext)
}

/// Stores uploaded images in memory and serves them back by name.
///
/// Blobs do not survive a process restart, matching the rest of the
/// gateway's ephemeral state.
pub struct InMemoryBlobStore {
    blobs: Mutex<HashMap<String, (Vec<u8>, String)>>,
}

impl InMemoryBlobStore {
    pub fn new() -> Self {
        Self {
            blobs: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryBlobStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BlobStore for InMemoryBlobStore {
    async fn store(&self, bytes: Vec<u8>, content_type: &str) -> Result<StoredBlob, BlobError> {
        let Some(extension) = extension_for(content_type) else {
            return Err(BlobError::RejectedType(content_type.to_string()));
        };
        if bytes.len() > MAX_IMAGE_BYTES {
            return Err(BlobError::TooLarge {
                size: bytes.len(),
                max: MAX_IMAGE_BYTES,
            });
        }

        let name = format!("{}.{extension}", Uuid::new_v4());
        let url = format!("/uploads/{name}");
        let mut blobs = self.blobs.lock().await;
        blobs.insert(name, (bytes, content_type.to_string()));
        tracing::debug!("stored image at {url}");

        Ok(StoredBlob { url })
    }

    async fn fetch(&self, name: &str) -> Option<(Vec<u8>, String)> {
        self.blobs.lock().await.get(name).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_stored_image_is_retrievable_by_name() {
        // given:
        let store = InMemoryBlobStore::new();
        let bytes = vec![0x89, 0x50, 0x4e, 0x47];

        // when:
        let blob = store.store(bytes.clone(), "image/png").await.unwrap();

        // then: the url points under /uploads/ and the bytes round-trip
        let name = blob.url.strip_prefix("/uploads/").unwrap();
        assert!(name.ends_with(".png"));
        let (fetched, content_type) = store.fetch(name).await.unwrap();
        assert_eq!(fetched, bytes);
        assert_eq!(content_type, "image/png");
    }

    #[tokio::test]
    async fn test_unsupported_content_type_is_rejected() {
        let store = InMemoryBlobStore::new();
        let result = store.store(vec![1, 2, 3], "application/pdf").await;
        assert_eq!(
            result,
            Err(BlobError::RejectedType("application/pdf".to_string()))
        );
    }

    #[tokio::test]
    async fn test_oversized_image_is_rejected() {
        let store = InMemoryBlobStore::new();
        let oversized = vec![0u8; MAX_IMAGE_BYTES + 1];
        let result = store.store(oversized, "image/jpeg").await;
        assert_eq!(
            result,
            Err(BlobError::TooLarge {
                size: MAX_IMAGE_BYTES + 1,
                max: MAX_IMAGE_BYTES,
            })
        );
    }

    #[tokio::test]
    async fn test_fetching_an_unknown_name_returns_none() {
        let store = InMemoryBlobStore::new();
        assert!(store.fetch("missing.png").await.is_none());
    }
}
