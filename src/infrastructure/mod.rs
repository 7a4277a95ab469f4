//! Infrastructure layer: in-memory implementations of the domain interfaces
//! and the DTOs for the HTTP API.

pub mod blob;
pub mod dto;
pub mod pusher;
pub mod registry;

pub use blob::{InMemoryBlobStore, MAX_IMAGE_BYTES};
pub use pusher::ChannelEventPusher;
pub use registry::InMemoryConnectionRegistry;
