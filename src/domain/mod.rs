//! Domain model: value objects, protocol events, and the interfaces the
//! use case layer depends on.
//!
//! Concrete implementations of the traits defined here live in the
//! infrastructure layer (dependency inversion).

pub mod blob;
pub mod event;
pub mod identity;
pub mod message;
pub mod pusher;
pub mod registry;
pub mod session;

pub use blob::{BlobError, BlobStore, StoredBlob};
pub use event::{ClientMessage, ServerEvent};
pub use identity::{IdentityError, Username};
pub use message::{ChatPayload, PayloadError};
pub use pusher::{EventPusher, OUTBOUND_BUFFER_CAPACITY, PusherChannel};
pub use registry::{ConnectionRegistry, RegistryError};
pub use session::{ConnectionId, Session};
