//! # Domain Traits
//!
//! Abstract interfaces for the external collaborators (chat transport, image lookup).
//! Allows for pluggable implementations in the Infrastructure layer.

use async_trait::async_trait;

use crate::domain::error::{ImageLookupError, TransportError};
use crate::domain::types::Event;

/// Abstract interface for a real-time chat transport (e.g., Slack RTM).
///
/// The handle returned by `connect` is owned by the supervisor and threaded
/// through every call that needs the live connection.
#[async_trait]
pub trait Transport: Send + Sync {
    type Handle: Send;

    /// Open a new real-time session.
    async fn connect(&self) -> Result<Self::Handle, TransportError>;

    /// Resolve the identifier the platform uses for this bot.
    async fn resolve_identity(&self, handle: &Self::Handle) -> Result<String, TransportError>;

    /// Lightweight check that the session is still usable.
    async fn probe(&self, handle: &Self::Handle) -> Result<(), TransportError>;

    /// Events observed since the last call. May block, may return nothing.
    async fn read_events(&self, handle: &mut Self::Handle) -> Result<Vec<Event>, TransportError>;

    /// Post `text` to `channel`.
    async fn send(&self, channel: &str, text: &str) -> Result<(), TransportError>;
}

/// Abstract interface for the image-lookup service
#[async_trait]
pub trait ImageLookup: Send + Sync {
    /// Fetch the candidate resource URLs and select one.
    async fn lookup(&self) -> Result<String, ImageLookupError>;
}
