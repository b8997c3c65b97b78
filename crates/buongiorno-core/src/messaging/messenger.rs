//! Messaging port.

use crate::error::ServiceError;
use async_trait::async_trait;

/// A photo upload addressed to one chat.
///
/// Owns its own copy of the image bytes: every destination gets a fresh
/// payload, since an upload consumes what it sends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoMessage {
    pub chat_id: i64,
    pub photo: Vec<u8>,
    pub file_name: String,
    pub mime_type: String,
    pub caption: String,
}

/// Messaging port.
#[async_trait]
pub trait Messenger: Send + Sync {
    /// Service name for logging and errors (e.g., "telegram").
    fn name(&self) -> &'static str;

    /// Initialize the client for a run (e.g., verify the bot token).
    ///
    /// Failure here aborts the broadcast; it is the only messaging failure
    /// that propagates to the caller.
    async fn connect(&self) -> Result<(), ServiceError>;

    /// Send one photo to one chat.
    async fn send_photo(&self, message: PhotoMessage) -> Result<(), ServiceError>;
}
