//! # Response Sender
//!
//! Posts a [`Response`] back to its channel, substituting the fallback text when the
//! router had nothing to say. No retry: a failed send ends the connection.

use crate::domain::error::TransportError;
use crate::domain::traits::Transport;
use crate::domain::types::Response;
use crate::strings::messages;

pub struct ResponseSender {
    fallback: String,
}

impl ResponseSender {
    pub fn new(help_verb: &str) -> Self {
        Self {
            fallback: messages::fallback(help_verb),
        }
    }

    pub async fn send<T: Transport>(
        &self,
        transport: &T,
        response: &Response,
    ) -> Result<(), TransportError> {
        let text = response.text.as_deref().unwrap_or(&self.fallback);
        tracing::info!(channel = %response.channel_id, "Bot sending message: {}", text);
        transport.send(&response.channel_id, text).await
    }
}
