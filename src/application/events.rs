//! # Event Stream
//!
//! Pulls the events observed since the previous poll out of the live session. Each
//! poll is an independent batch; nothing is buffered between polls.

use crate::domain::error::TransportError;
use crate::domain::traits::Transport;
use crate::domain::types::Event;

pub struct EventStream<'a, T: Transport> {
    transport: &'a T,
}

impl<'a, T: Transport> EventStream<'a, T> {
    pub fn new(transport: &'a T) -> Self {
        Self { transport }
    }

    pub async fn poll(
        &self,
        handle: &mut T::Handle,
    ) -> Result<std::vec::IntoIter<Event>, TransportError> {
        let events = self.transport.read_events(handle).await?;
        if !events.is_empty() {
            tracing::debug!(count = events.len(), "Received events");
        }
        Ok(events.into_iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::shutdown::ShutdownController;
    use crate::application::testing::ScriptedTransport;

    #[tokio::test]
    async fn test_each_poll_is_a_fresh_batch() {
        let shutdown = ShutdownController::new();
        let transport = ScriptedTransport::new(&shutdown)
            .batch(vec![Event::greeting(), Event::message("C1", "hi")])
            .batch(vec![Event::message("C2", "again")]);
        let stream = EventStream::new(&transport);
        let mut handle = 1;

        let first: Vec<Event> = stream.poll(&mut handle).await.unwrap().collect();
        assert_eq!(first.len(), 2);
        let second: Vec<Event> = stream.poll(&mut handle).await.unwrap().collect();
        assert_eq!(second, vec![Event::message("C2", "again")]);
        assert_eq!(stream.poll(&mut handle).await.unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_read_failure_surfaces() {
        let shutdown = ShutdownController::new();
        let transport = ScriptedTransport::new(&shutdown).read_error(TransportError::Closed);
        let stream = EventStream::new(&transport);
        let mut handle = 1;

        assert!(matches!(
            stream.poll(&mut handle).await,
            Err(TransportError::Closed)
        ));
    }
}
