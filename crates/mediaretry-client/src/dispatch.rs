//! Fire-and-forget delivery of parsed events to subscribers.

use std::sync::Arc;

use mediaretry_protocol::MediaRetryEvent;
use tokio::sync::broadcast;
use tracing::trace;

#[derive(Debug, Clone)]
pub enum Event {
    /// Response to a media retry receipt. Decrypt it with
    /// [`decrypt_media_retry_notification`](crate::decrypt_media_retry_notification).
    MediaRetry(MediaRetryEvent),
}

pub trait EventDispatcher: Send + Sync {
    fn dispatch_event(&self, event: Event);
}

/// Dispatcher backed by a tokio broadcast channel.
#[derive(Debug, Clone)]
pub struct BroadcastDispatcher {
    tx: broadcast::Sender<Arc<Event>>,
}

impl BroadcastDispatcher {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Arc<Event>> {
        self.tx.subscribe()
    }
}

impl EventDispatcher for BroadcastDispatcher {
    fn dispatch_event(&self, event: Event) {
        if self.tx.send(Arc::new(event)).is_err() {
            trace!("no event subscribers, dropping event");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::UNIX_EPOCH;

    use mediaretry_protocol::{Jid, MediaRetryContent, MediaRetryError};

    use super::*;

    fn event() -> Event {
        Event::MediaRetry(MediaRetryEvent {
            timestamp: UNIX_EPOCH,
            message_id: "ID".into(),
            chat_id: Jid::new("1", "s.whatsapp.net"),
            from_me: true,
            sender_id: None,
            content: MediaRetryContent::Declined(MediaRetryError { code: 1 }),
        })
    }

    #[test]
    fn subscribers_receive_events() {
        let dispatcher = BroadcastDispatcher::new(8);
        let mut rx1 = dispatcher.subscribe();
        let mut rx2 = dispatcher.subscribe();

        dispatcher.dispatch_event(event());

        for rx in [&mut rx1, &mut rx2] {
            let received = rx.try_recv().unwrap();
            let Event::MediaRetry(evt) = &*received;
            assert_eq!(evt.message_id, "ID");
        }
    }

    #[test]
    fn dispatch_without_subscribers_is_silent() {
        let dispatcher = BroadcastDispatcher::new(8);
        dispatcher.dispatch_event(event());
        let mut late = dispatcher.subscribe();
        assert!(late.try_recv().is_err());
    }
}
