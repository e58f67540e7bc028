//! Broadcast adapter for template events.

use tokio::sync::broadcast;
use tracing::trace;

use crate::domain::events::TemplateEvent;
use crate::domain::ports::EventPublisher;

/// Fans [`TemplateEvent`]s out to every current subscriber.
///
/// Subscribers that fall more than `capacity` events behind observe a lag;
/// publishing while nobody listens drops the event.
#[derive(Debug, Clone)]
pub struct BroadcastEventPublisher {
    tx: broadcast::Sender<TemplateEvent>,
}

impl BroadcastEventPublisher {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<TemplateEvent> {
        self.tx.subscribe()
    }
}

impl EventPublisher<TemplateEvent> for BroadcastEventPublisher {
    fn publish(&self, event: &TemplateEvent) {
        if self.tx.send(event.clone()).is_err() {
            trace!(event = event.name(), "No subscribers for template event");
        }
    }
}
