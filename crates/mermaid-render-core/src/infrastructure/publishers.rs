//! `EventPublisher` adapters.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::broadcast;
use tracing::info;

use crate::domain::{DomainEvent, EventPublisher};

/// Logs every event at info level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingEventPublisher;

#[async_trait]
impl EventPublisher for TracingEventPublisher {
    async fn publish(&self, event: DomainEvent) {
        info!(
            event_type = event.event_type(),
            aggregate_id = %event.aggregate_id,
            event_id = %event.event_id,
            "Domain event"
        );
    }
}

/// Fans events out to any number of subscribers.
///
/// Publishing with nobody listening drops the event silently. Slow
/// subscribers lag and lose the oldest events once `capacity` is exceeded.
#[derive(Debug, Clone)]
pub struct BroadcastEventPublisher {
    sender: broadcast::Sender<DomainEvent>,
}

impl BroadcastEventPublisher {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<DomainEvent> {
        self.sender.subscribe()
    }
}

#[async_trait]
impl EventPublisher for BroadcastEventPublisher {
    async fn publish(&self, event: DomainEvent) {
        // Err only means there are no receivers
        let _ = self.sender.send(event);
    }
}

/// Keeps every published event in memory, in order.
#[derive(Debug, Default)]
pub struct RecordingEventPublisher {
    events: Mutex<Vec<DomainEvent>>,
}

impl RecordingEventPublisher {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything published so far.
    #[must_use]
    pub fn events(&self) -> Vec<DomainEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }

    #[must_use]
    pub fn event_types(&self) -> Vec<&'static str> {
        self.events().iter().map(DomainEvent::event_type).collect()
    }
}

#[async_trait]
impl EventPublisher for RecordingEventPublisher {
    async fn publish(&self, event: DomainEvent) {
        match self.events.lock() {
            Ok(mut events) => events.push(event),
            Err(poisoned) => poisoned.into_inner().push(event),
        }
    }
}

/// Sends each event to every inner publisher in turn.
pub struct FanOutPublisher {
    targets: Vec<Arc<dyn EventPublisher>>,
}

impl FanOutPublisher {
    #[must_use]
    pub fn new(targets: Vec<Arc<dyn EventPublisher>>) -> Self {
        Self { targets }
    }
}

#[async_trait]
impl EventPublisher for FanOutPublisher {
    async fn publish(&self, event: DomainEvent) {
        for target in &self.targets {
            target.publish(event.clone()).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AggregateId, EventKind};

    fn started() -> DomainEvent {
        DomainEvent::new(AggregateId::generate(), EventKind::EditorSessionStarted)
    }

    #[tokio::test]
    async fn test_broadcast_without_subscribers_is_ok() {
        let publisher = BroadcastEventPublisher::new(8);
        publisher.publish(started()).await;
    }

    #[tokio::test]
    async fn test_broadcast_delivers_in_order() {
        let publisher = BroadcastEventPublisher::new(8);
        let mut receiver = publisher.subscribe();
        let first = started();
        let second = started();

        publisher.publish_all(vec![first.clone(), second.clone()]).await;

        assert_eq!(receiver.recv().await.ok(), Some(first));
        assert_eq!(receiver.recv().await.ok(), Some(second));
    }

    #[tokio::test]
    async fn test_recording_and_fan_out() {
        let recorder = Arc::new(RecordingEventPublisher::new());
        let fan_out = FanOutPublisher::new(vec![
            recorder.clone() as Arc<dyn EventPublisher>,
            Arc::new(TracingEventPublisher),
        ]);

        fan_out.publish_all(vec![started(), started()]).await;
        assert_eq!(
            recorder.event_types(),
            vec!["EditorSessionStarted", "EditorSessionStarted"]
        );
    }
}
