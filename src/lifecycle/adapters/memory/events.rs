//! In-memory event sinks.

use async_trait::async_trait;
use std::sync::{Arc, RwLock};
use tokio::sync::broadcast;

use crate::lifecycle::{
    domain::{LifecycleEvent, LifecycleEventKind},
    ports::{EventSink, EventSinkError, EventSinkResult},
};

/// Sink that keeps every published event, in order.
#[derive(Debug, Clone, Default)]
pub struct RecordingEventSink {
    events: Arc<RwLock<Vec<LifecycleEvent>>>,
}

impl RecordingEventSink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the events published so far.
    #[must_use]
    pub fn events(&self) -> Vec<LifecycleEvent> {
        self.events
            .read()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    /// Returns how many events of `kind` were published.
    #[must_use]
    pub fn count(&self, kind: LifecycleEventKind) -> usize {
        self.events()
            .iter()
            .filter(|event| event.kind() == kind)
            .count()
    }
}

#[async_trait]
impl EventSink for RecordingEventSink {
    async fn publish(&self, event: &LifecycleEvent) -> EventSinkResult<()> {
        let mut events = self.events.write().map_err(|err| {
            EventSinkError::delivery(std::io::Error::other(err.to_string()))
        })?;
        events.push(event.clone());
        Ok(())
    }
}

/// Sink that fans events out to every current subscriber.
///
/// Subscribers that fall more than the channel capacity behind lose the
/// oldest events.
#[derive(Debug, Clone)]
pub struct BroadcastEventSink {
    sender: broadcast::Sender<LifecycleEvent>,
}

impl BroadcastEventSink {
    /// Creates a sink buffering up to `capacity` events per subscriber.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Subscribes to events published from now on.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<LifecycleEvent> {
        self.sender.subscribe()
    }
}

#[async_trait]
impl EventSink for BroadcastEventSink {
    async fn publish(&self, event: &LifecycleEvent) -> EventSinkResult<()> {
        self.sender
            .send(event.clone())
            .map(|_| ())
            .map_err(|_| EventSinkError::NoSubscribers)
    }
}
