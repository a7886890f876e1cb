//! Event sink port.

use crate::lifecycle::domain::LifecycleEvent;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for event publication.
pub type EventSinkResult<T> = Result<T, EventSinkError>;

/// Receiver of committed lifecycle events.
///
/// The orchestrator publishes only after the change is stored, and does not
/// retry: delivery guarantees beyond that belong to the sink.
#[async_trait]
pub trait EventSink: Send + Sync {
    /// Publishes one event.
    ///
    /// # Errors
    ///
    /// Returns [`EventSinkError`] when the event could not be handed over.
    async fn publish(&self, event: &LifecycleEvent) -> EventSinkResult<()>;
}

/// Errors returned by event sinks.
#[derive(Debug, Clone, Error)]
pub enum EventSinkError {
    /// The sink has no receiver for the event.
    #[error("no subscribers for lifecycle events")]
    NoSubscribers,
    /// Delivery failed.
    #[error("event delivery failed: {0}")]
    Delivery(Arc<dyn std::error::Error + Send + Sync>),
}

impl EventSinkError {
    /// Wraps a delivery failure.
    pub fn delivery(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Delivery(Arc::new(err))
    }
}
