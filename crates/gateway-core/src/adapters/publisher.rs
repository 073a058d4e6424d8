//! Event Publisher Adapters
//!
//! Implementations of the `GatewayEventPublisher` port: a buffering
//! publisher for tests and replay, and a counting no-op.

use crate::events::GatewayEvent;
use crate::ports::outbound::GatewayEventPublisher;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::debug;

/// Publisher that buffers events in memory.
#[derive(Debug, Default)]
pub struct BufferedEventPublisher {
    events: RwLock<Vec<GatewayEvent>>,
}

impl BufferedEventPublisher {
    /// Create an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of all events published so far, in order.
    pub fn events(&self) -> Vec<GatewayEvent> {
        self.events.read().clone()
    }

    /// Take all buffered events, leaving the buffer empty.
    pub fn drain(&self) -> Vec<GatewayEvent> {
        std::mem::take(&mut *self.events.write())
    }

    /// Number of buffered events.
    pub fn len(&self) -> usize {
        self.events.read().len()
    }

    /// Whether the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.events.read().is_empty()
    }
}

impl GatewayEventPublisher for BufferedEventPublisher {
    fn publish(&self, event: GatewayEvent) {
        debug!(?event, "event published");
        self.events.write().push(event);
    }
}

/// No-op publisher that only counts events.
#[derive(Debug, Default)]
pub struct NoOpEventPublisher {
    count: AtomicUsize,
}

impl NoOpEventPublisher {
    /// Create a counting no-op publisher.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of events published.
    pub fn event_count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }
}

impl GatewayEventPublisher for NoOpEventPublisher {
    fn publish(&self, _event: GatewayEvent) {
        self.count.fetch_add(1, Ordering::SeqCst);
    }
}
