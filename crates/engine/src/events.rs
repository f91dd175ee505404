//! Broadcast notifications for triage consumers.

use std::sync::Arc;

use tokio::sync::broadcast;

use crate::TriageSet;

pub const DEFAULT_EVENT_CAPACITY: usize = 64;

/// A notification published by [`crate::FocusProvider`].
#[derive(Debug, Clone)]
pub enum FocusEvent {
    /// A triage fetch completed. Published after the set is fully built and
    /// before it is returned to the caller.
    Refreshed(Arc<TriageSet>),
    /// Cached or in-memory state changed; consumers should re-read.
    Changed,
}

/// Fan-out of [`FocusEvent`]s to any number of subscribers.
///
/// Publishing with no subscribers is not an error; slow subscribers that
/// fall more than the channel capacity behind observe `Lagged`.
#[derive(Debug)]
pub struct EventBus {
    sender: broadcast::Sender<FocusEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _receiver) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<FocusEvent> {
        self.sender.subscribe()
    }

    pub fn publish(&self, event: FocusEvent) {
        let receivers = self.sender.send(event).unwrap_or(0);
        tracing::trace!(receivers, "focus event published");
    }

    pub fn changed(&self) {
        self.publish(FocusEvent::Changed);
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_CAPACITY)
    }
}
