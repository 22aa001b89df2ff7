//! Bounded in-memory history of lifecycle events.

use super::{LifecycleEvent, LifecycleEventType};
use std::collections::VecDeque;
use tracing::debug;

/// Events kept when no capacity is given.
pub const DEFAULT_HISTORY_CAPACITY: usize = 256;

/// Keeps the most recent lifecycle events, oldest first.
#[derive(Debug, Clone)]
pub struct LifecycleTracker {
    events: VecDeque<LifecycleEvent>,
    capacity: usize,
}

impl LifecycleTracker {
    /// A tracker with the default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_CAPACITY)
    }

    /// A tracker keeping at most `capacity` events (at least one).
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            events: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Appends an event, dropping the oldest one when full.
    pub fn record(&mut self, event: LifecycleEvent) {
        if self.events.len() == self.capacity {
            self.events.pop_front();
        }
        debug!(
            event = ?event.event_type(),
            position = %event.position,
            digest = %event.digest,
            "Recorded lifecycle event"
        );
        self.events.push_back(event);
    }

    /// Events, oldest first.
    pub fn events(&self) -> impl Iterator<Item = &LifecycleEvent> {
        self.events.iter()
    }

    /// Most recently recorded event.
    pub fn latest(&self) -> Option<&LifecycleEvent> {
        self.events.back()
    }

    /// Number of recorded events of one type still in the history.
    pub fn count(&self, event_type: LifecycleEventType) -> usize {
        self.events
            .iter()
            .filter(|event| event.event_type() == event_type)
            .count()
    }

    /// Number of events held.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether no event is held.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl Default for LifecycleTracker {
    fn default() -> Self {
        Self::new()
    }
}
