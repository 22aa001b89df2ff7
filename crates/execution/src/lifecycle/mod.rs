//! Position lifecycle history.

mod events;
mod tracker;

pub use events::{EventData, LifecycleEvent, LifecycleEventType};
pub use tracker::{DEFAULT_HISTORY_CAPACITY, LifecycleTracker};
