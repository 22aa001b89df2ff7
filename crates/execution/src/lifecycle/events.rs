//! Lifecycle events for position tracking.

use clmm_rebalancer_domain::range::TickRange;
use serde::{Deserialize, Serialize};

/// Type of lifecycle event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LifecycleEventType {
    /// Position was closed and reopened over a new range.
    Migrated,
    /// Fees and rewards were reinvested into the position.
    Compounded,
}

/// A lifecycle event for a position.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LifecycleEvent {
    /// Event ID.
    pub id: uuid::Uuid,
    /// Position the plan acted on.
    pub position: String,
    /// Pool the position belongs to.
    pub pool: String,
    /// Transaction digest.
    pub digest: String,
    /// When the event was recorded.
    pub timestamp: chrono::DateTime<chrono::Utc>,
    /// Event details.
    pub data: EventData,
}

impl LifecycleEvent {
    /// Creates an event with a fresh id, stamped now.
    pub fn new(
        position: impl Into<String>,
        pool: impl Into<String>,
        digest: impl Into<String>,
        data: EventData,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4(),
            position: position.into(),
            pool: pool.into(),
            digest: digest.into(),
            timestamp: chrono::Utc::now(),
            data,
        }
    }

    /// Kind of the event.
    pub fn event_type(&self) -> LifecycleEventType {
        match self.data {
            EventData::Migrated { .. } => LifecycleEventType::Migrated,
            EventData::Compounded { .. } => LifecycleEventType::Compounded,
        }
    }
}

/// Event-specific data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EventData {
    /// Liquidity moved to a new range.
    Migrated {
        from: TickRange,
        to: TickRange,
        /// Liquidity planned for the new position.
        projected_liquidity: u128,
        /// Id of the created position when the receipt reported it.
        new_position: Option<String>,
    },
    /// Fees and rewards added back to the position.
    Compounded {
        range: TickRange,
        /// Liquidity planned to be added.
        added_liquidity: u128,
    },
}
