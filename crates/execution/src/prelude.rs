//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types from the crate.
//!
//! # Example
//!
//! ```rust
//! use clmm_rebalancer_execution::prelude::*;
//! ```

// Configuration and errors
pub use crate::config::{PositionManagerOptions, WorkerConfig};
pub use crate::error::ExecutionError;

// Lifecycle
pub use crate::lifecycle::{EventData, LifecycleEvent, LifecycleEventType, LifecycleTracker};

// Scheduler
pub use crate::scheduler::CompoundTimer;

// Strategy
pub use crate::strategy::{
    CompoundPlan, MigrationPlan, OwedYieldSource, PendingYield, PositionManager, RebalanceDecision,
    RebalancePolicy, SetAsideReward, YieldSource, decide_rebalance,
};

// Submission
pub use crate::submission::{CreatedObject, DryRunSubmitter, PlanSubmitter, SubmissionReceipt};

// Worker
pub use crate::worker::{CompoundOutcome, CycleReport, RebalanceOutcome, RebalanceWorker};
