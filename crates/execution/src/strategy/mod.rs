//! Migrate and compound planning, and the rebalance decision.

mod manager;
mod rebalance;
mod yield_source;

pub use manager::{CompoundPlan, MigrationPlan, PositionManager, SetAsideReward};
pub use rebalance::{RebalanceDecision, RebalancePolicy, decide_rebalance};
pub use yield_source::{OwedYieldSource, PendingYield, YieldSource};
