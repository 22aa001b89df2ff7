//! Pending fee and reward amounts of a position.

use crate::error::ExecutionError;
use async_trait::async_trait;
use clmm_rebalancer_domain::math::AmountPair;
use clmm_rebalancer_domain::position::Position;

/// Fees and rewards a position can collect right now.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PendingYield {
    /// Fees in X and Y.
    pub fees: AmountPair,
    /// One amount per pool reward slot.
    pub rewards: Vec<u128>,
}

impl PendingYield {
    /// Pending amount of the reward in slot `index`, zero when the slot is unknown.
    pub fn reward(&self, index: usize) -> u128 {
        self.rewards.get(index).copied().unwrap_or(0)
    }
}

/// Reads what a position has accrued.
#[async_trait]
pub trait YieldSource: Send + Sync {
    async fn pending_fees(&self, position: &Position) -> Result<AmountPair, ExecutionError>;

    async fn pending_rewards(&self, position: &Position) -> Result<Vec<u128>, ExecutionError>;

    /// Fetches fees and rewards concurrently.
    async fn pending_yield(&self, position: &Position) -> Result<PendingYield, ExecutionError> {
        let (fees, rewards) =
            tokio::try_join!(self.pending_fees(position), self.pending_rewards(position))?;
        Ok(PendingYield { fees, rewards })
    }
}

/// Uses the owed amounts already recorded on the position snapshot.
#[derive(Debug, Clone, Copy, Default)]
pub struct OwedYieldSource;

#[async_trait]
impl YieldSource for OwedYieldSource {
    async fn pending_fees(&self, position: &Position) -> Result<AmountPair, ExecutionError> {
        Ok(position.owed_fees())
    }

    async fn pending_rewards(&self, position: &Position) -> Result<Vec<u128>, ExecutionError> {
        Ok(position.owed_rewards())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clmm_rebalancer_domain::enums::Protocol;
    use clmm_rebalancer_protocols::fixtures::materialized;

    #[tokio::test]
    async fn test_owed_source_reads_snapshot() {
        let position = materialized(Protocol::Cetus, 1000, 960, 1080, 1_000);
        let pending = OwedYieldSource.pending_yield(&position).await.unwrap();
        assert_eq!(pending.fees, position.owed_fees());
        assert_eq!(pending.rewards, position.owed_rewards());
    }

    #[test]
    fn test_missing_reward_slot_is_zero() {
        let pending = PendingYield {
            fees: AmountPair::default(),
            rewards: vec![5],
        };
        assert_eq!(pending.reward(0), 5);
        assert_eq!(pending.reward(2), 0);
    }
}
