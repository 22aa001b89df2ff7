//! Builds migrate and compound plans from the protocol capability set.

use super::yield_source::{OwedYieldSource, PendingYield, YieldSource};
use crate::config::PositionManagerOptions;
use crate::error::ExecutionError;
use clmm_rebalancer_domain::coin::Coin;
use clmm_rebalancer_domain::position::{FromAmounts, Position};
use clmm_rebalancer_protocols::adapter::ProtocolAdapter;
use clmm_rebalancer_protocols::capability::{
    CoinPair, DecreaseLiquidityOptions, IncreaseLiquidityOptions, IncreaseTarget,
};
use clmm_rebalancer_protocols::error::ProtocolError;
use clmm_rebalancer_protocols::plan::{Argument, Plan};
use std::sync::Arc;
use tracing::{debug, info};

/// A collected reward whose coin is not one of the pool's coins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetAsideReward {
    /// Reward coin.
    pub coin: Coin,
    /// Raw amount collected.
    pub amount: u128,
}

/// A migrate plan with the position it is expected to create.
#[derive(Debug, Clone)]
pub struct MigrationPlan {
    /// Steps to submit.
    pub plan: Plan,
    /// The position the plan creates, sized before execution.
    pub projected: Position,
    /// Rewards transferred to the owner instead of being deposited.
    pub set_aside: Vec<SetAsideReward>,
}

/// A compound plan with the liquidity it is expected to add.
#[derive(Debug, Clone)]
pub struct CompoundPlan {
    /// Steps to submit.
    pub plan: Plan,
    /// The liquidity added to the existing position.
    pub projected: Position,
    /// Rewards transferred to the owner instead of being deposited.
    pub set_aside: Vec<SetAsideReward>,
}

/// Plans position migrations and compounds for one protocol.
#[derive(Clone)]
pub struct PositionManager {
    options: PositionManagerOptions,
    adapter: ProtocolAdapter,
    yields: Arc<dyn YieldSource>,
}

impl PositionManager {
    /// Creates a manager reading pending yield from position snapshots.
    ///
    /// Fails when the options do not validate.
    pub fn new(options: PositionManagerOptions, adapter: ProtocolAdapter) -> Result<Self, ExecutionError> {
        Self::with_yield_source(options, adapter, Arc::new(OwedYieldSource))
    }

    /// Creates a manager reading pending yield from `yields`.
    ///
    /// Fails when the options do not validate.
    pub fn with_yield_source(
        options: PositionManagerOptions,
        adapter: ProtocolAdapter,
        yields: Arc<dyn YieldSource>,
    ) -> Result<Self, ExecutionError> {
        options.validate()?;
        Ok(Self {
            options,
            adapter,
            yields,
        })
    }

    /// Options every plan is built with.
    pub fn options(&self) -> &PositionManagerOptions {
        &self.options
    }

    /// Protocol the plans target.
    pub fn adapter(&self) -> &ProtocolAdapter {
        &self.adapter
    }

    /// Moves all liquidity of `position` into a new position over `[tick_lower, tick_upper]`.
    ///
    /// The new position is funded with the removed coins plus collected fees
    /// and pool-coin rewards, then transferred to the owner together with any
    /// rewards in other coins.
    pub async fn migrate(
        &self,
        position: &Position,
        tick_lower: i32,
        tick_upper: i32,
    ) -> Result<MigrationPlan, ExecutionError> {
        let operations = self.adapter.operations();
        let pending = self.yields.pending_yield(position).await?;
        let mut plan = Plan::new();

        let removed = operations.decrease_liquidity(
            &mut plan,
            position,
            &DecreaseLiquidityOptions {
                slippage_tolerance: self.options.slippage_tolerance.clone(),
            },
        )?;
        let rewards = self.collect_rewards(&mut plan, position, &pending, &removed)?;
        operations.close_position(&mut plan, position)?;

        let desired = position.mint_amounts()?.checked_add(&pending.fees)?;
        let projected = Position::from_amounts(FromAmounts {
            owner: position.owner().to_string(),
            pool: position.pool().clone(),
            tick_lower,
            tick_upper,
            amount_x: desired.amount_x,
            amount_y: desired.amount_y,
        })?;

        let created = operations
            .increase_liquidity(
                &mut plan,
                &projected,
                &IncreaseLiquidityOptions {
                    coin_x_in: Some(removed.x),
                    coin_y_in: Some(removed.y),
                    slippage_tolerance: self.options.slippage_tolerance.clone(),
                    target: IncreaseTarget::CreatePosition,
                },
            )?
            .ok_or(ExecutionError::InvalidPlan("increase did not return the created position"))?;
        plan.transfer_objects(vec![created], position.owner());
        let set_aside = transfer_set_aside(&mut plan, position.owner(), rewards);

        info!(
            position = position.id().unwrap_or_default(),
            tick_lower,
            tick_upper,
            liquidity = projected.liquidity(),
            steps = plan.len(),
            "Migrate position"
        );
        Ok(MigrationPlan {
            plan,
            projected,
            set_aside,
        })
    }

    /// Reinvests collected fees and pool-coin rewards into `position` over its current range.
    pub async fn compound(&self, position: &Position) -> Result<CompoundPlan, ExecutionError> {
        let operations = self.adapter.operations();
        let id = position.id().ok_or(ProtocolError::NotMaterialized)?;
        let pending = self.yields.pending_yield(position).await?;
        let mut plan = Plan::new();

        let collected = operations.collect(&mut plan, position)?;
        let rewards = self.collect_rewards(&mut plan, position, &pending, &collected)?;

        let projected = Position::from_amounts(FromAmounts {
            owner: position.owner().to_string(),
            pool: position.pool().clone(),
            tick_lower: position.tick_lower(),
            tick_upper: position.tick_upper(),
            amount_x: pending.fees.amount_x,
            amount_y: pending.fees.amount_y,
        })?;
        operations.increase_liquidity(
            &mut plan,
            &projected,
            &IncreaseLiquidityOptions {
                coin_x_in: Some(collected.x),
                coin_y_in: Some(collected.y),
                slippage_tolerance: self.options.slippage_tolerance.clone(),
                target: IncreaseTarget::Existing(id.to_string()),
            },
        )?;
        let set_aside = transfer_set_aside(&mut plan, position.owner(), rewards);

        info!(position = id, liquidity = projected.liquidity(), "Compound position");
        Ok(CompoundPlan {
            plan,
            projected,
            set_aside,
        })
    }

    /// Collects every reward with a pending amount, merging pool-coin rewards into `into`.
    fn collect_rewards(
        &self,
        plan: &mut Plan,
        position: &Position,
        pending: &PendingYield,
        into: &CoinPair,
    ) -> Result<Vec<(SetAsideReward, Argument)>, ExecutionError> {
        let operations = self.adapter.operations();
        let mut set_aside = Vec::new();

        for (idx, reward) in position.pool().rewards().iter().enumerate() {
            let amount = pending.reward(idx);
            if amount == 0 {
                continue;
            }
            let collected = operations.collect_reward(plan, position, &reward.coin)?;
            if reward.coin == *position.coin_x() {
                plan.merge_coins(into.x.clone(), vec![collected]);
            } else if reward.coin == *position.coin_y() {
                plan.merge_coins(into.y.clone(), vec![collected]);
            } else {
                debug!(coin = %reward.coin.coin_type(), amount, "Setting aside reward");
                set_aside.push((
                    SetAsideReward {
                        coin: reward.coin.clone(),
                        amount,
                    },
                    collected,
                ));
            }
        }
        Ok(set_aside)
    }
}

fn transfer_set_aside(
    plan: &mut Plan,
    owner: &str,
    rewards: Vec<(SetAsideReward, Argument)>,
) -> Vec<SetAsideReward> {
    rewards
        .into_iter()
        .map(|(reward, object)| {
            plan.transfer_objects(vec![object], owner);
            reward
        })
        .collect()
}
