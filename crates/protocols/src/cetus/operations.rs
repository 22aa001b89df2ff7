//! Cetus plan steps.

use super::{CLOCK_OBJECT_ID, CetusConfig};
use crate::capability::{
    CoinPair, DecreaseLiquidityOptions, IncreaseLiquidityOptions, IncreaseTarget,
    PositionOperations, coin_input, coin_type_arguments, minimum_amounts, pure_u64,
    require_materialized, require_projected,
};
use crate::error::ProtocolError;
use crate::plan::{Argument, Plan, PureValue};
use clmm_rebalancer_domain::coin::Coin;
use clmm_rebalancer_domain::enums::Protocol;
use clmm_rebalancer_domain::math::tick_to_bits;
use clmm_rebalancer_domain::position::Position;
use tracing::debug;

/// Position operations against the Cetus `pool` module.
#[derive(Debug, Clone)]
pub struct CetusOperations {
    config: CetusConfig,
    position_type: String,
}

impl Default for CetusOperations {
    fn default() -> Self {
        Self::new(CetusConfig::default())
    }
}

impl CetusOperations {
    /// Operations addressing the objects of `config`.
    pub fn new(config: CetusConfig) -> Self {
        let position_type = config.position_type();
        Self {
            config,
            position_type,
        }
    }

    /// Object ids the operations address.
    pub fn config(&self) -> &CetusConfig {
        &self.config
    }

    fn target(&self, function: &str) -> String {
        format!("{}::pool::{function}", self.config.package_id)
    }

    fn config_object(&self) -> Argument {
        Argument::object(self.config.global_config_id.clone())
    }

    fn collect_fee_call(&self, plan: &mut Plan, position: &Position, id: &str) -> CoinPair {
        let call = plan.move_call(
            self.target("collect_fee"),
            coin_type_arguments(position),
            vec![
                self.config_object(),
                Argument::object(position.pool().id()),
                Argument::object(id),
                Argument::pure(PureValue::Bool(true)),
                Argument::object(CLOCK_OBJECT_ID),
            ],
        );
        CoinPair {
            x: call.nested(0),
            y: call.nested(1),
        }
    }
}

impl PositionOperations for CetusOperations {
    fn protocol(&self) -> Protocol {
        Protocol::Cetus
    }

    fn position_object_type(&self) -> &str {
        &self.position_type
    }

    fn open_position(&self, plan: &mut Plan, position: &Position) -> Result<Argument, ProtocolError> {
        require_projected(position)?;
        let call = plan.move_call(
            self.target("open_position"),
            coin_type_arguments(position),
            vec![
                self.config_object(),
                Argument::object(position.pool().id()),
                Argument::pure(PureValue::U32(tick_to_bits(position.tick_lower()))),
                Argument::pure(PureValue::U32(tick_to_bits(position.tick_upper()))),
                Argument::object(CLOCK_OBJECT_ID),
            ],
        );
        Ok(call.result())
    }

    fn close_position(&self, plan: &mut Plan, position: &Position) -> Result<(), ProtocolError> {
        let id = require_materialized(position)?;
        plan.move_call(
            self.target("close_position"),
            coin_type_arguments(position),
            vec![
                self.config_object(),
                Argument::object(position.pool().id()),
                Argument::object(id),
                Argument::object(CLOCK_OBJECT_ID),
            ],
        );
        Ok(())
    }

    fn increase_liquidity(
        &self,
        plan: &mut Plan,
        position: &Position,
        options: &IncreaseLiquidityOptions,
    ) -> Result<Option<Argument>, ProtocolError> {
        require_projected(position)?;
        let desired = position.mint_amounts()?;
        let minimum = minimum_amounts(desired, &options.slippage_tolerance)?;
        let min_x = pure_u64("minimum x", minimum.amount_x)?;
        let min_y = pure_u64("minimum y", minimum.amount_y)?;

        let (position_object, created) = match &options.target {
            IncreaseTarget::CreatePosition => {
                let opened = self.open_position(plan, position)?;
                (opened.clone(), Some(opened))
            }
            IncreaseTarget::Existing(id) => (Argument::object(id.clone()), None),
        };

        let coin_x = coin_input(plan, options.coin_x_in.as_ref(), position.coin_x(), desired.amount_x);
        let coin_y = coin_input(plan, options.coin_y_in.as_ref(), position.coin_y(), desired.amount_y);

        plan.move_call(
            self.target("add_liquidity"),
            coin_type_arguments(position),
            vec![
                self.config_object(),
                Argument::object(position.pool().id()),
                position_object,
                coin_x,
                coin_y,
                min_x,
                min_y,
                // fix amount a
                Argument::pure(PureValue::Bool(true)),
                Argument::object(CLOCK_OBJECT_ID),
            ],
        );
        Ok(created)
    }

    fn decrease_liquidity(
        &self,
        plan: &mut Plan,
        position: &Position,
        options: &DecreaseLiquidityOptions,
    ) -> Result<CoinPair, ProtocolError> {
        let id = require_materialized(position)?;
        debug!(position = %id, liquidity = position.liquidity(), "Decreasing liquidity");
        let minimum = minimum_amounts(position.mint_amounts()?, &options.slippage_tolerance)?;

        let removed = plan.move_call(
            self.target("remove_liquidity"),
            coin_type_arguments(position),
            vec![
                self.config_object(),
                Argument::object(position.pool().id()),
                Argument::object(id),
                Argument::pure(PureValue::U128(position.liquidity())),
                pure_u64("minimum x", minimum.amount_x)?,
                pure_u64("minimum y", minimum.amount_y)?,
                Argument::pure(PureValue::Bool(true)),
                Argument::object(CLOCK_OBJECT_ID),
            ],
        );
        let removed = CoinPair {
            x: removed.nested(0),
            y: removed.nested(1),
        };

        let fees = self.collect_fee_call(plan, position, id);
        plan.merge_coins(removed.x.clone(), vec![fees.x]);
        plan.merge_coins(removed.y.clone(), vec![fees.y]);
        Ok(removed)
    }

    fn collect(&self, plan: &mut Plan, position: &Position) -> Result<CoinPair, ProtocolError> {
        let id = require_materialized(position)?;
        Ok(self.collect_fee_call(plan, position, id))
    }

    fn collect_reward(
        &self,
        plan: &mut Plan,
        position: &Position,
        reward_coin: &Coin,
    ) -> Result<Argument, ProtocolError> {
        let id = require_materialized(position)?;
        let mut type_arguments = coin_type_arguments(position);
        type_arguments.push(reward_coin.coin_type().to_string());
        let call = plan.move_call(
            self.target("collect_reward"),
            type_arguments,
            vec![
                self.config_object(),
                Argument::object(position.pool().id()),
                Argument::object(id),
                Argument::pure(PureValue::Bool(true)),
                Argument::object(CLOCK_OBJECT_ID),
            ],
        );
        Ok(call.result())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::Step;
    use crate::fixtures::{materialized, projected};
    use clmm_rebalancer_domain::rational::Percent;

    fn slippage() -> Percent {
        Percent::new(5_000, 1_000_000).unwrap()
    }

    #[test]
    fn test_open_encodes_negative_ticks_as_bits() {
        let ops = CetusOperations::default();
        let mut plan = Plan::new();
        ops.open_position(&mut plan, &projected(Protocol::Cetus, 0, -120, 120)).unwrap();

        let Step::MoveCall(call) = &plan.steps()[0] else {
            panic!("expected a move call");
        };
        assert!(call.target.ends_with("::pool::open_position"));
        assert_eq!(call.arguments[2], Argument::pure(PureValue::U32(4_294_967_176)));
        assert_eq!(call.arguments[3], Argument::pure(PureValue::U32(120)));
    }

    #[test]
    fn test_lifecycle_misuse_is_rejected() {
        let ops = CetusOperations::default();
        let mut plan = Plan::new();
        let fetched = materialized(Protocol::Cetus, 0, -120, 120, 1_000_000);
        assert!(matches!(
            ops.open_position(&mut plan, &fetched),
            Err(ProtocolError::AlreadyMaterialized(_))
        ));
        let planned = projected(Protocol::Cetus, 0, -120, 120);
        assert_eq!(
            ops.close_position(&mut plan, &planned).unwrap_err(),
            ProtocolError::NotMaterialized
        );
        assert!(plan.is_empty());
    }

    #[test]
    fn test_decrease_merges_fees_into_removed_coins() {
        let ops = CetusOperations::default();
        let mut plan = Plan::new();
        let fetched = materialized(Protocol::Cetus, 0, -120, 120, 1_000_000_000);
        let removed = ops
            .decrease_liquidity(&mut plan, &fetched, &DecreaseLiquidityOptions { slippage_tolerance: slippage() })
            .unwrap();

        assert_eq!(
            plan.move_call_targets()
                .iter()
                .map(|t| t.rsplit("::").next().unwrap_or_default())
                .collect::<Vec<_>>(),
            vec!["remove_liquidity", "collect_fee"]
        );
        assert_eq!(plan.len(), 4);
        assert!(matches!(&plan.steps()[2], Step::MergeCoins { destination, .. } if *destination == removed.x));
        assert!(plan.references_are_ordered());
    }

    #[test]
    fn test_increase_requests_missing_coins() {
        let ops = CetusOperations::default();
        let mut plan = Plan::new();
        let planned = projected(Protocol::Cetus, 0, -120, 120);
        let created = ops
            .increase_liquidity(
                &mut plan,
                &planned,
                &IncreaseLiquidityOptions {
                    coin_x_in: None,
                    coin_y_in: None,
                    slippage_tolerance: slippage(),
                    target: IncreaseTarget::CreatePosition,
                },
            )
            .unwrap();

        assert!(created.is_some());
        let desired = planned.mint_amounts().unwrap();
        assert!(plan.steps().iter().any(|step| matches!(
            step,
            Step::CoinWithBalance { balance, use_gas_coin: true, .. } if *balance == desired.amount_x
        )));
        assert!(plan.steps().iter().any(|step| matches!(
            step,
            Step::CoinWithBalance { balance, use_gas_coin: false, .. } if *balance == desired.amount_y
        )));
        assert!(plan.references_are_ordered());
    }

    #[test]
    fn test_collect_reward_adds_reward_type_argument() {
        let ops = CetusOperations::default();
        let mut plan = Plan::new();
        let fetched = materialized(Protocol::Cetus, 0, -120, 120, 1_000);
        let reward = Coin::new("0x5::cetus::CETUS");
        ops.collect_reward(&mut plan, &fetched, &reward).unwrap();
        let Step::MoveCall(call) = &plan.steps()[0] else {
            panic!("expected a move call");
        };
        assert_eq!(call.type_arguments.len(), 3);
        assert_eq!(call.type_arguments[2], reward.coin_type());
    }
}
