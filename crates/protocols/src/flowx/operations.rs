//! FlowX V3 plan steps.

use super::FlowXConfig;
use crate::capability::{
    CoinPair, DecreaseLiquidityOptions, IncreaseLiquidityOptions, IncreaseTarget,
    PositionOperations, coin_input, coin_type_arguments, minimum_amounts, pure_u64,
    require_materialized, require_projected,
};
use crate::cetus::CLOCK_OBJECT_ID;
use crate::error::ProtocolError;
use crate::plan::{Argument, Plan, PureValue};
use clmm_rebalancer_domain::coin::Coin;
use clmm_rebalancer_domain::enums::Protocol;
use clmm_rebalancer_domain::math::tick_to_bits;
use clmm_rebalancer_domain::position::Position;
use tracing::debug;

/// Position operations against the FlowX `position_manager` module.
#[derive(Debug, Clone)]
pub struct FlowXOperations {
    config: FlowXConfig,
    position_type: String,
}

impl Default for FlowXOperations {
    fn default() -> Self {
        Self::new(FlowXConfig::default())
    }
}

impl FlowXOperations {
    /// Operations addressing the objects of `config`.
    pub fn new(config: FlowXConfig) -> Self {
        let position_type = config.position_type();
        Self {
            config,
            position_type,
        }
    }

    fn target(&self, function: &str) -> String {
        format!("{}::position_manager::{function}", self.config.package_id)
    }

    fn version_object(&self) -> Argument {
        Argument::object(self.config.version_object_id.clone())
    }

    // FlowX takes its own signed integer type, built from the two's complement bits.
    fn tick_argument(&self, plan: &mut Plan, tick: i32) -> Argument {
        plan.move_call(
            format!("{}::i32::from_u32", self.config.package_id),
            vec![],
            vec![Argument::pure(PureValue::U32(tick_to_bits(tick)))],
        )
        .result()
    }

    fn collect_call(&self, plan: &mut Plan, position: &Position, id: &str) -> CoinPair {
        let call = plan.move_call(
            self.target("collect"),
            coin_type_arguments(position),
            vec![
                self.version_object(),
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

impl PositionOperations for FlowXOperations {
    fn protocol(&self) -> Protocol {
        Protocol::FlowXV3
    }

    fn position_object_type(&self) -> &str {
        &self.position_type
    }

    fn open_position(&self, plan: &mut Plan, position: &Position) -> Result<Argument, ProtocolError> {
        require_projected(position)?;
        let tick_lower = self.tick_argument(plan, position.tick_lower());
        let tick_upper = self.tick_argument(plan, position.tick_upper());
        let call = plan.move_call(
            self.target("open_position"),
            coin_type_arguments(position),
            vec![
                self.version_object(),
                Argument::object(position.pool().id()),
                tick_lower,
                tick_upper,
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
                self.version_object(),
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
                self.version_object(),
                Argument::object(position.pool().id()),
                position_object,
                coin_x,
                coin_y,
                min_x,
                min_y,
                // fix amount x
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
                self.version_object(),
                Argument::object(position.pool().id()),
                Argument::object(id),
                Argument::pure(PureValue::U128(position.liquidity())),
                pure_u64("minimum x", minimum.amount_x)?,
                pure_u64("minimum y", minimum.amount_y)?,
                Argument::object(CLOCK_OBJECT_ID),
            ],
        );
        let removed = CoinPair {
            x: removed.nested(0),
            y: removed.nested(1),
        };

        let fees = self.collect_call(plan, position, id);
        plan.merge_coins(removed.x.clone(), vec![fees.x]);
        plan.merge_coins(removed.y.clone(), vec![fees.y]);
        Ok(removed)
    }

    fn collect(&self, plan: &mut Plan, position: &Position) -> Result<CoinPair, ProtocolError> {
        let id = require_materialized(position)?;
        Ok(self.collect_call(plan, position, id))
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
                self.version_object(),
                Argument::object(position.pool().id()),
                Argument::object(id),
                Argument::pure(PureValue::Bool(true)),
                Argument::object(CLOCK_OBJECT_ID),
            ],
        );
        Ok(call.result())
    }
}
