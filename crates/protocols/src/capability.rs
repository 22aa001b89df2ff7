//! The protocol agnostic operation set every supported CLMM implements.

use crate::error::ProtocolError;
use crate::plan::{Argument, Plan, PureValue};
use clmm_rebalancer_domain::coin::Coin;
use clmm_rebalancer_domain::enums::Protocol;
use clmm_rebalancer_domain::math::AmountPair;
use clmm_rebalancer_domain::position::Position;
use clmm_rebalancer_domain::rational::{Fraction, Percent};
use tracing::debug;

/// Coins produced by a step, in the pool's X/Y order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoinPair {
    /// Coin X output.
    pub x: Argument,
    /// Coin Y output.
    pub y: Argument,
}

/// Position that receives the liquidity of an increase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IncreaseTarget {
    /// Open a new position in the same plan and return it.
    CreatePosition,
    /// Add to the on chain position with this id.
    Existing(String),
}

/// Inputs of an increase liquidity step.
#[derive(Debug, Clone)]
pub struct IncreaseLiquidityOptions {
    /// Coin X to deposit; a coin of the required balance is requested when absent.
    pub coin_x_in: Option<Argument>,
    /// Coin Y to deposit; requested like `coin_x_in` when absent.
    pub coin_y_in: Option<Argument>,
    /// Tolerance used to derive the maximum deposit amounts.
    pub slippage_tolerance: Percent,
    /// Position that receives the liquidity.
    pub target: IncreaseTarget,
}

/// Inputs of a decrease liquidity step.
#[derive(Debug, Clone)]
pub struct DecreaseLiquidityOptions {
    /// Tolerance used to derive the minimum withdrawn amounts.
    pub slippage_tolerance: Percent,
}

/// The six position operations a protocol exposes.
///
/// Every method appends move calls to `plan` and returns handles to what those
/// calls produce. None of them inspect the protocol identity of the position.
pub trait PositionOperations: Send + Sync {
    fn protocol(&self) -> Protocol;

    /// Fully qualified type of this protocol's position objects.
    fn position_object_type(&self) -> &str;

    /// Opens an empty position with the bounds of a projected position.
    fn open_position(&self, plan: &mut Plan, position: &Position) -> Result<Argument, ProtocolError>;

    fn close_position(&self, plan: &mut Plan, position: &Position) -> Result<(), ProtocolError>;

    /// Deposits the mint amounts of the projected `position`.
    ///
    /// Returns the new position object when `options.target` creates one.
    fn increase_liquidity(
        &self,
        plan: &mut Plan,
        position: &Position,
        options: &IncreaseLiquidityOptions,
    ) -> Result<Option<Argument>, ProtocolError>;

    /// Removes all liquidity and collects fees, returning the merged coins.
    fn decrease_liquidity(
        &self,
        plan: &mut Plan,
        position: &Position,
        options: &DecreaseLiquidityOptions,
    ) -> Result<CoinPair, ProtocolError>;

    /// Collects owed fees.
    fn collect(&self, plan: &mut Plan, position: &Position) -> Result<CoinPair, ProtocolError>;

    /// Collects the owed amount of one pool reward.
    fn collect_reward(
        &self,
        plan: &mut Plan,
        position: &Position,
        reward_coin: &Coin,
    ) -> Result<Argument, ProtocolError>;
}

/// `(1 - slippage) * desired`, rounded half up, for each side.
pub fn minimum_amounts(desired: AmountPair, slippage: &Percent) -> Result<AmountPair, ProtocolError> {
    let keep = slippage.complement();
    let bound = |amount: u128, what: &'static str| -> Result<u128, ProtocolError> {
        let value = (&keep * &Fraction::from(amount)).round_half_up();
        u128::try_from(value).map_err(|_| ProtocolError::AmountOverflow { what, value: amount })
    };
    Ok(AmountPair::new(
        bound(desired.amount_x, "minimum x")?,
        bound(desired.amount_y, "minimum y")?,
    ))
}

pub(crate) fn pure_u64(what: &'static str, value: u128) -> Result<Argument, ProtocolError> {
    u64::try_from(value)
        .map(|v| Argument::pure(PureValue::U64(v)))
        .map_err(|_| ProtocolError::AmountOverflow { what, value })
}

pub(crate) fn require_materialized(position: &Position) -> Result<&str, ProtocolError> {
    position.id().ok_or(ProtocolError::NotMaterialized)
}

pub(crate) fn require_projected(position: &Position) -> Result<(), ProtocolError> {
    match position.id() {
        Some(id) => Err(ProtocolError::AlreadyMaterialized(id.to_string())),
        None => Ok(()),
    }
}

/// Uses the provided coin or requests one holding `amount`, drawn from gas for SUI.
pub(crate) fn coin_input(plan: &mut Plan, provided: Option<&Argument>, coin: &Coin, amount: u128) -> Argument {
    match provided {
        Some(argument) => argument.clone(),
        None => {
            debug!(coin = %coin.coin_type(), amount, "Requesting input coin");
            plan.coin_with_balance(coin.coin_type(), amount, coin.is_gas_coin())
        }
    }
}

pub(crate) fn coin_type_arguments(position: &Position) -> Vec<String> {
    vec![
        position.coin_x().coin_type().to_string(),
        position.coin_y().coin_type().to_string(),
    ]
}
