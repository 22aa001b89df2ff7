//! Pool snapshots.

use crate::coin::{Coin, normalize_address};
use crate::enums::Protocol;
use crate::error::{DomainError, MathError};
use crate::math::tick_to_sqrt_price_x64;
use crate::rational::Fraction;
use num_bigint::BigInt;

/// Emission schedule of one pool reward slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewardInfo {
    /// Reward coin.
    pub coin: Coin,
    /// Unix time the emission ends.
    pub ended_at_seconds: u64,
    /// Unix time of the last growth update.
    pub last_update_time: u64,
    /// Emission rate per second as stored on chain.
    pub reward_per_seconds: u128,
    /// Total amount allocated to the slot.
    pub total_reward: u128,
    /// Accumulated reward growth per unit of liquidity.
    pub reward_growth_global: u128,
}

impl RewardInfo {
    /// A reward slot for `coin` with an empty schedule.
    pub fn for_coin(coin: Coin) -> Self {
        Self {
            coin,
            ended_at_seconds: 0,
            last_update_time: 0,
            reward_per_seconds: 0,
            total_reward: 0,
            reward_growth_global: 0,
        }
    }
}

/// Fields required to build a [`Pool`].
#[derive(Debug, Clone)]
pub struct PoolParams {
    /// Pool object id.
    pub id: String,
    /// Coins in X/Y order.
    pub coins: [Coin; 2],
    /// Reward slots in on-chain order.
    pub rewards: Vec<RewardInfo>,
    /// Raw X and Y balances.
    pub reserves: [u128; 2],
    /// Fee rate in millionths.
    pub fee: u32,
    /// Current 64.64 square root price.
    pub sqrt_price_x64: u128,
    /// Tick of the current price.
    pub tick_current: i32,
    /// Defaults to `fee / 50` when absent.
    pub tick_spacing: Option<u32>,
    /// Liquidity active at the current tick.
    pub liquidity: u128,
    /// Accumulated X fee growth per unit of liquidity.
    pub fee_growth_global_x: u128,
    /// Accumulated Y fee growth per unit of liquidity.
    pub fee_growth_global_y: u128,
    /// Protocol the pool belongs to.
    pub protocol: Protocol,
}

/// Immutable snapshot of a concentrated liquidity pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pool {
    id: String,
    coins: [Coin; 2],
    rewards: Vec<RewardInfo>,
    reserves: [u128; 2],
    fee: u32,
    sqrt_price_x64: u128,
    tick_current: i32,
    tick_spacing: u32,
    liquidity: u128,
    fee_growth_global_x: u128,
    fee_growth_global_y: u128,
    protocol: Protocol,
}

impl Pool {
    /// Builds a snapshot, normalizing the id and resolving the tick spacing.
    pub fn new(params: PoolParams) -> Result<Self, DomainError> {
        let tick_spacing = params.tick_spacing.unwrap_or(params.fee / 50);
        if tick_spacing == 0 {
            return Err(DomainError::InvalidTickSpacing { fee: params.fee });
        }
        Ok(Self {
            id: normalize_address(&params.id),
            coins: params.coins,
            rewards: params.rewards,
            reserves: params.reserves,
            fee: params.fee,
            sqrt_price_x64: params.sqrt_price_x64,
            tick_current: params.tick_current,
            tick_spacing,
            liquidity: params.liquidity,
            fee_growth_global_x: params.fee_growth_global_x,
            fee_growth_global_y: params.fee_growth_global_y,
            protocol: params.protocol,
        })
    }

    /// Normalized pool object id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Both coins in X/Y order.
    pub fn coins(&self) -> &[Coin; 2] {
        &self.coins
    }

    /// Coin X.
    pub fn coin_x(&self) -> &Coin {
        &self.coins[0]
    }

    /// Coin Y.
    pub fn coin_y(&self) -> &Coin {
        &self.coins[1]
    }

    /// Reward slots in on-chain order.
    pub fn rewards(&self) -> &[RewardInfo] {
        &self.rewards
    }

    /// Raw X and Y balances.
    pub fn reserves(&self) -> [u128; 2] {
        self.reserves
    }

    /// Fee rate in millionths.
    pub fn fee(&self) -> u32 {
        self.fee
    }

    /// Current 64.64 square root price.
    pub fn sqrt_price_x64(&self) -> u128 {
        self.sqrt_price_x64
    }

    /// Tick of the current price.
    pub fn tick_current(&self) -> i32 {
        self.tick_current
    }

    /// Tick spacing, never zero.
    pub fn tick_spacing(&self) -> u32 {
        self.tick_spacing
    }

    /// Liquidity active at the current tick.
    pub fn liquidity(&self) -> u128 {
        self.liquidity
    }

    /// Global fee growth for X and Y.
    pub fn fee_growth_global(&self) -> (u128, u128) {
        (self.fee_growth_global_x, self.fee_growth_global_y)
    }

    /// Protocol the pool belongs to.
    pub fn protocol(&self) -> Protocol {
        self.protocol
    }

    /// X:Y deposit ratio for a position over `[tick_lower, tick_upper]` at the current price.
    ///
    /// One sided ranges return `2^128` (all X) or `2^-128` (all Y).
    pub fn get_ratio(&self, tick_lower: i32, tick_upper: i32) -> Result<Fraction, MathError> {
        let lower = BigInt::from(tick_to_sqrt_price_x64(tick_lower)?);
        let upper = BigInt::from(tick_to_sqrt_price_x64(tick_upper)?);
        let current = BigInt::from(self.sqrt_price_x64);
        let q128 = BigInt::from(1u8) << 128u32;

        if current <= lower {
            return Ok(Fraction::from_integer(q128));
        }
        if current >= upper {
            return Fraction::new(1, q128);
        }

        let numerator = (&upper - &current) * q128;
        let denominator = &current * &upper * (&current - &lower);
        Fraction::new(numerator, denominator)
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn test_tick_spacing_defaults_from_fee() {
        let mut p = params(0, 60);
        p.tick_spacing = None;
        p.fee = 3_000;
        assert_eq!(Pool::new(p).unwrap().tick_spacing(), 60);
    }

    #[test]
    fn test_zero_tick_spacing_is_rejected() {
        let mut p = params(0, 60);
        p.tick_spacing = None;
        p.fee = 40;
        assert_eq!(
            Pool::new(p).unwrap_err(),
            DomainError::InvalidTickSpacing { fee: 40 }
        );
    }

    #[test]
    fn test_id_is_normalized() {
        let pool = pool(0, 60);
        assert_eq!(pool.id().len(), 66);
        assert!(pool.id().ends_with("abc"));
        assert_eq!(pool.coin_x().symbol(), "SUI");
        assert_eq!(pool.coin_y().symbol(), "USDC");
    }

    #[test]
    fn test_ratio_outside_range_is_one_sided() {
        let pool = pool(0, 60);
        let q128 = BigInt::from(1u8) << 128u32;
        assert_eq!(
            pool.get_ratio(60, 120).unwrap(),
            Fraction::from_integer(q128.clone())
        );
        assert_eq!(pool.get_ratio(-120, -60).unwrap(), Fraction::new(1, q128).unwrap());
    }

    #[test]
    fn test_ratio_inside_range_is_positive() {
        let pool = pool(0, 60);
        let ratio = pool.get_ratio(-600, 600).unwrap();
        assert!(ratio > Fraction::zero());
        // a symmetric range around tick 0 needs roughly equal raw amounts
        let skewed = pool.get_ratio(-60, 600).unwrap();
        assert!(skewed > ratio);
    }
}
