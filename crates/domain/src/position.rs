//! Position snapshots, materialized or projected from deposit amounts.

use crate::coin::{Coin, normalize_address};
use crate::error::{DomainError, MathError};
use crate::math::{
    AmountPair, MAX_TICK, MIN_TICK, get_amounts_for_liquidity, max_liquidity_for_amount_x,
    max_liquidity_for_amount_y, tick_to_sqrt_price_x64,
};
use crate::pool::Pool;

/// Where a position snapshot came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PositionOrigin {
    /// Read from the ledger under this object id.
    Materialized(String),
    /// Sized locally for planning; does not exist on chain yet.
    Projected,
}

/// Per reward slot accounting of a position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PositionRewardInfo {
    /// Reward credited to the position and not yet collected.
    pub coins_owed_reward: u128,
    /// Reward growth inside the range at the last update.
    pub reward_growth_inside_last: u128,
}

/// Fields of a position read from the ledger.
#[derive(Debug, Clone)]
pub struct PositionParams {
    /// Position object id.
    pub id: String,
    /// Owner address.
    pub owner: String,
    /// Pool the position belongs to.
    pub pool: Pool,
    /// Liquidity of the position.
    pub liquidity: u128,
    /// Lower tick, inclusive.
    pub tick_lower: i32,
    /// Upper tick, inclusive.
    pub tick_upper: i32,
    /// X fee growth inside the range at the last update.
    pub fee_growth_inside_last_x: u128,
    /// Y fee growth inside the range at the last update.
    pub fee_growth_inside_last_y: u128,
    /// X fees credited and not yet collected.
    pub coins_owed_x: u128,
    /// Y fees credited and not yet collected.
    pub coins_owed_y: u128,
    /// Reward accounting, one entry per pool reward slot.
    pub reward_infos: Vec<PositionRewardInfo>,
}

/// Desired deposit used to size a projected position.
#[derive(Debug, Clone)]
pub struct FromAmounts {
    /// Owner the projected position is opened for.
    pub owner: String,
    /// Pool to deposit into.
    pub pool: Pool,
    /// Lower tick, inclusive.
    pub tick_lower: i32,
    /// Upper tick, inclusive.
    pub tick_upper: i32,
    /// Raw X amount available.
    pub amount_x: u128,
    /// Raw Y amount available.
    pub amount_y: u128,
}

/// A liquidity position over `[tick_lower, tick_upper]` in one pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    origin: PositionOrigin,
    owner: String,
    pool: Pool,
    liquidity: u128,
    tick_lower: i32,
    tick_upper: i32,
    fee_growth_inside_last_x: u128,
    fee_growth_inside_last_y: u128,
    coins_owed_x: u128,
    coins_owed_y: u128,
    reward_infos: Vec<PositionRewardInfo>,
}

fn validate_ticks(pool: &Pool, tick_lower: i32, tick_upper: i32) -> Result<(), DomainError> {
    for tick in [tick_lower, tick_upper] {
        if !(MIN_TICK..=MAX_TICK).contains(&tick) {
            return Err(DomainError::TickOutOfBounds(tick));
        }
    }
    if tick_lower >= tick_upper {
        return Err(DomainError::InvalidTickOrder {
            lower: tick_lower,
            upper: tick_upper,
        });
    }
    let spacing = pool.tick_spacing();
    for tick in [tick_lower, tick_upper] {
        if i64::from(tick) % i64::from(spacing) != 0 {
            return Err(DomainError::MisalignedTick { tick, spacing });
        }
    }
    Ok(())
}

impl Position {
    /// Builds a materialized position, validating its tick bounds against the pool.
    pub fn new(params: PositionParams) -> Result<Self, DomainError> {
        validate_ticks(&params.pool, params.tick_lower, params.tick_upper)?;
        Ok(Self {
            origin: PositionOrigin::Materialized(normalize_address(&params.id)),
            owner: params.owner,
            pool: params.pool,
            liquidity: params.liquidity,
            tick_lower: params.tick_lower,
            tick_upper: params.tick_upper,
            fee_growth_inside_last_x: params.fee_growth_inside_last_x,
            fee_growth_inside_last_y: params.fee_growth_inside_last_y,
            coins_owed_x: params.coins_owed_x,
            coins_owed_y: params.coins_owed_y,
            reward_infos: params.reward_infos,
        })
    }

    /// Projects the largest position the given amounts can fund over the range.
    ///
    /// Inside the range the liquidity is the smaller of what each side can back,
    /// so neither requested amount is exceeded. A price exactly on the lower
    /// tick counts as below the range and is sized from X alone.
    pub fn from_amounts(request: FromAmounts) -> Result<Self, DomainError> {
        validate_ticks(&request.pool, request.tick_lower, request.tick_upper)?;
        let sqrt_lower = tick_to_sqrt_price_x64(request.tick_lower)?;
        let sqrt_upper = tick_to_sqrt_price_x64(request.tick_upper)?;
        let sqrt_current = request.pool.sqrt_price_x64();

        let liquidity = if sqrt_current <= sqrt_lower {
            max_liquidity_for_amount_x(sqrt_lower, sqrt_upper, request.amount_x)?
        } else if sqrt_current < sqrt_upper {
            let from_x = max_liquidity_for_amount_x(sqrt_current, sqrt_upper, request.amount_x)?;
            let from_y = max_liquidity_for_amount_y(sqrt_lower, sqrt_current, request.amount_y)?;
            from_x.min(from_y)
        } else {
            max_liquidity_for_amount_y(sqrt_lower, sqrt_upper, request.amount_y)?
        };

        Ok(Self {
            origin: PositionOrigin::Projected,
            owner: request.owner,
            pool: request.pool,
            liquidity,
            tick_lower: request.tick_lower,
            tick_upper: request.tick_upper,
            fee_growth_inside_last_x: 0,
            fee_growth_inside_last_y: 0,
            coins_owed_x: 0,
            coins_owed_y: 0,
            reward_infos: Vec::new(),
        })
    }

    /// Where the snapshot came from.
    pub fn origin(&self) -> &PositionOrigin {
        &self.origin
    }

    /// Ledger object id, absent for projected positions.
    pub fn id(&self) -> Option<&str> {
        match &self.origin {
            PositionOrigin::Materialized(id) => Some(id),
            PositionOrigin::Projected => None,
        }
    }

    /// Whether the position was sized from amounts and has no id yet.
    pub fn is_projected(&self) -> bool {
        self.origin == PositionOrigin::Projected
    }

    /// Owner address.
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Pool snapshot the position was read or projected against.
    pub fn pool(&self) -> &Pool {
        &self.pool
    }

    /// Coin X of the pool.
    pub fn coin_x(&self) -> &Coin {
        self.pool.coin_x()
    }

    /// Coin Y of the pool.
    pub fn coin_y(&self) -> &Coin {
        self.pool.coin_y()
    }

    /// Liquidity of the position.
    pub fn liquidity(&self) -> u128 {
        self.liquidity
    }

    /// Lower tick, inclusive.
    pub fn tick_lower(&self) -> i32 {
        self.tick_lower
    }

    /// Upper tick, inclusive.
    pub fn tick_upper(&self) -> i32 {
        self.tick_upper
    }

    /// Fee growth inside the range for X and Y at the last update.
    pub fn fee_growth_inside_last(&self) -> (u128, u128) {
        (self.fee_growth_inside_last_x, self.fee_growth_inside_last_y)
    }

    /// Fees already credited to the position.
    pub fn owed_fees(&self) -> AmountPair {
        AmountPair::new(self.coins_owed_x, self.coins_owed_y)
    }

    /// Reward accounting in pool slot order.
    pub fn reward_infos(&self) -> &[PositionRewardInfo] {
        &self.reward_infos
    }

    /// Rewards already credited to the position, by pool reward slot.
    pub fn owed_rewards(&self) -> Vec<u128> {
        self.reward_infos
            .iter()
            .map(|info| info.coins_owed_reward)
            .collect()
    }

    /// True while the pool's current tick lies within the position's bounds.
    pub fn contains_current_tick(&self) -> bool {
        (self.tick_lower..=self.tick_upper).contains(&self.pool.tick_current())
    }

    /// Token amounts the liquidity represents at the current price, rounded up.
    pub fn mint_amounts(&self) -> Result<AmountPair, MathError> {
        get_amounts_for_liquidity(
            self.pool.sqrt_price_x64(),
            tick_to_sqrt_price_x64(self.tick_lower)?,
            tick_to_sqrt_price_x64(self.tick_upper)?,
            self.liquidity,
            true,
        )
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use crate::pool::fixtures::pool;

    pub fn position(tick_current: i32, tick_lower: i32, tick_upper: i32, liquidity: u128) -> Position {
        Position::new(PositionParams {
            id: "0x99".to_string(),
            owner: "0x1".to_string(),
            pool: pool(tick_current, 60),
            liquidity,
            tick_lower,
            tick_upper,
            fee_growth_inside_last_x: 0,
            fee_growth_inside_last_y: 0,
            coins_owed_x: 0,
            coins_owed_y: 0,
            reward_infos: Vec::new(),
        })
        .unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::position;
    use super::*;
    use crate::pool::fixtures::pool;
    use proptest::prelude::*;

    fn request(tick_current: i32, tick_lower: i32, tick_upper: i32, x: u128, y: u128) -> FromAmounts {
        FromAmounts {
            owner: "0x1".to_string(),
            pool: pool(tick_current, 60),
            tick_lower,
            tick_upper,
            amount_x: x,
            amount_y: y,
        }
    }

    #[test]
    fn test_new_rejects_bad_ticks() {
        let base = PositionParams {
            id: "0x99".to_string(),
            owner: "0x1".to_string(),
            pool: pool(0, 60),
            liquidity: 1,
            tick_lower: 60,
            tick_upper: 0,
            fee_growth_inside_last_x: 0,
            fee_growth_inside_last_y: 0,
            coins_owed_x: 0,
            coins_owed_y: 0,
            reward_infos: Vec::new(),
        };
        assert_eq!(
            Position::new(base.clone()).unwrap_err(),
            DomainError::InvalidTickOrder { lower: 60, upper: 0 }
        );

        let misaligned = PositionParams {
            tick_lower: 0,
            tick_upper: 90,
            ..base.clone()
        };
        assert_eq!(
            Position::new(misaligned).unwrap_err(),
            DomainError::MisalignedTick { tick: 90, spacing: 60 }
        );

        let out_of_bounds = PositionParams {
            tick_lower: -443_700,
            tick_upper: 0,
            ..base
        };
        assert_eq!(
            Position::new(out_of_bounds).unwrap_err(),
            DomainError::TickOutOfBounds(-443_700)
        );
    }

    #[test]
    fn test_materialized_and_projected_origins() {
        let fetched = position(0, -60, 60, 1_000);
        assert!(!fetched.is_projected());
        assert!(fetched.id().is_some_and(|id| id.ends_with("99")));

        let projected = Position::from_amounts(request(0, -60, 60, 1_000, 1_000)).unwrap();
        assert!(projected.is_projected());
        assert_eq!(projected.id(), None);
    }

    #[test]
    fn test_from_amounts_straddling_takes_min() {
        let req = request(2000, 1860, 2100, 50_000_000, 80_000_000);
        let sqrt_current = req.pool.sqrt_price_x64();
        let sqrt_lower = tick_to_sqrt_price_x64(1860).unwrap();
        let sqrt_upper = tick_to_sqrt_price_x64(2100).unwrap();
        let from_x = max_liquidity_for_amount_x(sqrt_current, sqrt_upper, 50_000_000).unwrap();
        let from_y = max_liquidity_for_amount_y(sqrt_lower, sqrt_current, 80_000_000).unwrap();

        let projected = Position::from_amounts(req).unwrap();
        assert_eq!(projected.liquidity(), from_x.min(from_y));
        assert_eq!(projected.tick_lower() % 60, 0);
        assert_eq!(projected.tick_upper() % 60, 0);
    }

    #[test]
    fn test_from_amounts_one_sided() {
        let below = Position::from_amounts(request(0, 60, 180, 1_000_000, 0)).unwrap();
        assert!(below.liquidity() > 0);
        assert_eq!(below.mint_amounts().unwrap().amount_y, 0);

        let above = Position::from_amounts(request(600, 60, 180, 0, 1_000_000)).unwrap();
        assert!(above.liquidity() > 0);
        assert_eq!(above.mint_amounts().unwrap().amount_x, 0);
    }

    #[test]
    fn test_from_amounts_at_lower_bound_uses_only_x() {
        // current price exactly on the lower tick: sized from X alone, no Y needed
        let req = request(60, 60, 180, 1_000_000, 0);
        let expected = max_liquidity_for_amount_x(
            tick_to_sqrt_price_x64(60).unwrap(),
            tick_to_sqrt_price_x64(180).unwrap(),
            1_000_000,
        )
        .unwrap();

        let projected = Position::from_amounts(req).unwrap();
        assert!(expected > 0);
        assert_eq!(projected.liquidity(), expected);

        let amounts = projected.mint_amounts().unwrap();
        assert_eq!(amounts.amount_y, 0);
        assert!(amounts.amount_x <= 1_000_001);
    }

    #[test]
    fn test_mint_amounts_do_not_exceed_deposit_by_more_than_rounding() {
        let projected = Position::from_amounts(request(1000, 960, 1080, 10_000_000, 10_000_000)).unwrap();
        let amounts = projected.mint_amounts().unwrap();
        assert!(amounts.amount_x <= 10_000_001);
        assert!(amounts.amount_y <= 10_000_001);
    }

    #[test]
    fn test_contains_current_tick() {
        assert!(position(1000, 900, 1020, 1).contains_current_tick());
        assert!(position(1020, 900, 1020, 1).contains_current_tick());
        assert!(!position(2000, 900, 1020, 1).contains_current_tick());
    }

    proptest! {
        #[test]
        fn prop_from_amounts_keeps_aligned_ordered_ticks(
            lower_units in -100i32..100,
            width in 1i32..50,
            current in -6000i32..6000,
            x in 0u64..u64::MAX,
            y in 0u64..u64::MAX,
        ) {
            let lower = lower_units * 60;
            let upper = lower + width * 60;
            let projected = Position::from_amounts(request(current, lower, upper, x.into(), y.into())).unwrap();
            prop_assert!(projected.tick_lower() < projected.tick_upper());
            prop_assert_eq!(projected.tick_lower() % 60, 0);
            prop_assert_eq!(projected.tick_upper() % 60, 0);
        }
    }
}
