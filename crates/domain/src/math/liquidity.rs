//! Liquidity and token amount formulas over 64.64 square root prices.

use crate::error::MathError;
use primitive_types::{U256, U512};
use serde::{Deserialize, Serialize};
use std::ops::Add;

/// A pair of raw token amounts, in the pool's X/Y order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AmountPair {
    /// Amount of coin X.
    pub amount_x: u128,
    /// Amount of coin Y.
    pub amount_y: u128,
}

impl AmountPair {
    /// Creates a pair from its X and Y amounts.
    pub fn new(amount_x: u128, amount_y: u128) -> Self {
        Self { amount_x, amount_y }
    }

    /// Whether both amounts are zero.
    pub fn is_zero(&self) -> bool {
        self.amount_x == 0 && self.amount_y == 0
    }

    /// Component-wise sum, failing on overflow.
    pub fn checked_add(&self, other: &AmountPair) -> Result<AmountPair, MathError> {
        Ok(AmountPair {
            amount_x: self
                .amount_x
                .checked_add(other.amount_x)
                .ok_or(MathError::Overflow("amount x"))?,
            amount_y: self
                .amount_y
                .checked_add(other.amount_y)
                .ok_or(MathError::Overflow("amount y"))?,
        })
    }
}

impl Add for AmountPair {
    type Output = AmountPair;

    fn add(self, rhs: AmountPair) -> AmountPair {
        AmountPair {
            amount_x: self.amount_x.saturating_add(rhs.amount_x),
            amount_y: self.amount_y.saturating_add(rhs.amount_y),
        }
    }
}

fn ordered(a: u128, b: u128) -> (u128, u128) {
    if a <= b { (a, b) } else { (b, a) }
}

fn narrow_u256(value: U256, what: &'static str) -> Result<u128, MathError> {
    u128::try_from(value).map_err(|_| MathError::Overflow(what))
}

fn narrow_u512(value: U512, what: &'static str) -> Result<u128, MathError> {
    u128::try_from(value).map_err(|_| MathError::Overflow(what))
}

/// Largest liquidity that `amount_x` of coin X can back across the range.
///
/// `L = amount_x * sqrt_lower * sqrt_upper / ((sqrt_upper - sqrt_lower) * 2^64)`.
/// Returns zero for a zero amount or an empty range.
pub fn max_liquidity_for_amount_x(
    sqrt_price_a: u128,
    sqrt_price_b: u128,
    amount_x: u128,
) -> Result<u128, MathError> {
    let (lower, upper) = ordered(sqrt_price_a, sqrt_price_b);
    let numerator = (U512::from(amount_x) * U512::from(upper) * U512::from(lower)) >> 64;
    let denominator = upper - lower;
    if numerator.is_zero() || denominator == 0 {
        return Ok(0);
    }
    narrow_u512(numerator / U512::from(denominator), "liquidity for amount x")
}

/// Largest liquidity that `amount_y` of coin Y can back across the range.
///
/// `L = amount_y * 2^64 / (sqrt_upper - sqrt_lower)`.
pub fn max_liquidity_for_amount_y(
    sqrt_price_a: u128,
    sqrt_price_b: u128,
    amount_y: u128,
) -> Result<u128, MathError> {
    let (lower, upper) = ordered(sqrt_price_a, sqrt_price_b);
    let delta = upper - lower;
    if delta == 0 {
        return Ok(0);
    }
    narrow_u256(
        (U256::from(amount_y) << 64) / U256::from(delta),
        "liquidity for amount y",
    )
}

/// `L * 2^64 * (upper - lower) / (lower * upper)`.
pub fn get_amount_x(
    liquidity: u128,
    sqrt_price_lower: u128,
    sqrt_price_upper: u128,
    round_up: bool,
) -> Result<u128, MathError> {
    let (lower, upper) = ordered(sqrt_price_lower, sqrt_price_upper);
    let numerator = (U512::from(liquidity) << 64) * U512::from(upper - lower);
    let denominator = U512::from(lower) * U512::from(upper);
    if denominator.is_zero() {
        return Ok(0);
    }
    let (quotient, remainder) = numerator.div_mod(denominator);
    let amount = if round_up && !remainder.is_zero() {
        quotient + U512::one()
    } else {
        quotient
    };
    narrow_u512(amount, "amount x")
}

/// `L * (upper - lower) / 2^64`.
pub fn get_amount_y(
    liquidity: u128,
    sqrt_price_lower: u128,
    sqrt_price_upper: u128,
    round_up: bool,
) -> Result<u128, MathError> {
    let (lower, upper) = ordered(sqrt_price_lower, sqrt_price_upper);
    let product = U256::from(liquidity) * U256::from(upper - lower);
    let mut amount = product >> 64;
    if round_up && product.low_u64() != 0 {
        amount = amount + U256::one();
    }
    narrow_u256(amount, "amount y")
}

/// Token amounts represented by `liquidity` over `[sqrt_lower, sqrt_upper]` at `sqrt_current`.
///
/// Below the range everything is coin X, above it everything is coin Y, and
/// inside it X covers `current..upper` while Y covers `lower..current`.
/// `round_up` should be set whenever the amounts feed a minimum bound.
pub fn get_amounts_for_liquidity(
    sqrt_price_current: u128,
    sqrt_price_lower: u128,
    sqrt_price_upper: u128,
    liquidity: u128,
    round_up: bool,
) -> Result<AmountPair, MathError> {
    let (lower, upper) = ordered(sqrt_price_lower, sqrt_price_upper);
    if sqrt_price_current < lower {
        Ok(AmountPair::new(
            get_amount_x(liquidity, lower, upper, round_up)?,
            0,
        ))
    } else if sqrt_price_current < upper {
        Ok(AmountPair::new(
            get_amount_x(liquidity, sqrt_price_current, upper, round_up)?,
            get_amount_y(liquidity, lower, sqrt_price_current, round_up)?,
        ))
    } else {
        Ok(AmountPair::new(
            0,
            get_amount_y(liquidity, lower, upper, round_up)?,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{Q64, tick_to_sqrt_price_x64};

    #[test]
    fn test_degenerate_inputs_yield_zero() {
        assert_eq!(max_liquidity_for_amount_x(Q64, Q64, 1_000).unwrap(), 0);
        assert_eq!(max_liquidity_for_amount_x(Q64, 2 * Q64, 0).unwrap(), 0);
        assert_eq!(max_liquidity_for_amount_y(Q64, Q64, 1_000).unwrap(), 0);
        assert_eq!(get_amount_x(1_000, 0, Q64, true).unwrap(), 0);
    }

    #[test]
    fn test_unit_prices() {
        // sqrt prices 1 and 2: x = L * (1/1 - 1/2), y = L * (2 - 1)
        let lower = Q64;
        let upper = 2 * Q64;
        assert_eq!(get_amount_x(1_000, lower, upper, false).unwrap(), 500);
        assert_eq!(get_amount_y(1_000, lower, upper, false).unwrap(), 1_000);
        assert_eq!(max_liquidity_for_amount_x(lower, upper, 500).unwrap(), 1_000);
        assert_eq!(max_liquidity_for_amount_y(lower, upper, 1_000).unwrap(), 1_000);
        // argument order does not matter
        assert_eq!(max_liquidity_for_amount_y(upper, lower, 1_000).unwrap(), 1_000);
    }

    #[test]
    fn test_round_up_only_adds_on_remainder() {
        let lower = Q64;
        let upper = Q64 + Q64 / 3;
        let down = get_amount_y(10, lower, upper, false).unwrap();
        let up = get_amount_y(10, lower, upper, true).unwrap();
        assert_eq!(down, 3);
        assert_eq!(up, 4);

        let exact_down = get_amount_y(10, Q64, 2 * Q64, false).unwrap();
        let exact_up = get_amount_y(10, Q64, 2 * Q64, true).unwrap();
        assert_eq!(exact_down, exact_up);
    }

    #[test]
    fn test_amounts_follow_current_price() {
        let lower = tick_to_sqrt_price_x64(-600).unwrap();
        let upper = tick_to_sqrt_price_x64(600).unwrap();
        let liquidity = 1_000_000_000u128;

        let below = get_amounts_for_liquidity(lower - 1, lower, upper, liquidity, true).unwrap();
        assert!(below.amount_x > 0);
        assert_eq!(below.amount_y, 0);

        let above = get_amounts_for_liquidity(upper, lower, upper, liquidity, true).unwrap();
        assert_eq!(above.amount_x, 0);
        assert!(above.amount_y > 0);

        let inside = get_amounts_for_liquidity(Q64, lower, upper, liquidity, true).unwrap();
        assert!(inside.amount_x > 0 && inside.amount_y > 0);
        assert!(inside.amount_x < below.amount_x);
        assert!(inside.amount_y < above.amount_y);
    }

    #[test]
    fn test_liquidity_round_trips_through_amounts() {
        let lower = tick_to_sqrt_price_x64(-600).unwrap();
        let upper = tick_to_sqrt_price_x64(600).unwrap();
        let liquidity = max_liquidity_for_amount_x(lower, upper, 1_000_000).unwrap();
        let amount = get_amount_x(liquidity, lower, upper, false).unwrap();
        assert!(amount <= 1_000_000);
        assert!(1_000_000 - amount <= 1);
    }

    #[test]
    fn test_overflow_is_reported() {
        let result = max_liquidity_for_amount_y(Q64, Q64 + 1, u128::MAX);
        assert_eq!(result.unwrap_err(), MathError::Overflow("liquidity for amount y"));
    }
}
