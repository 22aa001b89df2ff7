//! Single token deposits.
//!
//! Splits a one sided input into the part deposited as is and the part swapped
//! into the other coin, given USD prices supplied by the caller.

use crate::error::MathError;
use crate::pool::Pool;
use crate::rational::Fraction;
use num_bigint::BigInt;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// Denominator of pool fee rates.
pub const FEE_RATE_DENOMINATOR: u32 = 1_000_000;

const PRICE_SCALING: u64 = 1_000_000_000;

/// Single sided deposit to be split by a swap before minting.
#[derive(Debug, Clone)]
pub struct ZapRequest<'a> {
    /// Pool the deposit goes into.
    pub pool: &'a Pool,
    /// Lower tick of the target range.
    pub tick_lower: i32,
    /// Upper tick of the target range.
    pub tick_upper: i32,
    /// Raw input amount in the smallest unit of the input coin.
    pub amount: u128,
    /// Whether `amount` is denominated in coin X.
    pub is_coin_x: bool,
    /// USD price of one whole coin X.
    pub price_x: Decimal,
    /// USD price of one whole coin Y.
    pub price_y: Decimal,
}

fn scaled_price(price: Decimal) -> Result<BigInt, MathError> {
    price
        .checked_mul(Decimal::from(PRICE_SCALING))
        .ok_or(MathError::Overflow("scaled price"))?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i128()
        .map(BigInt::from)
        .ok_or(MathError::Overflow("scaled price"))
}

/// Part of a single sided input to deposit as is.
///
/// The rest of `amount` is meant to be swapped into the other coin so both
/// sides match the pool's deposit ratio over the range after the swap fee.
pub fn zap_amount(request: &ZapRequest<'_>) -> Result<u128, MathError> {
    let pool = request.pool;
    let ten = BigInt::from(10u8);
    let unit_x = ten.pow(u32::from(pool.coin_x().decimals()));
    let unit_y = ten.pow(u32::from(pool.coin_y().decimals()));

    let value_ratio = Fraction::new(scaled_price(request.price_y)?, scaled_price(request.price_x)?)?
        .checked_div(&Fraction::new(unit_y, unit_x)?)?;
    let mut ratio = &pool.get_ratio(request.tick_lower, request.tick_upper)? * &value_ratio;
    if !request.is_coin_x {
        ratio = ratio.invert()?;
    }

    let fee_multiplier = Fraction::new(
        FEE_RATE_DENOMINATOR.saturating_sub(pool.fee()),
        FEE_RATE_DENOMINATOR,
    )?;
    let divisor = &(&ratio * &fee_multiplier) + &Fraction::one();
    let swapped = Fraction::from_integer(request.amount)
        .checked_div(&divisor)?
        .round_half_up();

    let kept = BigInt::from(request.amount) - swapped;
    u128::try_from(kept).map_err(|_| MathError::Overflow("zap amount"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::fixtures::pool;
    use rust_decimal_macros::dec;

    fn request(pool: &Pool, is_coin_x: bool, amount: u128) -> ZapRequest<'_> {
        ZapRequest {
            pool,
            tick_lower: -600,
            tick_upper: 600,
            amount,
            is_coin_x,
            price_x: dec!(3.0),
            price_y: dec!(1.0),
        }
    }

    #[test]
    fn test_one_sided_range_keeps_everything_or_nothing() {
        let pool = pool(0, 60);
        // the whole deposit is coin X above the current price
        let above = ZapRequest {
            tick_lower: 60,
            tick_upper: 600,
            ..request(&pool, true, 1_000_000)
        };
        assert_eq!(zap_amount(&above).unwrap(), 1_000_000);

        let as_y = ZapRequest {
            tick_lower: 60,
            tick_upper: 600,
            ..request(&pool, false, 1_000_000)
        };
        assert_eq!(zap_amount(&as_y).unwrap(), 0);
    }

    #[test]
    fn test_in_range_keeps_a_part() {
        let pool = pool(0, 60);
        let kept = zap_amount(&request(&pool, true, 1_000_000_000)).unwrap();
        assert!(kept > 0);
        assert!(kept < 1_000_000_000);
    }

    #[test]
    fn test_zero_price_is_rejected() {
        let pool = pool(0, 60);
        let zap = ZapRequest {
            price_x: Decimal::ZERO,
            ..request(&pool, true, 1_000)
        };
        assert_eq!(zap_amount(&zap).unwrap_err(), MathError::DivisionByZero);
    }

    #[test]
    fn test_huge_price_is_an_overflow_error() {
        let pool = pool(0, 60);
        let zap = ZapRequest {
            tick_lower: -120,
            tick_upper: 120,
            price_x: Decimal::MAX,
            price_y: Decimal::ONE,
            ..request(&pool, true, 1_000)
        };
        assert!(matches!(zap_amount(&zap), Err(MathError::Overflow(_))));
    }
}
