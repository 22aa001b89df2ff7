//! Human readable prices derived from square root prices and ticks.

use super::tick_math::tick_to_sqrt_price_x64;
use crate::coin::Coin;
use crate::error::MathError;
use crate::rational::Fraction;
use num_bigint::BigInt;

/// Converts a square root price into the price of `base` quoted in `quote`.
///
/// The raw ratio is `sqrt^2 / 2^128` when `base` sorts before `quote`, and its
/// inverse otherwise. Decimals are not applied.
pub fn sqrt_price_x64_to_price(
    base: &Coin,
    quote: &Coin,
    sqrt_price_x64: u128,
) -> Result<Fraction, MathError> {
    let sqrt_price = BigInt::from(sqrt_price_x64);
    let ratio_x128 = &sqrt_price * &sqrt_price;
    let q128 = BigInt::from(1u8) << 128u32;
    if base.sorts_before(quote) {
        Fraction::new(ratio_x128, q128)
    } else {
        Fraction::new(q128, ratio_x128)
    }
}

/// Price of `base` quoted in `quote` at `tick`.
pub fn tick_to_price(base: &Coin, quote: &Coin, tick: i32) -> Result<Fraction, MathError> {
    sqrt_price_x64_to_price(base, quote, tick_to_sqrt_price_x64(tick)?)
}
