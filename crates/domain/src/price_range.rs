//! Base and target bands inside a tick range, in square root price space.

use crate::error::MathError;
use crate::math::tick_to_sqrt_price_x64;
use crate::rational::{Fraction, Percent};
use num_bigint::BigInt;

/// Where a square root price sits relative to a band.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BandSide {
    /// Under the lower bound.
    Below,
    /// Within the bounds, both included.
    Inside,
    /// Over the upper bound.
    Above,
}

/// A `[lower, upper]` interval of 64.64 square root prices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceBand {
    /// Lower 64.64 square root price.
    pub lower: BigInt,
    /// Upper 64.64 square root price.
    pub upper: BigInt,
}

impl PriceBand {
    /// Side of the band `sqrt_price_x64` falls on. The bounds are inside.
    pub fn side_of(&self, sqrt_price_x64: u128) -> BandSide {
        let price = BigInt::from(sqrt_price_x64);
        if price < self.lower {
            BandSide::Below
        } else if price > self.upper {
            BandSide::Above
        } else {
            BandSide::Inside
        }
    }
}

/// Sqrt price bounds of a tick range and the bands shrunk from both ends by a percentage.
///
/// Bands past the first one that collapses are not computed. Check [`PriceRange::is_valid`]
/// before using either band.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceRange {
    price_lower: u128,
    price_upper: u128,
    base: Option<PriceBand>,
    target: Option<PriceBand>,
    valid: bool,
}

fn shrink(lower: u128, upper: u128, diff: &BigInt, percent: &Percent) -> PriceBand {
    let offset = (percent * &Fraction::from_integer(diff.clone())).quotient();
    PriceBand {
        lower: BigInt::from(lower) + &offset,
        upper: BigInt::from(upper) - offset,
    }
}

impl PriceRange {
    /// Computes the bounds of `[tick_lower, tick_upper]` and both bands.
    ///
    /// A percent is the share of the full width removed from each end.
    pub fn new(
        tick_lower: i32,
        tick_upper: i32,
        base_percent: &Percent,
        target_percent: &Percent,
    ) -> Result<Self, MathError> {
        let mut price_lower = tick_to_sqrt_price_x64(tick_lower)?;
        let mut price_upper = tick_to_sqrt_price_x64(tick_upper)?;
        if price_upper <= price_lower {
            std::mem::swap(&mut price_lower, &mut price_upper);
        }
        let diff = BigInt::from(price_upper - price_lower);

        let mut range = Self {
            price_lower,
            price_upper,
            base: None,
            target: None,
            valid: false,
        };

        let base = shrink(price_lower, price_upper, &diff, base_percent);
        let base_collapsed = base.upper <= base.lower;
        range.base = Some(base);
        if base_collapsed {
            return Ok(range);
        }

        let target = shrink(price_lower, price_upper, &diff, target_percent);
        range.valid = target.upper > target.lower
            && range.base.as_ref().is_some_and(|base| target.upper < base.upper);
        range.target = Some(target);
        Ok(range)
    }

    /// Square root price at the lower tick.
    pub fn price_lower(&self) -> u128 {
        self.price_lower
    }

    /// Square root price at the upper tick.
    pub fn price_upper(&self) -> u128 {
        self.price_upper
    }

    /// Band shrunk by the base percent.
    pub fn base(&self) -> Option<&PriceBand> {
        self.base.as_ref()
    }

    /// Band shrunk by the target percent, absent when the base band collapsed.
    pub fn target(&self) -> Option<&PriceBand> {
        self.target.as_ref()
    }

    /// Whether both bands are non empty and the target band sits strictly inside the base band.
    pub fn is_valid(&self) -> bool {
        self.valid
    }
}
