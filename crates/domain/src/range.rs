//! Tick ranges and the pool's active range.

use crate::error::DomainError;
use crate::math::{saturate_tick, tick_to_sqrt_price_x64};
use crate::pool::Pool;
use crate::position::Position;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A closed tick interval `[lower, upper]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TickRange {
    /// Lower tick, inclusive.
    pub lower: i32,
    /// Upper tick, inclusive.
    pub upper: i32,
}

impl TickRange {
    /// Creates the range `[lower, upper]`.
    pub fn new(lower: i32, upper: i32) -> Self {
        Self { lower, upper }
    }

    /// The range a position covers.
    pub fn of(position: &Position) -> Self {
        Self::new(position.tick_lower(), position.tick_upper())
    }

    /// Whether `tick` lies within the bounds, both included.
    pub fn contains(&self, tick: i32) -> bool {
        (self.lower..=self.upper).contains(&tick)
    }

    /// Distance between the bounds in ticks.
    pub fn width(&self) -> i64 {
        i64::from(self.upper) - i64::from(self.lower)
    }
}

impl fmt::Display for TickRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.lower, self.upper)
    }
}

/// The `multiplier * tick_spacing` wide range centred on the pool's current tick.
///
/// The lower bound is the spacing multiple nearest to `tick_current - width / 2`.
/// When that lands exactly on the current tick while the price sits below the
/// tick's own price, the range moves down one spacing so it still covers the price.
pub fn closest_active_range(pool: &Pool, multiplier: u32) -> Result<TickRange, DomainError> {
    if multiplier == 0 {
        return Err(DomainError::InvalidMultiplier);
    }
    let spacing = i64::from(pool.tick_spacing());
    let current = i64::from(pool.tick_current());
    let width = i64::from(multiplier) * spacing;

    let mut lower = (2 * current - width + spacing).div_euclid(2 * spacing) * spacing;
    if lower == current && pool.sqrt_price_x64() < tick_to_sqrt_price_x64(pool.tick_current())? {
        lower -= spacing;
    }

    Ok(TickRange::new(saturate_tick(lower), saturate_tick(lower + width)))
}

/// True when the position's bounds differ from the pool's active range.
pub fn is_out_of_range(position: &Position, multiplier: u32) -> Result<bool, DomainError> {
    let active = closest_active_range(position.pool(), multiplier)?;
    Ok(TickRange::of(position) != active)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::Pool;
    use crate::pool::fixtures::{params, pool};
    use crate::position::fixtures::position;
    use proptest::prelude::*;

    #[test]
    fn test_active_range_around_current_tick() {
        let range = closest_active_range(&pool(100, 60), 2).unwrap();
        assert_eq!(range, TickRange::new(60, 180));
        assert_eq!(range.lower % 60, 0);
        assert!(range.contains(100));

        assert_eq!(
            closest_active_range(&pool(1000, 60), 2).unwrap(),
            TickRange::new(960, 1080)
        );
        assert_eq!(
            closest_active_range(&pool(2000, 60), 4).unwrap(),
            TickRange::new(1860, 2100)
        );
    }

    #[test]
    fn test_negative_ticks_snap_on_the_grid() {
        let range = closest_active_range(&pool(-1000, 60), 2).unwrap();
        assert_eq!(range, TickRange::new(-1080, -960));
    }

    #[test]
    fn test_lower_bound_on_current_tick_shifts_down_below_tick_price() {
        // a single spacing wide range snaps its lower bound onto tick 60
        let mut below = params(60, 60);
        below.sqrt_price_x64 = tick_to_sqrt_price_x64(60).unwrap() - 1;
        let lowered = closest_active_range(&Pool::new(below).unwrap(), 1).unwrap();
        assert_eq!(lowered, TickRange::new(0, 60));

        let exact = closest_active_range(&pool(60, 60), 1).unwrap();
        assert_eq!(exact, TickRange::new(60, 120));
    }

    #[test]
    fn test_zero_multiplier_is_rejected() {
        assert_eq!(
            closest_active_range(&pool(0, 60), 0).unwrap_err(),
            DomainError::InvalidMultiplier
        );
    }

    #[test]
    fn test_out_of_range_compares_exact_bounds() {
        assert!(!is_out_of_range(&position(1000, 960, 1080, 1), 2).unwrap());
        assert!(is_out_of_range(&position(1000, 900, 1020, 1), 2).unwrap());
        assert!(is_out_of_range(&position(2000, 900, 1020, 1), 4).unwrap());
    }

    proptest! {
        #[test]
        fn prop_active_range_is_aligned_and_covers_current(
            tick in -400_000i32..400_000,
            spacing in prop::sample::select(vec![1u32, 2, 10, 60, 200]),
            multiplier in 1u32..20,
        ) {
            let pool = pool(tick, spacing);
            let range = closest_active_range(&pool, multiplier).unwrap();
            prop_assert_eq!(range.lower % spacing as i32, 0);
            prop_assert_eq!(range.width(), i64::from(multiplier) * i64::from(spacing));
            prop_assert!(range.lower <= tick + spacing as i32);
            prop_assert!(range.upper >= tick - spacing as i32);
        }
    }
}
