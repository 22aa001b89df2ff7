//! Target range selection for a tracked position.

use crate::error::ExecutionError;
use clmm_rebalancer_domain::math::{MAX_TICK, MIN_TICK, clamp_tick_to_range};
use clmm_rebalancer_domain::position::Position;
use clmm_rebalancer_domain::price_range::{BandSide, PriceRange};
use clmm_rebalancer_domain::range::{TickRange, closest_active_range};
use clmm_rebalancer_domain::rational::Percent;
use tracing::{debug, warn};

/// Parameters of the range selection.
#[derive(Debug, Clone)]
pub struct RebalancePolicy {
    /// Width of the active range in tick spacings.
    pub multiplier: u32,
    /// Shrink of the base band.
    pub base_price_percent: Percent,
    /// Shrink of the target band.
    pub target_price_percent: Percent,
    /// Spacings added on the side the price left the base band.
    pub widen_spacing_units: u32,
}

/// Where a position should be, given the current pool state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RebalanceDecision {
    /// The position's range.
    pub current: TickRange,
    /// The pool's active range for the configured multiplier.
    pub active: TickRange,
    /// Range the position should occupy. Equal to `current` when nothing changes.
    pub target: TickRange,
    /// Side of the base band the price is on; `None` when in range or the band is invalid.
    pub price_side: Option<BandSide>,
}

impl RebalanceDecision {
    /// Whether the position differs from the active range.
    pub fn is_out_of_range(&self) -> bool {
        self.current != self.active
    }

    /// Whether the position has to move to `target`.
    pub fn requires_migration(&self) -> bool {
        self.target != self.current
    }
}

/// Chooses the target range for `position`.
///
/// An in range position keeps its bounds. Otherwise the target is the active
/// range, widened on the side where the price has left the active range's
/// base band.
pub fn decide_rebalance(
    position: &Position,
    policy: &RebalancePolicy,
) -> Result<RebalanceDecision, ExecutionError> {
    let pool = position.pool();
    let current = TickRange::of(position);
    let active = closest_active_range(pool, policy.multiplier)?;

    if current == active {
        return Ok(RebalanceDecision {
            current,
            active,
            target: current,
            price_side: None,
        });
    }

    let bands = PriceRange::new(
        active.lower,
        active.upper,
        &policy.base_price_percent,
        &policy.target_price_percent,
    )?;
    let mut target = active;
    let mut price_side = None;

    match bands.base().filter(|_| bands.is_valid()) {
        Some(base) => {
            let side = base.side_of(pool.sqrt_price_x64());
            let spacing = pool.tick_spacing();
            let widen = i64::from(spacing) * i64::from(policy.widen_spacing_units);
            match side {
                BandSide::Below => target.lower = widened(active.lower, -widen, spacing),
                BandSide::Above => target.upper = widened(active.upper, widen, spacing),
                BandSide::Inside => {}
            }
            price_side = Some(side);
        }
        None => {
            warn!(
                tick_lower = active.lower,
                tick_upper = active.upper,
                "Price band of the active range is invalid, not widening"
            );
        }
    }

    debug!(
        current = %current,
        active = %active,
        target = %target,
        side = ?price_side,
        "Rebalance decision"
    );
    Ok(RebalanceDecision {
        current,
        active,
        target,
        price_side,
    })
}

fn widened(tick: i32, delta: i64, spacing: u32) -> i32 {
    let moved = (i64::from(tick) + delta).clamp(i64::from(MIN_TICK), i64::from(MAX_TICK)) as i32;
    clamp_tick_to_range(moved, spacing, MIN_TICK, MAX_TICK)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clmm_rebalancer_domain::enums::Protocol;
    use clmm_rebalancer_domain::math::tick_to_sqrt_price_x64;
    use clmm_rebalancer_domain::pool::{Pool, PoolParams};
    use clmm_rebalancer_domain::position::PositionParams;
    use clmm_rebalancer_protocols::fixtures::{materialized, sui_usdc};

    fn policy(multiplier: u32, base_bps: u32, target_bps: u32) -> RebalancePolicy {
        RebalancePolicy {
            multiplier,
            base_price_percent: Percent::new(base_bps, 10_000).unwrap(),
            target_price_percent: Percent::new(target_bps, 10_000).unwrap(),
            widen_spacing_units: 1,
        }
    }

    /// Position over `[lower, upper]` in a pool at `tick` with the given sqrt price.
    fn position_at(tick: i32, sqrt_price_x64: u128, lower: i32, upper: i32) -> Position {
        let pool = Pool::new(PoolParams {
            id: "0xa1".to_string(),
            coins: sui_usdc(),
            rewards: Vec::new(),
            reserves: [0, 0],
            fee: 2_500,
            sqrt_price_x64,
            tick_current: tick,
            tick_spacing: Some(60),
            liquidity: 0,
            fee_growth_global_x: 0,
            fee_growth_global_y: 0,
            protocol: Protocol::Cetus,
        })
        .unwrap();
        Position::new(PositionParams {
            id: "0xb1".to_string(),
            owner: "0xa11ce".to_string(),
            pool,
            liquidity: 1_000,
            tick_lower: lower,
            tick_upper: upper,
            fee_growth_inside_last_x: 0,
            fee_growth_inside_last_y: 0,
            coins_owed_x: 0,
            coins_owed_y: 0,
            reward_infos: Vec::new(),
        })
        .unwrap()
    }

    #[test]
    fn test_active_position_keeps_its_range() {
        let position = materialized(Protocol::Cetus, 1000, 960, 1080, 1_000);
        let decision = decide_rebalance(&position, &policy(2, 1_000, 2_000)).unwrap();
        assert!(!decision.is_out_of_range());
        assert!(!decision.requires_migration());
        assert_eq!(decision.target, TickRange::new(960, 1080));
    }

    #[test]
    fn test_drifted_position_targets_active_range() {
        let position = materialized(Protocol::Cetus, 2000, 900, 1020, 1_000);
        let decision = decide_rebalance(&position, &policy(4, 1_000, 2_000)).unwrap();
        assert!(decision.is_out_of_range());
        assert_eq!(decision.active, TickRange::new(1860, 2100));
        assert_eq!(decision.price_side, Some(BandSide::Inside));
        assert_eq!(decision.target, decision.active);
        assert!(decision.target.contains(2000));
    }

    #[test]
    fn test_widens_above_when_price_leaves_base_band() {
        // at tick 60 with the price just under the tick price the range shifts to [0, 60]
        // and the price sits in the top of it; a 49% base band excludes it
        let sqrt = tick_to_sqrt_price_x64(60).unwrap() - 1;
        let position = position_at(60, sqrt, -600, -540);
        let decision = decide_rebalance(&position, &policy(1, 4_900, 4_950)).unwrap();
        assert_eq!(decision.active, TickRange::new(0, 60));
        assert_eq!(decision.price_side, Some(BandSide::Above));
        assert_eq!(decision.target, TickRange::new(0, 120));
        assert!(decision.requires_migration());
    }

    #[test]
    fn test_widens_below_side_only() {
        let position = position_at(0, tick_to_sqrt_price_x64(0).unwrap(), 600, 660);
        let decision = decide_rebalance(&position, &policy(1, 4_900, 4_950)).unwrap();
        // the price sits exactly on the lower bound of [0, 60]
        assert_eq!(decision.active, TickRange::new(0, 60));
        assert_eq!(decision.price_side, Some(BandSide::Below));
        assert_eq!(decision.target, TickRange::new(-60, 60));
    }

    #[test]
    fn test_invalid_band_does_not_widen() {
        let position = position_at(0, tick_to_sqrt_price_x64(0).unwrap(), 600, 660);
        // target must end strictly inside the base band
        let decision = decide_rebalance(&position, &policy(1, 2_000, 1_000)).unwrap();
        assert_eq!(decision.price_side, None);
        assert_eq!(decision.target, decision.active);
    }

    #[test]
    fn test_widening_is_clamped_to_tick_bounds() {
        assert_eq!(widened(443_580, 120, 60), 443_580);
        assert_eq!(widened(-443_580, -120, 60), -443_580);
        assert_eq!(widened(0, -60, 60), -60);
    }
}
