//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types from the crate.
//!
//! # Example
//!
//! ```rust
//! use clmm_rebalancer_domain::prelude::*;
//! ```

// Coins
pub use crate::coin::{Coin, SUI_COIN_TYPE, normalize_address, normalize_coin_type};

// Enums and errors
pub use crate::enums::{Protocol, Rounding};
pub use crate::error::{DomainError, MathError};

// Math
pub use crate::math::{
    AmountPair, MAX_SQRT_RATIO, MAX_TICK, MIN_SQRT_RATIO, MIN_TICK, Q64, align_tick_to_spacing,
    clamp_tick_to_range, get_amounts_for_liquidity, max_liquidity_for_amount_x,
    max_liquidity_for_amount_y, sqrt_price_x64_to_price, sqrt_price_x64_to_tick, tick_from_bits,
    tick_to_bits, tick_to_price, tick_to_sqrt_price_x64,
};

// Models
pub use crate::pool::{Pool, PoolParams, RewardInfo};
pub use crate::position::{FromAmounts, Position, PositionOrigin, PositionParams, PositionRewardInfo};

// Ranges
pub use crate::price_range::{BandSide, PriceBand, PriceRange};
pub use crate::range::{TickRange, closest_active_range, is_out_of_range};

// Rational
pub use crate::rational::{FixedFormat, Fraction, Percent};

// Zap
pub use crate::zap::{FEE_RATE_DENOMINATOR, ZapRequest, zap_amount};
