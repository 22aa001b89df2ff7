//! Fixed point math for concentrated liquidity.
//!
//! - Tick index and `sqrtPriceX64` conversions
//! - Liquidity and token amount formulas
//! - Human readable price conversions

mod liquidity;
mod price;
mod tick_math;

pub use liquidity::*;
pub use price::*;
pub use tick_math::*;
