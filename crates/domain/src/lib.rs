//! Core domain model for concentrated liquidity position management.
//!
//! This crate provides:
//! - Fixed point tick and square root price conversions
//! - Liquidity and token amount formulas
//! - Exact rational arithmetic for slippage, fee and ratio math
//! - Pool and position snapshots
//! - Active range selection and price band derivation

/// Prelude module for convenient imports.
pub mod prelude;

/// Coin identity and address normalization.
pub mod coin;
/// Common enumerations.
pub mod enums;
/// Error types.
pub mod error;
/// Fixed point math.
pub mod math;
/// Pool snapshots.
pub mod pool;
/// Position snapshots.
pub mod position;
/// Base and target price bands.
pub mod price_range;
/// Active range selection.
pub mod range;
/// Exact rational numbers.
pub mod rational;
/// Single sided deposit math.
pub mod zap;
