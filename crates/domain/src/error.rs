//! Error types for domain math and model construction.

use thiserror::Error;

/// Errors raised by the fixed point and rational math.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MathError {
    /// A fraction was built with a zero denominator.
    #[error("division by zero")]
    DivisionByZero,
    /// A zero fraction was inverted.
    #[error("cannot invert zero")]
    CannotInvertZero,
    /// A tick or square root price lies outside the supported domain.
    #[error("{what} {value} is outside the supported range [{min}, {max}]")]
    OutOfRange {
        /// Quantity that was checked.
        what: &'static str,
        /// Offending value.
        value: String,
        /// Lowest accepted value.
        min: String,
        /// Highest accepted value.
        max: String,
    },
    /// A result does not fit in its target integer width.
    #[error("overflow while computing {0}")]
    Overflow(&'static str),
}

/// Errors raised while building pool or position snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// Lower tick is not strictly below the upper tick.
    #[error("tick_lower {lower} must be below tick_upper {upper}")]
    InvalidTickOrder {
        /// Lower tick.
        lower: i32,
        /// Upper tick.
        upper: i32,
    },
    /// Tick is not a multiple of the pool tick spacing.
    #[error("tick {tick} is not a multiple of tick spacing {spacing}")]
    MisalignedTick {
        /// Offending tick.
        tick: i32,
        /// Pool tick spacing.
        spacing: u32,
    },
    /// Tick lies outside `[MIN_TICK, MAX_TICK]`.
    #[error("tick {0} is outside the valid tick range")]
    TickOutOfBounds(i32),
    /// Tick spacing resolved to zero.
    #[error("tick spacing must be positive (fee rate {fee})")]
    InvalidTickSpacing {
        /// Fee rate the spacing was derived from.
        fee: u32,
    },
    /// Range multiplier must be at least one.
    #[error("range multiplier must be positive")]
    InvalidMultiplier,
    /// Underlying math failure.
    #[error(transparent)]
    Math(#[from] MathError),
}
