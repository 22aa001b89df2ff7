//! Exact rational arithmetic.
//!
//! - [`Fraction`]: reduced rational numbers with half up decimal rendering
//! - [`Percent`]: fractions that keep their original scale under addition

mod fraction;
mod percent;

pub use fraction::*;
pub use percent::*;
