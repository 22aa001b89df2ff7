//! Percentages backed by unreduced fractions.

use super::fraction::{FixedFormat, Fraction};
use crate::error::MathError;
use num_bigint::BigInt;
use num_traits::Signed;
use rust_decimal::Decimal;
use std::fmt;
use std::ops::{Add, Mul, Sub};

/// A fraction interpreted as a percentage.
///
/// Addition and subtraction keep the unreduced numerator and denominator so a
/// basis point scale survives until rendering.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Percent(Fraction);

impl Percent {
    /// Creates `numerator / denominator`, failing on a zero denominator.
    pub fn new(
        numerator: impl Into<BigInt>,
        denominator: impl Into<BigInt>,
    ) -> Result<Self, MathError> {
        Fraction::new(numerator, denominator).map(Self)
    }

    /// 100%.
    pub fn one() -> Self {
        Self(Fraction::one())
    }

    /// 0%.
    pub fn zero() -> Self {
        Self(Fraction::zero())
    }

    /// Creates a percent from basis points of `1_000_000`.
    pub fn from_millionths(value: u32) -> Self {
        Self(Fraction::from_parts(BigInt::from(value), BigInt::from(1_000_000u32)))
    }

    /// Numerator as stored, not reduced.
    pub fn numerator(&self) -> &BigInt {
        self.0.numerator()
    }

    /// Denominator as stored, not reduced.
    pub fn denominator(&self) -> &BigInt {
        self.0.denominator()
    }

    /// The underlying fraction.
    pub fn as_fraction(&self) -> &Fraction {
        &self.0
    }

    /// Whether the value lies in `[0, 1]`.
    pub fn is_unit_interval(&self) -> bool {
        !self.numerator().is_negative() && self.numerator() <= self.denominator()
    }

    /// `1 - self`, keeping the scale of `self`.
    pub fn complement(&self) -> Percent {
        &Percent::one() - self
    }

    /// Renders the value times 100 with `decimals` fractional digits.
    pub fn to_fixed(&self, decimals: u32) -> String {
        self.to_fixed_with(decimals, &FixedFormat::default())
    }

    /// Like [`Percent::to_fixed`] with explicit separators.
    pub fn to_fixed_with(&self, decimals: u32, format: &FixedFormat) -> String {
        let scaled = Fraction::from_parts(self.numerator() * 100u32, self.denominator().clone());
        scaled.to_fixed_with(decimals, format)
    }
}

impl fmt::Display for Percent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.to_fixed(2))
    }
}

impl TryFrom<Decimal> for Percent {
    type Error = MathError;

    /// Converts a decimal ratio (`0.005` is 0.5%) keeping its scale as the denominator.
    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        let denominator = BigInt::from(10u32).pow(value.scale());
        Percent::new(value.mantissa(), denominator)
    }
}

impl Add<&Percent> for &Percent {
    type Output = Percent;

    fn add(self, rhs: &Percent) -> Percent {
        let numerator = self.numerator() * rhs.denominator() + rhs.numerator() * self.denominator();
        let denominator = self.denominator() * rhs.denominator();
        Percent(Fraction::from_parts(numerator, denominator))
    }
}

impl Sub<&Percent> for &Percent {
    type Output = Percent;

    fn sub(self, rhs: &Percent) -> Percent {
        let numerator = self.numerator() * rhs.denominator() - rhs.numerator() * self.denominator();
        let denominator = self.denominator() * rhs.denominator();
        Percent(Fraction::from_parts(numerator, denominator))
    }
}

impl Mul<&Fraction> for &Percent {
    type Output = Fraction;

    fn mul(self, rhs: &Fraction) -> Fraction {
        &self.0 * rhs
    }
}

impl Mul<&Percent> for &Percent {
    type Output = Fraction;

    fn mul(self, rhs: &Percent) -> Fraction {
        &self.0 * &rhs.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_add_and_sub_keep_scale() {
        let a = Percent::new(5, 1_000_000).unwrap();
        let b = Percent::new(10, 1_000_000).unwrap();
        let sum = &a + &b;
        assert_eq!(sum.numerator(), &BigInt::from(15_000_000i64));
        assert_eq!(sum.denominator(), &BigInt::from(1_000_000_000_000i64));

        let complement = a.complement();
        assert_eq!(complement.numerator(), &BigInt::from(999_995));
        assert_eq!(complement.denominator(), &BigInt::from(1_000_000));
    }

    #[test]
    fn test_multiply_reduces() {
        let half = Percent::new(50, 100).unwrap();
        let product = &half * &Fraction::from_integer(10);
        assert_eq!(product.numerator(), &BigInt::from(5));
        assert_eq!(product.denominator(), &BigInt::from(1));
    }

    #[test]
    fn test_to_fixed_renders_percentage() {
        assert_eq!(Percent::new(1, 200).unwrap().to_fixed(2), "0.50");
        assert_eq!(Percent::new(1, 3).unwrap().to_fixed(1), "33.3");
        assert_eq!(Percent::one().to_string(), "100.00%");
    }

    #[test]
    fn test_unit_interval() {
        assert!(Percent::zero().is_unit_interval());
        assert!(Percent::one().is_unit_interval());
        assert!(!Percent::new(101, 100).unwrap().is_unit_interval());
        assert!(!Percent::new(-1, 100).unwrap().is_unit_interval());
    }

    #[test]
    fn test_from_decimal_keeps_scale() {
        let p = Percent::try_from(dec!(0.005)).unwrap();
        assert_eq!(p.numerator(), &BigInt::from(5));
        assert_eq!(p.denominator(), &BigInt::from(1000));
        assert_eq!(Percent::try_from(dec!(1)).unwrap(), Percent::one());
        assert_eq!(Percent::from_millionths(5_000), p);
    }
}
