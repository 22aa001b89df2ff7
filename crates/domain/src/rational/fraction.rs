//! Exact fractions with round half up rendering.

use crate::error::MathError;
use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{One, Signed, Zero};
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Mul, Sub};

/// Rendering options for [`Fraction::to_fixed_with`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedFormat {
    /// Separator between the integer and fractional digits.
    pub decimal_separator: String,
    /// Separator inserted every three integer digits. Empty disables grouping.
    pub group_separator: String,
}

impl Default for FixedFormat {
    fn default() -> Self {
        Self {
            decimal_separator: ".".to_string(),
            group_separator: String::new(),
        }
    }
}

/// Exact rational number over arbitrary precision integers.
///
/// The denominator is always positive, the sign lives in the numerator.
#[derive(Debug, Clone)]
pub struct Fraction {
    numerator: BigInt,
    denominator: BigInt,
}

impl Fraction {
    /// Creates a fraction, normalizing the sign onto the numerator.
    pub fn new(
        numerator: impl Into<BigInt>,
        denominator: impl Into<BigInt>,
    ) -> Result<Self, MathError> {
        let numerator = numerator.into();
        let denominator = denominator.into();
        if denominator.is_zero() {
            return Err(MathError::DivisionByZero);
        }
        Ok(Self::from_parts(numerator, denominator))
    }

    /// Creates the fraction `value / 1`.
    pub fn from_integer(value: impl Into<BigInt>) -> Self {
        Self {
            numerator: value.into(),
            denominator: BigInt::one(),
        }
    }

    /// Zero.
    pub fn zero() -> Self {
        Self::from_integer(0)
    }

    /// One.
    pub fn one() -> Self {
        Self::from_integer(1)
    }

    // Callers guarantee a nonzero denominator.
    pub(crate) fn from_parts(numerator: BigInt, denominator: BigInt) -> Self {
        if denominator.is_negative() {
            Self {
                numerator: -numerator,
                denominator: -denominator,
            }
        } else {
            Self {
                numerator,
                denominator,
            }
        }
    }

    fn reduced(self) -> Self {
        let g = self.numerator.gcd(&self.denominator);
        if g.is_zero() || g.is_one() {
            return self;
        }
        Self {
            numerator: self.numerator / &g,
            denominator: self.denominator / &g,
        }
    }

    /// Numerator, carrying the sign.
    pub fn numerator(&self) -> &BigInt {
        &self.numerator
    }

    /// Denominator, always positive.
    pub fn denominator(&self) -> &BigInt {
        &self.denominator
    }

    /// Integer part, truncated toward zero.
    pub fn quotient(&self) -> BigInt {
        &self.numerator / &self.denominator
    }

    /// Remainder of the truncated division, with the sign of the numerator.
    pub fn remainder(&self) -> BigInt {
        &self.numerator % &self.denominator
    }

    /// Whether the value is zero.
    pub fn is_zero(&self) -> bool {
        self.numerator.is_zero()
    }

    /// Returns `denominator / numerator`.
    pub fn invert(&self) -> Result<Self, MathError> {
        if self.numerator.is_zero() {
            return Err(MathError::CannotInvertZero);
        }
        Ok(Self::from_parts(
            self.denominator.clone(),
            self.numerator.clone(),
        ))
    }

    /// Divides by `other`, reducing the result.
    pub fn checked_div(&self, other: &Fraction) -> Result<Fraction, MathError> {
        Ok(self * &other.invert()?)
    }

    /// Rounds to the nearest integer, halves away from zero.
    ///
    /// Matches the digits produced by `to_fixed(0)`.
    pub fn round_half_up(&self) -> BigInt {
        let (quotient, remainder) = self.numerator.abs().div_rem(&self.denominator);
        let rounded = if (remainder << 1u32) >= self.denominator {
            quotient + 1u32
        } else {
            quotient
        };
        if self.numerator.is_negative() {
            -rounded
        } else {
            rounded
        }
    }

    /// Renders the value with `decimals` fractional digits, rounding half up.
    pub fn to_fixed(&self, decimals: u32) -> String {
        self.to_fixed_with(decimals, &FixedFormat::default())
    }

    /// Renders the value with custom separators, rounding half up.
    pub fn to_fixed_with(&self, decimals: u32, format: &FixedFormat) -> String {
        let negative = self.numerator.is_negative();
        let (quotient, remainder) = self.numerator.abs().div_rem(&self.denominator);
        let group = |value: &BigInt| group_digits(&value.to_string(), &format.group_separator);

        let body = if decimals == 0 {
            let rounded = if (&remainder << 1u32) >= self.denominator {
                quotient + 1u32
            } else {
                quotient
            };
            group(&rounded)
        } else {
            let scale = BigInt::from(10u32).pow(decimals);
            // One extra digit, then round it away.
            let raw = (remainder * &scale * 10u32) / &self.denominator;
            let fractional = (raw + 5u32) / 10u32;
            if fractional >= scale {
                format!(
                    "{}{}{}",
                    group(&(quotient + 1u32)),
                    format.decimal_separator,
                    "0".repeat(decimals as usize)
                )
            } else {
                format!(
                    "{}{}{:0>width$}",
                    group(&quotient),
                    format.decimal_separator,
                    fractional.to_string(),
                    width = decimals as usize
                )
            }
        };

        if negative { format!("-{body}") } else { body }
    }
}

fn group_digits(digits: &str, separator: &str) -> String {
    if separator.is_empty() || digits.len() <= 3 {
        return digits.to_string();
    }
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 * separator.len());
    let head = digits.len() % 3;
    for (i, ch) in digits.chars().enumerate() {
        if i != 0 && (i + 3 - head) % 3 == 0 {
            out.push_str(separator);
        }
        out.push(ch);
    }
    out
}

impl PartialEq for Fraction {
    fn eq(&self, other: &Self) -> bool {
        &self.numerator * &other.denominator == &other.numerator * &self.denominator
    }
}

impl Eq for Fraction {}

impl PartialOrd for Fraction {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Fraction {
    // Valid because both denominators are positive.
    fn cmp(&self, other: &Self) -> Ordering {
        (&self.numerator * &other.denominator).cmp(&(&other.numerator * &self.denominator))
    }
}

impl fmt::Display for Fraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}

impl From<BigInt> for Fraction {
    fn from(value: BigInt) -> Self {
        Self::from_integer(value)
    }
}

impl From<u128> for Fraction {
    fn from(value: u128) -> Self {
        Self::from_integer(value)
    }
}

impl From<u64> for Fraction {
    fn from(value: u64) -> Self {
        Self::from_integer(value)
    }
}

impl From<i64> for Fraction {
    fn from(value: i64) -> Self {
        Self::from_integer(value)
    }
}

impl Add<&Fraction> for &Fraction {
    type Output = Fraction;

    fn add(self, rhs: &Fraction) -> Fraction {
        let numerator = &self.numerator * &rhs.denominator + &rhs.numerator * &self.denominator;
        let denominator = &self.denominator * &rhs.denominator;
        Fraction::from_parts(numerator, denominator).reduced()
    }
}

impl Sub<&Fraction> for &Fraction {
    type Output = Fraction;

    fn sub(self, rhs: &Fraction) -> Fraction {
        let numerator = &self.numerator * &rhs.denominator - &rhs.numerator * &self.denominator;
        let denominator = &self.denominator * &rhs.denominator;
        Fraction::from_parts(numerator, denominator).reduced()
    }
}

impl Mul<&Fraction> for &Fraction {
    type Output = Fraction;

    fn mul(self, rhs: &Fraction) -> Fraction {
        let numerator = &self.numerator * &rhs.numerator;
        let denominator = &self.denominator * &rhs.denominator;
        Fraction::from_parts(numerator, denominator).reduced()
    }
}

macro_rules! forward_owned_binop {
    ($($imp:ident, $method:ident);*) => {
        $(
            impl $imp<Fraction> for Fraction {
                type Output = Fraction;

                fn $method(self, rhs: Fraction) -> Fraction {
                    (&self).$method(&rhs)
                }
            }

            impl $imp<&Fraction> for Fraction {
                type Output = Fraction;

                fn $method(self, rhs: &Fraction) -> Fraction {
                    (&self).$method(rhs)
                }
            }
        )*
    };
}

forward_owned_binop!(Add, add; Sub, sub; Mul, mul);
