//! Exact decimal numbers using dashu
//!
//! A `Number` is an integer coefficient and a base-10 exponent, so scale
//! factors such as 0.3048 or 0.01 are held exactly instead of as binary
//! approximations. The exponent is kept as written: `"1.50"` stays `1.50`.
//! Addition, subtraction and multiplication are exact; only a quotient that
//! does not terminate is rounded, through dashu-float (DBig), to at least
//! `WORK_PRECISION` significant digits.

use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

use dashu_float::DBig;
use dashu_int::IBig;
use serde::{Deserialize, Serialize, Serializer, Deserializer};
use thiserror::Error;

/// Error type for number operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NumberError {
    #[error("Invalid number format: {0}")]
    ParseError(String),

    #[error("Division by zero")]
    DivisionByZero,

    #[error("Overflow: result too large")]
    Overflow,
}

/// Minimum significant digits of a non-terminating quotient
const WORK_PRECISION: usize = 50;

/// Largest written exponent accepted by `from_str` (`1e4096`)
const MAX_EXPONENT: usize = 4096;

#[derive(Debug, Clone, Copy)]
enum Rounding {
    Trunc,
    Floor,
    Ceil,
    HalfEven,
}

/// Arbitrary precision decimal number: `significand * 10^exponent`
///
/// All operations return Results or new Numbers - never panic.
#[derive(Debug, Clone)]
pub struct Number {
    significand: IBig,
    exponent: isize,
}

fn pow10(n: usize) -> IBig {
    IBig::from(10u8).pow(n)
}

fn digit_count(n: &IBig) -> usize {
    n.to_string().trim_start_matches('-').len()
}

impl Number {
    // ========== Construction ==========

    /// Create from string representation
    /// Supports: "123", "3.14", "1.50", "3.", "1/3", "1.5e10", "-42"
    pub fn from_str(s: &str) -> Result<Self, NumberError> {
        let s = s.trim();

        // Handle rational format "a/b"
        if let Some((num, den)) = s.split_once('/') {
            let num = Self::parse_decimal(num.trim())?;
            let den = Self::parse_decimal(den.trim())?;
            return num.checked_div(&den);
        }

        Self::parse_decimal(s)
    }

    fn parse_decimal(s: &str) -> Result<Self, NumberError> {
        let invalid = || NumberError::ParseError(s.to_string());

        let (mantissa, exp) = match s.find(|c: char| c == 'e' || c == 'E') {
            Some(i) => (&s[..i], s[i + 1..].parse::<isize>().map_err(|_| invalid())?),
            None => (s, 0),
        };
        if exp.unsigned_abs() > MAX_EXPONENT {
            return Err(NumberError::Overflow);
        }

        let (negative, unsigned) = match mantissa.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, mantissa.strip_prefix('+').unwrap_or(mantissa)),
        };
        let (int_part, frac_part) = unsigned.split_once('.').unwrap_or((unsigned, ""));

        let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if int_part.len() + frac_part.len() == 0 || !all_digits(int_part) || !all_digits(frac_part) {
            return Err(invalid());
        }

        let digits: IBig = format!("{}{}", int_part, frac_part).parse().map_err(|_| invalid())?;
        Ok(Self {
            significand: if negative { -digits } else { digits },
            exponent: exp - frac_part.len() as isize,
        })
    }

    /// Create from i64
    pub fn from_i64(n: i64) -> Self {
        Self { significand: IBig::from(n), exponent: 0 }
    }

    pub fn zero() -> Self {
        Self::from_i64(0)
    }

    pub fn one() -> Self {
        Self::from_i64(1)
    }

    fn from_dbig(val: DBig) -> Self {
        let (significand, exponent) = val.into_repr().into_parts();
        Self { significand, exponent }
    }

    fn to_dbig(&self) -> DBig {
        DBig::from_parts(self.significand.clone(), self.exponent)
    }

    /// Coefficient of this value written with a lower (or equal) exponent
    fn rescaled(&self, exponent: isize) -> IBig {
        let shift = self.exponent.saturating_sub(exponent).max(0) as usize;
        &self.significand * pow10(shift)
    }

    /// Both coefficients over the smaller of the two exponents
    fn aligned(&self, other: &Self) -> (IBig, IBig, isize) {
        let exponent = self.exponent.min(other.exponent);
        (self.rescaled(exponent), other.rescaled(exponent), exponent)
    }

    // ========== Predicates ==========

    pub fn is_zero(&self) -> bool {
        self.significand == IBig::ZERO
    }

    fn is_negative(&self) -> bool {
        self.significand < IBig::ZERO
    }

    // ========== Basic Arithmetic ==========

    pub fn add(&self, other: &Self) -> Self {
        let (a, b, exponent) = self.aligned(other);
        Self { significand: a + b, exponent }
    }

    pub fn sub(&self, other: &Self) -> Self {
        let (a, b, exponent) = self.aligned(other);
        Self { significand: a - b, exponent }
    }

    pub fn mul(&self, other: &Self) -> Self {
        Self {
            significand: &self.significand * &other.significand,
            exponent: self.exponent + other.exponent,
        }
    }

    /// Safe division (returns Result, never panics)
    ///
    /// A terminating quotient is exact and carries the exponent
    /// `self.exponent - other.exponent` where it can (`3.00 / 2 == 1.50`).
    pub fn checked_div(&self, other: &Self) -> Result<Self, NumberError> {
        if other.is_zero() {
            return Err(NumberError::DivisionByZero);
        }

        // Enough digits for any terminating quotient of these operands
        let precision = WORK_PRECISION.max(digit_count(&self.significand) + 4 * digit_count(&other.significand));
        let quotient = self.to_dbig().with_precision(precision).value() / other.to_dbig();
        let quotient = Self::from_dbig(quotient);

        let ideal = self.exponent - other.exponent;
        if quotient.exponent > ideal && quotient.mul(other) == *self {
            return Ok(Self { significand: quotient.rescaled(ideal), exponent: ideal });
        }
        Ok(quotient)
    }

    /// Integer part of the quotient, truncated toward zero (`-7 // 2 == -3`)
    pub fn checked_div_trunc(&self, other: &Self) -> Result<Self, NumberError> {
        if other.is_zero() {
            return Err(NumberError::DivisionByZero);
        }
        let (a, b, _) = self.aligned(other);
        Ok(Self { significand: &a / &b, exponent: 0 })
    }

    /// Remainder carrying the sign of the dividend (`-7 % 2 == -1`)
    pub fn checked_rem_trunc(&self, other: &Self) -> Result<Self, NumberError> {
        if other.is_zero() {
            return Err(NumberError::DivisionByZero);
        }
        let (a, b, exponent) = self.aligned(other);
        Ok(Self { significand: &a % &b, exponent })
    }

    pub fn neg(&self) -> Self {
        Self { significand: -&self.significand, exponent: self.exponent }
    }

    pub fn abs(&self) -> Self {
        if self.is_negative() {
            self.neg()
        } else {
            self.clone()
        }
    }

    // ========== Rounding ==========

    /// Same value at `exponent`, dropped digits resolved by `rounding`
    fn quantize(&self, exponent: isize, rounding: Rounding) -> Self {
        if self.exponent >= exponent {
            return Self { significand: self.rescaled(exponent), exponent };
        }

        let divisor = pow10((exponent - self.exponent) as usize);
        let quotient = &self.significand / &divisor;
        let remainder = &self.significand % &divisor;

        let away_from_zero = match rounding {
            Rounding::Trunc => false,
            Rounding::Floor => remainder < IBig::ZERO,
            Rounding::Ceil => remainder > IBig::ZERO,
            Rounding::HalfEven => {
                let magnitude = if remainder < IBig::ZERO { -remainder } else { remainder };
                match (&magnitude * IBig::from(2u8)).cmp(&divisor) {
                    Ordering::Less => false,
                    Ordering::Greater => true,
                    Ordering::Equal => &quotient % IBig::from(2u8) != IBig::ZERO,
                }
            }
        };

        let significand = match (away_from_zero, self.is_negative()) {
            (false, _) => quotient,
            (true, true) => &quotient - IBig::ONE,
            (true, false) => &quotient + IBig::ONE,
        };
        Self { significand, exponent }
    }

    /// Floor - largest integer <= x
    pub fn floor(&self) -> Self {
        self.quantize(0, Rounding::Floor)
    }

    /// Ceiling - smallest integer >= x
    pub fn ceil(&self) -> Self {
        self.quantize(0, Rounding::Ceil)
    }

    /// Integer part, toward zero
    pub fn trunc(&self) -> Self {
        self.quantize(0, Rounding::Trunc)
    }

    /// Round to exactly `places` decimal places, ties to even
    pub fn round_dp(&self, places: u32) -> Self {
        self.quantize(-(places as isize), Rounding::HalfEven)
    }

    // ========== Coercion ==========

    /// Integer part as i64, truncated toward zero; None when out of range
    pub fn to_i64(&self) -> Option<i64> {
        // |value| >= 10^19 never fits
        if self.exponent > 18 && !self.is_zero() {
            return None;
        }
        self.trunc().significand.try_into().ok()
    }

    /// Convert to f64 (may lose precision)
    pub fn to_f64(&self) -> Option<f64> {
        let value: f64 = format!("{}e{}", self.significand, self.exponent).parse().ok()?;
        if value.is_finite() {
            Some(value)
        } else {
            None
        }
    }

    // ========== Display ==========

    /// Exact positional notation, never scientific
    pub fn to_plain_string(&self) -> String {
        if self.is_zero() && self.exponent >= 0 {
            return "0".to_string();
        }

        let negative = self.is_negative();
        let digits = if negative { (-&self.significand).to_string() } else { self.significand.to_string() };

        let body = if self.exponent >= 0 {
            format!("{}{}", digits, "0".repeat(self.exponent as usize))
        } else {
            let shift = self.exponent.unsigned_abs();
            if digits.len() > shift {
                let (int_part, frac_part) = digits.split_at(digits.len() - shift);
                format!("{}.{}", int_part, frac_part)
            } else {
                format!("0.{}{}", "0".repeat(shift - digits.len()), digits)
            }
        };

        if negative {
            format!("-{}", body)
        } else {
            body
        }
    }

    /// Coefficient and exponent with trailing zeros removed
    fn normalized(&self) -> (IBig, isize) {
        if self.is_zero() {
            return (IBig::ZERO, 0);
        }
        let ten = IBig::from(10u8);
        let mut significand = self.significand.clone();
        let mut exponent = self.exponent;
        while &significand % &ten == IBig::ZERO {
            significand = &significand / &ten;
            exponent += 1;
        }
        (significand, exponent)
    }
}

// ========== Trait Implementations ==========

impl std::str::FromStr for Number {
    type Err = NumberError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Number::from_str(s)
    }
}

impl From<i64> for Number {
    fn from(n: i64) -> Self {
        Number::from_i64(n)
    }
}

impl std::fmt::Display for Number {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_plain_string())
    }
}

impl Serialize for Number {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_plain_string())
    }
}

impl<'de> Deserialize<'de> for Number {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_str(&s).map_err(serde::de::Error::custom)
    }
}

/// Numeric equality: `1.50 == 1.5`
impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Number {}

impl Hash for Number {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let (significand, exponent) = self.normalized();
        significand.to_string().hash(state);
        exponent.hash(state);
    }
}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Number {
    fn cmp(&self, other: &Self) -> Ordering {
        let (a, b, _) = self.aligned(other);
        a.cmp(&b)
    }
}
