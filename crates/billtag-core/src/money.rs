//! # Money Module
//!
//! Parsing, exact conversion and rounding of monetary amounts.
//!
//! ## Two Number Types, One Rounding Point
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE SPLIT PROBLEM                                                      │
//! │                                                                         │
//! │  Floating point:                                                        │
//! │    10.00 × (1/3) = 3.3333333333333335  ❌ noise compounds per split    │
//! │                                                                         │
//! │  OUR SOLUTION:                                                          │
//! │    Decimal      - every amount read from the table (exact, base 10)    │
//! │    BigRational  - every share (1/3 stays 1/3)                          │
//! │                                                                         │
//! │    split = round(share × price)   ← the ONLY lossy step               │
//! │                                                                         │
//! │  10.00 split three ways: 3.33 + 3.33 + 3.33 = 9.99                     │
//! │  We KNOW we lost 0.01 and report it as the rounding remainder          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use billtag_core::money::{parse_amount, round_to_decimal, to_rational, RoundingMode};
//! use num_rational::BigRational;
//!
//! let price = parse_amount("€ 10,00").unwrap();
//! let third = BigRational::new(1.into(), 3.into());
//! let split = round_to_decimal(&(to_rational(price) * third), 2, RoundingMode::HalfEven).unwrap();
//! assert_eq!(split.to_string(), "3.33");
//! ```

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, ToPrimitive, Zero};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

// =============================================================================
// Rounding Mode
// =============================================================================

/// How half-way values are rounded when a share is turned into money.
///
/// ## Comparison
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────┐
/// │  value    HalfEven (default)    HalfAwayFromZero                    │
/// │  ─────    ──────────────────    ────────────────                    │
/// │  0.125    0.12                  0.13                                │
/// │  0.135    0.14                  0.14                                │
/// │  -0.125   -0.12                 -0.13                               │
/// │                                                                     │
/// │  HalfEven alternates direction on ties, so across many entries     │
/// │  the rounding remainder does not drift one way.                     │
/// └─────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundingMode {
    /// Bankers rounding: ties go to the even neighbour.
    #[default]
    HalfEven,

    /// Commercial rounding: ties go away from zero.
    HalfAwayFromZero,
}

impl fmt::Display for RoundingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoundingMode::HalfEven => write!(f, "half-even"),
            RoundingMode::HalfAwayFromZero => write!(f, "half-away-from-zero"),
        }
    }
}

impl FromStr for RoundingMode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "half-even" | "bankers" | "even" => Ok(RoundingMode::HalfEven),
            "half-away-from-zero" | "half-up" | "commercial" => {
                Ok(RoundingMode::HalfAwayFromZero)
            }
            other => Err(ValidationError::InvalidFormat {
                field: "rounding_mode".to_string(),
                reason: format!(
                    "unknown mode '{}'. Valid options: half-even, half-away-from-zero",
                    other
                ),
            }),
        }
    }
}

// =============================================================================
// Parsing
// =============================================================================

/// Parses a monetary string the way people type them into spreadsheets.
///
/// ## Rules
/// - Everything except digits, `.`, `,` and `-` is dropped (`€`, `$`, spaces)
/// - With both `.` and `,` present, the LAST one is the decimal separator
/// - With one kind repeated (`1.234.567`), it is a thousands separator
/// - A single `,` or `.` is the decimal separator (`12,50` = 12.50)
///
/// Returns `None` when nothing numeric is left.
///
/// ## Example
/// ```rust
/// use billtag_core::money::parse_amount;
/// use rust_decimal::Decimal;
///
/// assert_eq!(parse_amount("12,50"), Some(Decimal::new(1250, 2)));
/// assert_eq!(parse_amount("$1,234.50"), Some(Decimal::new(123450, 2)));
/// assert_eq!(parse_amount("1.234,50 €"), Some(Decimal::new(123450, 2)));
/// assert_eq!(parse_amount("n/a"), None);
/// ```
pub fn parse_amount(raw: &str) -> Option<Decimal> {
    let kept: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, '.' | ',' | '-'))
        .collect();

    let normalized = match kept.rfind(['.', ',']) {
        None => kept,
        Some(pos) => {
            let separator = if kept[pos..].starts_with('.') { '.' } else { ',' };
            let other = if separator == '.' { ',' } else { '.' };
            let grouping_only = !kept.contains(other) && kept.matches(separator).count() > 1;

            if grouping_only {
                kept.replace(separator, "")
            } else {
                kept.char_indices()
                    .filter_map(|(i, c)| match c {
                        '.' | ',' if i == pos => Some('.'),
                        '.' | ',' => None,
                        _ => Some(c),
                    })
                    .collect()
            }
        }
    };

    Decimal::from_str(&normalized).ok()
}

/// Parses a discount rate.
///
/// Plain values are fractions (`0.15`); a `%` suffix means percent (`15%`).
///
/// ## Example
/// ```rust
/// use billtag_core::money::parse_rate;
/// use rust_decimal::Decimal;
///
/// assert_eq!(parse_rate("0,15"), Some(Decimal::new(15, 2)));
/// assert_eq!(parse_rate("15%"), Some(Decimal::new(15, 2)));
/// ```
pub fn parse_rate(raw: &str) -> Option<Decimal> {
    let value = parse_amount(raw)?;
    if raw.contains('%') {
        value.checked_div(Decimal::ONE_HUNDRED).map(|v| v.normalize())
    } else {
        Some(value)
    }
}

// =============================================================================
// Exact Conversion
// =============================================================================

/// Converts a decimal into an exact rational (`12.34` → `1234/100`).
pub fn to_rational(value: Decimal) -> BigRational {
    BigRational::new(
        BigInt::from(value.mantissa()),
        pow10(value.scale()),
    )
}

/// Rounds a rational to `dp` decimal places.
///
/// Returns `None` if the result does not fit a `Decimal` (more than 28
/// places or a mantissa beyond 96 bits).
///
/// ## Example
/// ```rust
/// use billtag_core::money::{round_to_decimal, RoundingMode};
/// use num_rational::BigRational;
///
/// let value = BigRational::new(1.into(), 8.into()); // 0.125
/// assert_eq!(round_to_decimal(&value, 2, RoundingMode::HalfEven).unwrap().to_string(), "0.12");
/// assert_eq!(round_to_decimal(&value, 2, RoundingMode::HalfAwayFromZero).unwrap().to_string(), "0.13");
/// ```
pub fn round_to_decimal(value: &BigRational, dp: u32, mode: RoundingMode) -> Option<Decimal> {
    let scaled = value * BigRational::from_integer(pow10(dp));
    let mantissa = round_to_integer(&scaled, mode).to_i128()?;
    Decimal::try_from_i128_with_scale(mantissa, dp).ok()
}

/// Rounds a rational to the nearest integer using `mode`.
pub fn round_to_integer(value: &BigRational, mode: RoundingMode) -> BigInt {
    match mode {
        // Ratio::round already breaks ties away from zero
        RoundingMode::HalfAwayFromZero => value.round().to_integer(),
        RoundingMode::HalfEven => {
            let floor = value.floor().to_integer();
            let fraction = value - BigRational::from_integer(floor.clone());
            let half = BigRational::new(BigInt::one(), BigInt::from(2u8));

            match fraction.cmp(&half) {
                Ordering::Less => floor,
                Ordering::Greater => floor + 1,
                Ordering::Equal if (&floor % BigInt::from(2u8)).is_zero() => floor,
                Ordering::Equal => floor + 1,
            }
        }
    }
}

/// Sums rationals exactly.
pub fn sum_rationals<'a, I>(values: I) -> BigRational
where
    I: IntoIterator<Item = &'a BigRational>,
{
    values
        .into_iter()
        .fold(BigRational::zero(), |acc, value| acc + value)
}

fn pow10(exp: u32) -> BigInt {
    BigInt::from(10u8).pow(exp)
}

// =============================================================================
// Unit Tests
// =============================================================================
