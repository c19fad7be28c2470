//! # Validation Module
//!
//! Range checks for line fields and allocation options.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: CLI / config file                                            │
//! │  ├── Type parsing (clap, serde)                                        │
//! │  └── AllocationOptions::validate() → THIS MODULE                       │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Line parsing (LineItem::from_raw)                            │
//! │  ├── qty, discount → THIS MODULE                                       │
//! │  └── Errors carry the source line number                               │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Engine                                                       │
//! │  └── Zero-price lines, untagged lines, empty delivery weights          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use rust_decimal::Decimal;

use crate::error::{ValidationError, ValidationResult};
use crate::MAX_ROUNDING_PRECISION;

// =============================================================================
// Line Validators
// =============================================================================

/// Validates a line quantity.
///
/// ## Rules
/// - Must be positive (> 0)
///
/// ## Example
/// ```rust
/// use billtag_core::validation::validate_quantity;
///
/// assert!(validate_quantity(3).is_ok());
/// assert!(validate_quantity(0).is_err());
/// assert!(validate_quantity(-2).is_err());
/// ```
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "qty".to_string(),
        });
    }

    Ok(())
}

/// Validates a discount rate.
///
/// ## Rules
/// - Must be in [0, 1): `0` is no discount, `1` would make the line free
pub fn validate_discount_rate(field: &str, rate: Decimal) -> ValidationResult<()> {
    if rate < Decimal::ZERO || rate >= Decimal::ONE {
        return Err(ValidationError::RateOutOfRange {
            field: field.to_string(),
            value: rate,
        });
    }

    Ok(())
}

// =============================================================================
// Option Validators
// =============================================================================

/// Validates the number of decimal places used for rounding.
///
/// ## Rules
/// - At most 28 (the scale limit of `Decimal`)
pub fn validate_rounding_precision(precision: u32) -> ValidationResult<()> {
    if precision > MAX_ROUNDING_PRECISION {
        return Err(ValidationError::OutOfRange {
            field: "rounding_precision".to_string(),
            min: 0,
            max: MAX_ROUNDING_PRECISION as i64,
        });
    }

    Ok(())
}

/// Validates the currency multiplier.
///
/// ## Rules
/// - Must be positive: a zero multiplier would zero every line
pub fn validate_currency_multiplier(multiplier: Decimal) -> ValidationResult<()> {
    if multiplier <= Decimal::ZERO {
        return Err(ValidationError::MustBePositive {
            field: "currency_multiplier".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
