//! # Allocation Options
//!
//! Everything the engine needs besides the lines themselves.
//!
//! The struct doubles as the `[allocation]` table of the CLI config file,
//! so every field has a serde default.
//!
//! ```toml
//! [allocation]
//! rounding_precision = 2
//! currency_multiplier = "0.0432"
//! delivery_amount = "150"
//! default_discount_rate = "0"
//! delivery_weighting = "by_price_share"
//! rounding_mode = "half_even"
//! ```

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{ValidationError, ValidationResult};
use crate::money::RoundingMode;
use crate::validation::{
    validate_currency_multiplier, validate_discount_rate, validate_rounding_precision,
};
use crate::DEFAULT_ROUNDING_PRECISION;

// =============================================================================
// Delivery Weighting
// =============================================================================

/// Which per-tag totals weight the delivery split.
///
/// ## Mode Comparison
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                     Delivery Weighting                                  │
/// │                                                                         │
/// │  BY UNIT SHARE (Default)                                               │
/// │  ───────────────────────                                               │
/// │  • Weight = items each tag took (2 beers + 1/2 pizza = 5/2)            │
/// │  • Exact rationals, nothing rounded                                    │
/// │  • Fair when shipping cost follows item count                          │
/// │                                                                         │
/// │  BY PRICE SHARE                                                        │
/// │  ──────────────                                                        │
/// │  • Weight = money each tag spent, rounded to whole currency units      │
/// │  • Sub-unit rounding noise from the line splits is dropped             │
/// │  • Fair when shipping cost follows order value                         │
/// │  • A tag that spent less than half a unit gets no delivery share       │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryWeighting {
    /// Weight by accumulated `tag_share × qty`.
    #[default]
    ByUnitShare,

    /// Weight by accumulated split price, in whole currency units.
    ByPriceShare,
}

impl fmt::Display for DeliveryWeighting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeliveryWeighting::ByUnitShare => write!(f, "by-unit-share"),
            DeliveryWeighting::ByPriceShare => write!(f, "by-price-share"),
        }
    }
}

impl FromStr for DeliveryWeighting {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "by-unit-share" | "unit" | "units" | "qty" => Ok(DeliveryWeighting::ByUnitShare),
            "by-price-share" | "price" | "prices" => Ok(DeliveryWeighting::ByPriceShare),
            other => Err(ValidationError::InvalidFormat {
                field: "delivery_weighting".to_string(),
                reason: format!(
                    "unknown weighting '{}'. Valid options: by-unit-share, by-price-share",
                    other
                ),
            }),
        }
    }
}

// =============================================================================
// Allocation Options
// =============================================================================

/// Options for one allocation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AllocationOptions {
    /// Decimal places of every split price.
    pub rounding_precision: u32,

    /// Factor applied to every amount (static currency conversion).
    pub currency_multiplier: Decimal,

    /// Delivery charge in the table's currency; zero means no delivery line.
    pub delivery_amount: Decimal,

    /// Discount rate for lines without their own `discount`.
    pub default_discount_rate: Decimal,

    /// How the delivery charge is weighted across tags.
    pub delivery_weighting: DeliveryWeighting,

    /// How half-way values round.
    pub rounding_mode: RoundingMode,
}

impl Default for AllocationOptions {
    fn default() -> Self {
        AllocationOptions {
            rounding_precision: DEFAULT_ROUNDING_PRECISION,
            currency_multiplier: Decimal::ONE,
            delivery_amount: Decimal::ZERO,
            default_discount_rate: Decimal::ZERO,
            delivery_weighting: DeliveryWeighting::default(),
            rounding_mode: RoundingMode::default(),
        }
    }
}

impl AllocationOptions {
    /// Sets the rounding precision.
    pub fn with_rounding_precision(mut self, precision: u32) -> Self {
        self.rounding_precision = precision;
        self
    }

    /// Sets the currency multiplier.
    pub fn with_currency_multiplier(mut self, multiplier: Decimal) -> Self {
        self.currency_multiplier = multiplier;
        self
    }

    /// Sets the delivery charge.
    pub fn with_delivery(mut self, amount: Decimal) -> Self {
        self.delivery_amount = amount;
        self
    }

    /// Sets the default discount rate.
    pub fn with_default_discount(mut self, rate: Decimal) -> Self {
        self.default_discount_rate = rate;
        self
    }

    /// Sets the delivery weighting.
    pub fn with_delivery_weighting(mut self, weighting: DeliveryWeighting) -> Self {
        self.delivery_weighting = weighting;
        self
    }

    /// Sets the rounding mode.
    pub fn with_rounding_mode(mut self, mode: RoundingMode) -> Self {
        self.rounding_mode = mode;
        self
    }

    /// Returns true if a delivery line will be added.
    pub fn has_delivery(&self) -> bool {
        !self.delivery_amount.is_zero()
    }

    /// Validates the options.
    pub fn validate(&self) -> ValidationResult<()> {
        validate_rounding_precision(self.rounding_precision)?;
        validate_currency_multiplier(self.currency_multiplier)?;
        validate_discount_rate("default_discount_rate", self.default_discount_rate)?;
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_defaults() {
        let options = AllocationOptions::default();
        assert_eq!(options.rounding_precision, 2);
        assert_eq!(options.currency_multiplier, dec!(1));
        assert!(!options.has_delivery());
        assert_eq!(options.delivery_weighting, DeliveryWeighting::ByUnitShare);
        assert_eq!(options.rounding_mode, RoundingMode::HalfEven);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_validation() {
        let options = AllocationOptions::default().with_default_discount(dec!(1));
        assert!(options.validate().is_err());

        let options = AllocationOptions::default().with_currency_multiplier(dec!(0));
        assert!(options.validate().is_err());

        let options = AllocationOptions::default().with_rounding_precision(40);
        assert!(options.validate().is_err());

        let options = AllocationOptions::default().with_delivery(dec!(-5));
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_weighting_parsing() {
        assert_eq!(
            "by-price-share".parse::<DeliveryWeighting>().unwrap(),
            DeliveryWeighting::ByPriceShare
        );
        assert_eq!(
            "BY_UNIT_SHARE".parse::<DeliveryWeighting>().unwrap(),
            DeliveryWeighting::ByUnitShare
        );
        assert_eq!("price".parse::<DeliveryWeighting>().unwrap(), DeliveryWeighting::ByPriceShare);
        assert!("weight".parse::<DeliveryWeighting>().is_err());
    }

    #[test]
    fn test_partial_deserialization_uses_defaults() {
        let options: AllocationOptions =
            serde_json::from_str(r#"{"delivery_amount": "3.00", "delivery_weighting": "by_price_share"}"#)
                .unwrap();
        assert_eq!(options.delivery_amount, dec!(3.00));
        assert_eq!(options.delivery_weighting, DeliveryWeighting::ByPriceShare);
        assert_eq!(options.rounding_precision, 2);
        assert_eq!(options.currency_multiplier, dec!(1));
    }
}
