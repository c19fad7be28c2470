//! # Line Items
//!
//! From a raw table row to a typed, validated line.
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  RawLine (from billtag-io reader)                                      │
//! │  { "qty": "3", "name": "Beer", "tags": "AAB", "unit": "4,00" }         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  LineItem::from_raw ← THIS MODULE                                      │
//! │       ├── qty      "3"    → 3              (InvalidQuantity)           │
//! │       ├── price    "4,00" → Unit(4.00)     (MissingPriceField,         │
//! │       │                                     InvalidAmount)             │
//! │       ├── discount absent → None           (InvalidDiscount)           │
//! │       ├── name     "Beer"                  (MissingField)              │
//! │       └── tags     "AAB"  → {A:2, B:1}                                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  LineItem (immutable) → engine                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Blank fields count as absent: a table with both `total` and `unit`
//! columns fills in one and leaves the other empty.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{AllocationError, AllocationResult};
use crate::money::{parse_amount, parse_rate};
use crate::tags::TagMultiset;
use crate::validation::{validate_discount_rate, validate_quantity};

// =============================================================================
// Field Names
// =============================================================================

/// Quantity column.
pub const FIELD_QTY: &str = "qty";
/// Display name column.
pub const FIELD_NAME: &str = "name";
/// Tag characters column.
pub const FIELD_TAGS: &str = "tags";
/// Net line price column.
pub const FIELD_TOTAL: &str = "total";
/// Unit price column.
pub const FIELD_UNIT: &str = "unit";
/// Discount rate column.
pub const FIELD_DISCOUNT: &str = "discount";

// =============================================================================
// Raw Line
// =============================================================================

/// One table row as read: field name → raw string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawLine {
    /// 1-based line number in the source table.
    pub number: usize,

    /// Field values keyed by header name.
    pub fields: BTreeMap<String, String>,
}

impl RawLine {
    /// Creates an empty row for source line `number`.
    pub fn new(number: usize) -> Self {
        RawLine {
            number,
            fields: BTreeMap::new(),
        }
    }

    /// Builder-style field setter.
    ///
    /// ## Example
    /// ```rust
    /// use billtag_core::line::RawLine;
    ///
    /// let line = RawLine::new(2)
    ///     .with_field("qty", "2")
    ///     .with_field("name", "Pizza");
    /// assert_eq!(line.value("name"), Some("Pizza"));
    /// ```
    pub fn with_field(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(field.into(), value.into());
        self
    }

    /// Returns the trimmed value of `field`, or `None` if absent or blank.
    pub fn value(&self, field: &str) -> Option<&str> {
        self.fields
            .get(field)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }
}

// =============================================================================
// Price Field
// =============================================================================

/// Which price column a line used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceField {
    /// Net price for the whole line, before discount.
    Total(Decimal),

    /// Price of one unit; the line price is `unit × qty`.
    Unit(Decimal),
}

impl PriceField {
    /// Line price before discount and currency conversion.
    pub fn line_price(&self, qty: i64) -> Option<Decimal> {
        match self {
            PriceField::Total(total) => Some(*total),
            PriceField::Unit(unit) => unit.checked_mul(Decimal::from(qty)),
        }
    }
}

// =============================================================================
// Line Item
// =============================================================================

/// A parsed, validated line of the bill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// Source line number (for error messages and entry provenance).
    pub number: usize,

    /// Positive quantity.
    pub qty: i64,

    /// Display label.
    pub name: String,

    /// Tag multiset; may be empty here, the engine rejects that.
    pub tags: TagMultiset,

    /// Price as given.
    pub price: PriceField,

    /// Own discount rate in [0, 1), if the line has one.
    pub discount: Option<Decimal>,
}

impl LineItem {
    /// Parses and validates a raw row.
    ///
    /// Checks run in a fixed order (qty, price, discount, name) and the
    /// first failure is returned.
    pub fn from_raw(raw: &RawLine) -> AllocationResult<Self> {
        let line = raw.number;

        let qty_raw = raw.value(FIELD_QTY).unwrap_or_default();
        let qty: i64 = qty_raw
            .parse()
            .map_err(|_| AllocationError::InvalidQuantity {
                line,
                value: qty_raw.to_string(),
                reason: "not an integer".to_string(),
            })?;
        validate_quantity(qty).map_err(|e| AllocationError::InvalidQuantity {
            line,
            value: qty_raw.to_string(),
            reason: e.to_string(),
        })?;

        let price = if let Some(total) = raw.value(FIELD_TOTAL) {
            PriceField::Total(parse_field(line, FIELD_TOTAL, total)?)
        } else if let Some(unit) = raw.value(FIELD_UNIT) {
            PriceField::Unit(parse_field(line, FIELD_UNIT, unit)?)
        } else {
            return Err(AllocationError::MissingPriceField { line });
        };

        let discount = match raw.value(FIELD_DISCOUNT) {
            Some(value) => {
                let rate = parse_rate(value).ok_or_else(|| AllocationError::InvalidAmount {
                    line,
                    field: FIELD_DISCOUNT.to_string(),
                    value: value.to_string(),
                })?;
                validate_discount_rate(FIELD_DISCOUNT, rate)
                    .map_err(|_| AllocationError::InvalidDiscount { line, rate })?;
                Some(rate)
            }
            None => None,
        };

        let name = raw
            .value(FIELD_NAME)
            .ok_or_else(|| AllocationError::MissingField {
                line,
                field: FIELD_NAME.to_string(),
            })?
            .to_string();

        let tags = TagMultiset::parse(raw.value(FIELD_TAGS).unwrap_or_default());

        Ok(LineItem {
            number: line,
            qty,
            name,
            tags,
            price,
            discount,
        })
    }
}

fn parse_field(line: usize, field: &str, value: &str) -> AllocationResult<Decimal> {
    parse_amount(value).ok_or_else(|| AllocationError::InvalidAmount {
        line,
        field: field.to_string(),
        value: value.to_string(),
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tags::Tag;
    use rust_decimal_macros::dec;

    fn pizza() -> RawLine {
        RawLine::new(2)
            .with_field("qty", "2")
            .with_field("name", "Pizza")
            .with_field("tags", "AB")
            .with_field("total", "10.00")
    }

    #[test]
    fn test_parse_total_line() {
        let item = LineItem::from_raw(&pizza()).unwrap();
        assert_eq!(item.number, 2);
        assert_eq!(item.qty, 2);
        assert_eq!(item.name, "Pizza");
        assert_eq!(item.price, PriceField::Total(dec!(10.00)));
        assert_eq!(item.tags.count(Tag::new('A')), 1);
        assert_eq!(item.discount, None);
    }

    #[test]
    fn test_total_wins_over_unit() {
        let raw = pizza().with_field("unit", "99");
        let item = LineItem::from_raw(&raw).unwrap();
        assert_eq!(item.price, PriceField::Total(dec!(10.00)));
    }

    #[test]
    fn test_blank_total_falls_back_to_unit() {
        let raw = pizza().with_field("total", "  ").with_field("unit", "4,00");
        let item = LineItem::from_raw(&raw).unwrap();
        assert_eq!(item.price, PriceField::Unit(dec!(4.00)));
        assert_eq!(item.price.line_price(item.qty), Some(dec!(8.00)));
    }

    #[test]
    fn test_missing_price() {
        let mut raw = pizza();
        raw.fields.remove("total");
        let err = LineItem::from_raw(&raw).unwrap_err();
        assert!(matches!(err, AllocationError::MissingPriceField { line: 2 }));
    }

    #[test]
    fn test_invalid_quantity() {
        for qty in ["", "two", "2.5", "0", "-1"] {
            let raw = pizza().with_field("qty", qty);
            let err = LineItem::from_raw(&raw).unwrap_err();
            assert!(
                matches!(err, AllocationError::InvalidQuantity { line: 2, .. }),
                "qty {qty:?} gave {err:?}"
            );
        }
    }

    #[test]
    fn test_quantity_checked_before_price() {
        let mut raw = pizza().with_field("qty", "x");
        raw.fields.remove("total");
        let err = LineItem::from_raw(&raw).unwrap_err();
        assert!(matches!(err, AllocationError::InvalidQuantity { .. }));
    }

    #[test]
    fn test_invalid_amount() {
        let raw = pizza().with_field("total", "ten");
        let err = LineItem::from_raw(&raw).unwrap_err();
        assert!(matches!(
            err,
            AllocationError::InvalidAmount { ref field, .. } if field == "total"
        ));
    }

    #[test]
    fn test_discount_forms() {
        let item = LineItem::from_raw(&pizza().with_field("discount", "0.1")).unwrap();
        assert_eq!(item.discount, Some(dec!(0.1)));

        let item = LineItem::from_raw(&pizza().with_field("discount", "25%")).unwrap();
        assert_eq!(item.discount, Some(dec!(0.25)));

        let item = LineItem::from_raw(&pizza().with_field("discount", "")).unwrap();
        assert_eq!(item.discount, None);
    }

    #[test]
    fn test_discount_out_of_range() {
        for rate in ["1", "15", "-0.1"] {
            let err = LineItem::from_raw(&pizza().with_field("discount", rate)).unwrap_err();
            assert!(matches!(err, AllocationError::InvalidDiscount { line: 2, .. }));
        }
    }

    #[test]
    fn test_missing_name() {
        let mut raw = pizza();
        raw.fields.remove("name");
        let err = LineItem::from_raw(&raw).unwrap_err();
        assert!(matches!(err, AllocationError::MissingField { ref field, .. } if field == "name"));
    }

    #[test]
    fn test_missing_tags_parse_as_empty() {
        let mut raw = pizza();
        raw.fields.remove("tags");
        let item = LineItem::from_raw(&raw).unwrap();
        assert!(item.tags.is_empty());
    }
}
