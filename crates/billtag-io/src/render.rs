//! # Itemization Renderer
//!
//! Turns an [`Allocation`] into the per-tag listing printed by the CLI,
//! or into a JSON report.
//!
//! ## Text Layout
//! ```text
//! A: 1.500 items, total split price 11.00
//! =======================================
//! * Delivery |    1/2 |   1.00
//! Pizza      |      1 |   5.00
//! ...
//!
//! Total price: 21.00
//! Rounding remainder: 0.01        ← only when nonzero
//! ```

use billtag_core::money::round_to_decimal;
use billtag_core::{Allocation, AllocationEntry, RoundingMode, TagBucket};
use num_rational::BigRational;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;

use crate::error::IoResult;

/// Decimal places used for a tag's item count in the header.
pub const QTY_DISPLAY_PRECISION: u32 = 3;

// =============================================================================
// Text
// =============================================================================

/// Renders the itemization as plain text.
///
/// Money in headers and totals is shown with `precision` decimal places.
pub fn render_text(allocation: &Allocation, precision: u32) -> String {
    let mut out = String::new();

    for (tag, bucket) in allocation.ledger.iter() {
        let header = format!(
            "{tag}: {} items, total split price {}",
            display_qty(&bucket.split_qty()),
            at_precision(bucket.split_price(), precision),
        );
        out.push_str(&header);
        out.push('\n');
        out.push_str(&"=".repeat(header.chars().count()));
        out.push('\n');

        render_rows(&mut out, bucket);
        out.push('\n');
    }

    out.push_str(&format!(
        "Total price: {}\n",
        at_precision(allocation.total_split_price, precision)
    ));

    let remainder = allocation.rounding_remainder();
    if !remainder.is_zero() {
        out.push_str(&format!("Rounding remainder: {}\n", remainder.normalize()));
    }

    debug!(bytes = out.len(), "Rendered text itemization");
    out
}

fn render_rows(out: &mut String, bucket: &TagBucket) {
    let entries = bucket.entries_by_label();
    let width = entries
        .iter()
        .map(|e| e.label.chars().count())
        .max()
        .unwrap_or_default();

    for entry in entries {
        out.push_str(&format!(
            "{:<width$} | {:>6} | {:>6}\n",
            entry.label,
            entry.unit_share.to_string(),
            entry.split_price.to_string(),
        ));
    }
}

fn display_qty(qty: &BigRational) -> String {
    match round_to_decimal(qty, QTY_DISPLAY_PRECISION, RoundingMode::HalfEven) {
        Some(value) => value.to_string(),
        None => qty.to_string(),
    }
}

fn at_precision(mut value: Decimal, precision: u32) -> Decimal {
    value.rescale(precision);
    value
}

// =============================================================================
// JSON
// =============================================================================

#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    tags: Vec<JsonTag<'a>>,
    total_price: Decimal,
    total_split_price: Decimal,
    rounding_remainder: Decimal,
}

#[derive(Debug, Serialize)]
struct JsonTag<'a> {
    tag: String,
    split_qty: String,
    split_price: Decimal,
    entries: Vec<&'a AllocationEntry>,
}

/// Renders the allocation as a pretty-printed JSON report.
///
/// Decimals are strings; exact shares are `"n/d"` strings.
pub fn render_json(allocation: &Allocation) -> IoResult<String> {
    let report = JsonReport {
        tags: allocation
            .ledger
            .iter()
            .map(|(tag, bucket)| JsonTag {
                tag: tag.to_string(),
                split_qty: bucket.split_qty().to_string(),
                split_price: bucket.split_price(),
                entries: bucket.entries_by_label(),
            })
            .collect(),
        total_price: allocation.total_price,
        total_split_price: allocation.total_split_price,
        rounding_remainder: allocation.rounding_remainder(),
    };

    let json = serde_json::to_string_pretty(&report)?;
    debug!(bytes = json.len(), "Rendered JSON report");
    Ok(json)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use billtag_core::{allocate, AllocationOptions, RawLine};
    use rust_decimal_macros::dec;

    fn line(number: usize, qty: &str, name: &str, tags: &str, total: &str) -> RawLine {
        RawLine::new(number)
            .with_field("qty", qty)
            .with_field("name", name)
            .with_field("tags", tags)
            .with_field("total", total)
    }

    #[test]
    fn test_pizza_itemization() {
        let lines = vec![line(2, "2", "Pizza", "AB", "10.00")];
        let allocation = allocate(&lines, &AllocationOptions::default()).unwrap();

        let expected = "\
A: 1.000 items, total split price 5.00
======================================
Pizza |      1 |   5.00

B: 1.000 items, total split price 5.00
======================================
Pizza |      1 |   5.00

Total price: 10.00
";
        assert_eq!(render_text(&allocation, 2), expected);
    }

    #[test]
    fn test_rows_are_sorted_and_padded() {
        let lines = vec![
            line(2, "1", "Wine", "A", "12.00"),
            line(3, "1", "Bread", "A", "3"),
        ];
        let options = AllocationOptions::default().with_delivery(dec!(1.50));
        let allocation = allocate(&lines, &options).unwrap();
        let text = render_text(&allocation, 2);

        let rows: Vec<&str> = text.lines().skip(2).take(3).collect();
        assert_eq!(
            rows,
            vec![
                "* Delivery |      1 |   1.50",
                "Bread      |      1 |   3.00",
                "Wine       |      1 |  12.00",
            ]
        );
        assert!(text.starts_with("A: 3.000 items, total split price 16.50\n"));
        assert!(text.ends_with("Total price: 16.50\n"));
    }

    #[test]
    fn test_fractional_qty_and_remainder() {
        let lines = vec![line(2, "1", "Cake", "ABC", "10.00")];
        let allocation = allocate(&lines, &AllocationOptions::default()).unwrap();
        let text = render_text(&allocation, 2);

        assert!(text.contains("A: 0.333 items, total split price 3.33\n"));
        assert!(text.contains("Cake |    1/3 |   3.33\n"));
        assert!(text.contains("Total price: 9.99\n"));
        assert!(text.ends_with("Rounding remainder: 0.01\n"));
    }

    #[test]
    fn test_qty_keeps_three_places() {
        assert_eq!(display_qty(&BigRational::from_integer(2.into())), "2.000");
        assert_eq!(display_qty(&BigRational::new(3.into(), 2.into())), "1.500");
        assert_eq!(display_qty(&BigRational::new(8.into(), 3.into())), "2.667");
    }

    #[test]
    fn test_json_report() {
        let lines = vec![line(2, "3", "Beer", "AAB", "12.00")];
        let allocation = allocate(&lines, &AllocationOptions::default()).unwrap();
        let json: serde_json::Value = serde_json::from_str(&render_json(&allocation).unwrap()).unwrap();

        assert_eq!(json["tags"][0]["tag"], "A");
        assert_eq!(json["tags"][0]["split_qty"], "2");
        assert_eq!(json["tags"][0]["split_price"], "8.00");
        assert_eq!(json["tags"][0]["entries"][0]["tag_share"], "2/3");
        assert_eq!(json["tags"][1]["tag"], "B");
        assert_eq!(json["tags"][1]["split_price"], "4.00");
        assert_eq!(json["total_price"], "12.00");
        assert_eq!(json["rounding_remainder"], "0.00");
    }
}
