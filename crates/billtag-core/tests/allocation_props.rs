// Property tests for the allocation engine.
// Run with: cargo test -p billtag-core --test allocation_props

use std::collections::BTreeMap;

use billtag_core::money::sum_rationals;
use billtag_core::{allocate, AllocationOptions, DeliveryWeighting, RawLine, RoundingMode};
use num_rational::BigRational;
use num_traits::One;
use proptest::prelude::*;
use rust_decimal::Decimal;

fn line_strategy() -> impl Strategy<Value = (i64, i64, String)> {
    (1i64..20, 1i64..1_000_000, "[A-E]{1,7}")
}

fn to_lines(specs: &[(i64, i64, String)]) -> Vec<RawLine> {
    specs
        .iter()
        .enumerate()
        .map(|(i, (qty, cents, tags))| {
            RawLine::new(i + 2)
                .with_field("qty", qty.to_string())
                .with_field("name", format!("item {i}"))
                .with_field("tags", tags.clone())
                .with_field("total", Decimal::new(*cents, 2).to_string())
        })
        .collect()
}

/// Worst case drift: half a cent per entry.
fn drift_bound(entries: usize) -> Decimal {
    Decimal::new(5, 3) * Decimal::from(entries)
}

proptest! {
    // Every line's shares add up to exactly one, however the tags repeat.
    #[test]
    fn tag_shares_sum_to_one_per_line(specs in prop::collection::vec(line_strategy(), 1..12)) {
        let allocation = allocate(&to_lines(&specs), &AllocationOptions::default()).unwrap();

        let mut by_line: BTreeMap<usize, Vec<BigRational>> = BTreeMap::new();
        for entry in allocation.ledger.entries() {
            by_line.entry(entry.source.unwrap()).or_default().push(entry.tag_share.clone());
        }

        prop_assert_eq!(by_line.len(), specs.len());
        for shares in by_line.values() {
            prop_assert_eq!(sum_rationals(shares), BigRational::one());
        }
    }

    // Rounding drift never exceeds half a unit per entry, in either mode.
    #[test]
    fn rounding_drift_is_bounded(
        specs in prop::collection::vec(line_strategy(), 1..12),
        away in any::<bool>(),
    ) {
        let mode = if away { RoundingMode::HalfAwayFromZero } else { RoundingMode::HalfEven };
        let options = AllocationOptions::default().with_rounding_mode(mode);
        let allocation = allocate(&to_lines(&specs), &options).unwrap();

        let remainder = allocation.rounding_remainder().abs();
        prop_assert!(remainder <= drift_bound(allocation.entry_count()));
    }

    // A single-tag line keeps its full quantity and rounded price.
    #[test]
    fn single_tag_line_is_not_split(qty in 1i64..50, cents in 1i64..1_000_000, tag in "[A-Z]") {
        let specs = vec![(qty, cents, tag.repeat(3))];
        let allocation = allocate(&to_lines(&specs), &AllocationOptions::default()).unwrap();

        let entry = allocation.ledger.entries().next().unwrap();
        prop_assert_eq!(allocation.entry_count(), 1);
        prop_assert_eq!(&entry.unit_share, &BigRational::from_integer(qty.into()));
        prop_assert_eq!(entry.split_price, Decimal::new(cents, 2));
    }

    // Delivery shares sum to one and the rounded splits stay within drift of the converted charge.
    #[test]
    fn delivery_split_is_complete(
        specs in prop::collection::vec((1i64..20, 10_000i64..1_000_000, "[A-E]{1,7}"), 1..10),
        delivery_cents in 1i64..100_000,
        multiplier_cents in 10i64..10_000,
        by_price in any::<bool>(),
    ) {
        let weighting = if by_price { DeliveryWeighting::ByPriceShare } else { DeliveryWeighting::ByUnitShare };
        let delivery = Decimal::new(delivery_cents, 2);
        let multiplier = Decimal::new(multiplier_cents, 2);
        let options = AllocationOptions::default()
            .with_delivery(delivery)
            .with_currency_multiplier(multiplier)
            .with_delivery_weighting(weighting);
        let allocation = allocate(&to_lines(&specs), &options).unwrap();

        let deliveries: Vec<_> = allocation.ledger.entries().filter(|e| e.is_delivery()).collect();
        prop_assert!(!deliveries.is_empty());

        let shares = sum_rationals(deliveries.iter().map(|e| &e.tag_share));
        prop_assert_eq!(shares, BigRational::one());

        let split: Decimal = deliveries.iter().map(|e| e.split_price).sum();
        prop_assert!((split - delivery * multiplier).abs() <= drift_bound(deliveries.len()));
    }
}
