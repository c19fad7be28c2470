//! # Allocation Engine
//!
//! Splits a bill across tags.
//!
//! ## Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  for each RawLine, in input order:                                     │
//! │                                                                         │
//! │    LineItem::from_raw ─► net price ─► zero check ─► total_price +=     │
//! │                          │                                              │
//! │                          ├── total, or unit × qty                      │
//! │                          ├── × (1 − discount)   if discount > 0        │
//! │                          └── × currency_multiplier                     │
//! │                                                                         │
//! │    for each distinct tag (count c of total weight w):                  │
//! │        share       = c / w                         exact               │
//! │        unit_share  = share × qty                   exact               │
//! │        split_price = round(share × price)          ← only rounding     │
//! │                                                                         │
//! │  if delivery ≠ 0:                                                       │
//! │    weights ─► normalize ─► one "* Delivery" entry per weighted tag     │
//! │                                                                         │
//! │  total_split_price = Σ split_price                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//! ```rust
//! use billtag_core::{allocate, AllocationOptions, RawLine, Tag};
//!
//! let lines = vec![RawLine::new(2)
//!     .with_field("qty", "2")
//!     .with_field("name", "Pizza")
//!     .with_field("tags", "AB")
//!     .with_field("total", "10.00")];
//!
//! let allocation = allocate(&lines, &AllocationOptions::default()).unwrap();
//! let a = allocation.ledger.bucket(Tag::new('A')).unwrap();
//! assert_eq!(a.split_price().to_string(), "5.00");
//! assert_eq!(allocation.total_split_price.to_string(), "10.00");
//! ```

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::Zero;
use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::error::{AllocationError, AllocationResult};
use crate::ledger::{Allocation, AllocationEntry, TagLedger};
use crate::line::{LineItem, RawLine};
use crate::money::{round_to_decimal, round_to_integer, sum_rationals, to_rational, RoundingMode};
use crate::options::{AllocationOptions, DeliveryWeighting};
use crate::tags::Tag;
use crate::DELIVERY_LABEL;

// =============================================================================
// Entry Point
// =============================================================================

/// Allocates `lines` across their tags.
///
/// Stops at the first invalid line; there is no partial result.
pub fn allocate(lines: &[RawLine], options: &AllocationOptions) -> AllocationResult<Allocation> {
    options.validate()?;

    let mut allocator = Allocator::new(options);
    for raw in lines {
        let item = LineItem::from_raw(raw)?;
        allocator.add_line(&item)?;
    }

    if options.has_delivery() {
        allocator.add_delivery()?;
    }

    let allocation = allocator.finish();
    info!(
        lines = lines.len(),
        tags = allocation.ledger.len(),
        total_price = %allocation.total_price,
        total_split_price = %allocation.total_split_price,
        "Allocation complete"
    );
    Ok(allocation)
}

// =============================================================================
// Allocator
// =============================================================================

/// Single-pass accumulator behind [`allocate`].
///
/// Exposed for callers that parse lines themselves.
#[derive(Debug)]
pub struct Allocator<'a> {
    options: &'a AllocationOptions,
    ledger: TagLedger,
    total_price: Decimal,
}

impl<'a> Allocator<'a> {
    /// Creates an empty allocator. Options are assumed validated.
    pub fn new(options: &'a AllocationOptions) -> Self {
        Allocator {
            options,
            ledger: TagLedger::new(),
            total_price: Decimal::ZERO,
        }
    }

    /// Allocates one line to its tags.
    pub fn add_line(&mut self, item: &LineItem) -> AllocationResult<()> {
        let price = self.net_price(item)?;
        if price.is_zero() {
            return Err(AllocationError::ZeroPriceLine {
                line: item.number,
                name: item.name.clone(),
            });
        }
        if item.tags.is_empty() {
            return Err(AllocationError::UntaggedLine {
                line: item.number,
                name: item.name.clone(),
            });
        }

        self.total_price = checked_add(self.total_price, price, "total price")?;

        let exact_price = to_rational(price);
        let qty = BigRational::from_integer(BigInt::from(item.qty));

        for (tag, share) in item.tags.shares() {
            let split_price = self.round(&(&share * &exact_price), "split price")?;
            let unit_share = &share * &qty;

            debug!(
                line = item.number,
                name = %item.name,
                %tag,
                share = %share,
                %split_price,
                "Allocated line share"
            );

            self.ledger.record_line(
                tag,
                AllocationEntry {
                    source: Some(item.number),
                    label: item.name.clone(),
                    tag_share: share,
                    unit_share,
                    line_total_price: price,
                    split_price,
                },
            );
        }

        Ok(())
    }

    /// Splits the delivery charge across tags by the configured weighting.
    pub fn add_delivery(&mut self) -> AllocationResult<()> {
        let weights = self
            .options
            .delivery_weighting
            .weights(&self.ledger, self.options.rounding_mode);
        let shares = normalize(weights).ok_or(AllocationError::NoTagsForDelivery)?;

        let delivery = self
            .options
            .delivery_amount
            .checked_mul(self.options.currency_multiplier)
            .ok_or_else(|| overflow("delivery"))?;
        self.total_price = checked_add(self.total_price, delivery, "total price")?;

        let exact_delivery = to_rational(delivery);
        for (tag, share) in shares {
            let split_price = self.round(&(&share * &exact_delivery), "delivery split")?;

            debug!(%tag, share = %share, %split_price, "Allocated delivery share");

            self.ledger.record_delivery(
                tag,
                AllocationEntry {
                    source: None,
                    label: DELIVERY_LABEL.to_string(),
                    tag_share: share.clone(),
                    unit_share: share,
                    line_total_price: delivery,
                    split_price,
                },
            );
        }

        Ok(())
    }

    /// Finishes the run and sums the rounded splits.
    pub fn finish(self) -> Allocation {
        let total_split_price = self.ledger.entries().map(|e| e.split_price).sum();
        Allocation {
            ledger: self.ledger,
            total_price: self.total_price,
            total_split_price,
        }
    }

    /// Line price after discount and currency conversion, unrounded.
    fn net_price(&self, item: &LineItem) -> AllocationResult<Decimal> {
        let mut price = item
            .price
            .line_price(item.qty)
            .ok_or_else(|| overflow("line price"))?;

        let rate = item.discount.unwrap_or(self.options.default_discount_rate);
        if rate > Decimal::ZERO {
            price = price
                .checked_mul(Decimal::ONE - rate)
                .ok_or_else(|| overflow("discount"))?;
        }

        price
            .checked_mul(self.options.currency_multiplier)
            .ok_or_else(|| overflow("currency conversion"))
    }

    fn round(&self, value: &BigRational, context: &str) -> AllocationResult<Decimal> {
        round_to_decimal(
            value,
            self.options.rounding_precision,
            self.options.rounding_mode,
        )
        .ok_or_else(|| overflow(context))
    }
}

// =============================================================================
// Delivery Weighting
// =============================================================================

impl DeliveryWeighting {
    /// Per-tag weights for the delivery split, in tag order.
    ///
    /// Zero weights are kept; [`normalize`] drops them.
    pub fn weights(&self, ledger: &TagLedger, mode: RoundingMode) -> Vec<(Tag, BigRational)> {
        ledger
            .iter()
            .map(|(tag, bucket)| {
                let weight = match self {
                    DeliveryWeighting::ByUnitShare => bucket.unit_share_total().clone(),
                    DeliveryWeighting::ByPriceShare => BigRational::from_integer(
                        round_to_integer(&to_rational(bucket.price_share_total()), mode),
                    ),
                };
                (tag, weight)
            })
            .collect()
    }
}

/// Turns weights into shares of their sum, skipping zero weights.
///
/// Returns `None` when the weights sum to zero (nothing to split by).
pub fn normalize(weights: Vec<(Tag, BigRational)>) -> Option<Vec<(Tag, BigRational)>> {
    let share_total = sum_rationals(weights.iter().map(|(_, weight)| weight));
    if share_total.is_zero() {
        return None;
    }

    Some(
        weights
            .into_iter()
            .filter(|(_, weight)| !weight.is_zero())
            .map(|(tag, weight)| (tag, weight / &share_total))
            .collect(),
    )
}

fn checked_add(a: Decimal, b: Decimal, context: &str) -> AllocationResult<Decimal> {
    a.checked_add(b).ok_or_else(|| overflow(context))
}

fn overflow(context: &str) -> AllocationError {
    AllocationError::AmountOverflow {
        context: context.to_string(),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
