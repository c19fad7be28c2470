//! # Tag Ledger
//!
//! The engine's output: per-tag allocation entries plus exact totals.
//!
//! ## Structure
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          TagLedger                                      │
//! │                                                                         │
//! │  'A' ──► TagBucket                                                     │
//! │          ├── entries: [Pizza 1 × 5.00, Beer 2 × 8.00, * Delivery 2.00] │
//! │          ├── unit_share_total:  3      (exact, lines only)             │
//! │          └── price_share_total: 13.00  (rounded splits, lines only)    │
//! │                                                                         │
//! │  'B' ──► TagBucket                                                     │
//! │          └── ...                                                        │
//! │                                                                         │
//! │  Allocation                                                            │
//! │  ├── ledger                                                            │
//! │  ├── total_price        Σ exact line prices + delivery                 │
//! │  └── total_split_price  Σ rounded split prices                         │
//! │                                                                         │
//! │  rounding_remainder = total_price − total_split_price                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Built in one pass by the engine, read-only afterwards.

use std::collections::BTreeMap;

use num_rational::BigRational;
use num_traits::Zero;
use rust_decimal::Decimal;
use serde::{Serialize, Serializer};

use crate::money::sum_rationals;
use crate::tags::Tag;

// =============================================================================
// Allocation Entry
// =============================================================================

/// One tag's part of one line (or of the delivery charge).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AllocationEntry {
    /// Source line number; `None` for the synthetic delivery entry.
    pub source: Option<usize>,

    /// Label to display.
    pub label: String,

    /// Exact fraction of the line attributed to this tag.
    #[serde(serialize_with = "serialize_ratio")]
    pub tag_share: BigRational,

    /// Exact quantity attributed to this tag (`tag_share × qty`).
    #[serde(serialize_with = "serialize_ratio")]
    pub unit_share: BigRational,

    /// Line price after discount and currency conversion (unrounded).
    pub line_total_price: Decimal,

    /// This tag's price, rounded to the configured precision.
    pub split_price: Decimal,
}

impl AllocationEntry {
    /// True for the synthetic delivery entry.
    pub fn is_delivery(&self) -> bool {
        self.source.is_none()
    }
}

fn serialize_ratio<S: Serializer>(value: &BigRational, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(value)
}

// =============================================================================
// Tag Bucket
// =============================================================================

/// Everything allocated to one tag.
#[derive(Debug, Clone, PartialEq)]
pub struct TagBucket {
    entries: Vec<AllocationEntry>,
    unit_share_total: BigRational,
    price_share_total: Decimal,
}

impl Default for TagBucket {
    fn default() -> Self {
        TagBucket {
            entries: Vec::new(),
            unit_share_total: BigRational::zero(),
            price_share_total: Decimal::ZERO,
        }
    }
}

impl TagBucket {
    /// Entries in insertion order (lines first, delivery last).
    pub fn entries(&self) -> &[AllocationEntry] {
        &self.entries
    }

    /// Entries sorted by label, as the itemization lists them.
    pub fn entries_by_label(&self) -> Vec<&AllocationEntry> {
        let mut entries: Vec<_> = self.entries.iter().collect();
        entries.sort_by(|a, b| a.label.cmp(&b.label));
        entries
    }

    /// Σ `unit_share` over line entries (delivery excluded).
    pub fn unit_share_total(&self) -> &BigRational {
        &self.unit_share_total
    }

    /// Σ `split_price` over line entries (delivery excluded).
    pub fn price_share_total(&self) -> Decimal {
        self.price_share_total
    }

    /// Σ `unit_share` over all entries, delivery included.
    pub fn split_qty(&self) -> BigRational {
        sum_rationals(self.entries.iter().map(|e| &e.unit_share))
    }

    /// Σ `split_price` over all entries, delivery included.
    pub fn split_price(&self) -> Decimal {
        self.entries.iter().map(|e| e.split_price).sum()
    }
}

// =============================================================================
// Tag Ledger
// =============================================================================

/// Tag → bucket, in tag order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TagLedger {
    buckets: BTreeMap<Tag, TagBucket>,
}

impl TagLedger {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a line entry and updates the tag's running totals.
    pub(crate) fn record_line(&mut self, tag: Tag, entry: AllocationEntry) {
        let bucket = self.buckets.entry(tag).or_default();
        bucket.unit_share_total += &entry.unit_share;
        bucket.price_share_total += entry.split_price;
        bucket.entries.push(entry);
    }

    /// Records a delivery entry; running totals are left alone.
    pub(crate) fn record_delivery(&mut self, tag: Tag, entry: AllocationEntry) {
        self.buckets.entry(tag).or_default().entries.push(entry);
    }

    /// Bucket for `tag`, if anything was allocated to it.
    pub fn bucket(&self, tag: Tag) -> Option<&TagBucket> {
        self.buckets.get(&tag)
    }

    /// Buckets in lexicographic tag order.
    pub fn iter(&self) -> impl Iterator<Item = (Tag, &TagBucket)> {
        self.buckets.iter().map(|(tag, bucket)| (*tag, bucket))
    }

    /// Tags in lexicographic order.
    pub fn tags(&self) -> impl Iterator<Item = Tag> + '_ {
        self.buckets.keys().copied()
    }

    /// Every entry across all tags.
    pub fn entries(&self) -> impl Iterator<Item = &AllocationEntry> {
        self.buckets.values().flat_map(|bucket| bucket.entries.iter())
    }

    /// True when nothing was allocated.
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Number of tags.
    pub fn len(&self) -> usize {
        self.buckets.len()
    }
}

// =============================================================================
// Allocation
// =============================================================================

/// Result of one allocation run.
#[derive(Debug, Clone, PartialEq)]
pub struct Allocation {
    /// Per-tag entries.
    pub ledger: TagLedger,

    /// Exact bill total (lines after discount and conversion, plus delivery).
    pub total_price: Decimal,

    /// Sum of every rounded split price.
    pub total_split_price: Decimal,
}

impl Allocation {
    /// Money lost (positive) or invented (negative) by per-entry rounding.
    ///
    /// Reported, never corrected.
    pub fn rounding_remainder(&self) -> Decimal {
        self.total_price - self.total_split_price
    }

    /// Number of entries across all tags.
    pub fn entry_count(&self) -> usize {
        self.ledger.entries().count()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
