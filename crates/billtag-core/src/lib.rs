//! # billtag-core: Pure Allocation Logic for billtag
//!
//! This crate is the **heart** of billtag. It splits a shared bill across
//! expense tags, as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        billtag Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    apps/cli (billtag binary)                    │   │
//! │  │    args ──► config ──► read ──► allocate ──► render ──► stdout  │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    billtag-io                                   │   │
//! │  │         TSV table reader, text / JSON renderers                 │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ billtag-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────┐  ┌─────────┐  ┌─────────┐  ┌──────────────────┐  │   │
//! │  │   │  line   │  │  tags   │  │  money  │  │ engine / ledger  │  │   │
//! │  │   │ RawLine │  │  Tag    │  │ parsing │  │ allocate         │  │   │
//! │  │   │LineItem │  │Multiset │  │rounding │  │ TagLedger        │  │   │
//! │  │   └─────────┘  └─────────┘  └─────────┘  └──────────────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO FILES • NO FORMATTING • PURE FUNCTIONS            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`engine`] - `allocate`, line and delivery splitting
//! - [`ledger`] - Allocation entries, per-tag buckets, totals
//! - [`line`] - Raw rows and validated line items
//! - [`tags`] - Single-character tags and tag multisets
//! - [`money`] - Amount parsing, exact conversion, rounding modes
//! - [`options`] - Allocation options and delivery weighting
//! - [`error`] - Domain error types
//! - [`validation`] - Range checks
//!
//! ## Design Principles
//!
//! 1. **Exact Until Rounded**: shares are rationals, amounts are decimals
//! 2. **Round Once**: each split price is rounded exactly once
//! 3. **Report, Don't Fix**: rounding drift is surfaced as a remainder
//! 4. **Fail Fast**: the first bad line aborts the whole run

// =============================================================================
// Module Declarations
// =============================================================================

pub mod engine;
pub mod error;
pub mod ledger;
pub mod line;
pub mod money;
pub mod options;
pub mod tags;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use engine::{allocate, Allocator};
pub use error::{AllocationError, AllocationResult, ValidationError};
pub use ledger::{Allocation, AllocationEntry, TagBucket, TagLedger};
pub use line::{LineItem, PriceField, RawLine};
pub use money::RoundingMode;
pub use options::{AllocationOptions, DeliveryWeighting};
pub use tags::{Tag, TagMultiset};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Label of the synthetic delivery entry.
///
/// The leading `*` sorts it before alphanumeric item names in a tag's listing.
pub const DELIVERY_LABEL: &str = "* Delivery";

/// Decimal places used when none are configured.
pub const DEFAULT_ROUNDING_PRECISION: u32 = 2;

/// Largest rounding precision a `Decimal` can hold.
pub const MAX_ROUNDING_PRECISION: u32 = 28;
