//! # Error Types
//!
//! Domain-specific error types for billtag-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  billtag-core errors (this file)                                       │
//! │  ├── AllocationError  - Bad line data, impossible delivery split       │
//! │  └── ValidationError  - Option / field range failures                  │
//! │                                                                         │
//! │  billtag-io errors (separate crate)                                    │
//! │  └── IoError          - Reading tables, writing reports                │
//! │                                                                         │
//! │  CLI errors (in app)                                                   │
//! │  └── AppError         - What the user sees on stderr                   │
//! │                                                                         │
//! │  Flow: ValidationError → AllocationError → AppError → exit status 1    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every allocation error is fatal. The engine stops at the first bad line:
//! half of a shared bill is not a useful answer.

use rust_decimal::Decimal;
use thiserror::Error;

// =============================================================================
// Allocation Error
// =============================================================================

/// Errors raised while allocating a bill.
///
/// `line` is always the 1-based line number in the source table, so the
/// message points the user at the row to fix.
#[derive(Debug, Error)]
pub enum AllocationError {
    /// The `qty` field is not an integer, or is not positive.
    ///
    /// ## When This Occurs
    /// - `qty` is blank or missing
    /// - `qty` is `"2.5"`, `"two"`, etc.
    /// - `qty` is `0` or negative
    #[error("Invalid qty '{value}' on line {line}: {reason}")]
    InvalidQuantity {
        line: usize,
        value: String,
        reason: String,
    },

    /// The line has neither a `total` nor a `unit` price.
    #[error("Line {line} has no total or unit price")]
    MissingPriceField { line: usize },

    /// The line's price works out to exactly zero.
    ///
    /// ## When This Occurs
    /// - A price of `0` typed in the table
    ///
    /// Zero-cost items are treated as a data error, not a free item.
    #[error("Price of line {line} ({name}) equals 0")]
    ZeroPriceLine { line: usize, name: String },

    /// Delivery was requested but no tag carries any weight.
    #[error("Cannot split delivery: no tag carries any weight")]
    NoTagsForDelivery,

    /// A monetary field could not be parsed.
    #[error("Invalid {field} '{value}' on line {line}")]
    InvalidAmount {
        line: usize,
        field: String,
        value: String,
    },

    /// A discount rate outside [0, 1).
    #[error("Discount {rate} on line {line} must be at least 0 and below 1")]
    InvalidDiscount { line: usize, rate: Decimal },

    /// The line lists no tags, so nobody pays for it.
    #[error("Line {line} ({name}) has no tags")]
    UntaggedLine { line: usize, name: String },

    /// A required text field is missing or blank.
    #[error("Line {line} is missing the {field} field")]
    MissingField { line: usize, field: String },

    /// Decimal arithmetic left the representable range.
    #[error("Amount overflow while computing {context}")]
    AmountOverflow { context: String },

    /// Options failed validation (wraps ValidationError).
    #[error("Invalid options: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Range and format errors for single values.
///
/// Raised by [`crate::validation`] and by option parsing. The engine wraps
/// these into [`AllocationError`] with line context where it has one.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Integer value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Rate is outside [0, 1).
    #[error("{field} must be at least 0 and below 1, got {value}")]
    RateOutOfRange { field: String, value: Decimal },

    /// Invalid format (e.g. unknown rounding mode name).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Convenience type alias for Results with AllocationError.
pub type AllocationResult<T> = Result<T, AllocationError>;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Unit Tests
// =============================================================================
