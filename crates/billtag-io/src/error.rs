//! # IO Error Types
//!
//! Error types for reading tables and writing reports.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  std::io::Error / csv::Error / serde_json::Error                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  IoError (this module) ← Adds the file path where there is one         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  AppError (in cli) ← Printed as "error: ..." with exit status 1        │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use thiserror::Error;

/// Table and report errors.
#[derive(Debug, Error)]
pub enum IoError {
    /// The input file could not be opened.
    ///
    /// ## When This Occurs
    /// - Path does not exist
    /// - Permission denied
    #[error("Cannot open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The source could not be read as text.
    ///
    /// ## When This Occurs
    /// - Invalid UTF-8 in the input
    /// - Read error half way through the file
    #[error("Cannot read table: {0}")]
    Read(#[from] std::io::Error),

    /// A row could not be split into cells.
    #[error("Malformed table: {0}")]
    Table(#[from] csv::Error),

    /// The report could not be serialized.
    #[error("Cannot serialize report: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Result type alias for IO operations.
pub type IoResult<T> = Result<T, IoError>;
