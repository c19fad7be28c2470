//! # CLI Error Types
//!
//! Everything that can stop a `billtag` run. `main` prints the message as
//! `error: <message>` and exits with status 1.

use std::path::PathBuf;

use billtag_core::{AllocationError, ValidationError};
use billtag_io::IoError;
use thiserror::Error;

/// Application-level errors.
#[derive(Debug, Error)]
pub enum AppError {
    /// `--config` named a file that does not exist.
    #[error("Config file not found: {}", .0.display())]
    ConfigNotFound(PathBuf),

    /// The config file exists but could not be read.
    #[error("Cannot read config {}: {source}", path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid TOML for [`crate::config::AppConfig`].
    #[error("Invalid config file: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Reading the table or writing the report failed.
    #[error(transparent)]
    Io(#[from] IoError),

    /// The bill could not be allocated.
    #[error(transparent)]
    Allocation(#[from] AllocationError),

    /// The merged configuration is out of range.
    #[error("Invalid configuration: {0}")]
    Validation(#[from] ValidationError),
}

/// Result type alias for the CLI.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocation_errors_pass_through() {
        let err = AppError::from(AllocationError::MissingPriceField { line: 4 });
        assert_eq!(err.to_string(), "Line 4 has no total or unit price");
    }

    #[test]
    fn test_config_not_found_names_path() {
        let err = AppError::ConfigNotFound(PathBuf::from("/tmp/nope.toml"));
        assert_eq!(err.to_string(), "Config file not found: /tmp/nope.toml");
    }
}
