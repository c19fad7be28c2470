//! # CLI Configuration
//!
//! Merges defaults, the config file, the environment and flags into one
//! [`AppConfig`].
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Command-line flags (highest priority)                              │
//! │     billtag bill.tsv -d 3,50 --format json                             │
//! │                                                                         │
//! │  2. Environment Variables                                              │
//! │     BILLTAG_DELIVERY=3.50                                              │
//! │     BILLTAG_ROUNDING_MODE=half-away-from-zero                          │
//! │                                                                         │
//! │  3. TOML Config File                                                   │
//! │     --config <path>, or                                                │
//! │     ~/.config/billtag/billtag.toml (Linux)                             │
//! │     ~/Library/Application Support/org.billtag.billtag/... (macOS)      │
//! │                                                                         │
//! │  4. Default Values (lowest priority)                                   │
//! │     2 places, multiplier 1, no delivery, no discount                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # billtag.toml
//! [allocation]
//! rounding_precision = 2
//! currency_multiplier = "1"
//! delivery_amount = "0"
//! default_discount_rate = "0.1"
//! delivery_weighting = "by_price_share"   # by_unit_share | by_price_share
//! rounding_mode = "half_even"             # half_even | half_away_from_zero
//!
//! [output]
//! format = "text"                         # text | json
//! ```

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use billtag_core::money::{parse_amount, parse_rate};
use billtag_core::error::ValidationResult;
use billtag_core::{AllocationOptions, DeliveryWeighting};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::args::Args;
use crate::error::{AppError, AppResult};

/// Environment variable prefix for overrides.
pub const ENV_PREFIX: &str = "BILLTAG_";

/// File name looked up in the user config directory.
pub const CONFIG_FILE_NAME: &str = "billtag.toml";

// =============================================================================
// Output Settings
// =============================================================================

/// How the itemization is printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// Grouped plain-text listing.
    #[default]
    Text,

    /// Pretty-printed JSON report.
    Json,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "text" | "txt" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!(
                "Unknown output format: '{}'. Valid options: text, json",
                other
            )),
        }
    }
}

/// Output section of the config file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputSettings {
    #[serde(default)]
    pub format: OutputFormat,
}

// =============================================================================
// App Config
// =============================================================================

/// Full configuration of one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Allocation options handed to the engine.
    #[serde(default)]
    pub allocation: AllocationOptions,

    /// Output settings.
    #[serde(default)]
    pub output: OutputSettings,
}

impl AppConfig {
    /// Loads configuration from file and environment on top of defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (`config_path`, else the user config dir)
    /// 3. Environment variables
    ///
    /// An explicit `config_path` that does not exist is an error; a missing
    /// default file is not.
    pub fn load(config_path: Option<&Path>) -> AppResult<Self> {
        let mut config = match config_path {
            Some(path) if !path.exists() => {
                return Err(AppError::ConfigNotFound(path.to_path_buf()));
            }
            Some(path) => Self::from_file(path)?,
            None => match Self::default_config_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                Some(path) => {
                    debug!(?path, "Config file not found, using defaults");
                    Self::default()
                }
                None => Self::default(),
            },
        };

        config.apply_env_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Parses a config file.
    pub fn from_file(path: &Path) -> AppResult<Self> {
        info!(?path, "Loading config from file");
        let contents = std::fs::read_to_string(path).map_err(|source| AppError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(toml::from_str(&contents)?)
    }

    /// Applies `BILLTAG_*` overrides read through `lookup`.
    ///
    /// Unparseable values are logged and ignored.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(&format!("{ENV_PREFIX}{name}"));
        let options = &mut self.allocation;

        if let Some(raw) = var("ROUNDING") {
            match raw.trim().parse::<u32>() {
                Ok(places) => options.rounding_precision = places,
                Err(_) => warn!(value = %raw, "Ignoring invalid BILLTAG_ROUNDING"),
            }
        }

        if let Some(raw) = var("CURRENCY_MULTIPLIER") {
            match parse_amount(&raw) {
                Some(factor) => options.currency_multiplier = factor,
                None => warn!(value = %raw, "Ignoring invalid BILLTAG_CURRENCY_MULTIPLIER"),
            }
        }

        if let Some(raw) = var("DELIVERY") {
            match parse_amount(&raw) {
                Some(amount) => {
                    debug!(%amount, "Overriding delivery from environment");
                    options.delivery_amount = amount;
                }
                None => warn!(value = %raw, "Ignoring invalid BILLTAG_DELIVERY"),
            }
        }

        if let Some(raw) = var("DEFAULT_DISCOUNT") {
            match parse_rate(&raw) {
                Some(rate) => options.default_discount_rate = rate,
                None => warn!(value = %raw, "Ignoring invalid BILLTAG_DEFAULT_DISCOUNT"),
            }
        }

        if let Some(raw) = var("DELIVERY_WEIGHTING") {
            match raw.parse::<DeliveryWeighting>() {
                Ok(weighting) => options.delivery_weighting = weighting,
                Err(e) => warn!(error = %e, "Ignoring invalid BILLTAG_DELIVERY_WEIGHTING"),
            }
        }

        if let Some(raw) = var("ROUNDING_MODE") {
            match raw.parse() {
                Ok(mode) => options.rounding_mode = mode,
                Err(e) => warn!(error = %e, "Ignoring invalid BILLTAG_ROUNDING_MODE"),
            }
        }

        if let Some(raw) = var("FORMAT") {
            match raw.parse() {
                Ok(format) => self.output.format = format,
                Err(e) => warn!(error = %e, "Ignoring invalid BILLTAG_FORMAT"),
            }
        }
    }

    /// Applies command-line flags; absent flags change nothing.
    pub fn apply_args(&mut self, args: &Args) {
        let options = &mut self.allocation;

        if let Some(places) = args.rounding {
            options.rounding_precision = places;
        }
        if let Some(factor) = args.currency_multiplier {
            options.currency_multiplier = factor;
        }
        if let Some(amount) = args.delivery {
            options.delivery_amount = amount;
        }
        if let Some(rate) = args.default_discount {
            options.default_discount_rate = rate;
        }
        if args.use_price_shares_for_delivery {
            options.delivery_weighting = DeliveryWeighting::ByPriceShare;
        }
        if let Some(mode) = args.rounding_mode {
            options.rounding_mode = mode;
        }
        if let Some(format) = args.format {
            self.output.format = format;
        }
    }

    /// Validates the merged configuration.
    pub fn validate(&self) -> ValidationResult<()> {
        self.allocation.validate()
    }

    /// `billtag.toml` in the platform config directory.
    pub fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("org", "billtag", "billtag")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use billtag_core::RoundingMode;
    use clap::Parser;
    use rust_decimal_macros::dec;
    use std::collections::HashMap;
    use std::io::Write;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.allocation, AllocationOptions::default());
        assert_eq!(config.output.format, OutputFormat::Text);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_toml_partial_file() {
        let config: AppConfig = toml::from_str(
            r#"
            [allocation]
            delivery_amount = "3.50"
            delivery_weighting = "by_price_share"

            [output]
            format = "json"
            "#,
        )
        .unwrap();

        assert_eq!(config.allocation.delivery_amount, dec!(3.50));
        assert_eq!(config.allocation.delivery_weighting, DeliveryWeighting::ByPriceShare);
        assert_eq!(config.allocation.rounding_precision, 2);
        assert_eq!(config.output.format, OutputFormat::Json);
    }

    #[test]
    fn test_load_explicit_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[allocation]\nrounding_precision = 3").unwrap();

        let config = AppConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.allocation.rounding_precision, 3);
    }

    #[test]
    fn test_load_missing_explicit_file() {
        let err = AppConfig::load(Some(Path::new("/no/such/billtag.toml"))).unwrap_err();
        assert!(matches!(err, AppError::ConfigNotFound(_)));
    }

    #[test]
    fn test_load_malformed_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[allocation\nrounding_precision = ").unwrap();

        let err = AppConfig::load(Some(file.path())).unwrap_err();
        assert!(matches!(err, AppError::ConfigParse(_)));
    }

    #[test]
    fn test_env_overrides() {
        let mut config = AppConfig::default();
        config.apply_env_overrides(env(&[
            ("BILLTAG_ROUNDING", "0"),
            ("BILLTAG_CURRENCY_MULTIPLIER", "0,92"),
            ("BILLTAG_DELIVERY", "€ 4.99"),
            ("BILLTAG_DEFAULT_DISCOUNT", "5%"),
            ("BILLTAG_DELIVERY_WEIGHTING", "price"),
            ("BILLTAG_ROUNDING_MODE", "half_away_from_zero"),
            ("BILLTAG_FORMAT", "json"),
        ]));

        let options = &config.allocation;
        assert_eq!(options.rounding_precision, 0);
        assert_eq!(options.currency_multiplier, dec!(0.92));
        assert_eq!(options.delivery_amount, dec!(4.99));
        assert_eq!(options.default_discount_rate, dec!(0.05));
        assert_eq!(options.delivery_weighting, DeliveryWeighting::ByPriceShare);
        assert_eq!(options.rounding_mode, RoundingMode::HalfAwayFromZero);
        assert_eq!(config.output.format, OutputFormat::Json);
    }

    #[test]
    fn test_invalid_env_values_are_ignored() {
        let mut config = AppConfig::default();
        config.apply_env_overrides(env(&[
            ("BILLTAG_ROUNDING", "two"),
            ("BILLTAG_DELIVERY", "free"),
            ("BILLTAG_FORMAT", "yaml"),
        ]));
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_flags_override_everything() {
        let mut config = AppConfig::default();
        config.apply_env_overrides(env(&[("BILLTAG_DELIVERY", "2"), ("BILLTAG_ROUNDING", "3")]));

        let args = Args::parse_from(["billtag", "bill.tsv", "-d", "5", "--use-price-shares-for-delivery"]);
        config.apply_args(&args);

        assert_eq!(config.allocation.delivery_amount, dec!(5));
        assert_eq!(config.allocation.rounding_precision, 3);
        assert_eq!(config.allocation.delivery_weighting, DeliveryWeighting::ByPriceShare);
    }

    #[test]
    fn test_validate_rejects_full_discount() {
        let mut config = AppConfig::default();
        config.allocation.default_discount_rate = dec!(1);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_output_format_parsing() {
        assert_eq!("TEXT".parse::<OutputFormat>().unwrap(), OutputFormat::Text);
        assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert!("xml".parse::<OutputFormat>().is_err());
    }
}
