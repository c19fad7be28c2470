//! Command-line arguments.
//!
//! Every option is optional here so that an absent flag leaves the config
//! file or environment value in place.

use std::path::PathBuf;

use billtag_core::money::{parse_amount, parse_rate};
use billtag_core::RoundingMode;
use clap::{ArgAction, Parser};
use rust_decimal::Decimal;

use crate::config::OutputFormat;

#[derive(Debug, Clone, Parser)]
#[command(name = "billtag")]
#[command(about = "Split a shared bill across expense tags")]
#[command(version)]
#[command(after_help = "\
Examples:
  billtag dinner.tsv
  billtag groceries.tsv -d 4,99 --use-price-shares-for-delivery
  billtag order.tsv -c 0.92 --rounding-mode half-away-from-zero --format json")]
pub struct Args {
    /// Tab-separated bill: header row with qty, name, tags, total or unit
    pub input: PathBuf,

    /// Decimal places of each split price [default: 2]
    #[arg(long, short = 'r', value_name = "PLACES")]
    pub rounding: Option<u32>,

    /// Factor applied to every amount, e.g. an exchange rate [default: 1]
    #[arg(long, short = 'c', value_name = "FACTOR", value_parser = amount_arg)]
    pub currency_multiplier: Option<Decimal>,

    /// Delivery charge split across tags [default: 0]
    #[arg(long, short = 'd', value_name = "AMOUNT", value_parser = amount_arg)]
    pub delivery: Option<Decimal>,

    /// Discount for lines without their own, as 0.1 or 10% [default: 0]
    #[arg(long, value_name = "RATE", value_parser = rate_arg)]
    pub default_discount: Option<Decimal>,

    /// Weight delivery by what each tag spent instead of items taken
    #[arg(long)]
    pub use_price_shares_for_delivery: bool,

    /// How half-way values round: half-even or half-away-from-zero
    #[arg(long, value_name = "MODE", value_parser = rounding_mode_arg)]
    pub rounding_mode: Option<RoundingMode>,

    /// Output format
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Config file [default: billtag.toml in the user config dir]
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// More log output on stderr (-v info, -vv debug, -vvv trace)
    #[arg(long, short = 'v', action = ArgAction::Count)]
    pub verbose: u8,
}

fn amount_arg(raw: &str) -> Result<Decimal, String> {
    parse_amount(raw).ok_or_else(|| format!("'{raw}' is not an amount"))
}

fn rate_arg(raw: &str) -> Result<Decimal, String> {
    parse_rate(raw).ok_or_else(|| format!("'{raw}' is not a rate"))
}

fn rounding_mode_arg(raw: &str) -> Result<RoundingMode, String> {
    raw.parse().map_err(|e: billtag_core::ValidationError| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_minimal_args() {
        let args = Args::try_parse_from(["billtag", "bill.tsv"]).unwrap();
        assert_eq!(args.input, PathBuf::from("bill.tsv"));
        assert_eq!(args.rounding, None);
        assert!(!args.use_price_shares_for_delivery);
        assert_eq!(args.verbose, 0);
    }

    #[test]
    fn test_locale_tolerant_amounts() {
        let args = Args::try_parse_from([
            "billtag", "bill.tsv", "-d", "4,99", "-c", "€1.5", "--default-discount", "10%",
        ])
        .unwrap();
        assert_eq!(args.delivery, Some(dec!(4.99)));
        assert_eq!(args.currency_multiplier, Some(dec!(1.5)));
        assert_eq!(args.default_discount, Some(dec!(0.1)));
    }

    #[test]
    fn test_modes_and_verbosity() {
        let args = Args::try_parse_from([
            "billtag",
            "bill.tsv",
            "--rounding-mode",
            "half-away-from-zero",
            "--format",
            "json",
            "--use-price-shares-for-delivery",
            "-vv",
        ])
        .unwrap();
        assert_eq!(args.rounding_mode, Some(RoundingMode::HalfAwayFromZero));
        assert_eq!(args.format, Some(OutputFormat::Json));
        assert!(args.use_price_shares_for_delivery);
        assert_eq!(args.verbose, 2);
    }

    #[test]
    fn test_bad_values_are_rejected() {
        assert!(Args::try_parse_from(["billtag", "bill.tsv", "-d", "lots"]).is_err());
        assert!(Args::try_parse_from(["billtag", "bill.tsv", "--rounding-mode", "up"]).is_err());
        assert!(Args::try_parse_from(["billtag"]).is_err());
    }
}
