//! # billtag CLI
//!
//! Orchestration only: the allocation lives in `billtag-core`, tables and
//! reports in `billtag-io`. `main.rs` is a thin wrapper so this can be
//! tested as a library.
//!
//! ## Run Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Args ──► AppConfig::load ──► apply_args ──► validate                  │
//! │                                                │                        │
//! │                                                ▼                        │
//! │  stdout ◄── render_text / render_json ◄── allocate ◄── read_path       │
//! │                                                                         │
//! │  Any error ──► "error: <message>" on stderr, exit status 1             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod args;
pub mod config;
pub mod error;

use billtag_core::allocate;
use billtag_io::{read_path, render_json, render_text};
use tracing::{debug, info, Level};
use tracing_subscriber::EnvFilter;

pub use args::Args;
pub use config::{AppConfig, OutputFormat};
pub use error::{AppError, AppResult};

/// Runs one allocation and returns the report to print.
///
/// Nothing is written anywhere; on error the caller prints nothing but
/// the message.
pub fn run(args: &Args) -> AppResult<String> {
    let mut config = AppConfig::load(args.config.as_deref())?;
    config.apply_args(args);
    config.validate()?;
    debug!(?config, "Configuration resolved");

    let lines = read_path(&args.input)?;
    let allocation = allocate(&lines, &config.allocation)?;
    info!(
        tags = allocation.ledger.len(),
        total_price = %allocation.total_price,
        "Bill allocated"
    );

    let report = match config.output.format {
        OutputFormat::Text => render_text(&allocation, config.allocation.rounding_precision),
        OutputFormat::Json => {
            let mut json = render_json(&allocation)?;
            json.push('\n');
            json
        }
    };
    Ok(report)
}

/// Initializes the tracing subscriber on stderr.
///
/// ## Log Levels
/// - `RUST_LOG` set - used as is
/// - otherwise `-v` count: warn, info, debug, trace
pub fn init_tracing(verbosity: u8) {
    let level = match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_str().to_lowercase()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
