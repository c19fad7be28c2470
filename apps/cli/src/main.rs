//! # billtag Entry Point
//!
//! ```text
//! billtag bill.tsv [-r PLACES] [-c FACTOR] [-d AMOUNT] [--default-discount RATE]
//!                  [--use-price-shares-for-delivery] [--rounding-mode MODE]
//!                  [--format text|json] [--config PATH] [-v...]
//! ```

use std::process::ExitCode;

use billtag_cli::{init_tracing, run, Args};
use clap::Parser;

fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            // --help and --version land here too
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    init_tracing(args.verbose);

    match run(&args) {
        Ok(report) => {
            print!("{report}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
