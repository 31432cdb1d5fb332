//! Payroll Settlement CLI
//!
//! Credits every employee's net monthly pay, then applies the withdrawal
//! requests against the same accounts, and prints both reports followed by the
//! final balances.
//!
//! # Usage
//!
//! ```bash
//! cargo run
//! cargo run -- --payroll-concurrency 8 --withdrawal-concurrency 1
//! cargo run -- --accounts accounts.csv --employees staff.csv --withdrawals requests.csv
//! RUST_LOG=debug cargo run
//! ```
//!
//! Reports go to stdout and logs to stderr.
//!
//! # Exit Codes
//!
//! - 0: Success, including runs where individual operations failed
//! - 1: Error (invalid concurrency limit, unreadable or malformed input, etc.)

use payroll_settlement_engine::{app, cli, logging};
use std::process;

fn main() {
    let args = cli::parse_args();
    logging::init_logging(args.log_level.as_deref());

    let mut output = std::io::stdout();
    if let Err(e) = app::run(&args, &mut output) {
        tracing::error!(error = %e, "settlement aborted");
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
