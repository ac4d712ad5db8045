//! Spending Engine CLI
//!
//! Command-line interface for turning classified bank records into canonical
//! transactions, aggregates and recommendations.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- extrato.csv > report.json
//! cargo run -- --format csv extrato.csv > categories.csv
//! cargo run -- --strategy async --batch-size 2000 --max-concurrent 8 extrato.csv
//! cargo run -- --reference-date 2024-06-30 --exclude-marker "resgate" extrato.json
//! RUST_LOG=info cargo run -- extrato.csv
//! ```
//!
//! The report goes to stdout; logs go to stderr.
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 1: Error (file not found, input not a collection, output failure, etc.)

use log::error;
use rust_spending_engine::cli;
use rust_spending_engine::strategy;
use std::process;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = cli::parse_args();

    let strategy = strategy::create_strategy(args.strategy.clone(), args.to_engine_config());

    let mut output = std::io::stdout();
    if let Err(e) = strategy.process(&args.input_file, &mut output) {
        error!("{}", e);
        process::exit(1);
    }
}
