use crate::core::{Clock, FixedClock, SettlementMarkers, SystemClock};
use crate::strategy::{BatchConfig, EngineConfig};
use chrono::NaiveDate;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::sync::Arc;

/// Parse classified bank records and aggregate spending
#[derive(Parser, Debug)]
#[command(name = "spending-engine")]
#[command(
    about = "Parse classified bank records into transactions, aggregates and recommendations",
    long_about = None
)]
pub struct CliArgs {
    /// Input file containing classified records
    #[arg(value_name = "INPUT", help = "Path to the input CSV or JSON file")]
    pub input_file: PathBuf,

    /// Processing strategy
    #[arg(
        long = "strategy",
        value_name = "STRATEGY",
        default_value = "sync",
        help = "Processing strategy: 'sync' for single-threaded or 'async' for batched"
    )]
    pub strategy: StrategyType,

    /// Number of records per batch (async mode only)
    #[arg(
        long = "batch-size",
        value_name = "SIZE",
        help = "Number of records per batch (default: 1000)"
    )]
    pub batch_size: Option<usize>,

    /// Number of build workers per batch (async mode only)
    #[arg(
        long = "max-concurrent",
        value_name = "COUNT",
        help = "Number of concurrent build workers (default: CPU cores)"
    )]
    pub max_concurrent_batches: Option<usize>,

    /// Input format; inferred from the file extension when omitted
    #[arg(long = "input-format", value_name = "FORMAT")]
    pub input_format: Option<InputFormat>,

    /// Output format
    #[arg(
        long = "format",
        value_name = "FORMAT",
        default_value = "json",
        help = "Output format: 'json' for the full report or 'csv' for the category table"
    )]
    pub output_format: OutputFormat,

    /// Extra settlement markers (case-insensitive substrings)
    #[arg(long = "exclude-marker", value_name = "TEXT")]
    pub exclude_markers: Vec<String>,

    /// Drop the built-in settlement markers
    #[arg(long = "no-default-markers")]
    pub no_default_markers: bool,

    /// Date used for missing dates and the empty-input month
    #[arg(
        long = "reference-date",
        value_name = "YYYY-MM-DD",
        value_parser = parse_reference_date
    )]
    pub reference_date: Option<NaiveDate>,
}

/// Available processing strategies
#[derive(Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum StrategyType {
    Sync,
    Async,
}

/// Supported input formats
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum InputFormat {
    Csv,
    Json,
}

/// Supported output formats
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Csv,
}

fn parse_reference_date(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|e| format!("expected YYYY-MM-DD, got '{}': {}", value, e))
}

impl CliArgs {
    /// Create a BatchConfig from CLI arguments
    ///
    /// Missing values use the defaults; zero values fall back to the defaults
    /// with a warning.
    pub fn to_batch_config(&self) -> BatchConfig {
        if self.batch_size.is_some() || self.max_concurrent_batches.is_some() {
            let default = BatchConfig::default();
            BatchConfig::new(
                self.batch_size.unwrap_or(default.batch_size),
                self.max_concurrent_batches
                    .unwrap_or(default.max_concurrent_batches),
            )
        } else {
            BatchConfig::default()
        }
    }

    /// Build the settlement marker list from the marker flags
    pub fn to_settlement_markers(&self) -> SettlementMarkers {
        let base = if self.no_default_markers {
            SettlementMarkers::none()
        } else {
            SettlementMarkers::default()
        };
        base.extend(self.exclude_markers.iter())
    }

    /// Create the full EngineConfig from CLI arguments
    pub fn to_engine_config(&self) -> EngineConfig {
        let clock: Arc<dyn Clock> = match self.reference_date {
            Some(date) => Arc::new(FixedClock::new(date)),
            None => Arc::new(SystemClock),
        };

        EngineConfig {
            exclusion: Arc::new(self.to_settlement_markers()),
            clock,
            batch: self.to_batch_config(),
            input_format: self.input_format,
            output_format: self.output_format,
        }
    }
}
