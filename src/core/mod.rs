//! Core processing module
//!
//! This module contains the deterministic parsing and aggregation core:
//! - `value_parser` - Locale-ambiguous amounts into integer minor units
//! - `date_normalizer` - Raw dates into `YYYY-MM-DD`
//! - `category_path` - Category text into normalized hierarchical paths
//! - `builder` - Classified records into canonical transactions
//! - `transaction_store` - Run-level accumulation across batches
//! - `engine` - Full-replay aggregation into totals and roll-ups
//! - `insights` - Rule-based recommendations over aggregation output
//! - `traits` - Injectable clock and exclusion policy
//! - `async` - Thread-safe accumulation for the async strategy

pub mod r#async;
pub mod builder;
pub mod category_path;
pub mod date_normalizer;
pub mod engine;
pub mod insights;
pub mod traits;
pub mod transaction_store;
pub mod value_parser;

pub use builder::TransactionBuilder;
pub use date_normalizer::DateNormalizer;
pub use engine::AggregationEngine;
pub use r#async::{AsyncTransactionStore, BatchOutcome, BatchProcessor};
pub use traits::{Clock, ExclusionPolicy, FixedClock, SettlementMarkers, SystemClock};
pub use transaction_store::TransactionStore;
