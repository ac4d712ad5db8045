//! Rust Spending Engine Library
//!
//! # Overview
//!
//! Deterministic parsing and aggregation of classified bank records. Each
//! record carries a free-form amount, date and category; the engine turns them
//! into canonical transactions (integer minor units, explicit kind, ISO date,
//! hierarchical category path), drops settlement entries, aggregates the set
//! and derives a few rule-based recommendations.
//!
//! # Architecture
//!
//! - [`types`] - Core data types (ClassifiedRecord, Transaction, aggregates, errors)
//! - [`core`] - Processing components:
//!   - [`core::value_parser`] - Locale-ambiguous amounts into minor units
//!   - [`core::date_normalizer`] - Raw dates into `YYYY-MM-DD`
//!   - [`core::category_path`] - Category text into normalized paths
//!   - [`core::builder`] - Classified records into canonical transactions
//!   - [`core::engine`] - Aggregation over a full transaction set
//!   - [`core::insights`] - Recommendations from an aggregation result
//!   - [`core::transaction_store`] - Accumulation across batches
//! - [`io`] - CSV/JSON readers and report writers
//! - [`strategy`] - Sync and async end-to-end pipelines
//! - [`cli`] - CLI arguments parsing
//!
//! # Amounts
//!
//! Every amount is an integer number of minor units (cents). Negative parsed
//! amounts are refunds and become `Inflow`; zero and positive amounts are
//! `Outflow`. The stored amount is always the absolute value.

pub mod cli;
pub mod core;
pub mod io;
pub mod strategy;
pub mod types;

pub use core::{AggregationEngine, TransactionBuilder, TransactionStore};
pub use io::{write_category_csv, write_json_report};
pub use types::{
    AggregationResult, ClassifiedRecord, EngineError, RawAmount, Recommendation, Report,
    Transaction, TransactionId, TransactionKind,
};
