//! Asynchronous batch processing strategy
//!
//! Reads the input in batches on a multi-threaded tokio runtime and builds
//! each batch concurrently.
//!
//! # Architecture
//!
//! ```text
//! AsyncProcessingStrategy
//!     ├── BatchConfig (batch_size, max_concurrent_batches)
//!     ├── AsyncReader (batch CSV reading) / JSON array split into batches
//!     ├── BatchProcessor (order-preserving chunks on tokio tasks)
//!     └── AsyncTransactionStore (DashMap-backed accumulation)
//! ```
//!
//! Batches are processed one after another and each batch is stored in input
//! order, so duplicate resolution matches the sync strategy exactly.
//! Aggregation runs once, over the final snapshot.

use crate::cli::InputFormat;
use crate::core::r#async::{AsyncTransactionStore, BatchOutcome, BatchProcessor};
use crate::io::async_reader::AsyncReader;
use crate::io::json_format::read_json_records;
use crate::io::open_error;
use crate::strategy::{EngineConfig, ProcessingStrategy};
use crate::types::{EngineError, Transaction};
use log::{debug, info, warn};
use std::path::Path;
use std::sync::Arc;

/// Configuration for batch processing
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BatchConfig {
    /// Number of records per batch
    pub batch_size: usize,
    /// Number of worker threads, and chunks per batch
    pub max_concurrent_batches: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            batch_size: 1000,
            max_concurrent_batches: num_cpus::get(),
        }
    }
}

impl BatchConfig {
    /// Create a new BatchConfig with custom values
    ///
    /// Zero values fall back to the defaults with a warning.
    pub fn new(batch_size: usize, max_concurrent_batches: usize) -> Self {
        let default = Self::default();

        let batch_size = if batch_size == 0 {
            warn!(
                "Invalid batch_size ({}), using default ({})",
                batch_size, default.batch_size
            );
            default.batch_size
        } else {
            batch_size
        };

        let max_concurrent_batches = if max_concurrent_batches == 0 {
            warn!(
                "Invalid max_concurrent_batches ({}), using default ({})",
                max_concurrent_batches, default.max_concurrent_batches
            );
            default.max_concurrent_batches
        } else {
            max_concurrent_batches
        };

        Self {
            batch_size,
            max_concurrent_batches,
        }
    }
}

/// Asynchronous batch processing strategy
#[derive(Debug, Clone)]
pub struct AsyncProcessingStrategy {
    config: EngineConfig,
}

impl AsyncProcessingStrategy {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    async fn collect_async(&self, input_path: &Path) -> Result<Vec<Transaction>, EngineError> {
        let batch = &self.config.batch;
        let store = Arc::new(AsyncTransactionStore::new());
        let processor = BatchProcessor::new(
            Arc::new(self.config.transaction_builder()),
            Arc::clone(&store),
            batch.max_concurrent_batches,
        );
        let mut outcome = BatchOutcome::default();
        let mut batches = 0usize;
        let mut skipped = 0;

        match self.config.input_format_for(input_path) {
            InputFormat::Csv => {
                let file = tokio::fs::File::open(input_path)
                    .await
                    .map_err(|e| open_error(input_path, e))?;

                // csv-async reads futures::io streams
                let compat_file = tokio_util::compat::TokioAsyncReadCompatExt::compat(file);
                let mut reader = AsyncReader::new(compat_file);

                loop {
                    let records = reader.read_batch(batch.batch_size).await;
                    if records.is_empty() {
                        break;
                    }

                    batches += 1;
                    let batch_outcome = processor.process_batch(records).await?;
                    debug!("Batch {}: {:?}", batches, batch_outcome);
                    outcome.absorb(batch_outcome);
                }
                skipped = reader.skipped();
            }
            InputFormat::Json => {
                let bytes = tokio::fs::read(input_path)
                    .await
                    .map_err(|e| open_error(input_path, e))?;
                let mut records = read_json_records(bytes.as_slice())?.into_iter().peekable();

                while records.peek().is_some() {
                    let chunk: Vec<_> = records.by_ref().take(batch.batch_size).collect();

                    batches += 1;
                    let batch_outcome = processor.process_batch(chunk).await?;
                    debug!("Batch {}: {:?}", batches, batch_outcome);
                    outcome.absorb(batch_outcome);
                }
            }
        }

        info!(
            "Processed {} records in {} batches: {} stored, {} excluded, {} duplicates, {} malformed rows skipped",
            outcome.received,
            batches,
            outcome.stored,
            outcome.excluded,
            outcome.duplicates,
            skipped
        );

        Ok(store.snapshot())
    }
}

impl ProcessingStrategy for AsyncProcessingStrategy {
    fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn collect(&self, input_path: &Path) -> Result<Vec<Transaction>, EngineError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(self.config.batch.max_concurrent_batches)
            .build()
            .map_err(|e| EngineError::runtime(&format!("Failed to create tokio runtime: {}", e)))?;

        runtime.block_on(self.collect_async(input_path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::FixedClock;
    use chrono::NaiveDate;
    use std::io::Write;
    use tempfile::{Builder, NamedTempFile};

    /// Helper function to create a temporary file for testing
    fn create_temp_file(content: &str, suffix: &str) -> NamedTempFile {
        let mut file = Builder::new()
            .suffix(suffix)
            .tempfile()
            .expect("Failed to create temp file");
        file.write_all(content.as_bytes())
            .expect("Failed to write to temp file");
        file.flush().expect("Failed to flush temp file");
        file
    }

    fn strategy(batch_size: usize) -> AsyncProcessingStrategy {
        AsyncProcessingStrategy::new(EngineConfig {
            clock: Arc::new(FixedClock::new(NaiveDate::from_ymd_opt(2024, 2, 29).unwrap())),
            batch: BatchConfig::new(batch_size, 3),
            ..EngineConfig::default()
        })
    }

    #[test]
    fn test_batch_config_zero_values_fall_back() {
        let config = BatchConfig::new(0, 0);
        assert_eq!(config, BatchConfig::default());
    }

    #[test]
    fn test_async_strategy_handles_missing_file() {
        let result = strategy(10).collect(Path::new("nonexistent.csv"));
        assert!(matches!(result, Err(EngineError::FileNotFound { .. })));
    }

    #[test]
    fn test_async_strategy_keeps_first_duplicate_across_batches() {
        let csv_content = "id,amount,category\n\
                           1,\"10,00\",Mercado\n\
                           2,\"20,00\",Mercado\n\
                           3,\"30,00\",Lazer\n\
                           1,\"99,00\",Mercado\n\
                           4,\"40,00\",Lazer\n";
        let file = create_temp_file(csv_content, ".csv");

        let transactions = strategy(2).collect(file.path()).unwrap();

        let ids: Vec<_> = transactions.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
        assert_eq!(transactions[0].amount_minor_units, 1000);
    }

    #[test]
    fn test_async_strategy_reads_json_in_batches() {
        let json_content = r#"[
            {"id": 3, "amount": "5,00"},
            {"id": 1, "amount": 12.5},
            {"id": 2, "amount": "(7,00)", "description": "Estorno"},
            {"id": 4, "amount": "100,00", "description": "PGTO FATURA"}
        ]"#;
        let file = create_temp_file(json_content, ".json");

        let transactions = strategy(1).collect(file.path()).unwrap();

        let ids: Vec<_> = transactions.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(transactions[0].amount_minor_units, 1250);
        assert_eq!(transactions[1].amount_minor_units, 700);
    }

    #[test]
    fn test_async_strategy_rejects_json_object_root() {
        let file = create_temp_file(r#"{"records": []}"#, ".json");

        let result = strategy(10).collect(file.path());

        assert_eq!(result, Err(EngineError::not_a_collection("object")));
    }
}
