//! Synchronous processing strategy
//!
//! Single-threaded pipeline: records are read one at a time (streaming for
//! CSV), built into canonical transactions and accumulated in a
//! `TransactionStore`. The store's id-ordered snapshot is what gets
//! aggregated.

use crate::cli::InputFormat;
use crate::core::{BatchOutcome, TransactionBuilder, TransactionStore};
use crate::io::json_format::read_json_records;
use crate::io::open_error;
use crate::io::sync_reader::SyncReader;
use crate::strategy::{EngineConfig, ProcessingStrategy};
use crate::types::{ClassifiedRecord, EngineError, Transaction};
use log::{info, warn};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Synchronous processing strategy
///
/// # Examples
///
/// ```no_run
/// use rust_spending_engine::strategy::{EngineConfig, ProcessingStrategy, SyncProcessingStrategy};
/// use std::path::Path;
/// use std::io;
///
/// let strategy = SyncProcessingStrategy::new(EngineConfig::default());
/// let mut output = io::stdout();
///
/// strategy.process(Path::new("extrato.csv"), &mut output)
///     .expect("Processing failed");
/// ```
#[derive(Debug, Clone)]
pub struct SyncProcessingStrategy {
    config: EngineConfig,
}

impl SyncProcessingStrategy {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }
}

impl ProcessingStrategy for SyncProcessingStrategy {
    fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn collect(&self, input_path: &Path) -> Result<Vec<Transaction>, EngineError> {
        let builder = self.config.transaction_builder();
        let mut store = TransactionStore::new();
        let mut outcome = BatchOutcome::default();
        let mut skipped = 0;

        match self.config.input_format_for(input_path) {
            InputFormat::Csv => {
                for result in SyncReader::new(input_path)? {
                    match result {
                        Ok(record) => accumulate(&builder, &mut store, &mut outcome, &record),
                        Err(e) => {
                            warn!("Skipping malformed row: {}", e);
                            skipped += 1;
                        }
                    }
                }
            }
            InputFormat::Json => {
                let file = File::open(input_path).map_err(|e| open_error(input_path, e))?;
                for record in read_json_records(BufReader::new(file))? {
                    accumulate(&builder, &mut store, &mut outcome, &record);
                }
            }
        }

        info!(
            "Processed {} records: {} stored, {} excluded, {} duplicates, {} malformed rows skipped",
            outcome.received, outcome.stored, outcome.excluded, outcome.duplicates, skipped
        );

        Ok(store.snapshot())
    }
}

fn accumulate(
    builder: &TransactionBuilder,
    store: &mut TransactionStore,
    outcome: &mut BatchOutcome,
    record: &ClassifiedRecord,
) {
    outcome.received += 1;
    match builder.build(record) {
        Some(transaction) => {
            if store.store(transaction) {
                outcome.stored += 1;
            } else {
                outcome.duplicates += 1;
            }
        }
        None => outcome.excluded += 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::OutputFormat;
    use crate::core::FixedClock;
    use chrono::NaiveDate;
    use std::io::Write;
    use std::sync::Arc;
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

    fn strategy() -> SyncProcessingStrategy {
        SyncProcessingStrategy::new(EngineConfig {
            clock: Arc::new(FixedClock::new(NaiveDate::from_ymd_opt(2024, 2, 29).unwrap())),
            output_format: OutputFormat::Csv,
            ..EngineConfig::default()
        })
    }

    #[test]
    fn test_sync_strategy_writes_category_table() {
        let csv_content = "id,amount,category\n1,\"100,00\",Mercado\n2,\"300,00\",Casa > Aluguel\n";
        let file = create_temp_file(csv_content, ".csv");
        let mut output = Vec::new();

        strategy().process(file.path(), &mut output).unwrap();

        let output_str = String::from_utf8(output).unwrap();
        assert_eq!(
            output_str,
            "category,depth,kind,total_minor_units,total,count,percentage\n\
             casa,1,outflow,30000,300.00,1,75.00\n\
             casa > aluguel,2,outflow,30000,300.00,1,75.00\n\
             mercado,1,outflow,10000,100.00,1,25.00\n"
        );
    }

    #[test]
    fn test_sync_strategy_handles_missing_file() {
        let mut output = Vec::new();

        let result = strategy().process(Path::new("nonexistent.csv"), &mut output);

        assert!(matches!(result, Err(EngineError::FileNotFound { .. })));
        assert!(output.is_empty());
    }

    #[test]
    fn test_sync_strategy_continues_on_malformed_row() {
        let csv_content = "id,amount\n1,\"10,00\"\nnope,\"20,00\"\n3,\"30,00\"\n";
        let file = create_temp_file(csv_content, ".csv");

        let transactions = strategy().collect(file.path()).unwrap();

        let ids: Vec<_> = transactions.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn test_sync_strategy_reads_json_by_extension() {
        let json_content = r#"[
            {"id": 2, "amount": 69.99, "category": "Lazer"},
            {"id": 1, "amount": "R$ 10,00", "date": null}
        ]"#;
        let file = create_temp_file(json_content, ".json");

        let transactions = strategy().collect(file.path()).unwrap();

        assert_eq!(transactions.len(), 2);
        assert_eq!(transactions[0].id, 1);
        assert_eq!(transactions[0].date, "2024-02-29");
        assert_eq!(transactions[1].amount_minor_units, 6999);
    }

    #[test]
    fn test_sync_strategy_rejects_json_object_root() {
        let file = create_temp_file(r#"{"id": 1}"#, ".json");

        let result = strategy().collect(file.path());

        assert_eq!(result, Err(EngineError::not_a_collection("object")));
    }

    #[test]
    fn test_accumulate_counts_stored_duplicates_and_excluded() {
        let builder = strategy().config().transaction_builder();
        let mut store = TransactionStore::new();
        let mut outcome = BatchOutcome::default();

        let records = [
            ClassifiedRecord::new(1).with_amount("10,00"),
            ClassifiedRecord::new(2).with_amount("20,00"),
            ClassifiedRecord::new(1).with_amount("99,00"),
            ClassifiedRecord::new(3)
                .with_amount("500,00")
                .with_description("Pagamento de fatura"),
        ];
        for record in &records {
            accumulate(&builder, &mut store, &mut outcome, record);
        }

        assert_eq!(
            outcome,
            BatchOutcome {
                received: 4,
                excluded: 1,
                stored: 2,
                duplicates: 1,
            }
        );
        assert_eq!(store.get(1).unwrap().amount_minor_units, 1000);
    }

    #[test]
    fn test_sync_strategy_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SyncProcessingStrategy>();
    }
}
