//! Processing strategy module
//!
//! This module defines the Strategy pattern for complete processing pipelines:
//! reading classified records, building and accumulating canonical
//! transactions, aggregating them and writing the report. Strategies differ
//! only in how records are read and accumulated; aggregation, insight
//! derivation and output are shared, so every strategy produces identical
//! output for identical input.

use crate::cli::{InputFormat, OutputFormat, StrategyType};
use crate::core::{
    insights, AggregationEngine, Clock, ExclusionPolicy, SettlementMarkers, SystemClock,
    TransactionBuilder,
};
use crate::io::{write_category_csv, write_json_report};
use crate::types::{EngineError, Report, Transaction};
use log::info;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

pub mod r#async;
pub mod sync;

pub use self::r#async::{AsyncProcessingStrategy, BatchConfig};
pub use sync::SyncProcessingStrategy;

/// Configuration shared by every strategy
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Settlement exclusion applied before parsing
    pub exclusion: Arc<dyn ExclusionPolicy>,

    /// Clock for missing dates and the empty-input month
    pub clock: Arc<dyn Clock>,

    /// Batch settings (async strategy only)
    pub batch: BatchConfig,

    /// Input format; `None` infers it from the file extension
    pub input_format: Option<InputFormat>,

    pub output_format: OutputFormat,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            exclusion: Arc::new(SettlementMarkers::default()),
            clock: Arc::new(SystemClock),
            batch: BatchConfig::default(),
            input_format: None,
            output_format: OutputFormat::Json,
        }
    }
}

impl EngineConfig {
    /// Builder wired with this configuration's exclusion policy and clock
    pub fn transaction_builder(&self) -> TransactionBuilder {
        TransactionBuilder::new(Arc::clone(&self.exclusion), Arc::clone(&self.clock))
    }

    pub fn aggregation_engine(&self) -> AggregationEngine {
        AggregationEngine::new(Arc::clone(&self.clock))
    }

    /// Input format for a path
    ///
    /// An explicit format wins; otherwise `.json` (any case) means JSON and
    /// anything else CSV.
    pub fn input_format_for(&self, path: &Path) -> InputFormat {
        if let Some(format) = self.input_format {
            return format;
        }

        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        if is_json {
            InputFormat::Json
        } else {
            InputFormat::Csv
        }
    }
}

/// Processing strategy trait for complete pipelines
///
/// Implementors provide `collect`; `report` and `process` are shared.
pub trait ProcessingStrategy: Send + Sync {
    /// Configuration this strategy was created with
    fn config(&self) -> &EngineConfig;

    /// Read the input and accumulate every canonical transaction
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<Transaction>)` - The accumulated transactions ordered by id
    /// * `Err(EngineError)` - A file-level or collection-level failure
    ///
    /// Malformed rows are logged and skipped; they never abort the run.
    fn collect(&self, input_path: &Path) -> Result<Vec<Transaction>, EngineError>;

    /// Run the pipeline and return the report
    fn report(&self, input_path: &Path) -> Result<Report, EngineError> {
        let transactions = self.collect(input_path)?;
        Ok(build_report(transactions, self.config()))
    }

    /// Run the pipeline and write the report in the configured format
    fn process(&self, input_path: &Path, output: &mut dyn Write) -> Result<(), EngineError> {
        let report = self.report(input_path)?;
        write_report(&report, self.config().output_format, output)
    }
}

/// Aggregate accumulated transactions and derive recommendations
pub fn build_report(transactions: Vec<Transaction>, config: &EngineConfig) -> Report {
    let summary = config.aggregation_engine().aggregate(&transactions);
    let recommendations = insights::derive(&summary);

    info!(
        "Aggregated {} transactions: inflow {} / outflow {} minor units, {} recommendations",
        summary.transaction_count,
        summary.total_inflow_minor_units,
        summary.total_outflow_minor_units,
        recommendations.len()
    );

    Report {
        transactions,
        summary,
        recommendations,
    }
}

/// Write a report in the given output format
pub fn write_report(
    report: &Report,
    format: OutputFormat,
    output: &mut dyn Write,
) -> Result<(), EngineError> {
    match format {
        OutputFormat::Json => write_json_report(report, output),
        OutputFormat::Csv => write_category_csv(&report.summary, output),
    }
}

/// Create a processing strategy based on the specified strategy type
pub fn create_strategy(
    strategy_type: StrategyType,
    config: EngineConfig,
) -> Box<dyn ProcessingStrategy> {
    match strategy_type {
        StrategyType::Sync => Box::new(SyncProcessingStrategy::new(config)),
        StrategyType::Async => Box::new(AsyncProcessingStrategy::new(config)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::FixedClock;
    use chrono::NaiveDate;
    use rstest::rstest;
    use tempfile::NamedTempFile;

    fn config() -> EngineConfig {
        EngineConfig {
            clock: Arc::new(FixedClock::new(NaiveDate::from_ymd_opt(2024, 3, 31).unwrap())),
            batch: BatchConfig::new(2, 2),
            ..EngineConfig::default()
        }
    }

    #[rstest]
    #[case::csv("extrato.csv", None, InputFormat::Csv)]
    #[case::json("extrato.json", None, InputFormat::Json)]
    #[case::json_upper("EXTRATO.JSON", None, InputFormat::Json)]
    #[case::no_extension("extrato", None, InputFormat::Csv)]
    #[case::explicit_wins("extrato.json", Some(InputFormat::Csv), InputFormat::Csv)]
    fn test_input_format_for(
        #[case] path: &str,
        #[case] explicit: Option<InputFormat>,
        #[case] expected: InputFormat,
    ) {
        let config = EngineConfig {
            input_format: explicit,
            ..EngineConfig::default()
        };
        assert_eq!(config.input_format_for(Path::new(path)), expected);
    }

    #[test]
    fn test_build_report_empty_uses_clock_month() {
        let report = build_report(Vec::new(), &config());

        assert!(report.transactions.is_empty());
        assert_eq!(report.summary.transaction_count, 0);
        assert_eq!(report.summary.most_expensive_month, "2024-03");
    }

    #[rstest]
    fn test_strategies_produce_identical_reports(
        #[values(StrategyType::Sync, StrategyType::Async)] strategy_type: StrategyType,
    ) {
        let csv_content = "id,amount,category,description,date\n\
                           1,\"R$ 1.000,00\",Casa > Aluguel,Aluguel,05/01/2024\n\
                           2,\"250,00\",Mercado,Compras,10/01/2024\n\
                           3,\"-50,00\",Mercado,Estorno,12/01/2024\n\
                           4,\"900,00\",Cartão,Pagamento de fatura,15/01/2024\n\
                           2,\"999,00\",Mercado,Duplicado,10/01/2024\n";
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(csv_content.as_bytes()).unwrap();
        file.flush().unwrap();

        let baseline = create_strategy(StrategyType::Sync, config())
            .report(file.path())
            .unwrap();
        let report = create_strategy(strategy_type, config())
            .report(file.path())
            .unwrap();

        assert_eq!(report, baseline);
        let ids: Vec<_> = report.transactions.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(report.summary.total_outflow_minor_units, 125000);
        assert_eq!(report.summary.total_inflow_minor_units, 5000);
    }
}
