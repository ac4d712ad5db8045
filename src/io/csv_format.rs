//! CSV format handling for classified records and category output
//!
//! This module centralizes all CSV format concerns, providing:
//! - CsvRecord structure for deserialization
//! - Conversion from CSV records to classified records
//! - Category table serialization
//!
//! All functions are pure (no file I/O) for easy testing.

use crate::core::value_parser::format_minor_units;
use crate::types::{AggregationResult, ClassifiedRecord, EngineError, RawAmount, TransactionId};
use serde::Deserialize;
use std::io::Write;

/// Header of the category table written by `write_category_csv`
pub const CATEGORY_CSV_HEADER: [&str; 7] = [
    "category",
    "depth",
    "kind",
    "total_minor_units",
    "total",
    "count",
    "percentage",
];

/// CSV record structure for deserialization
///
/// Matches the classifier export with columns:
/// id, kind, amount, category, counterparty, description, date.
/// Portuguese column names are accepted as aliases. Every column except `id`
/// may be empty or missing altogether.
///
/// `amount` stays a string: amounts in CSV are locale-formatted text and must
/// go through the text parsing pipeline.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct CsvRecord {
    pub id: TransactionId,
    #[serde(default, alias = "tipo")]
    pub kind: Option<String>,
    #[serde(default, alias = "valor")]
    pub amount: Option<String>,
    #[serde(default, alias = "categoria")]
    pub category: Option<String>,
    #[serde(default, alias = "empresa")]
    pub counterparty: Option<String>,
    #[serde(default, alias = "descricao")]
    pub description: Option<String>,
    #[serde(default, alias = "data")]
    pub date: Option<String>,
}

/// Convert a CsvRecord to a ClassifiedRecord
///
/// Empty cells become absent fields. No validation happens here: every
/// malformed field has a fallback further down the pipeline.
pub fn convert_csv_record(csv_record: CsvRecord) -> ClassifiedRecord {
    ClassifiedRecord {
        id: csv_record.id,
        kind_hint: present(csv_record.kind),
        raw_amount: RawAmount::from(present(csv_record.amount)),
        category: present(csv_record.category),
        counterparty: present(csv_record.counterparty),
        description: present(csv_record.description),
        raw_date: present(csv_record.date),
    }
}

fn present(field: Option<String>) -> Option<String> {
    field.filter(|value| !value.trim().is_empty())
}

/// Write the category aggregates as a CSV table
///
/// Rows keep the aggregation order (category key, then kind with inflow
/// first). `total` is the major-unit rendering and `percentage` has two
/// decimals.
pub fn write_category_csv(
    result: &AggregationResult,
    output: &mut dyn Write,
) -> Result<(), EngineError> {
    let mut writer = csv::Writer::from_writer(output);

    writer.write_record(CATEGORY_CSV_HEADER)?;

    for entry in &result.category_aggregates {
        let total = i64::try_from(entry.total_minor_units).unwrap_or(i64::MAX);
        writer.write_record(&[
            entry.key.clone(),
            entry.depth.to_string(),
            entry.kind.as_str().to_string(),
            entry.total_minor_units.to_string(),
            format_minor_units(total),
            entry.count.to_string(),
            format!("{:.2}", entry.percentage),
        ])?;
    }

    writer.flush()?;

    Ok(())
}
