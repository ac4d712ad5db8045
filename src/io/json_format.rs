//! JSON format handling for classified records and reports
//!
//! Input is a top-level array of record objects using the same field names as
//! the CSV export (Portuguese aliases included). Unlike CSV, `amount` may be a
//! JSON string, a number or null.
//!
//! A document whose root is not an array is the one structural failure of the
//! pipeline and is reported as `EngineError::NotACollection`. Individual
//! elements without a usable id are logged and skipped.

use crate::types::{ClassifiedRecord, EngineError, RawAmount, Report, TransactionId};
use log::warn;
use serde_json::{Map, Value};
use std::io::{Read, Write};

/// Read classified records from a JSON document
pub fn read_json_records<R: Read>(reader: R) -> Result<Vec<ClassifiedRecord>, EngineError> {
    let document: Value = serde_json::from_reader(reader)?;
    records_from_value(document)
}

/// Convert an already-parsed JSON document into classified records
pub fn records_from_value(document: Value) -> Result<Vec<ClassifiedRecord>, EngineError> {
    let elements = match document {
        Value::Array(elements) => elements,
        other => return Err(EngineError::not_a_collection(value_kind(&other))),
    };

    let mut records = Vec::with_capacity(elements.len());
    for (index, element) in elements.into_iter().enumerate() {
        match convert_json_record(element) {
            Some(record) => records.push(record),
            None => warn!("Skipping JSON element {}: not an object with an integer id", index),
        }
    }

    Ok(records)
}

/// Convert one JSON element into a ClassifiedRecord
///
/// Returns `None` when the element is not an object or has no usable id.
pub fn convert_json_record(element: Value) -> Option<ClassifiedRecord> {
    let Value::Object(fields) = element else {
        return None;
    };

    let id = record_id(field(&fields, &["id"])?)?;

    Some(ClassifiedRecord {
        id,
        kind_hint: text_field(&fields, &["kind", "tipo"]),
        raw_amount: raw_amount(field(&fields, &["amount", "valor"])),
        category: text_field(&fields, &["category", "categoria"]),
        counterparty: text_field(&fields, &["counterparty", "empresa"]),
        description: text_field(&fields, &["description", "descricao"]),
        raw_date: text_field(&fields, &["date", "data"]),
    })
}

/// Write a report as pretty-printed JSON followed by a newline
pub fn write_json_report(report: &Report, output: &mut dyn Write) -> Result<(), EngineError> {
    serde_json::to_writer_pretty(&mut *output, report)
        .map_err(|e| EngineError::serialization(&e.to_string()))?;
    writeln!(output)?;
    output.flush()?;
    Ok(())
}

fn field<'a>(fields: &'a Map<String, Value>, names: &[&str]) -> Option<&'a Value> {
    names.iter().find_map(|name| fields.get(*name))
}

fn record_id(value: &Value) -> Option<TransactionId> {
    match value {
        Value::Number(number) => number.as_u64(),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

fn text_field(fields: &Map<String, Value>, names: &[&str]) -> Option<String> {
    let text = match field(fields, names)? {
        Value::String(text) => text.clone(),
        Value::Number(number) => number.to_string(),
        Value::Bool(flag) => flag.to_string(),
        _ => return None,
    };
    Some(text).filter(|text| !text.trim().is_empty())
}

fn raw_amount(value: Option<&Value>) -> RawAmount {
    match value {
        Some(Value::String(text)) => RawAmount::Text(text.clone()),
        Some(Value::Number(number)) => number
            .as_f64()
            .map(RawAmount::Number)
            .unwrap_or(RawAmount::Missing),
        _ => RawAmount::Missing,
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AggregationResult, Recommendation, RecommendationLevel};
    use rstest::rstest;
    use serde_json::json;

    #[test]
    fn test_read_json_records() {
        let data = r#"[
            {"id": 1, "amount": "R$ 150,00", "category": "Mercado", "date": "10/01/2024"},
            {"id": 2, "valor": -20.5, "categoria": "Lazer", "empresa": "Cinema"},
            {"id": 3, "amount": null, "description": "Sem valor"}
        ]"#;

        let records = read_json_records(data.as_bytes()).unwrap();

        assert_eq!(records.len(), 3);
        assert_eq!(records[0].raw_amount, RawAmount::Text("R$ 150,00".to_string()));
        assert_eq!(records[0].raw_date.as_deref(), Some("10/01/2024"));
        assert_eq!(records[1].raw_amount, RawAmount::Number(-20.5));
        assert_eq!(records[1].counterparty.as_deref(), Some("Cinema"));
        assert_eq!(records[2].raw_amount, RawAmount::Missing);
        assert_eq!(records[2].description.as_deref(), Some("Sem valor"));
    }

    #[rstest]
    #[case::object(json!({"transactions": []}), "object")]
    #[case::string(json!("1,2,3"), "string")]
    #[case::null(json!(null), "null")]
    #[case::number(json!(42), "number")]
    fn test_non_array_root_is_not_a_collection(#[case] document: Value, #[case] found: &str) {
        let result = records_from_value(document);
        assert_eq!(result, Err(EngineError::not_a_collection(found)));
    }

    #[test]
    fn test_empty_array_is_valid() {
        assert_eq!(records_from_value(json!([])), Ok(Vec::new()));
    }

    #[test]
    fn test_elements_without_usable_id_are_skipped() {
        let document = json!([
            {"id": 1, "amount": "10,00"},
            "not an object",
            {"amount": "5,00"},
            {"id": -4, "amount": "5,00"},
            {"id": "7", "amount": "1,00"}
        ]);

        let ids: Vec<_> = records_from_value(document)
            .unwrap()
            .iter()
            .map(|record| record.id)
            .collect();

        assert_eq!(ids, vec![1, 7]);
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        let result = read_json_records("[{\"id\": 1,".as_bytes());
        assert!(matches!(result, Err(EngineError::ParseError { .. })));
    }

    #[test]
    fn test_write_json_report() {
        let report = Report {
            transactions: Vec::new(),
            summary: AggregationResult {
                total_inflow_minor_units: 0,
                total_outflow_minor_units: 0,
                balance_minor_units: 0,
                transaction_count: 0,
                category_aggregates: Vec::new(),
                monthly_aggregates: Vec::new(),
                top_outflow_categories: Vec::new(),
                most_expensive_month: "2024-01".to_string(),
            },
            recommendations: vec![Recommendation {
                level: RecommendationLevel::Praise,
                title: "Gastos em queda".to_string(),
                message: "Ótimo".to_string(),
            }],
        };
        let mut output = Vec::new();

        write_json_report(&report, &mut output).unwrap();

        let parsed: Value = serde_json::from_slice(&output).unwrap();
        assert_eq!(parsed["summary"]["most_expensive_month"], "2024-01");
        assert_eq!(parsed["recommendations"][0]["level"], "praise");
        assert!(parsed["transactions"].as_array().unwrap().is_empty());
    }
}
