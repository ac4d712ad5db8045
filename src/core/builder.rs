//! Canonical transaction construction
//!
//! The `TransactionBuilder` turns one classified record into zero or one
//! `Transaction`:
//! - settlement records are dropped before any parsing happens
//! - the kind is derived from the sign of the parsed amount; the classifier's
//!   kind hint is never trusted
//! - malformed fields fall back to their documented defaults, so a single bad
//!   row can never abort a batch

use crate::core::category_path::{display_label, to_path};
use crate::core::date_normalizer::DateNormalizer;
use crate::core::traits::{Clock, ExclusionPolicy};
use crate::core::value_parser::parse_amount;
use crate::types::{ClassifiedRecord, Transaction, TransactionKind};
use log::debug;
use std::sync::Arc;

/// Counterparty used when the classifier supplied none
pub const DEFAULT_COUNTERPARTY: &str = "Não informado";

/// Description used when the classifier supplied none
pub const DEFAULT_DESCRIPTION: &str = "Sem descrição";

/// Builds canonical transactions from classified records
#[derive(Debug, Clone)]
pub struct TransactionBuilder {
    exclusion: Arc<dyn ExclusionPolicy>,
    dates: DateNormalizer,
}

impl TransactionBuilder {
    /// Create a builder with an exclusion policy and a clock for date fallbacks
    pub fn new(exclusion: Arc<dyn ExclusionPolicy>, clock: Arc<dyn Clock>) -> Self {
        Self {
            exclusion,
            dates: DateNormalizer::new(clock),
        }
    }

    /// Build a transaction from a classified record
    ///
    /// # Returns
    ///
    /// * `Some(Transaction)` - The canonical transaction
    /// * `None` - The record matched the exclusion policy and must not count
    pub fn build(&self, record: &ClassifiedRecord) -> Option<Transaction> {
        let counterparty = non_blank(record.counterparty.as_deref());
        let description = non_blank(record.description.as_deref());

        if self.exclusion.is_excluded(
            counterparty.unwrap_or_default(),
            description.unwrap_or_default(),
        ) {
            debug!("Excluding settlement record {}", record.id);
            return None;
        }

        let signed = parse_amount(&record.raw_amount);
        let kind = TransactionKind::from_signed(signed);

        if let Some(hint) = record.kind_hint.as_deref() {
            if !hint.trim().eq_ignore_ascii_case(kind.as_str()) && !hint.trim().is_empty() {
                debug!(
                    "Record {}: kind hint '{}' overridden by amount sign ({})",
                    record.id,
                    hint.trim(),
                    kind.as_str()
                );
            }
        }

        let raw_category = record.category.as_deref().unwrap_or_default();

        Some(Transaction {
            id: record.id,
            kind,
            amount_minor_units: signed.unsigned_abs(),
            category: display_label(raw_category),
            category_path: to_path(raw_category),
            counterparty: counterparty.unwrap_or(DEFAULT_COUNTERPARTY).to_string(),
            description: description.unwrap_or(DEFAULT_DESCRIPTION).to_string(),
            date: self
                .dates
                .normalize(record.raw_date.as_deref().unwrap_or_default()),
        })
    }

    /// Build every record of a batch, dropping excluded ones
    pub fn build_all(&self, records: &[ClassifiedRecord]) -> Vec<Transaction> {
        records.iter().filter_map(|record| self.build(record)).collect()
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::traits::{FixedClock, SettlementMarkers};
    use chrono::NaiveDate;
    use rstest::rstest;

    fn builder() -> TransactionBuilder {
        let clock = FixedClock::new(NaiveDate::from_ymd_opt(2024, 5, 20).unwrap());
        TransactionBuilder::new(Arc::new(SettlementMarkers::default()), Arc::new(clock))
    }

    #[test]
    fn test_build_outflow() {
        let record = ClassifiedRecord::new(7)
            .with_amount("R$ 1.234,56")
            .with_category("Transporte > Apps > Uber")
            .with_counterparty("Uber do Brasil")
            .with_description("Viagem centro")
            .with_date("15/01/2024");

        let txn = builder().build(&record).unwrap();

        assert_eq!(txn.id, 7);
        assert_eq!(txn.kind, TransactionKind::Outflow);
        assert_eq!(txn.amount_minor_units, 123456);
        assert_eq!(txn.category, "Transporte > Apps > Uber");
        assert_eq!(txn.category_path, vec!["transporte", "apps", "uber"]);
        assert_eq!(txn.counterparty, "Uber do Brasil");
        assert_eq!(txn.description, "Viagem centro");
        assert_eq!(txn.date, "2024-01-15");
    }

    #[rstest]
    #[case::minus("-500,75", TransactionKind::Inflow, 50075)]
    #[case::parenthesized("(100,00)", TransactionKind::Inflow, 10000)]
    #[case::positive("99,90", TransactionKind::Outflow, 9990)]
    #[case::zero_is_outflow("0,00", TransactionKind::Outflow, 0)]
    #[case::garbage_is_zero_outflow("n/a", TransactionKind::Outflow, 0)]
    fn test_kind_follows_sign(
        #[case] amount: &str,
        #[case] kind: TransactionKind,
        #[case] minor: u64,
    ) {
        let record = ClassifiedRecord::new(1).with_amount(amount);
        let txn = builder().build(&record).unwrap();
        assert_eq!(txn.kind, kind);
        assert_eq!(txn.amount_minor_units, minor);
    }

    #[test]
    fn test_kind_hint_is_not_trusted() {
        let record = ClassifiedRecord::new(1)
            .with_amount("-20,00")
            .with_kind_hint("Outflow");

        let txn = builder().build(&record).unwrap();
        assert_eq!(txn.kind, TransactionKind::Inflow);
    }

    #[rstest]
    #[case::counterparty_marker("Pagamento de Fatura", "Cartão final 1234")]
    #[case::description_marker("Nubank", "PAGAMENTO FATURA MARÇO")]
    fn test_settlement_records_are_dropped(#[case] counterparty: &str, #[case] description: &str) {
        let record = ClassifiedRecord::new(1)
            .with_amount("1.500,00")
            .with_counterparty(counterparty)
            .with_description(description);

        assert!(builder().build(&record).is_none());
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let record = ClassifiedRecord::new(3);
        let txn = builder().build(&record).unwrap();

        assert_eq!(txn.kind, TransactionKind::Outflow);
        assert_eq!(txn.amount_minor_units, 0);
        assert_eq!(txn.category, "Outros");
        assert_eq!(txn.category_path, vec!["outros"]);
        assert_eq!(txn.counterparty, DEFAULT_COUNTERPARTY);
        assert_eq!(txn.description, DEFAULT_DESCRIPTION);
        assert_eq!(txn.date, "2024-05-20");
    }

    #[test]
    fn test_blank_text_fields_use_defaults() {
        let record = ClassifiedRecord::new(3)
            .with_counterparty("   ")
            .with_description("");
        let txn = builder().build(&record).unwrap();

        assert_eq!(txn.counterparty, DEFAULT_COUNTERPARTY);
        assert_eq!(txn.description, DEFAULT_DESCRIPTION);
    }

    #[test]
    fn test_build_all_drops_only_excluded() {
        let records = vec![
            ClassifiedRecord::new(1).with_amount("10,00").with_counterparty("Padaria"),
            ClassifiedRecord::new(2).with_amount("20,00").with_counterparty("Mercado"),
            ClassifiedRecord::new(3)
                .with_amount("3.000,00")
                .with_counterparty("Pagamento de fatura"),
            ClassifiedRecord::new(4).with_amount("-5,00").with_counterparty("Estorno"),
            ClassifiedRecord::new(5).with_amount("7,50").with_counterparty("Farmácia"),
        ];

        let txns = builder().build_all(&records);
        let ids: Vec<_> = txns.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 2, 4, 5]);
    }

    #[test]
    fn test_custom_exclusion_policy() {
        let clock = FixedClock::new(NaiveDate::from_ymd_opt(2024, 5, 20).unwrap());
        let builder = TransactionBuilder::new(
            Arc::new(SettlementMarkers::new(["transferencia entre contas"])),
            Arc::new(clock),
        );

        let excluded = ClassifiedRecord::new(1).with_description("Transferencia entre contas");
        let kept = ClassifiedRecord::new(2).with_description("Pagamento de fatura");

        assert!(builder.build(&excluded).is_none());
        assert!(builder.build(&kept).is_some());
    }
}
