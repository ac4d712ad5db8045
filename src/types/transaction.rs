//! Transaction-related types for the Rust Spending Engine
//!
//! This module defines the classifier-produced input record, the raw amount
//! representation it carries, and the canonical `Transaction` built from it.

use serde::{Deserialize, Serialize};

/// Transaction identifier
///
/// Assigned by the upstream classifier. Unique within a processing run,
/// increasing across batches but not guaranteed contiguous.
pub type TransactionId = u64;

/// Signed amount in minor currency units (cents)
pub type MinorUnits = i64;

/// Semantic direction of a transaction
///
/// Derived strictly from the sign of the parsed amount: negative amounts are
/// refunds/reversals (`Inflow`), zero or positive amounts are spend (`Outflow`).
/// The declaration order matters: `Inflow` sorts before `Outflow`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Money coming back in (refund, reversal, credit)
    Inflow,

    /// Money going out (spend)
    Outflow,
}

impl TransactionKind {
    /// Derive the kind from a signed minor-unit amount
    pub fn from_signed(amount: MinorUnits) -> Self {
        if amount < 0 {
            TransactionKind::Inflow
        } else {
            TransactionKind::Outflow
        }
    }

    /// Lowercase label used in CSV output and log lines
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Inflow => "inflow",
            TransactionKind::Outflow => "outflow",
        }
    }
}

/// Raw amount as handed over by the classifier
///
/// CSV input always produces `Text`; JSON input may produce any variant.
#[derive(Debug, Clone, PartialEq)]
pub enum RawAmount {
    /// Free-form text such as `"R$ 1.234,56"` or `"(100,00)"`
    Text(String),

    /// Already-numeric major-unit value such as `69.99`
    Number(f64),

    /// Field absent or null
    Missing,
}

impl From<&str> for RawAmount {
    fn from(value: &str) -> Self {
        RawAmount::Text(value.to_string())
    }
}

impl From<f64> for RawAmount {
    fn from(value: f64) -> Self {
        RawAmount::Number(value)
    }
}

impl From<Option<String>> for RawAmount {
    fn from(value: Option<String>) -> Self {
        value.map(RawAmount::Text).unwrap_or(RawAmount::Missing)
    }
}

/// One classified record, as produced by the upstream classifier
///
/// Every field except `id` may be absent. `kind_hint` is advisory only and is
/// never trusted: the kind is re-derived from the parsed amount.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedRecord {
    pub id: TransactionId,
    pub kind_hint: Option<String>,
    pub raw_amount: RawAmount,
    pub category: Option<String>,
    pub counterparty: Option<String>,
    pub description: Option<String>,
    pub raw_date: Option<String>,
}

impl ClassifiedRecord {
    /// Create a record with only an id; every other field is missing
    pub fn new(id: TransactionId) -> Self {
        ClassifiedRecord {
            id,
            kind_hint: None,
            raw_amount: RawAmount::Missing,
            category: None,
            counterparty: None,
            description: None,
            raw_date: None,
        }
    }

    pub fn with_amount(mut self, amount: impl Into<RawAmount>) -> Self {
        self.raw_amount = amount.into();
        self
    }

    pub fn with_category(mut self, category: &str) -> Self {
        self.category = Some(category.to_string());
        self
    }

    pub fn with_counterparty(mut self, counterparty: &str) -> Self {
        self.counterparty = Some(counterparty.to_string());
        self
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    pub fn with_date(mut self, date: &str) -> Self {
        self.raw_date = Some(date.to_string());
        self
    }

    pub fn with_kind_hint(mut self, hint: &str) -> Self {
        self.kind_hint = Some(hint.to_string());
        self
    }
}

/// Canonical transaction
///
/// Created once by the `TransactionBuilder` and never mutated afterwards.
/// `amount_minor_units` is always non-negative; the sign lives exclusively in
/// `kind`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Transaction {
    pub id: TransactionId,
    pub kind: TransactionKind,
    pub amount_minor_units: u64,

    /// Human-readable category, pieces joined by `" > "`
    pub category: String,

    /// Normalized hierarchy, broadest first; never empty
    pub category_path: Vec<String>,

    pub counterparty: String,
    pub description: String,

    /// Canonical `YYYY-MM-DD`
    pub date: String,
}

impl Transaction {
    /// Calendar month key (`YYYY-MM`) of the transaction date
    pub fn month_key(&self) -> &str {
        self.date.get(..7).unwrap_or(&self.date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::negative(-1, TransactionKind::Inflow)]
    #[case::zero(0, TransactionKind::Outflow)]
    #[case::positive(10000, TransactionKind::Outflow)]
    fn test_kind_from_signed(#[case] amount: MinorUnits, #[case] expected: TransactionKind) {
        assert_eq!(TransactionKind::from_signed(amount), expected);
    }

    #[test]
    fn test_month_key() {
        let txn = Transaction {
            id: 1,
            kind: TransactionKind::Inflow,
            amount_minor_units: 2000,
            category: "Alimentação".to_string(),
            category_path: vec!["alimentacao".to_string()],
            counterparty: "Mercado".to_string(),
            description: "Estorno".to_string(),
            date: "2024-03-09".to_string(),
        };

        assert_eq!(txn.month_key(), "2024-03");
    }

    #[test]
    fn test_inflow_sorts_before_outflow() {
        assert!(TransactionKind::Inflow < TransactionKind::Outflow);
    }
}
