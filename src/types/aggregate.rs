//! Aggregation output types
//!
//! These structures are derived data: they are rebuilt from scratch on every
//! aggregation call and never updated incrementally.

use super::transaction::{MinorUnits, TransactionKind};
use serde::Serialize;

/// Separator used when joining category path segments into a key
pub const PATH_SEPARATOR: &str = " > ";

/// Totals for one (category-path-prefix, kind) pair
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryAggregate {
    /// Path prefix segments joined by `" > "`, e.g. `"transporte > apps"`
    pub key: String,

    /// Number of segments in the prefix (1 for top-level categories)
    pub depth: usize,

    pub kind: TransactionKind,
    pub total_minor_units: u64,
    pub count: usize,

    /// Share of the grand total of the same kind, 0.0 to 100.0
    pub percentage: f64,
}

/// Totals for one calendar month
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyAggregate {
    /// `YYYY-MM`
    pub month: String,
    pub inflow_minor_units: u64,
    pub outflow_minor_units: u64,
    pub balance_minor_units: MinorUnits,
    pub count: usize,
}

/// Complete result of aggregating a transaction set
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregationResult {
    pub total_inflow_minor_units: u64,
    pub total_outflow_minor_units: u64,

    /// `total_inflow - total_outflow`
    pub balance_minor_units: MinorUnits,

    pub transaction_count: usize,

    /// Ordered by key, then kind (inflow first)
    pub category_aggregates: Vec<CategoryAggregate>,

    /// Ordered ascending by month
    pub monthly_aggregates: Vec<MonthlyAggregate>,

    /// Up to five full category paths with the largest outflow, descending
    pub top_outflow_categories: Vec<CategoryAggregate>,

    /// Month with the largest outflow, or the current month when empty
    pub most_expensive_month: String,
}

impl AggregationResult {
    /// Look up a category aggregate by key and kind
    pub fn category(&self, key: &str, kind: TransactionKind) -> Option<&CategoryAggregate> {
        self.category_aggregates
            .iter()
            .find(|entry| entry.key == key && entry.kind == kind)
    }

    /// Look up the aggregate for a month key (`YYYY-MM`)
    pub fn month(&self, month: &str) -> Option<&MonthlyAggregate> {
        self.monthly_aggregates
            .iter()
            .find(|entry| entry.month == month)
    }
}

/// Severity of an advisory recommendation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationLevel {
    Warning,
    Opportunity,
    Alert,
    Praise,
}

/// Rule-based advisory note derived from an `AggregationResult`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Recommendation {
    pub level: RecommendationLevel,
    pub title: String,
    pub message: String,
}
