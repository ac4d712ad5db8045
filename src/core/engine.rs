//! Aggregation engine
//!
//! This module provides the `AggregationEngine`, which turns a set of canonical
//! transactions into totals, per-category roll-ups, monthly roll-ups and
//! percentage shares.
//!
//! Aggregation always replays the whole transaction set. There is no running
//! accumulator and no merging of partial results, so the output never depends
//! on call order or on how the input was batched upstream.
//!
//! The engine enforces these invariants:
//! - `balance == total_inflow - total_outflow`, in exact integer arithmetic
//! - inflow and outflow are never netted inside a category
//! - the depth-1 category totals of a kind sum to the grand total of that kind
//! - every ancestor prefix of a category path receives the full amount

use crate::core::category_path::join_path;
use crate::core::traits::Clock;
use crate::types::{
    AggregationResult, CategoryAggregate, MinorUnits, MonthlyAggregate, Transaction,
    TransactionKind,
};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Number of entries in `top_outflow_categories`
pub const TOP_OUTFLOW_LIMIT: usize = 5;

/// Running sums for one category bucket
#[derive(Debug, Default, Clone, Copy)]
struct Bucket {
    depth: usize,
    total: u64,
    count: usize,
}

impl Bucket {
    fn add(&mut self, depth: usize, amount: u64) {
        self.depth = depth;
        self.total = self.total.saturating_add(amount);
        self.count += 1;
    }
}

/// Running sums for one month
#[derive(Debug, Default, Clone, Copy)]
struct MonthBucket {
    inflow: u64,
    outflow: u64,
    count: usize,
}

/// Pure aggregation over a transaction snapshot
///
/// Holds no state between calls other than the clock used for the
/// empty-input month fallback.
#[derive(Debug, Clone)]
pub struct AggregationEngine {
    clock: Arc<dyn Clock>,
}

impl AggregationEngine {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    /// Aggregate a full transaction set
    ///
    /// Safe to call repeatedly with different snapshots; identical input
    /// always produces an identical result.
    pub fn aggregate(&self, transactions: &[Transaction]) -> AggregationResult {
        let mut total_inflow: u64 = 0;
        let mut total_outflow: u64 = 0;

        let mut categories: BTreeMap<(String, TransactionKind), Bucket> = BTreeMap::new();
        let mut leaf_outflows: BTreeMap<String, Bucket> = BTreeMap::new();
        let mut months: BTreeMap<String, MonthBucket> = BTreeMap::new();

        for txn in transactions {
            let amount = txn.amount_minor_units;

            match txn.kind {
                TransactionKind::Inflow => total_inflow = total_inflow.saturating_add(amount),
                TransactionKind::Outflow => total_outflow = total_outflow.saturating_add(amount),
            }

            // Every prefix gets the full amount: a/b/c feeds a, a > b and a > b > c
            for depth in 1..=txn.category_path.len() {
                let key = join_path(&txn.category_path[..depth]);
                categories
                    .entry((key, txn.kind))
                    .or_default()
                    .add(depth, amount);
            }

            if txn.kind == TransactionKind::Outflow {
                leaf_outflows
                    .entry(join_path(&txn.category_path))
                    .or_default()
                    .add(txn.category_path.len(), amount);
            }

            let month = months.entry(txn.month_key().to_string()).or_default();
            match txn.kind {
                TransactionKind::Inflow => month.inflow = month.inflow.saturating_add(amount),
                TransactionKind::Outflow => month.outflow = month.outflow.saturating_add(amount),
            }
            month.count += 1;
        }

        let denominator = |kind: TransactionKind| match kind {
            TransactionKind::Inflow => total_inflow,
            TransactionKind::Outflow => total_outflow,
        };

        let category_aggregates: Vec<CategoryAggregate> = categories
            .into_iter()
            .filter(|(_, bucket)| bucket.total > 0)
            .map(|((key, kind), bucket)| CategoryAggregate {
                key,
                depth: bucket.depth,
                kind,
                total_minor_units: bucket.total,
                count: bucket.count,
                percentage: percentage(bucket.total, denominator(kind)),
            })
            .collect();

        let mut top_outflow_categories: Vec<CategoryAggregate> = leaf_outflows
            .into_iter()
            .filter(|(_, bucket)| bucket.total > 0)
            .map(|(key, bucket)| CategoryAggregate {
                key,
                depth: bucket.depth,
                kind: TransactionKind::Outflow,
                total_minor_units: bucket.total,
                count: bucket.count,
                percentage: percentage(bucket.total, total_outflow),
            })
            .collect();
        // Stable sort over key-ordered input: ties stay alphabetical
        top_outflow_categories.sort_by(|a, b| b.total_minor_units.cmp(&a.total_minor_units));
        top_outflow_categories.truncate(TOP_OUTFLOW_LIMIT);

        let monthly_aggregates: Vec<MonthlyAggregate> = months
            .into_iter()
            .map(|(month, bucket)| MonthlyAggregate {
                month,
                inflow_minor_units: bucket.inflow,
                outflow_minor_units: bucket.outflow,
                balance_minor_units: signed_difference(bucket.inflow, bucket.outflow),
                count: bucket.count,
            })
            .collect();

        let most_expensive_month = most_expensive(&monthly_aggregates)
            .unwrap_or_else(|| self.clock.current_month());

        AggregationResult {
            total_inflow_minor_units: total_inflow,
            total_outflow_minor_units: total_outflow,
            balance_minor_units: signed_difference(total_inflow, total_outflow),
            transaction_count: transactions.len(),
            category_aggregates,
            monthly_aggregates,
            top_outflow_categories,
            most_expensive_month,
        }
    }
}

/// Share of `total` in `denominator`, 0.0 when the denominator is 0
pub fn percentage(total: u64, denominator: u64) -> f64 {
    if denominator == 0 {
        return 0.0;
    }
    total as f64 / denominator as f64 * 100.0
}

/// `a - b` as a signed value, clamped to the `i64` range
fn signed_difference(a: u64, b: u64) -> MinorUnits {
    let difference = i128::from(a) - i128::from(b);
    difference.clamp(i128::from(MinorUnits::MIN), i128::from(MinorUnits::MAX)) as MinorUnits
}

/// Month with the largest outflow; the earliest month wins ties
fn most_expensive(months: &[MonthlyAggregate]) -> Option<String> {
    let mut best: Option<&MonthlyAggregate> = None;
    for month in months {
        if best.map_or(true, |b| month.outflow_minor_units > b.outflow_minor_units) {
            best = Some(month);
        }
    }
    best.map(|m| m.month.clone())
}
