//! Report type emitted at the end of a processing run

use super::aggregate::{AggregationResult, Recommendation};
use super::transaction::Transaction;
use serde::Serialize;

/// Everything a run produces: the canonical transactions, their aggregation
/// and the advisory notes derived from it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    /// Canonical transactions ordered by id
    pub transactions: Vec<Transaction>,

    pub summary: AggregationResult,

    /// At most three notes, in rule order
    pub recommendations: Vec<Recommendation>,
}
