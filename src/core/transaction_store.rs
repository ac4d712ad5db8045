//! Run-level transaction accumulation
//!
//! This module provides the `TransactionStore` that collects canonical
//! transactions across classifier batches. Accumulation lives here, never in
//! the aggregation engine: the engine only ever sees a full snapshot.
//!
//! # Duplicate Handling
//!
//! Transaction ids are unique within a run. If a duplicate id is encountered
//! (e.g. a batch replayed after an upstream retry), only the first occurrence
//! is kept so nothing is counted twice.

use crate::types::{Transaction, TransactionId};
use log::warn;
use std::collections::BTreeMap;

/// Transaction store for one processing run
///
/// Keyed by transaction id so snapshots come out in id order.
#[derive(Debug, Default)]
pub struct TransactionStore {
    transactions: BTreeMap<TransactionId, Transaction>,
}

impl TransactionStore {
    /// Create a new empty transaction store
    pub fn new() -> Self {
        TransactionStore {
            transactions: BTreeMap::new(),
        }
    }

    /// Store a transaction
    ///
    /// # Returns
    ///
    /// `true` if stored, `false` if the id was already present (first
    /// occurrence wins)
    pub fn store(&mut self, transaction: Transaction) -> bool {
        let id = transaction.id;
        if self.transactions.contains_key(&id) {
            warn!("Duplicate transaction id {}, keeping first occurrence", id);
            return false;
        }
        self.transactions.insert(id, transaction);
        true
    }

    pub fn get(&self, id: TransactionId) -> Option<&Transaction> {
        self.transactions.get(&id)
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// All stored transactions ordered by id
    pub fn snapshot(&self) -> Vec<Transaction> {
        self.transactions.values().cloned().collect()
    }
}
