//! Thread-safe transaction accumulation for async batch processing
//!
//! This module provides the `AsyncTransactionStore` struct, which collects
//! canonical transactions using `DashMap` so the store can be shared across
//! tokio tasks behind an `Arc`.
//!
//! # Duplicate Handling
//!
//! First occurrence of an id wins. The insert is a single atomic entry
//! operation, so two tasks racing on the same id cannot both succeed.

use crate::types::{Transaction, TransactionId};
use dashmap::DashMap;
use log::warn;

/// Thread-safe transaction store for async batch processing
#[derive(Debug)]
pub struct AsyncTransactionStore {
    transactions: DashMap<TransactionId, Transaction>,
}

impl AsyncTransactionStore {
    /// Create a new empty AsyncTransactionStore
    pub fn new() -> Self {
        Self {
            transactions: DashMap::new(),
        }
    }
}

impl Default for AsyncTransactionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl AsyncTransactionStore {
    /// Store a transaction (thread-safe)
    ///
    /// # Returns
    ///
    /// `true` if stored, `false` if the id was already present
    pub fn store(&self, transaction: Transaction) -> bool {
        let id = transaction.id;
        let mut inserted = false;

        self.transactions.entry(id).or_insert_with(|| {
            inserted = true;
            transaction
        });

        if !inserted {
            warn!("Duplicate transaction id {}, keeping first occurrence", id);
        }
        inserted
    }

    /// Get a copy of a stored transaction
    pub fn get(&self, id: TransactionId) -> Option<Transaction> {
        self.transactions.get(&id).map(|entry| entry.value().clone())
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// All stored transactions ordered by id
    pub fn snapshot(&self) -> Vec<Transaction> {
        let mut transactions: Vec<Transaction> = self
            .transactions
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        transactions.sort_by_key(|txn| txn.id);
        transactions
    }
}
