//! Concurrent batch building for async transaction processing
//!
//! This module provides the `BatchProcessor` struct, which builds canonical
//! transactions for a batch of classified records on several tokio tasks and
//! accumulates them into a shared `AsyncTransactionStore`.
//!
//! # Design
//!
//! A batch is split into contiguous chunks, one per worker. Chunks are built
//! concurrently (building is pure, so there is nothing to coordinate), then
//! the results are stored chunk by chunk in input order. Storing in input
//! order keeps "first occurrence wins" deterministic, so the async pipeline
//! produces exactly what the sync pipeline produces.
//!
//! # Architecture
//!
//! ```text
//! BatchProcessor
//!     ├── Arc<TransactionBuilder>     (shared, immutable)
//!     ├── Arc<AsyncTransactionStore>  (shared accumulation)
//!     └── workers                     (chunks per batch)
//! ```

use std::sync::Arc;

use super::AsyncTransactionStore;
use crate::core::builder::TransactionBuilder;
use crate::types::{ClassifiedRecord, EngineError, Transaction};
use log::debug;

/// Counters for one processed batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchOutcome {
    /// Records received
    pub received: usize,

    /// Records dropped by the exclusion policy
    pub excluded: usize,

    /// Transactions stored (new ids)
    pub stored: usize,

    /// Transactions dropped as duplicate ids
    pub duplicates: usize,
}

impl BatchOutcome {
    /// Add another batch's counters to this one
    pub fn absorb(&mut self, other: BatchOutcome) {
        self.received += other.received;
        self.excluded += other.excluded;
        self.stored += other.stored;
        self.duplicates += other.duplicates;
    }
}

/// Batch processor with order-preserving chunking
#[derive(Debug, Clone)]
pub struct BatchProcessor {
    builder: Arc<TransactionBuilder>,
    store: Arc<AsyncTransactionStore>,
    workers: usize,
}

impl BatchProcessor {
    /// Create a new BatchProcessor
    ///
    /// `workers` below 1 is treated as 1.
    pub fn new(
        builder: Arc<TransactionBuilder>,
        store: Arc<AsyncTransactionStore>,
        workers: usize,
    ) -> Self {
        Self {
            builder,
            store,
            workers: workers.max(1),
        }
    }

    /// Split a batch into at most `workers` contiguous chunks
    ///
    /// # Guarantees
    ///
    /// - Each record appears in exactly one chunk
    /// - Concatenating the chunks gives back the original order
    /// - No chunk is empty
    pub fn partition_in_order(&self, batch: Vec<ClassifiedRecord>) -> Vec<Vec<ClassifiedRecord>> {
        if batch.is_empty() {
            return Vec::new();
        }

        let chunk_size = batch.len().div_ceil(self.workers);
        let mut chunks = Vec::with_capacity(self.workers);
        let mut current = Vec::with_capacity(chunk_size);

        for record in batch {
            current.push(record);
            if current.len() == chunk_size {
                chunks.push(std::mem::replace(&mut current, Vec::with_capacity(chunk_size)));
            }
        }
        if !current.is_empty() {
            chunks.push(current);
        }

        chunks
    }

    /// Build and store one batch
    ///
    /// # Errors
    ///
    /// Returns `EngineError::RuntimeError` if a build task fails to complete.
    /// Nothing from the batch is stored in that case.
    pub async fn process_batch(
        &self,
        batch: Vec<ClassifiedRecord>,
    ) -> Result<BatchOutcome, EngineError> {
        let received = batch.len();

        let mut tasks = Vec::new();
        for chunk in self.partition_in_order(batch) {
            let builder = Arc::clone(&self.builder);
            tasks.push(tokio::spawn(async move { builder.build_all(&chunk) }));
        }

        // Join in spawn order so storage order matches input order
        let mut built: Vec<Vec<Transaction>> = Vec::with_capacity(tasks.len());
        for task in tasks {
            let transactions = task
                .await
                .map_err(|e| EngineError::runtime(&format!("build task failed: {}", e)))?;
            built.push(transactions);
        }

        let mut outcome = BatchOutcome {
            received,
            ..BatchOutcome::default()
        };
        for transaction in built.into_iter().flatten() {
            if self.store.store(transaction) {
                outcome.stored += 1;
            } else {
                outcome.duplicates += 1;
            }
        }
        outcome.excluded = received - outcome.stored - outcome.duplicates;

        debug!(
            "Batch done: {} received, {} stored, {} excluded, {} duplicates",
            outcome.received, outcome.stored, outcome.excluded, outcome.duplicates
        );

        Ok(outcome)
    }
}
