//! Asynchronous implementations of the accumulation layer
//!
//! Thread-safe counterparts used by the async strategy:
//!
//! - **AsyncTransactionStore**: DashMap-backed run-level accumulation
//! - **BatchProcessor**: builds a batch on several tokio tasks and stores the
//!   results in input order
//!
//! Aggregation itself has no async counterpart: it runs once, synchronously,
//! over the final snapshot.

pub mod batch_processor;
pub mod transaction_store;

pub use batch_processor::{BatchOutcome, BatchProcessor};
pub use transaction_store::AsyncTransactionStore;
