//! Types module
//!
//! Contains core data structures used throughout the application.
//! This module organizes types into logical submodules:
//! - `transaction`: Classifier input records and canonical transactions
//! - `aggregate`: Aggregation output and recommendations
//! - `report`: The complete output of a run
//! - `error`: Error types for the spending engine

pub mod aggregate;
pub mod error;
pub mod report;
pub mod transaction;

pub use aggregate::{
    AggregationResult, CategoryAggregate, MonthlyAggregate, Recommendation, RecommendationLevel,
    PATH_SEPARATOR,
};
pub use error::EngineError;
pub use report::Report;
pub use transaction::{
    ClassifiedRecord, MinorUnits, RawAmount, Transaction, TransactionId, TransactionKind,
};
