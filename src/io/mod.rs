//! I/O module
//!
//! Handles classifier input and report output.
//!
//! # Components
//!
//! - `csv_format` - CSV format handling (record conversion, category table)
//! - `json_format` - JSON format handling (record array, report)
//! - `sync_reader` - Synchronous CSV reader with iterator interface
//! - `async_reader` - Asynchronous CSV reader with batch reading interface

pub mod async_reader;
pub mod csv_format;
pub mod json_format;
pub mod sync_reader;

pub use async_reader::AsyncReader;
pub use csv_format::{convert_csv_record, write_category_csv, CsvRecord};
pub use json_format::{read_json_records, write_json_report};
pub use sync_reader::SyncReader;

use crate::types::EngineError;
use std::path::Path;

/// Map a failure to open an input file to an EngineError
pub(crate) fn open_error(path: &Path, error: std::io::Error) -> EngineError {
    match error.kind() {
        std::io::ErrorKind::NotFound => EngineError::file_not_found(&path.display().to_string()),
        _ => EngineError::IoError {
            message: format!("Failed to open file '{}': {}", path.display(), error),
        },
    }
}
