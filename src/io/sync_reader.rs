//! Synchronous CSV reader with iterator interface
//!
//! Provides a streaming iterator over classified records from a CSV file.
//! Delegates CSV format concerns to the csv_format module.
//!
//! # Iterator Interface
//!
//! SyncReader implements the Iterator trait, yielding
//! `Result<ClassifiedRecord, EngineError>` for each CSV row:
//!
//! ```no_run
//! use rust_spending_engine::io::sync_reader::SyncReader;
//! use std::path::Path;
//!
//! let reader = SyncReader::new(Path::new("extrato.csv")).unwrap();
//! for result in reader {
//!     match result {
//!         Ok(record) => println!("Record {}", record.id),
//!         Err(e) => eprintln!("Skipping row: {}", e),
//!     }
//! }
//! ```
//!
//! # Error Handling
//!
//! - Fatal errors (file not found, I/O errors) are returned from `new()`
//! - Rows that cannot be deserialized at all (e.g. a non-integer `id`) are
//!   yielded as `EngineError::ParseError` with their line number
//! - Field-level problems are not errors here; they are resolved by the
//!   builder's fallbacks

use crate::io::csv_format::{convert_csv_record, CsvRecord};
use crate::io::open_error;
use crate::types::{ClassifiedRecord, EngineError};
use csv::{ReaderBuilder, Trim};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Synchronous CSV reader
///
/// Reads one row at a time; memory usage does not grow with the file.
#[derive(Debug)]
pub struct SyncReader<R: Read = File> {
    reader: csv::Reader<R>,
}

impl SyncReader<File> {
    /// Open a CSV file for streaming iteration
    ///
    /// The CSV reader is configured to:
    /// - Trim whitespace from all fields
    /// - Allow flexible field counts (trailing columns may be missing)
    /// - Use an 8KB buffer
    pub fn new(path: &Path) -> Result<Self, EngineError> {
        let file = File::open(path).map_err(|e| open_error(path, e))?;
        Ok(Self::from_reader(file))
    }
}

impl<R: Read> SyncReader<R> {
    /// Wrap any reader producing CSV data
    pub fn from_reader(reader: R) -> Self {
        let reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .buffer_capacity(8 * 1024)
            .from_reader(reader);

        Self { reader }
    }
}

impl<R: Read> Iterator for SyncReader<R> {
    type Item = Result<ClassifiedRecord, EngineError>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut deserializer = self.reader.deserialize::<CsvRecord>();

        match deserializer.next()? {
            Ok(csv_record) => Some(Ok(convert_csv_record(csv_record))),
            Err(e) => Some(Err(EngineError::from(e))),
        }
    }
}
