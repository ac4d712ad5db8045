//! Error types for the Rust Spending Engine
//!
//! Malformed fields inside a record never surface here: every parser has a
//! documented fallback. These errors cover the conditions that cannot be
//! recovered locally.
//!
//! # Error Categories
//!
//! - **File I/O Errors**: File not found, permission denied, etc.
//! - **Parsing Errors**: Malformed CSV or JSON at the file/row level
//! - **Structural Errors**: Input that is not a collection of records at all
//! - **Output Errors**: Report serialization failures

use thiserror::Error;

/// Main error type for the spending engine
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    /// File not found at the specified path
    #[error("File not found: {path}")]
    FileNotFound {
        /// The path that was not found
        path: String,
    },

    /// I/O error occurred while reading or writing files
    #[error("I/O error: {message}")]
    IoError {
        /// Description of the I/O error
        message: String,
    },

    /// Input could not be parsed
    ///
    /// At row level this is recoverable: the row is skipped.
    #[error("Parse error{}: {message}", line.map(|l| format!(" at line {}", l)).unwrap_or_default())]
    ParseError {
        /// Line number where the error occurred (if available)
        line: Option<u64>,
        /// Description of the parsing error
        message: String,
    },

    /// Input is not a collection of records
    ///
    /// The only hard failure of the core: every per-field condition has a
    /// defined fallback, but a document with no record list has nothing to
    /// fall back on.
    #[error("Expected a collection of records, found {found}")]
    NotACollection {
        /// Short description of what was found instead
        found: String,
    },

    /// Report could not be serialized
    #[error("Serialization error: {message}")]
    SerializationError {
        /// Description of the serialization error
        message: String,
    },

    /// Async runtime could not be created or a task failed
    #[error("Runtime error: {message}")]
    RuntimeError {
        /// Description of the runtime error
        message: String,
    },
}

impl From<std::io::Error> for EngineError {
    fn from(error: std::io::Error) -> Self {
        EngineError::IoError {
            message: error.to_string(),
        }
    }
}

impl From<csv::Error> for EngineError {
    fn from(error: csv::Error) -> Self {
        let line = error.position().map(|pos| pos.line());
        EngineError::parse_error(line, &error.to_string())
    }
}

impl From<serde_json::Error> for EngineError {
    fn from(error: serde_json::Error) -> Self {
        if error.is_io() {
            return EngineError::IoError {
                message: error.to_string(),
            };
        }

        EngineError::parse_error(Some(error.line() as u64), &error.to_string())
    }
}

impl EngineError {
    /// Create a FileNotFound error
    pub fn file_not_found(path: &str) -> Self {
        EngineError::FileNotFound {
            path: path.to_string(),
        }
    }

    /// Create a ParseError error
    pub fn parse_error(line: Option<u64>, message: &str) -> Self {
        EngineError::ParseError {
            line,
            message: message.to_string(),
        }
    }

    /// Create a NotACollection error
    pub fn not_a_collection(found: &str) -> Self {
        EngineError::NotACollection {
            found: found.to_string(),
        }
    }

    /// Create a SerializationError error
    pub fn serialization(message: &str) -> Self {
        EngineError::SerializationError {
            message: message.to_string(),
        }
    }

    /// Create a RuntimeError error
    pub fn runtime(message: &str) -> Self {
        EngineError::RuntimeError {
            message: message.to_string(),
        }
    }
}
