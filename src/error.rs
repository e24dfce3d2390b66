//! Error types for the dpeval library.

use std::io;
use thiserror::Error;

/// Result type alias for dpeval operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while loading or scoring documents.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The input is not valid JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The input file is not in a supported format.
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    /// The reference or prediction dataset contains no documents.
    #[error("Empty dataset: {0}")]
    EmptyDataset(String),

    /// A document violates the canonical schema.
    #[error("Schema error in {document}: {message}")]
    Schema {
        /// Document (filename key) the error belongs to
        document: String,
        /// What was wrong
        message: String,
    },

    /// A table's HTML could not be turned into a table tree.
    #[error("Malformed table {table_id} in {document}: {reason}")]
    MalformedTable {
        /// Document containing the table
        document: String,
        /// Element id of the table
        table_id: i64,
        /// What was wrong with the markup
        reason: String,
    },

    /// Tree edit distance exceeded the per-table budget.
    #[error("Table {table_id} in {document} timed out after {elapsed_ms} ms")]
    Timeout {
        /// Document containing the table
        document: String,
        /// Element id of the reference table
        table_id: i64,
        /// Elapsed wall-clock time when the computation gave up
        elapsed_ms: u128,
    },

    /// An option value is not valid.
    #[error("Invalid option: {0}")]
    InvalidOption(String),

    /// Error while rendering a report.
    #[error("Rendering error: {0}")]
    Render(String),
}

impl Error {
    /// Build a schema error for a document.
    pub fn schema(document: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Schema {
            document: document.into(),
            message: message.into(),
        }
    }

    /// Whether this error is recovered per table (scored as a complete mismatch).
    pub fn is_table_recoverable(&self) -> bool {
        matches!(self, Error::MalformedTable { .. } | Error::Timeout { .. })
    }
}
