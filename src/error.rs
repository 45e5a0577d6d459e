//! Error types for tokenizing and streaming CSV records

use thiserror::Error;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, CsvError>;

/// Errors raised by the streaming reader and its line sources
///
/// The tokenizer itself never fails; malformed quoting is tolerated and
/// never reaches this type.
#[derive(Error, Debug)]
pub enum CsvError {
    /// The line source could not be opened
    #[error("Source unavailable: {0}")]
    SourceUnavailable(String),

    /// Reading from an already open source failed
    #[error("Source read error: {0}")]
    Source(String),

    /// Headers had to be inferred but the source ran out of lines
    #[error("Cannot read headers, source may be empty")]
    EmptySource,

    /// A data row does not have one field per header
    #[error("Invalid csv format in line {line}: expected {expected} fields, found {found}")]
    MalformedRow {
        /// Physical line number of the offending row (1-based)
        line: u64,
        /// Number of headers
        expected: usize,
        /// Number of fields the row was split into
        found: usize,
    },

    /// `next_record` was called after the last record
    #[error("No more records: iteration exhausted")]
    IterationExhausted,

    /// Configuration was replaced after the reader started consuming input
    #[error("Reader already started; configuration is frozen")]
    AlreadyStarted,

    /// A caller-supplied materializer refused a row
    #[error("Failed to build record from line {line}: {source}")]
    Materialize {
        /// Physical line number of the row
        line: u64,
        /// Error reported by the materializer
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}
