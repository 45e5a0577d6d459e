//! # streamcsv
//!
//! Streaming CSV reading built on a small line tokenizer.
//!
//! - [`Tokenizer`] splits one line into fields with a configurable
//!   delimiter, quote and escape character (escape may equal quote for
//!   `""`-doubling)
//! - [`CsvReader`] pulls lines from a [`LineSource`], skips leading rows,
//!   resolves headers (explicit or from the first line) and yields records
//!   one at a time with a single line of lookahead
//! - a [`RecordMaterializer`] decides what a record is: the raw fields
//!   ([`RawFields`]), a header-keyed map ([`KeyedFields`]) or a typed value
//!   built by a closure ([`FnMaterializer`])
//!
//! Memory use is one line plus one record, regardless of input size.
//!
//! ## Quick Start
//!
//! ```no_run
//! use streamcsv::{CsvReader, KeyedFields, ReaderConfig};
//!
//! let config = ReaderConfig::new().delimiter(';').skip_rows(1);
//! let mut reader = CsvReader::open_with("data.csv", config)?.with_materializer(KeyedFields)?;
//!
//! while reader.has_next()? {
//!     let record = reader.next_record()?;
//!     println!("{:?}", record);
//! }
//! # Ok::<(), streamcsv::CsvError>(())
//! ```
//!
//! ## Logging
//!
//! The crate emits [`tracing`] events (initialization at `debug`, each
//! consumed line at `trace`, malformed rows and source failures at `warn`).
//! Install any subscriber to see them.

pub mod config;
pub mod csv;
pub mod csv_reader;
pub mod error;
pub mod materializer;
pub mod source;

pub use config::{HeaderPolicy, ReaderConfig};
pub use csv::{Tokenizer, TokenizerConfig};
pub use csv_reader::{CsvReader, MapReader, Records, RowReader};
pub use error::{CsvError, Result};
pub use materializer::{
    BoxError, FnMaterializer, KeyedFields, KeyedRecord, RawFields, RecordMaterializer,
};
pub use source::{BufReadLines, FileLines, IterLines, LineSource};
