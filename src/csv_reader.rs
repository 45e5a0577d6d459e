//! Streaming CSV record reader
//!
//! [`CsvReader`] pulls lines from a [`LineSource`], skips leading rows,
//! resolves headers and keeps one line of lookahead so that
//! [`has_next`](CsvReader::has_next) can answer without consuming a record.
//! Each data line is split by the [`Tokenizer`] and handed, together with the
//! headers, to a [`RecordMaterializer`].
//!
//! Reading is single-pass and forward-only. A reader is not meant to be
//! shared between threads; every call takes `&mut self`.

use crate::config::{HeaderPolicy, ReaderConfig};
use crate::csv::Tokenizer;
use crate::error::{CsvError, Result};
use crate::materializer::{KeyedFields, RawFields, RecordMaterializer};
use crate::source::{BufReadLines, FileLines, LineSource};
use std::io::{BufReader, Read};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReaderState {
    /// Nothing consumed yet; configuration may still change
    Unstarted,
    /// Lookahead holds the next data line
    Ready,
    /// No more lines (terminal)
    Exhausted,
}

/// Streaming CSV reader yielding one record per data line
///
/// # Examples
///
/// ```
/// use streamcsv::{CsvReader, ReaderConfig};
/// use streamcsv::source::IterLines;
///
/// let lines = IterLines::new(["h1,h2", "1,2", "3,4"]);
/// let mut reader = CsvReader::with_config(lines, ReaderConfig::new());
///
/// while reader.has_next()? {
///     let row = reader.next_record()?;
///     println!("line {}: {:?}", reader.line_number(), row);
/// }
/// assert_eq!(reader.headers(), Some(&["h1".to_string(), "h2".to_string()][..]));
/// # Ok::<(), streamcsv::CsvError>(())
/// ```
///
/// # Reading a file as maps
///
/// ```no_run
/// use streamcsv::{CsvReader, KeyedFields};
///
/// let mut reader = CsvReader::open("data.csv")?.with_materializer(KeyedFields)?;
///
/// for record in reader.records() {
///     let record = record?;
///     println!("{:?}", record.get("name"));
/// }
/// # Ok::<(), streamcsv::CsvError>(())
/// ```
pub struct CsvReader<S, M = RawFields> {
    source: S,
    materializer: M,

    // Configuration (frozen once started)
    config: ReaderConfig,
    tokenizer: Tokenizer,

    // Cursor
    state: ReaderState,
    headers: Option<Vec<String>>,
    lookahead: Option<String>,
    line_number: u64,
    record_line: Option<u64>,
    records_read: u64,
    deferred_error: Option<CsvError>,
}

/// Reader yielding raw field sequences
pub type RowReader<S> = CsvReader<S, RawFields>;

/// Reader yielding header-keyed maps
pub type MapReader<S> = CsvReader<S, KeyedFields>;

impl CsvReader<FileLines> {
    /// Open a CSV file with the default configuration
    ///
    /// Compressed files (`.csv.zst`, `.csv.zip`, `.csv.gz`) are detected from
    /// the extension. Headers are inferred from the first line.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use streamcsv::CsvReader;
    ///
    /// let mut reader = CsvReader::open("data.csv.zst")?;
    /// for row in reader.records() {
    ///     println!("{:?}", row?);
    /// }
    /// # Ok::<(), streamcsv::CsvError>(())
    /// ```
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with(path, ReaderConfig::default())
    }

    /// Open a CSV file with an explicit configuration
    pub fn open_with<P: AsRef<Path>>(path: P, config: ReaderConfig) -> Result<Self> {
        Ok(Self::with_config(FileLines::open(path)?, config))
    }
}

impl<R: Read> CsvReader<BufReadLines<BufReader<R>>> {
    /// Read CSV from any byte stream (UTF-8)
    pub fn from_reader(reader: R, config: ReaderConfig) -> Self {
        Self::with_config(BufReadLines::new(BufReader::new(reader)), config)
    }
}

impl<S: LineSource> CsvReader<S> {
    /// Reader over `source` yielding raw field sequences
    pub fn with_config(source: S, config: ReaderConfig) -> Self {
        Self::new(source, config, RawFields)
    }
}

impl<S: LineSource, M: RecordMaterializer> CsvReader<S, M> {
    /// Create a reader from a line source, configuration and materializer
    ///
    /// Nothing is read until the first call that needs input.
    pub fn new(source: S, config: ReaderConfig, materializer: M) -> Self {
        CsvReader {
            source,
            materializer,
            tokenizer: Tokenizer::new(config.tokenizer()),
            config,
            state: ReaderState::Unstarted,
            headers: None,
            lookahead: None,
            line_number: 0,
            record_line: None,
            records_read: 0,
            deferred_error: None,
        }
    }

    /// Swap the materializer before reading starts
    ///
    /// Fails with [`CsvError::AlreadyStarted`] once input has been consumed.
    pub fn with_materializer<N: RecordMaterializer>(
        self,
        materializer: N,
    ) -> Result<CsvReader<S, N>> {
        if self.state != ReaderState::Unstarted {
            return Err(CsvError::AlreadyStarted);
        }

        Ok(CsvReader {
            source: self.source,
            materializer,
            config: self.config,
            tokenizer: self.tokenizer,
            state: self.state,
            headers: self.headers,
            lookahead: self.lookahead,
            line_number: self.line_number,
            record_line: self.record_line,
            records_read: self.records_read,
            deferred_error: self.deferred_error,
        })
    }

    /// Replace the configuration before reading starts
    ///
    /// Fails with [`CsvError::AlreadyStarted`] once input has been consumed.
    pub fn set_config(&mut self, config: ReaderConfig) -> Result<()> {
        if self.state != ReaderState::Unstarted {
            return Err(CsvError::AlreadyStarted);
        }
        self.tokenizer = Tokenizer::new(config.tokenizer());
        self.config = config;
        Ok(())
    }

    /// Configuration this reader was built with
    pub fn config(&self) -> &ReaderConfig {
        &self.config
    }

    /// Skip leading rows, resolve headers and prefetch the first data line
    ///
    /// Runs once; later calls return immediately. Every reading method calls
    /// this first, so explicit use is only needed to resolve headers early.
    /// A failure here leaves the reader exhausted.
    pub fn initialize(&mut self) -> Result<()> {
        if self.state != ReaderState::Unstarted {
            return Ok(());
        }
        // Frozen from here on, even if initialization fails
        self.state = ReaderState::Exhausted;

        let skip = self.config.skip_row_count();
        let mut skipped = 0;
        while skipped < skip {
            if self.read_line()?.is_none() {
                break;
            }
            skipped += 1;
        }

        let headers = match self.config.header_source().clone() {
            HeaderPolicy::Infer => {
                let line = self.read_line()?.ok_or(CsvError::EmptySource)?;
                Some(self.tokenizer.split(&line))
            }
            HeaderPolicy::Explicit(headers) => Some(headers),
            HeaderPolicy::Absent => None,
        };

        tracing::debug!(
            skipped,
            requested = skip,
            headers = ?headers,
            "csv reader initialized"
        );
        self.headers = headers;

        self.lookahead = self.read_line()?;
        if self.lookahead.is_some() {
            self.state = ReaderState::Ready;
        }
        Ok(())
    }

    /// Whether another data line is waiting
    ///
    /// Initializes the reader on first use. A source failure hit while
    /// prefetching after the previous record is reported here once.
    pub fn has_next(&mut self) -> Result<bool> {
        self.initialize()?;
        if let Some(err) = self.deferred_error.take() {
            return Err(err);
        }
        Ok(self.lookahead.is_some())
    }

    /// Tokenize and materialize the next data line
    ///
    /// # Errors
    ///
    /// - [`CsvError::IterationExhausted`] when no data line is left
    /// - [`CsvError::MalformedRow`] when the field count differs from the
    ///   header count; the row stays in place (see [`skip_row`](Self::skip_row))
    /// - [`CsvError::Materialize`] when the materializer refuses the row; the
    ///   row also stays in place
    /// - source errors from the initial read or a deferred prefetch
    pub fn next_record(&mut self) -> Result<M::Record> {
        self.initialize()?;
        if let Some(err) = self.deferred_error.take() {
            return Err(err);
        }

        let line = self.line_number;
        let fields = match &self.lookahead {
            Some(text) => self.tokenizer.split(text),
            None => return Err(CsvError::IterationExhausted),
        };

        if let Some(headers) = &self.headers {
            if fields.len() != headers.len() {
                tracing::warn!(
                    line,
                    expected = headers.len(),
                    found = fields.len(),
                    "malformed csv row"
                );
                return Err(CsvError::MalformedRow {
                    line,
                    expected: headers.len(),
                    found: fields.len(),
                });
            }
        }

        let headers = self.headers.as_deref().unwrap_or(&[]);
        let record = self
            .materializer
            .materialize(headers, fields)
            .map_err(|e| CsvError::Materialize {
                line,
                source: e.into(),
            })?;

        self.record_line = Some(line);
        self.records_read += 1;
        self.advance();
        Ok(record)
    }

    /// Discard the pending data line without tokenizing it
    ///
    /// Returns the raw text of the discarded line, or `None` if nothing was
    /// pending. Useful to step past a row that failed with
    /// [`CsvError::MalformedRow`].
    pub fn skip_row(&mut self) -> Result<Option<String>> {
        self.initialize()?;
        if let Some(err) = self.deferred_error.take() {
            return Err(err);
        }

        let skipped = self.lookahead.take();
        if skipped.is_some() {
            tracing::debug!(line = self.line_number, "skipping csv row");
            self.advance();
        }
        Ok(skipped)
    }

    /// Iterate over the remaining records
    ///
    /// The iterator ends after the first error it yields; use
    /// [`next_record`](Self::next_record) and [`skip_row`](Self::skip_row)
    /// to step past bad rows instead.
    pub fn records(&mut self) -> Records<'_, S, M> {
        Records {
            reader: self,
            failed: false,
        }
    }

    /// Headers used to check and key each row
    ///
    /// Explicit headers are available right away. Inferred headers are
    /// `None` until the reader initializes. Always `None` in headerless mode.
    pub fn headers(&self) -> Option<&[String]> {
        match (&self.headers, self.config.header_source()) {
            (Some(headers), _) => Some(headers.as_slice()),
            (None, HeaderPolicy::Explicit(headers)) => Some(headers.as_slice()),
            (None, _) => None,
        }
    }

    /// Physical lines consumed from the source so far
    ///
    /// Counts skipped rows, the header line and every data line, including
    /// the line held in lookahead, so after a record is returned it usually
    /// counts the following line too. Use [`record_line`](Self::record_line)
    /// for the line a record came from.
    pub fn line_number(&self) -> u64 {
        self.line_number
    }

    /// Line number of the most recently returned record
    pub fn record_line(&self) -> Option<u64> {
        self.record_line
    }

    /// Number of records returned so far
    pub fn records_read(&self) -> u64 {
        self.records_read
    }

    /// Give back the line source
    pub fn into_inner(self) -> S {
        self.source
    }

    fn read_line(&mut self) -> Result<Option<String>> {
        let line = self.source.next_line().inspect_err(|e| {
            tracing::warn!(line = self.line_number + 1, error = %e, "csv source read failed");
        })?;

        if line.is_some() {
            self.line_number += 1;
            tracing::trace!(line = self.line_number, "consumed csv line");
        }
        Ok(line)
    }

    /// Refill the lookahead; a read failure is held back for the next call
    fn advance(&mut self) {
        match self.read_line() {
            Ok(Some(next)) => self.lookahead = Some(next),
            Ok(None) => {
                self.lookahead = None;
                self.state = ReaderState::Exhausted;
            }
            Err(e) => {
                self.lookahead = None;
                self.state = ReaderState::Exhausted;
                self.deferred_error = Some(e);
            }
        }
    }
}

/// Iterator over the records of a [`CsvReader`]
pub struct Records<'a, S, M> {
    reader: &'a mut CsvReader<S, M>,
    failed: bool,
}

impl<S: LineSource, M: RecordMaterializer> Iterator for Records<'_, S, M> {
    type Item = Result<M::Record>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        let result = match self.reader.has_next() {
            Ok(true) => self.reader.next_record(),
            Ok(false) => return None,
            Err(e) => Err(e),
        };

        if result.is_err() {
            self.failed = true;
        }
        Some(result)
    }
}
