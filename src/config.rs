//! Reader configuration

use crate::csv::TokenizerConfig;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Where a reader's headers come from
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum HeaderPolicy {
    /// Tokenize the first unskipped line and use it as headers
    #[default]
    Infer,
    /// Use these headers; every unskipped line is data
    Explicit(Vec<String>),
    /// No headers at all; rows are not checked for field count
    Absent,
}

/// Immutable configuration for a [`CsvReader`](crate::CsvReader)
///
/// Built once with the setters below, then handed to the reader. A reader
/// that has started consuming input rejects a new configuration.
///
/// # Examples
///
/// ```
/// use streamcsv::ReaderConfig;
///
/// let config = ReaderConfig::new()
///     .delimiter(';')
///     .escape_char('\\')
///     .skip_rows(2)
///     .headers(["id", "name"]);
///
/// assert_eq!(config.tokenizer().delimiter, ';');
/// assert_eq!(config.skip_row_count(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ReaderConfig {
    #[cfg_attr(feature = "serde", serde(flatten))]
    tokenizer: TokenizerConfig,
    skip_rows: usize,
    headers: HeaderPolicy,
}

impl ReaderConfig {
    /// Default configuration: `,` delimiter, `"` quote and escape, no skipped
    /// rows, headers inferred from the first line
    pub fn new() -> Self {
        Self::default()
    }

    /// Set custom delimiter (builder pattern)
    pub fn delimiter(mut self, delimiter: char) -> Self {
        self.tokenizer.delimiter = delimiter;
        self
    }

    /// Set custom quote character (builder pattern)
    pub fn quote_char(mut self, quote: char) -> Self {
        self.tokenizer.quote_char = quote;
        self
    }

    /// Set custom escape character (builder pattern)
    ///
    /// Use the quote character itself for escape-by-doubling.
    pub fn escape_char(mut self, escape: char) -> Self {
        self.tokenizer.escape_char = escape;
        self
    }

    /// Replace all three tokenizer characters at once
    pub fn tokenizer_config(mut self, tokenizer: TokenizerConfig) -> Self {
        self.tokenizer = tokenizer;
        self
    }

    /// Number of leading lines to discard before headers or data
    pub fn skip_rows(mut self, n: usize) -> Self {
        self.skip_rows = n;
        self
    }

    /// Use explicit headers instead of reading them from the source
    pub fn headers<I, S>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.headers = HeaderPolicy::Explicit(headers.into_iter().map(Into::into).collect());
        self
    }

    /// Treat every unskipped line as data, without headers
    pub fn no_headers(mut self) -> Self {
        self.headers = HeaderPolicy::Absent;
        self
    }

    /// Set the header policy directly
    pub fn header_policy(mut self, policy: HeaderPolicy) -> Self {
        self.headers = policy;
        self
    }

    /// Delimiter, quote and escape characters
    pub fn tokenizer(&self) -> TokenizerConfig {
        self.tokenizer
    }

    /// Leading lines discarded before headers or data
    pub fn skip_row_count(&self) -> usize {
        self.skip_rows
    }

    /// Where headers come from
    pub fn header_source(&self) -> &HeaderPolicy {
        &self.headers
    }
}
