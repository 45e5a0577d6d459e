//! Line sources feeding the streaming reader
//!
//! A [`LineSource`] hands out one line at a time, without its terminator,
//! and reports `Ok(None)` at end of input. Failures of the underlying medium
//! (I/O, invalid UTF-8) are reported as [`CsvError::Source`].

use crate::error::{CsvError, Result};
use s_zip::StreamingZipReader;
use std::fs::File;
use std::io::{BufRead, BufReader, Cursor};
use std::path::Path;

/// A pull-based supplier of text lines
pub trait LineSource {
    /// Next line without its terminator, or `None` at end of input
    fn next_line(&mut self) -> Result<Option<String>>;
}

impl<L: LineSource + ?Sized> LineSource for Box<L> {
    fn next_line(&mut self) -> Result<Option<String>> {
        (**self).next_line()
    }
}

impl<L: LineSource + ?Sized> LineSource for &mut L {
    fn next_line(&mut self) -> Result<Option<String>> {
        (**self).next_line()
    }
}

/// Lines read from any buffered byte stream
///
/// `\n`, `\r\n` and a lone `\r` all end a line and are stripped. A final
/// line without a terminator is still returned.
pub struct BufReadLines<R> {
    reader: R,
}

impl<R: BufRead> BufReadLines<R> {
    /// Read lines from `reader`
    pub fn new(reader: R) -> Self {
        Self { reader }
    }

    /// Give back the wrapped reader
    pub fn into_inner(self) -> R {
        self.reader
    }

    fn fill(&mut self) -> Result<&[u8]> {
        self.reader
            .fill_buf()
            .map_err(|e| CsvError::Source(format!("Failed to read line: {}", e)))
    }
}

impl<R: BufRead> LineSource for BufReadLines<R> {
    fn next_line(&mut self) -> Result<Option<String>> {
        let mut bytes = Vec::new();
        let mut terminator = None;

        while terminator.is_none() {
            let buf = self.fill()?;
            if buf.is_empty() {
                break; // EOF
            }

            let used = match buf.iter().position(|&b| b == b'\n' || b == b'\r') {
                Some(end) => {
                    bytes.extend_from_slice(&buf[..end]);
                    terminator = Some(buf[end]);
                    end + 1
                }
                None => {
                    bytes.extend_from_slice(buf);
                    buf.len()
                }
            };
            self.reader.consume(used);
        }

        match terminator {
            None if bytes.is_empty() => return Ok(None),
            Some(b'\r') => {
                // \r\n counts as one terminator
                if self.fill()?.first() == Some(&b'\n') {
                    self.reader.consume(1);
                }
            }
            _ => {}
        }

        String::from_utf8(bytes)
            .map(Some)
            .map_err(|e| CsvError::Source(format!("Invalid UTF-8 in line: {}", e)))
    }
}

/// Lines taken from an in-memory iterator
///
/// # Examples
///
/// ```
/// use streamcsv::source::{IterLines, LineSource};
///
/// let mut lines = IterLines::new(["a,b", "1,2"]);
/// assert_eq!(lines.next_line().unwrap().as_deref(), Some("a,b"));
/// ```
pub struct IterLines<I> {
    iter: I,
}

impl<I: Iterator> IterLines<I> {
    /// Take lines from anything iterable
    pub fn new<T: IntoIterator<IntoIter = I>>(lines: T) -> Self {
        Self {
            iter: lines.into_iter(),
        }
    }
}

impl<I> LineSource for IterLines<I>
where
    I: Iterator,
    I::Item: Into<String>,
{
    fn next_line(&mut self) -> Result<Option<String>> {
        Ok(self.iter.next().map(Into::into))
    }
}

/// Lines of a CSV file on disk, decompressed when needed
///
/// Opened with [`FileLines::open`], which picks the mode from the file
/// extension:
/// - `.csv` (or anything else) → direct buffered read
/// - `.csv.zst`, `.csv.zip`, `.csv.gz` → archive entry decompressed with s-zip
pub enum FileLines {
    /// Plain file streamed through a `BufReader`
    Direct(BufReadLines<BufReader<File>>),
    /// Decompressed archive entry held in memory
    Decompressed(BufReadLines<Cursor<Vec<u8>>>),
}

impl FileLines {
    /// Open a CSV file - auto-detects compression from file extension
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_ref = path.as_ref();
        let path_str = path_ref.to_str().unwrap_or("");

        if path_str.ends_with(".csv.zst")
            || path_str.ends_with(".csv.zip")
            || path_str.ends_with(".csv.gz")
        {
            let mut zip = StreamingZipReader::open(path_ref).map_err(|e| {
                CsvError::SourceUnavailable(format!("Failed to open ZIP {}: {}", path_str, e))
            })?;

            // First .csv entry, else whatever comes first
            let entry_name = zip
                .entries()
                .iter()
                .find(|e| e.name.ends_with(".csv"))
                .or_else(|| zip.entries().first())
                .ok_or_else(|| {
                    CsvError::SourceUnavailable(format!("No CSV entry found in {}", path_str))
                })?
                .name
                .clone();

            let data = zip.read_entry_by_name(&entry_name).map_err(|e| {
                CsvError::SourceUnavailable(format!("Failed to read ZIP entry: {}", e))
            })?;

            tracing::debug!(
                path = path_str,
                entry = %entry_name,
                bytes = data.len(),
                "opened compressed csv source"
            );
            Ok(FileLines::Decompressed(BufReadLines::new(Cursor::new(data))))
        } else {
            let file = File::open(path_ref).map_err(|e| {
                CsvError::SourceUnavailable(format!("Failed to open CSV file {}: {}", path_str, e))
            })?;

            tracing::debug!(path = path_str, "opened csv source");
            Ok(FileLines::Direct(BufReadLines::new(BufReader::new(file))))
        }
    }
}

impl LineSource for FileLines {
    fn next_line(&mut self) -> Result<Option<String>> {
        match self {
            FileLines::Direct(lines) => lines.next_line(),
            FileLines::Decompressed(lines) => lines.next_line(),
        }
    }
}
