//! Turning resolved headers plus one row of fields into a record

use indexmap::IndexMap;
use std::convert::Infallible;
use std::marker::PhantomData;

/// Error type a materializer may report for a row
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Header-keyed record produced by [`KeyedFields`]
pub type KeyedRecord = IndexMap<String, String>;

/// Strategy converting `(headers, fields)` into the record type a reader yields
///
/// The reader only calls [`materialize`](Self::materialize) once the field
/// count has been checked against the headers, so both slices have the same
/// length (except in headerless mode, where `headers` is empty).
pub trait RecordMaterializer {
    /// Record handed to the consumer
    type Record;
    /// Failure reported for a row that cannot become a record
    type Error: Into<BoxError>;

    /// Build one record from the resolved headers and a row's fields
    fn materialize(
        &mut self,
        headers: &[String],
        fields: Vec<String>,
    ) -> Result<Self::Record, Self::Error>;
}

/// Yields the field sequence unchanged
#[derive(Debug, Clone, Copy, Default)]
pub struct RawFields;

impl RecordMaterializer for RawFields {
    type Record = Vec<String>;
    type Error = Infallible;

    fn materialize(
        &mut self,
        _headers: &[String],
        fields: Vec<String>,
    ) -> Result<Vec<String>, Infallible> {
        Ok(fields)
    }
}

/// Yields a header → value map in header order
///
/// Duplicate header names keep their first position and the last value.
/// Fields without a header (headerless mode) are keyed by their zero-based
/// column index.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyedFields;

impl RecordMaterializer for KeyedFields {
    type Record = KeyedRecord;
    type Error = Infallible;

    fn materialize(
        &mut self,
        headers: &[String],
        fields: Vec<String>,
    ) -> Result<KeyedRecord, Infallible> {
        let mut map = IndexMap::with_capacity(fields.len());
        for (column, value) in fields.into_iter().enumerate() {
            let key = match headers.get(column) {
                Some(header) => header.clone(),
                None => column.to_string(),
            };
            map.insert(key, value);
        }
        Ok(map)
    }
}

/// Caller-supplied construction of typed records
///
/// All type coercion lives in the closure; whatever error it returns is
/// passed back to the caller wrapped in
/// [`CsvError::Materialize`](crate::CsvError::Materialize) with the line
/// number of the row.
///
/// # Examples
///
/// ```
/// use streamcsv::{CsvReader, FnMaterializer, ReaderConfig};
/// use streamcsv::source::IterLines;
///
/// struct Point {
///     x: i32,
///     y: i32,
/// }
///
/// let parse = FnMaterializer::new(|_headers: &[String], fields: Vec<String>| {
///     Ok::<_, std::num::ParseIntError>(Point {
///         x: fields[0].parse()?,
///         y: fields[1].parse()?,
///     })
/// });
///
/// let mut reader = CsvReader::new(IterLines::new(["x,y", "1,2"]), ReaderConfig::new(), parse);
/// let point = reader.next_record().unwrap();
/// assert_eq!((point.x, point.y), (1, 2));
/// ```
pub struct FnMaterializer<F, T, E> {
    build: F,
    _marker: PhantomData<fn() -> (T, E)>,
}

impl<F, T, E> FnMaterializer<F, T, E>
where
    F: FnMut(&[String], Vec<String>) -> Result<T, E>,
    E: Into<BoxError>,
{
    /// Wrap a closure building one record from headers and fields
    pub fn new(build: F) -> Self {
        Self {
            build,
            _marker: PhantomData,
        }
    }
}

impl<F, T, E> RecordMaterializer for FnMaterializer<F, T, E>
where
    F: FnMut(&[String], Vec<String>) -> Result<T, E>,
    E: Into<BoxError>,
{
    type Record = T;
    type Error = E;

    fn materialize(&mut self, headers: &[String], fields: Vec<String>) -> Result<T, E> {
        (self.build)(headers, fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_raw_fields() {
        let headers = strings(&["a", "b"]);
        let row = RawFields.materialize(&headers, strings(&["1", "2"])).unwrap();
        assert_eq!(row, vec!["1", "2"]);
    }

    #[test]
    fn test_keyed_fields_keep_header_order() {
        let headers = strings(&["z", "a", "m"]);
        let map = KeyedFields
            .materialize(&headers, strings(&["1", "2", "3"]))
            .unwrap();
        let keys: Vec<&str> = map.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
        assert_eq!(map["a"], "2");
    }

    #[test]
    fn test_keyed_fields_duplicate_header_last_wins() {
        let headers = strings(&["id", "name", "id"]);
        let map = KeyedFields
            .materialize(&headers, strings(&["1", "x", "2"]))
            .unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map["id"], "2");
        assert_eq!(map.get_index(0).map(|(k, _)| k.as_str()), Some("id"));
    }

    #[test]
    fn test_keyed_fields_without_headers_use_column_index() {
        let map = KeyedFields.materialize(&[], strings(&["1", "2"])).unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map["0"], "1");
        assert_eq!(map["1"], "2");
    }

    #[test]
    fn test_fn_materializer() {
        let mut sum = FnMaterializer::new(|_h: &[String], fields: Vec<String>| {
            fields
                .iter()
                .map(|f| f.parse::<i64>())
                .sum::<Result<i64, _>>()
        });
        let headers = strings(&["a", "b"]);
        assert_eq!(sum.materialize(&headers, strings(&["3", "4"])).unwrap(), 7);
        assert!(sum.materialize(&headers, strings(&["3", "x"])).is_err());
    }
}
