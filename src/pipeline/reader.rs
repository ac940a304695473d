use crate::constants::required_columns;
use crate::error::{LoaderError, Result};
use crate::types::InputRecord;
use csv::{ReaderBuilder, StringRecord};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// Streams Form 477 records out of a comma-delimited source.
///
/// The first line is taken as the header; every later line is decoded by
/// column name into an [`InputRecord`]. Records are produced one at a time
/// and the raw field buffer is reused between reads.
pub struct RecordReader<R: Read> {
    inner: csv::Reader<R>,
    headers: StringRecord,
    current: StringRecord,
    current_line: u64,
}

impl RecordReader<File> {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        // csv buffers internally
        let file = File::open(path.as_ref())?;
        Self::from_reader(file)
    }
}

impl<R: Read> RecordReader<R> {
    pub fn from_reader(source: R) -> Result<Self> {
        let mut inner = ReaderBuilder::new()
            .delimiter(b',')
            .has_headers(true)
            .flexible(false)
            .from_reader(source);

        let headers = inner
            .headers()
            .map_err(|source| LoaderError::Parse { line: 1, source })?
            .clone();

        for column in required_columns() {
            if !headers.iter().any(|h| h == column) {
                return Err(LoaderError::MissingColumn(column.to_string()));
            }
        }
        debug!(columns = headers.len(), "parsed CSV header");

        Ok(Self {
            inner,
            headers,
            current: StringRecord::new(),
            current_line: 1,
        })
    }

    /// Read the next data line. `Ok(None)` at end of stream.
    pub fn next_record(&mut self) -> Result<Option<InputRecord>> {
        let line = self.inner.position().line();
        let has_more = self
            .inner
            .read_record(&mut self.current)
            .map_err(|source| LoaderError::Parse {
                line: error_line(&source).unwrap_or(line),
                source,
            })?;
        if !has_more {
            return Ok(None);
        }
        self.current_line = self
            .current
            .position()
            .map(|p| p.line())
            .unwrap_or(line);

        let mut record: InputRecord = self
            .current
            .deserialize(Some(&self.headers))
            .map_err(|source| LoaderError::Parse {
                line: self.current_line,
                source,
            })?;
        record.line = self.current_line;
        Ok(Some(record))
    }

    /// The most recently read line as a column name -> value object.
    pub fn describe_current(&self) -> serde_json::Value {
        let mut row = serde_json::Map::with_capacity(self.headers.len());
        for (name, value) in self.headers.iter().zip(self.current.iter()) {
            row.insert(name.to_string(), serde_json::Value::String(value.to_string()));
        }
        serde_json::Value::Object(row)
    }

    pub fn current_line(&self) -> u64 {
        self.current_line
    }
}

impl<R: Read> Iterator for RecordReader<R> {
    type Item = Result<InputRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_record().transpose()
    }
}

fn error_line(err: &csv::Error) -> Option<u64> {
    err.position().map(|p| p.line())
}
