//! JSONL reading operations.
//!
//! This module provides async functionality for reading JSONL data line-by-line
//! with line number tracking for error reporting.

use crate::error::{Error, Result};
use serde::de::DeserializeOwned;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};

/// Async reader for JSONL (JSON Lines) data.
///
/// `JsonlReader` wraps an async reader and yields one record per non-empty
/// line. Blank lines (including whitespace-only lines) are skipped but still
/// counted, so reported line numbers match the physical input.
///
/// # Type Parameters
///
/// * `R` - The underlying async reader type. Must implement [`AsyncRead`] and [`Unpin`].
///
/// # Examples
///
/// ```
/// use dragons_jsonl::JsonlReader;
/// use serde_json::Value;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> dragons_jsonl::Result<()> {
/// let payload: &[u8] = b"{\"a\":1}\n\n{\"a\":2}\n";
/// let mut reader = JsonlReader::new(payload);
/// let values: Vec<Value> = reader.read_all().await?;
/// assert_eq!(values.len(), 2);
/// assert_eq!(reader.line_number(), 3);
/// # Ok(())
/// # }
/// ```
pub struct JsonlReader<R> {
    /// Buffered reader wrapping the underlying async reader.
    reader: BufReader<R>,
    /// Current line number (1-based counting, 0 before any lines are read) for error reporting.
    line_number: usize,
    /// Reused line buffer.
    buffer: String,
}

impl<R: AsyncRead + Unpin> JsonlReader<R> {
    /// Creates a new `JsonlReader` wrapping the given async reader.
    ///
    /// Line numbering uses 1-based indexing: the counter starts at 0 and increments
    /// after each line is read, so the first line read is numbered 1.
    #[must_use]
    pub fn new(reader: R) -> Self {
        Self {
            reader: BufReader::new(reader),
            line_number: 0,
            buffer: String::new(),
        }
    }

    /// Creates a new `JsonlReader` with a custom buffer capacity.
    #[must_use]
    pub fn with_capacity(reader: R, capacity: usize) -> Self {
        Self {
            reader: BufReader::with_capacity(capacity, reader),
            line_number: 0,
            buffer: String::new(),
        }
    }

    /// Returns the current line number.
    ///
    /// Returns 0 before any lines have been read. After reading, returns the
    /// 1-based line number of the last line read, blank lines included.
    #[must_use]
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// Reads the next non-empty line without decoding it.
    ///
    /// The returned text has surrounding whitespace (including a trailing
    /// `\r`) removed. Returns `Ok(None)` at end of input.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if the underlying reader fails or the input is not
    /// valid UTF-8.
    pub async fn next_line(&mut self) -> Result<Option<&str>> {
        loop {
            self.buffer.clear();
            let read = self.reader.read_line(&mut self.buffer).await?;
            if read == 0 {
                return Ok(None);
            }
            self.line_number += 1;

            if !self.buffer.trim().is_empty() {
                return Ok(Some(self.buffer.trim()));
            }
        }
    }

    /// Reads and decodes the next non-empty line.
    ///
    /// Returns `Ok(None)` at end of input.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidLine` with the offending line number if the line
    /// is not valid JSON for `T`, or `Error::Io` if reading fails.
    pub async fn read_line<T: DeserializeOwned>(&mut self) -> Result<Option<T>> {
        let Some(line) = self.next_line().await? else {
            return Ok(None);
        };

        match serde_json::from_str(line) {
            Ok(value) => Ok(Some(value)),
            Err(source) => {
                tracing::debug!(line_number = self.line_number, error = %source, "Malformed JSONL line");
                Err(Error::InvalidLine {
                    line_number: self.line_number,
                    source,
                })
            }
        }
    }

    /// Reads and decodes every remaining line.
    ///
    /// Decoding stops at the first malformed line; nothing decoded so far is
    /// returned in that case.
    ///
    /// # Errors
    ///
    /// Same as [`read_line`](Self::read_line).
    pub async fn read_all<T: DeserializeOwned>(&mut self) -> Result<Vec<T>> {
        let mut records = Vec::new();
        while let Some(record) = self.read_line().await? {
            records.push(record);
        }
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Row {
        id: u32,
    }

    #[test]
    fn new_reader_starts_at_line_zero() {
        let reader = JsonlReader::new(&b""[..]);
        assert_eq!(reader.line_number(), 0);
    }

    #[tokio::test]
    async fn empty_input_yields_none() {
        let mut reader = JsonlReader::new(&b""[..]);
        let row: Option<Row> = reader.read_line().await.unwrap();
        assert!(row.is_none());
        assert_eq!(reader.line_number(), 0);
    }

    #[tokio::test]
    async fn blank_lines_are_skipped_but_counted() {
        let mut reader = JsonlReader::new(&b"\n   \n{\"id\":7}\n"[..]);
        let row: Row = reader.read_line().await.unwrap().unwrap();
        assert_eq!(row, Row { id: 7 });
        assert_eq!(reader.line_number(), 3);
    }

    #[tokio::test]
    async fn last_line_without_newline_is_read() {
        let mut reader = JsonlReader::new(&b"{\"id\":1}\n{\"id\":2}"[..]);
        let rows: Vec<Row> = reader.read_all().await.unwrap();
        assert_eq!(rows, vec![Row { id: 1 }, Row { id: 2 }]);
    }

    #[tokio::test]
    async fn crlf_line_endings_are_trimmed() {
        let mut reader = JsonlReader::new(&b"{\"id\":1}\r\n"[..]);
        assert_eq!(reader.next_line().await.unwrap(), Some("{\"id\":1}"));
    }

    #[tokio::test]
    async fn malformed_line_reports_line_number() {
        let mut reader = JsonlReader::new(&b"{\"id\":1}\n{\"id\":\n"[..]);
        let err = reader.read_all::<Row>().await.unwrap_err();
        match err {
            Error::InvalidLine { line_number, .. } => assert_eq!(line_number, 2),
            other => panic!("expected InvalidLine, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn next_line_returns_raw_text() {
        let mut reader = JsonlReader::with_capacity(&b"not json at all\n"[..], 16);
        assert_eq!(reader.next_line().await.unwrap(), Some("not json at all"));
        assert_eq!(reader.next_line().await.unwrap(), None);
    }

    #[tokio::test]
    async fn invalid_utf8_is_an_io_error() {
        let mut reader = JsonlReader::new(&[0xff, 0xfe, b'\n'][..]);
        let err = reader.next_line().await.unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
