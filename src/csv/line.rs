//! Physical line reading, line-ending normalization and skip filtering

use crate::error::{CsvError, Result};
use std::borrow::Cow;
use std::io::BufRead;

/// Strip one trailing LF and, directly before it, one trailing CR
///
/// No other trailing whitespace is touched. A lone trailing CR without a
/// following LF is kept.
///
/// ```
/// use lenient_csv::csv::strip_line_ending;
///
/// assert_eq!(strip_line_ending("a,b\r\n"), "a,b");
/// assert_eq!(strip_line_ending("a,b \n"), "a,b ");
/// assert_eq!(strip_line_ending("a,b\r"), "a,b\r");
/// ```
pub fn strip_line_ending(line: &str) -> &str {
    match line.strip_suffix('\n') {
        Some(rest) => rest.strip_suffix('\r').unwrap_or(rest),
        None => line,
    }
}

/// Whether a line carries no data: empty or a comment after leading whitespace
///
/// Only ASCII whitespace (space, tab, LF, VT, FF, CR) counts; a line holding
/// just a non-breaking space is data.
pub fn is_skippable(line: &str) -> bool {
    let rest = line.trim_start_matches(|c: char| c.is_ascii_whitespace() || c == '\x0b');
    rest.is_empty() || rest.starts_with('#')
}

/// Pulls candidate lines from a buffered source
///
/// Every physical line consumed bumps the line counter, including the blank
/// and comment lines that are discarded.
pub struct LineReader<R> {
    reader: R,
    raw: Vec<u8>,
    line: String,
    line_number: u64,
}

impl<R: BufRead> LineReader<R> {
    /// Wrap a buffered source
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            raw: Vec::with_capacity(1024),
            line: String::with_capacity(1024),
            line_number: 0,
        }
    }

    /// Number of physical lines consumed so far
    pub fn line_number(&self) -> u64 {
        self.line_number
    }

    /// Read up to the next line that is neither blank nor a comment
    ///
    /// Returns `Ok(None)` once the source is exhausted. The returned text has
    /// its line ending removed and borrows the reader's internal buffer.
    /// Invalid UTF-8 sequences are replaced with U+FFFD.
    pub fn next_candidate_line(&mut self) -> Result<Option<&str>> {
        loop {
            self.raw.clear();
            let bytes_read =
                self.reader
                    .read_until(b'\n', &mut self.raw)
                    .map_err(|source| CsvError::Read {
                        line: self.line_number,
                        source,
                    })?;
            if bytes_read == 0 {
                return Ok(None);
            }
            self.line_number += 1;

            self.line.clear();
            match String::from_utf8_lossy(&self.raw) {
                Cow::Borrowed(text) => self.line.push_str(text),
                Cow::Owned(text) => {
                    tracing::debug!(line = self.line_number, "replaced invalid UTF-8");
                    self.line.push_str(&text);
                }
            }

            let stripped_len = strip_line_ending(&self.line).len();
            self.line.truncate(stripped_len);

            if is_skippable(&self.line) {
                tracing::debug!(line = self.line_number, "skipping blank or comment line");
                continue;
            }
            return Ok(Some(&self.line));
        }
    }

    /// Release the wrapped source
    pub fn into_inner(self) -> R {
        self.reader
    }
}
