//! CSV reading session with lazy open and header handling

use crate::csv::{sanitize_delimiter, CsvParser, LineReader, DELIM_COMMA};
use crate::error::{CsvError, Result};
use crate::types::Row;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};

/// Reader configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ReaderOptions {
    /// Field delimiter. A quote, CR, LF or NUL is replaced by a comma.
    pub delimiter: char,
    /// Whether the first candidate line is a header
    pub has_header: bool,
}

impl Default for ReaderOptions {
    fn default() -> Self {
        Self {
            delimiter: DELIM_COMMA,
            has_header: false,
        }
    }
}

type BoxedLineReader = LineReader<Box<dyn BufRead>>;

enum Source {
    /// Path not opened yet
    Pending(PathBuf),
    Open(BoxedLineReader),
    /// Released after an open or read error
    Failed,
    /// Released by `close()`
    Closed,
}

enum HeaderState {
    Unresolved,
    /// `None` when the input ended before any candidate line
    Resolved(Option<Row>),
}

/// Lenient CSV reader over a file or any byte stream
///
/// Reads one candidate line per row: blank lines and `#` comments are
/// skipped, and each remaining line is tokenized on its own. The source is
/// opened on first access and the header, when enabled, is resolved once and
/// cached for the reader's lifetime.
///
/// # Examples
///
/// ```no_run
/// use lenient_csv::CsvReader;
///
/// let mut reader = CsvReader::open("data.csv");
///
/// for row_result in reader.rows() {
///     let row = row_result?;
///     println!("{:?}", row.fields());
/// }
/// # Ok::<(), lenient_csv::CsvError>(())
/// ```
///
/// # With Headers
///
/// ```
/// use lenient_csv::CsvReader;
///
/// let data = "# people\nname,age\n\nAnn,30\n";
/// let mut reader = CsvReader::from_reader(data.as_bytes()).has_header(true);
///
/// assert_eq!(reader.headers()?.unwrap(), &["name", "age"]);
/// assert_eq!(reader.read_row()?.unwrap(), ["Ann", "30"]);
/// assert_eq!(reader.read_row()?, None);
/// # Ok::<(), lenient_csv::CsvError>(())
/// ```
pub struct CsvReader {
    source: Source,
    header: HeaderState,
    options: ReaderOptions,
    line_number: u64,
    row_count: u64,
}

impl CsvReader {
    /// Create a reader for a file path
    ///
    /// Nothing is opened until the first call to [`headers`](Self::headers)
    /// or [`read_row`](Self::read_row); a missing file surfaces there.
    pub fn open<P: AsRef<Path>>(path: P) -> Self {
        Self::with_source(Source::Pending(path.as_ref().to_path_buf()))
    }

    /// Create a reader over an already-open byte stream
    ///
    /// ```
    /// use lenient_csv::CsvReader;
    ///
    /// let mut reader = CsvReader::from_reader("a;b\n".as_bytes()).delimiter(';');
    /// assert_eq!(reader.read_row()?.unwrap(), ["a", "b"]);
    /// # Ok::<(), lenient_csv::CsvError>(())
    /// ```
    pub fn from_reader<R: Read + 'static>(reader: R) -> Self {
        let boxed: Box<dyn BufRead> = Box::new(BufReader::new(reader));
        Self::with_source(Source::Open(LineReader::new(boxed)))
    }

    fn with_source(source: Source) -> Self {
        CsvReader {
            source,
            header: HeaderState::Unresolved,
            options: ReaderOptions::default(),
            line_number: 0,
            row_count: 0,
        }
    }

    /// Set custom delimiter (builder pattern)
    pub fn delimiter(mut self, delimiter: char) -> Self {
        self.options.delimiter = sanitize_delimiter(delimiter);
        self
    }

    /// Indicate that the first candidate line is a header (builder pattern)
    ///
    /// The header is then served by [`headers`](Self::headers) and never
    /// returned as a data row.
    pub fn has_header(mut self, has: bool) -> Self {
        self.options.has_header = has;
        self
    }

    /// Apply a full set of options (builder pattern)
    pub fn with_options(self, options: ReaderOptions) -> Self {
        self.delimiter(options.delimiter).has_header(options.has_header)
    }

    /// Options in effect
    pub fn options(&self) -> &ReaderOptions {
        &self.options
    }

    /// Get the header row
    ///
    /// Returns `Ok(None)` when headers are disabled or the input holds no
    /// candidate line. The first call consumes exactly one candidate line;
    /// later calls return the cached row without touching the source.
    pub fn headers(&mut self) -> Result<Option<&Row>> {
        if !self.options.has_header {
            return Ok(None);
        }
        self.resolve_header()?;
        match &self.header {
            HeaderState::Resolved(header) => Ok(header.as_ref()),
            HeaderState::Unresolved => Ok(None),
        }
    }

    /// Read the next data row
    ///
    /// Returns `Ok(None)` at end of data. When headers are enabled and not yet
    /// read, the header line is consumed first.
    ///
    /// An open or read error releases the source; every later call fails with
    /// [`CsvError::InvalidState`].
    pub fn read_row(&mut self) -> Result<Option<Row>> {
        if self.options.has_header {
            self.resolve_header()?;
        }

        let row = self.next_row()?;
        match &row {
            Some(row) => {
                self.row_count += 1;
                tracing::trace!(line = self.line_number, fields = row.len(), "read row");
            }
            None => tracing::debug!(lines = self.line_number, rows = self.row_count, "end of data"),
        }
        Ok(row)
    }

    /// Get iterator over data rows
    ///
    /// The iterator stops after yielding the first error.
    pub fn rows(&mut self) -> CsvRowIterator<'_> {
        CsvRowIterator {
            reader: self,
            done: false,
        }
    }

    /// Number of physical lines consumed so far, skipped lines included
    pub fn line_number(&self) -> u64 {
        self.line_number
    }

    /// Number of data rows returned so far (the header is not counted)
    pub fn row_count(&self) -> u64 {
        self.row_count
    }

    /// Whether the source has been released by `close()` or an error
    pub fn is_closed(&self) -> bool {
        matches!(self.source, Source::Closed | Source::Failed)
    }

    /// Release the source and the cached header
    ///
    /// Calling this more than once is a no-op.
    pub fn close(&mut self) {
        if matches!(self.source, Source::Closed) {
            return;
        }
        self.source = Source::Closed;
        self.header = HeaderState::Unresolved;
        tracing::debug!(lines = self.line_number, rows = self.row_count, "closed CSV reader");
    }

    fn resolve_header(&mut self) -> Result<()> {
        if let HeaderState::Resolved(_) = self.header {
            return Ok(());
        }
        let header = self.next_row()?;
        tracing::debug!(
            line = self.line_number,
            fields = header.as_ref().map_or(0, Row::len),
            "resolved header"
        );
        self.header = HeaderState::Resolved(header);
        Ok(())
    }

    fn next_row(&mut self) -> Result<Option<Row>> {
        let outcome = match open_source(&mut self.source) {
            Ok(reader) => {
                let parser = CsvParser::new(self.options.delimiter);
                let outcome = match reader.next_candidate_line() {
                    Ok(Some(line)) => parser.parse_line(line).map(Some),
                    Ok(None) => Ok(None),
                    Err(e) => Err(e),
                };
                self.line_number = reader.line_number();
                outcome
            }
            Err(e) => Err(e),
        };

        if let Err(e) = &outcome {
            if matches!(self.source, Source::Open(_)) || matches!(e, CsvError::Open { .. }) {
                tracing::debug!(error = %e, "releasing CSV source after error");
                self.source = Source::Failed;
                self.header = HeaderState::Unresolved;
            }
        }
        outcome
    }
}

/// Open a pending path and hand out its line reader
fn open_source(source: &mut Source) -> Result<&mut BoxedLineReader> {
    if matches!(source, Source::Pending(_)) {
        if let Source::Pending(path) = std::mem::replace(source, Source::Failed) {
            let file = match File::open(&path) {
                Ok(file) => file,
                Err(e) => return Err(CsvError::Open { path, source: e }),
            };
            tracing::debug!(path = %path.display(), "opened CSV source");
            let boxed: Box<dyn BufRead> = Box::new(BufReader::new(file));
            *source = Source::Open(LineReader::new(boxed));
        }
    }

    match source {
        Source::Open(reader) => Ok(reader),
        Source::Closed => Err(CsvError::InvalidState("reader is closed".to_string())),
        Source::Failed | Source::Pending(_) => Err(CsvError::InvalidState(
            "source was released after an earlier error".to_string(),
        )),
    }
}

/// Iterator over CSV data rows
pub struct CsvRowIterator<'a> {
    reader: &'a mut CsvReader,
    done: bool,
}

impl<'a> Iterator for CsvRowIterator<'a> {
    type Item = Result<Row>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.reader.read_row() {
            Ok(Some(row)) => Some(Ok(row)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    fn reader(data: &'static str) -> CsvReader {
        CsvReader::from_reader(data.as_bytes())
    }

    #[test]
    fn test_read_rows_without_header() -> Result<()> {
        let mut reader = reader("a,b,c\n\"a,b\",c\n");
        let rows = reader.rows().collect::<Result<Vec<_>>>()?;

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], ["a", "b", "c"]);
        assert_eq!(rows[1], ["a,b", "c"]);
        assert_eq!(reader.row_count(), 2);
        assert_eq!(reader.headers()?, None);
        Ok(())
    }

    #[test]
    fn test_header_consumed_before_first_row() -> Result<()> {
        let mut reader = reader("name,age\nAnn,30\nBob,41\n").has_header(true);

        // Header resolved implicitly by the first row read
        assert_eq!(reader.read_row()?.unwrap(), ["Ann", "30"]);
        assert_eq!(reader.headers()?.unwrap(), &["name", "age"]);
        assert_eq!(reader.read_row()?.unwrap(), ["Bob", "41"]);
        assert_eq!(reader.read_row()?, None);
        assert_eq!(reader.row_count(), 2);
        Ok(())
    }

    #[test]
    fn test_header_is_cached() -> Result<()> {
        let mut reader = reader("h1,h2\nd1,d2\n").has_header(true);

        assert_eq!(reader.headers()?.unwrap(), &["h1", "h2"]);
        assert_eq!(reader.line_number(), 1);
        assert_eq!(reader.headers()?.unwrap(), &["h1", "h2"]);
        assert_eq!(reader.line_number(), 1);
        assert_eq!(reader.read_row()?.unwrap(), ["d1", "d2"]);
        Ok(())
    }

    #[test]
    fn test_header_skips_comments_and_blank_lines() -> Result<()> {
        let mut reader = reader("# generated\n\n  \nid\n1\n").has_header(true);
        assert_eq!(reader.headers()?.unwrap(), &["id"]);
        assert_eq!(reader.line_number(), 4);
        Ok(())
    }

    #[test]
    fn test_header_on_empty_input() -> Result<()> {
        let mut reader = reader("# nothing here\n").has_header(true);
        assert_eq!(reader.headers()?, None);
        assert_eq!(reader.read_row()?, None);
        Ok(())
    }

    #[test]
    fn test_line_number_counts_skipped_lines() -> Result<()> {
        let mut reader = reader("# comment\n\nx,y\n");
        assert_eq!(reader.read_row()?.unwrap(), ["x", "y"]);
        assert_eq!(reader.line_number(), 3);
        assert_eq!(reader.read_row()?, None);
        assert_eq!(reader.row_count(), 1);
        Ok(())
    }

    #[test]
    fn test_lone_cr_after_closing_quote_at_end_of_input() -> Result<()> {
        let mut reader = reader("x,\"q\"\r");
        assert_eq!(reader.read_row()?.unwrap(), ["x", "q", ""]);
        assert_eq!(reader.read_row()?, None);
        assert_eq!(reader.line_number(), 1);
        Ok(())
    }

    #[test]
    fn test_illegal_delimiter_behaves_like_comma() -> Result<()> {
        for delimiter in ['"', '\r', '\n'] {
            let mut reader = reader("a,b\n").delimiter(delimiter);
            assert_eq!(reader.options().delimiter, ',');
            assert_eq!(reader.read_row()?.unwrap(), ["a", "b"]);
        }
        Ok(())
    }

    #[test]
    fn test_with_options() -> Result<()> {
        let options = ReaderOptions {
            delimiter: '|',
            has_header: true,
        };
        let mut reader = reader("k|v\n1|2\n").with_options(options);
        assert_eq!(reader.options(), &options);
        assert_eq!(reader.headers()?.unwrap(), &["k", "v"]);
        assert_eq!(reader.read_row()?.unwrap(), ["1", "2"]);
        Ok(())
    }

    #[test]
    fn test_close_is_idempotent() -> Result<()> {
        let mut reader = reader("a\nb\n").has_header(true);
        assert!(reader.headers()?.is_some());

        reader.close();
        assert!(reader.is_closed());
        reader.close();
        assert!(reader.is_closed());

        assert!(matches!(reader.read_row(), Err(CsvError::InvalidState(_))));
        assert!(matches!(reader.headers(), Err(CsvError::InvalidState(_))));
        Ok(())
    }

    #[test]
    fn test_missing_file_is_reported_lazily() {
        let mut reader = CsvReader::open("definitely/not/here.csv");
        assert!(!reader.is_closed());

        let err = reader.read_row().unwrap_err();
        assert!(matches!(err, CsvError::Open { .. }));
        assert!(reader.is_closed());

        // No retry: the session stays unusable
        assert!(matches!(reader.read_row(), Err(CsvError::InvalidState(_))));
        reader.close();
    }

    struct BrokenAfterFirstLine {
        served: bool,
    }

    impl Read for BrokenAfterFirstLine {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.served {
                return Err(io::Error::new(io::ErrorKind::Other, "connection reset"));
            }
            self.served = true;
            let data = b"a,b\n";
            buf[..data.len()].copy_from_slice(data);
            Ok(data.len())
        }
    }

    #[test]
    fn test_read_error_poisons_session() {
        let mut reader = CsvReader::from_reader(BrokenAfterFirstLine { served: false });
        let mut rows = reader.rows();

        assert_eq!(rows.next().unwrap().unwrap(), ["a", "b"]);
        assert!(matches!(rows.next(), Some(Err(CsvError::Read { line: 1, .. }))));
        assert!(rows.next().is_none());

        assert!(reader.is_closed());
        assert!(matches!(reader.read_row(), Err(CsvError::InvalidState(_))));
    }
}
