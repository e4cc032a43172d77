//! # lenient-csv
//!
//! Streaming CSV reader that turns raw text lines into rows of string fields.
//!
//! The reader is deliberately forgiving. On top of the RFC 4180 quoting rules
//! (double-quoted fields, `""` as an escaped quote) it accepts:
//!
//! - LF as well as CRLF line endings
//! - blank lines and `#` comment lines, which are skipped
//! - unterminated quoted fields, which absorb the rest of the line
//! - stray characters after a closing quote
//! - a varying number of fields per record
//!
//! Each physical line yields at most one row. Quoted fields never span lines.
//!
//! ## Quick Start
//!
//! ```no_run
//! use lenient_csv::CsvReader;
//!
//! let mut reader = CsvReader::open("data.csv").has_header(true);
//!
//! if let Some(header) = reader.headers()? {
//!     println!("Columns: {}", header);
//! }
//!
//! while let Some(row) = reader.read_row()? {
//!     println!("{} fields: {:?}", row.len(), row.fields());
//! }
//! # Ok::<(), lenient_csv::CsvError>(())
//! ```
//!
//! ## Tokenizing a single line
//!
//! ```
//! use lenient_csv::tokenize;
//!
//! let row = tokenize(r#""a,b",c"#, ',')?;
//! assert_eq!(row, ["a,b", "c"]);
//! # Ok::<(), lenient_csv::CsvError>(())
//! ```

pub mod csv;
pub mod csv_reader;
pub mod error;
pub mod types;

pub use csv::{
    sanitize_delimiter, tokenize, CsvEncoder, CsvParser, LineReader, DELIM_COMMA, DELIM_PIPE,
    DELIM_SEMICOLON, DELIM_TAB,
};
pub use csv_reader::{CsvReader, CsvRowIterator, ReaderOptions};
pub use error::{CsvError, Result};
pub use types::Row;
