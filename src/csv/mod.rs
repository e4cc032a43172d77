//! CSV utilities for line reading, tokenizing and encoding

mod encoder;
mod line;
mod parser;

pub use encoder::CsvEncoder;
pub use line::{is_skippable, strip_line_ending, LineReader};
pub use parser::{tokenize, CsvParser};

/// Comma delimiter (default)
pub const DELIM_COMMA: char = ',';
/// Semicolon delimiter
pub const DELIM_SEMICOLON: char = ';';
/// Tab delimiter
pub const DELIM_TAB: char = '\t';
/// Pipe delimiter
pub const DELIM_PIPE: char = '|';

/// Replace a delimiter that would clash with quoting or line breaks
///
/// A double quote, CR, LF or NUL becomes [`DELIM_COMMA`]; anything else is
/// returned unchanged.
///
/// ```
/// use lenient_csv::sanitize_delimiter;
///
/// assert_eq!(sanitize_delimiter(';'), ';');
/// assert_eq!(sanitize_delimiter('"'), ',');
/// ```
pub fn sanitize_delimiter(delimiter: char) -> char {
    match delimiter {
        '"' | '\r' | '\n' | '\0' => {
            tracing::warn!(?delimiter, "illegal delimiter, falling back to comma");
            DELIM_COMMA
        }
        other => other,
    }
}
