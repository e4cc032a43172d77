//! Lenient CSV line tokenizer
//!
//! RFC 4180 quoting with three relaxations: a quote in the middle of an
//! unquoted field is literal text, characters after a closing quote start a
//! new unquoted field, and an unterminated quoted field runs to end of line.

use crate::error::Result;
use crate::types::Row;

const QUOTE: char = '"';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Outside quotes (initial)
    Field,
    /// Inside a quoted field
    QuotedField,
    /// Just saw a quote inside a quoted field: either a close or `""`
    QuoteInQuoted,
}

/// CSV parser for one candidate line at a time
pub struct CsvParser {
    delimiter: char,
}

impl CsvParser {
    /// Create a parser for the given delimiter
    ///
    /// A quote, CR or LF delimiter is replaced by a comma.
    pub fn new(delimiter: char) -> Self {
        Self {
            delimiter: super::sanitize_delimiter(delimiter),
        }
    }

    /// Delimiter in effect after sanitizing
    pub fn delimiter(&self) -> char {
        self.delimiter
    }

    /// Parse CSV line into a row
    ///
    /// Always yields at least one field, whatever the input looks like. The
    /// only failure is running out of memory for the row buffers.
    pub fn parse_line(&self, line: &str) -> Result<Row> {
        let mut fields: Vec<String> = Vec::new();
        let mut current_field = String::new();
        // The accumulator never outgrows the line
        current_field.try_reserve(line.len())?;

        let mut state = State::Field;
        let mut chars = line.chars();
        let mut next = chars.next();

        while let Some(ch) = next {
            let mut consumed = true;

            match state {
                State::Field => {
                    if ch == self.delimiter {
                        close_field(&mut fields, &mut current_field)?;
                    } else if ch == QUOTE && current_field.is_empty() {
                        state = State::QuotedField;
                    } else if ch == '\r' || ch == '\n' {
                        break;
                    } else {
                        // Includes a quote after other text in an unquoted field
                        current_field.push(ch);
                    }
                }
                State::QuotedField => {
                    if ch == QUOTE {
                        state = State::QuoteInQuoted;
                    } else {
                        current_field.push(ch);
                    }
                }
                State::QuoteInQuoted => {
                    if ch == QUOTE {
                        current_field.push(QUOTE);
                        state = State::QuotedField;
                    } else if ch == self.delimiter {
                        close_field(&mut fields, &mut current_field)?;
                        state = State::Field;
                    } else if ch == '\r' || ch == '\n' {
                        // Closing quote at end of line; the final push below
                        // still adds an empty trailing field.
                        close_field(&mut fields, &mut current_field)?;
                        break;
                    } else {
                        // Stray text after a closing quote: close the quoted
                        // field and re-read this character as unquoted text.
                        close_field(&mut fields, &mut current_field)?;
                        state = State::Field;
                        consumed = false;
                    }
                }
            }

            if consumed {
                next = chars.next();
            }
        }

        // Last field, including an unterminated quoted one
        close_field(&mut fields, &mut current_field)?;
        fields.shrink_to_fit();

        Ok(Row::new(fields))
    }
}

/// Move the accumulated text into a freshly allocated field
fn close_field(fields: &mut Vec<String>, current_field: &mut String) -> Result<()> {
    let mut field = String::new();
    field.try_reserve_exact(current_field.len())?;
    field.push_str(current_field);
    fields.try_reserve(1)?;
    fields.push(field);
    current_field.clear();
    Ok(())
}

/// Tokenize a single candidate line with the given delimiter
///
/// ```
/// use lenient_csv::tokenize;
///
/// assert_eq!(tokenize(r#""a""b",c"#, ',')?, [r#"a"b"#, "c"]);
/// assert_eq!(tokenize("", ',')?, [""]);
/// # Ok::<(), lenient_csv::CsvError>(())
/// ```
pub fn tokenize(line: &str, delimiter: char) -> Result<Row> {
    CsvParser::new(delimiter).parse_line(line)
}
