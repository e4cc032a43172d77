//! CSV encoding that mirrors the tokenizer's quoting rules

use super::line::is_skippable;

const QUOTE: char = '"';

/// CSV encoder for turning fields back into a candidate line
///
/// The output of [`CsvEncoder::encode_row`] tokenizes back to the same fields
/// with the same delimiter, and is never mistaken for a blank or comment line.
pub struct CsvEncoder {
    delimiter: char,
}

impl CsvEncoder {
    /// Create a new CSV encoder for the given delimiter
    pub fn new(delimiter: char) -> Self {
        Self {
            delimiter: super::sanitize_delimiter(delimiter),
        }
    }

    /// Encode entire row into buffer
    pub fn encode_row<'a, I>(&self, fields: I, buffer: &mut String)
    where
        I: IntoIterator<Item = &'a str>,
    {
        for (i, field) in fields.into_iter().enumerate() {
            if i > 0 {
                buffer.push(self.delimiter);
            }
            // A leading field that looks blank or like a comment would make
            // the whole line skippable.
            let force = i == 0 && is_skippable(field);
            self.encode_field(field, force, buffer);
        }
    }

    /// Encode single field with quoting/escaping where required
    fn encode_field(&self, field: &str, force: bool, buffer: &mut String) {
        if force || self.needs_quoting(field) {
            buffer.push(QUOTE);
            for ch in field.chars() {
                if ch == QUOTE {
                    // " -> ""
                    buffer.push(QUOTE);
                }
                buffer.push(ch);
            }
            buffer.push(QUOTE);
        } else {
            buffer.push_str(field);
        }
    }

    fn needs_quoting(&self, field: &str) -> bool {
        field
            .chars()
            .any(|c| c == self.delimiter || c == QUOTE || c == '\n' || c == '\r')
    }
}
