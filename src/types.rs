//! Type definitions for CSV data

use crate::csv::CsvEncoder;
use std::fmt;
use std::ops::Index;

/// One record produced by tokenizing a candidate line
///
/// Fields keep their column order and are fully unescaped. Rows from the same
/// source may carry different field counts.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Row {
    fields: Vec<String>,
}

impl Row {
    /// Create a row from already-unescaped fields
    pub fn new(fields: Vec<String>) -> Self {
        Row { fields }
    }

    /// Get field by column index
    pub fn get(&self, col: usize) -> Option<&str> {
        self.fields.get(col).map(String::as_str)
    }

    /// Number of fields in the row
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if the row has no fields
    ///
    /// Rows produced by the tokenizer always hold at least one field.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Borrow all fields
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Iterate over fields as string slices
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(String::as_str)
    }

    /// Take ownership of the fields
    pub fn into_fields(self) -> Vec<String> {
        self.fields
    }

    /// Re-encode the row as a single CSV line (no line terminator)
    ///
    /// Tokenizing the result with the same delimiter yields this row again.
    pub fn to_line(&self, delimiter: char) -> String {
        let mut line = String::new();
        CsvEncoder::new(delimiter).encode_row(self.iter(), &mut line);
        line
    }
}

impl fmt::Display for Row {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_line(','))
    }
}

impl Index<usize> for Row {
    type Output = str;

    fn index(&self, col: usize) -> &str {
        &self.fields[col]
    }
}

impl IntoIterator for Row {
    type Item = String;
    type IntoIter = std::vec::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_iter()
    }
}

impl From<Vec<String>> for Row {
    fn from(fields: Vec<String>) -> Self {
        Row::new(fields)
    }
}

impl From<Row> for Vec<String> {
    fn from(row: Row) -> Self {
        row.fields
    }
}

impl PartialEq<[&str]> for Row {
    fn eq(&self, other: &[&str]) -> bool {
        self.fields.len() == other.len() && self.fields.iter().zip(other).all(|(a, b)| a == b)
    }
}

impl<const N: usize> PartialEq<[&str; N]> for Row {
    fn eq(&self, other: &[&str; N]) -> bool {
        self == &other[..]
    }
}

impl PartialEq<Vec<&str>> for Row {
    fn eq(&self, other: &Vec<&str>) -> bool {
        self == other.as_slice()
    }
}
