//! Error types for CSV reading

use std::collections::TryReserveError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading CSV data
///
/// Malformed input is never reported here: quoting problems and ragged rows
/// are resolved by the tokenizer. End of input is `Ok(None)`, not an error.
#[derive(Error, Debug)]
pub enum CsvError {
    /// The input source could not be opened
    #[error("Failed to open CSV source {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Reading from the input source failed
    ///
    /// `line` is the number of physical lines consumed before the failure.
    #[error("Failed to read line after line {line}: {source}")]
    Read {
        line: u64,
        #[source]
        source: io::Error,
    },

    /// A row or field buffer could not be grown
    #[error("Out of memory while building row: {0}")]
    Allocation(#[from] TryReserveError),

    /// The reader was closed, or a previous fatal error released its source
    #[error("Invalid state: {0}")]
    InvalidState(String),
}

/// Result type for CSV operations
pub type Result<T> = std::result::Result<T, CsvError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_error_display() {
        let error = CsvError::Open {
            path: PathBuf::from("missing.csv"),
            source: io::Error::new(io::ErrorKind::NotFound, "file not found"),
        };
        assert_eq!(
            error.to_string(),
            "Failed to open CSV source missing.csv: file not found"
        );
    }

    #[test]
    fn test_read_error_display() {
        let error = CsvError::Read {
            line: 7,
            source: io::Error::new(io::ErrorKind::InvalidData, "stream did not contain valid UTF-8"),
        };
        assert_eq!(
            error.to_string(),
            "Failed to read line after line 7: stream did not contain valid UTF-8"
        );
    }

    #[test]
    fn test_allocation_error_conversion() {
        let mut buf: Vec<u8> = Vec::new();
        let reserve_error = buf.try_reserve(usize::MAX).unwrap_err();
        let error: CsvError = reserve_error.into();
        assert!(matches!(error, CsvError::Allocation(_)));
        assert!(error.to_string().starts_with("Out of memory"));
    }

    #[test]
    fn test_invalid_state_display() {
        let error = CsvError::InvalidState("reader is closed".to_string());
        assert_eq!(error.to_string(), "Invalid state: reader is closed");
    }
}
