//! Flux decoding errors.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for flux operations.
pub type FluxResult<T> = Result<T, FluxError>;

/// Why a single record could not be decoded.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RecordError {
    #[error("expected at least {expected} columns, found {found}")]
    TooFewColumns { expected: usize, found: usize },

    #[error("row has {found} columns but the first data row has {expected}")]
    InconsistentColumns { expected: usize, found: usize },

    #[error("non-numeric field {token:?}")]
    NotNumeric { token: String },

    #[error("invalid {what} value {value}")]
    InvalidSlot { what: &'static str, value: f64 },
}

/// Errors raised while reading flux record files.
#[derive(Error, Debug)]
pub enum FluxError {
    #[error("Failed to read flux file: {path}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Malformed flux record in {path} at line {line}: {reason}")]
    Malformed {
        path: PathBuf,
        line: usize,
        reason: RecordError,
    },

    #[error("Flux file name carries no step index: {path}")]
    NoStepIndex { path: PathBuf },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_names_file_and_line() {
        let err = FluxError::Malformed {
            path: PathBuf::from("runs/baseline/flux_00010.DAT"),
            line: 7,
            reason: RecordError::TooFewColumns {
                expected: 10,
                found: 4,
            },
        };
        let msg = err.to_string();
        assert!(msg.contains("flux_00010.DAT"));
        assert!(msg.contains("line 7"));
        assert!(msg.contains("found 4"));
    }
}
