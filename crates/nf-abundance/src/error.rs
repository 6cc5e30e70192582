//! Abundance loading errors.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for abundance operations.
pub type AbundanceResult<T> = Result<T, AbundanceError>;

#[derive(Error, Debug)]
pub enum AbundanceError {
    #[error("Failed to read abundance file: {path}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Abundance file not found: {path}")]
    NotFound { path: PathBuf },

    #[error("CSV error in {path}: {source}")]
    Csv { path: PathBuf, source: csv::Error },

    #[error("Required column {column:?} missing from {path}")]
    MissingColumn { path: PathBuf, column: &'static str },

    #[error("Isotope {isotope:?} not found; known isotopes include {examples}")]
    UnknownIsotope { isotope: String, examples: String },

    #[error("Invalid {column} value {value:?} in {path} at row {row}")]
    InvalidValue {
        path: PathBuf,
        row: usize,
        column: &'static str,
        value: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_column_names_file() {
        let err = AbundanceError::MissingColumn {
            path: PathBuf::from("runs/baseline/final_abundances.csv"),
            column: "X",
        };
        let msg = err.to_string();
        assert!(msg.contains("\"X\""));
        assert!(msg.contains("final_abundances.csv"));
    }
}
