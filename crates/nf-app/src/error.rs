//! Error types for the nf-app service layer.

use std::path::PathBuf;

/// Application error type that wraps errors from the analysis crates and
/// gives the CLI one error interface.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Failed to read config file: {path}")]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Config error: {0}")]
    Config(String),

    #[error("Run folder not found: {path}")]
    RunNotFound { path: PathBuf },

    #[error("No flux_*.DAT files found in {path}")]
    NoFluxFiles { path: PathBuf },

    #[error("No runs matching {pattern:?} found in {path}")]
    NoMatchingRuns { pattern: String, path: PathBuf },

    #[error("Flux error: {0}")]
    Flux(String),

    #[error("Abundance error: {0}")]
    Abundance(String),

    #[error("Sensitivity error: {0}")]
    Sensitivity(String),

    #[error("Failed to write report: {path}")]
    ReportWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Report error: {0}")]
    Report(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for nf-app operations.
pub type AppResult<T> = Result<T, AppError>;

// Conversions from backend error types
impl From<nf_core::NfError> for AppError {
    fn from(err: nf_core::NfError) -> Self {
        AppError::InvalidInput(err.to_string())
    }
}

impl From<nf_flux::FluxError> for AppError {
    fn from(err: nf_flux::FluxError) -> Self {
        AppError::Flux(err.to_string())
    }
}

impl From<nf_abundance::AbundanceError> for AppError {
    fn from(err: nf_abundance::AbundanceError) -> Self {
        AppError::Abundance(err.to_string())
    }
}

impl From<nf_sensitivity::SensitivityError> for AppError {
    fn from(err: nf_sensitivity::SensitivityError) -> Self {
        AppError::Sensitivity(err.to_string())
    }
}

impl From<csv::Error> for AppError {
    fn from(err: csv::Error) -> Self {
        AppError::Report(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Report(err.to_string())
    }
}
