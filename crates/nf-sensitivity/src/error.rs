//! Sensitivity analysis errors.

use thiserror::Error;

/// Result type for sensitivity operations.
pub type SensitivityResult<T> = Result<T, SensitivityError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SensitivityError {
    #[error("Baseline (factor = 1) not found in sweep")]
    MissingBaseline,

    #[error("Baseline abundance of {isotope} is zero, ratios are undefined")]
    ZeroBaseline { isotope: String },

    #[error("Isotope {isotope} not found in any run of the sweep")]
    IsotopeNotFound { isotope: String },

    #[error("No data collected from runs matching {pattern:?}")]
    NoData { pattern: String },
}
