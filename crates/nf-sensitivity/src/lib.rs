//! nf-sensitivity: response of final abundances to a reaction-rate factor.
//!
//! Provides:
//! - Run-folder multiplier parsing (`fact_<number>`, `baseline`)
//! - Single-isotope sweeps and multi-isotope ratio collection
//! - Power-law fit (slope α, peak deviation S)
//! - Rankings by S and by |α|

pub mod error;
pub mod factor;
pub mod fit;
pub mod rank;
pub mod sweep;

// Re-exports for ergonomics
pub use error::{SensitivityError, SensitivityResult};
pub use factor::{BASELINE_NAME, factor_from_name, sweep_factor};
pub use fit::{SensitivityFit, SensitivityPoint, fit_power_law, least_squares_slope};
pub use rank::{RankedSensitivity, fit_all, rank_by_magnitude, rank_by_slope};
pub use sweep::{SweepOptions, SweepRow, SweepRun, collect_ratios, isotope_sweep};
