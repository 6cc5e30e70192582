//! Shared application service layer for nucleoflux.
//!
//! Locates run folders and input files, runs the flux, abundance and
//! sensitivity analyses, and turns their results into report rows for the
//! CLI to print or save.

pub mod analysis;
pub mod config;
pub mod error;
pub mod report;
pub mod run_service;

// Re-export key types for convenience
pub use analysis::{
    AbundanceComparison, FluxChangeReport, IsotopeFluxReport, abundance_ratios, compare_flux,
    compare_runs, factor_sweep, final_top, flux_snapshot, initial_top, integrate_run, isotope_flux,
    reaction_time_series, sensitivity, synthesis, time_evolution,
};
pub use config::{AnalysisConfig, SensitivityConfig, load_config, parse_config};
pub use error::{AppError, AppResult};
pub use report::{
    AbundanceRow, ChangeCategory, ChangeRow, CurvePoint, EvolutionRow, FactorRow, FluxChangeRow,
    FluxRow, IntegratedRow, PairedRow, SensitivityRow, SensitivitySummary, SeriesRow, change_rows,
    write_csv, write_json,
};
pub use run_service::{RunDir, scan_factor_runs, scan_pattern_runs};
