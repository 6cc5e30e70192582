//! Analysis configuration loaded from YAML.
//!
//! Every field is optional in the file. Fields left as `None` fall back to
//! the default of the command that reads them, and explicit CLI flags win
//! over anything set here.

use std::path::{Path, PathBuf};

use nf_core::{Real, ensure_non_negative};
use nf_sensitivity::SweepOptions;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Rows shown in ranked tables.
    pub top: Option<usize>,
    /// Minimum |flux| for a reaction to be kept.
    pub min_flux: Option<Real>,
    /// `|log10(B/A)|` at or below this counts as no change.
    pub log_tolerance: Option<Real>,
    /// Both abundances must exceed this before a ratio is taken.
    pub ratio_floor: Option<Real>,
    pub initial_abundance: PathBuf,
    pub runs_dir: PathBuf,
    pub baseline: PathBuf,
    pub sensitivity: SensitivityConfig,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            top: None,
            min_flux: None,
            log_tolerance: None,
            ratio_floor: None,
            initial_abundance: PathBuf::from(nf_abundance::DEFAULT_INITIAL_FILE),
            runs_dir: PathBuf::from("runs"),
            baseline: PathBuf::from("runs").join(nf_sensitivity::BASELINE_NAME),
            sensitivity: SensitivityConfig::default(),
        }
    }
}

/// Settings for the multi-isotope sensitivity ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SensitivityConfig {
    /// Only isotopes with A strictly below this; `None` keeps all.
    pub mass_number_max: Option<u32>,
    /// Isotopes plotted / shown in the slope ranking.
    pub top_n: usize,
    /// Minimum S for inclusion.
    pub min_s: Real,
    /// Ignore isotopes whose baseline X is at or below this.
    pub min_baseline: Real,
}

impl Default for SensitivityConfig {
    fn default() -> Self {
        let sweep = SweepOptions::default();
        Self {
            mass_number_max: sweep.mass_number_max,
            top_n: 12,
            min_s: 0.0,
            min_baseline: sweep.min_baseline,
        }
    }
}

impl AnalysisConfig {
    /// Reject negative or non-finite thresholds.
    pub fn validate(&self) -> AppResult<()> {
        let optional = [
            (self.min_flux, "min_flux"),
            (self.log_tolerance, "log_tolerance"),
            (self.ratio_floor, "ratio_floor"),
        ];
        for (value, what) in optional {
            if let Some(v) = value {
                ensure_non_negative(v, what)?;
            }
        }
        ensure_non_negative(self.sensitivity.min_s, "sensitivity.min_s")?;
        ensure_non_negative(self.sensitivity.min_baseline, "sensitivity.min_baseline")?;
        Ok(())
    }
}

impl SensitivityConfig {
    pub fn sweep_options(&self) -> SweepOptions {
        SweepOptions {
            mass_number_max: self.mass_number_max,
            min_baseline: self.min_baseline,
        }
    }
}

/// Load an analysis config from a YAML file.
pub fn load_config(path: &Path) -> AppResult<AnalysisConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| AppError::ConfigRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    parse_config(&content)
}

pub fn parse_config(content: &str) -> AppResult<AnalysisConfig> {
    let config: AnalysisConfig = serde_yaml::from_str(content)
        .map_err(|e| AppError::Config(format!("Failed to parse config YAML: {}", e)))?;
    config.validate()?;
    Ok(config)
}
