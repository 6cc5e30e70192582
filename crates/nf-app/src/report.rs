//! Report rows and their CSV / JSON writers.

use std::collections::BTreeMap;
use std::path::Path;

use nf_compare::{Comparison, Joined, RatioChange};
use nf_core::Real;
use nf_flux::{FluxEntry, IntegratedFlux, ReactionKey, SeriesPoint};
use nf_sensitivity::{RankedSensitivity, SweepRow};
use serde::Serialize;

use crate::error::{AppError, AppResult};

/// One reaction of a flux table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FluxRow {
    pub log10_abs_flux: Real,
    pub flux: Real,
    pub abs_flux: Real,
    pub reaction: String,
}

impl From<&FluxEntry> for FluxRow {
    fn from(entry: &FluxEntry) -> Self {
        Self {
            log10_abs_flux: entry.log10_abs_flux(),
            flux: entry.flux(),
            abs_flux: entry.abs_flux(),
            reaction: entry.key.to_string(),
        }
    }
}

/// Change of one reaction's |flux| between two files.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FluxChangeRow {
    pub delta_log10: Real,
    pub abs_flux_a: Real,
    pub abs_flux_b: Real,
    pub reaction: String,
}

impl From<&RatioChange<ReactionKey>> for FluxChangeRow {
    fn from(change: &RatioChange<ReactionKey>) -> Self {
        Self {
            delta_log10: change.log_ratio,
            abs_flux_a: change.a,
            abs_flux_b: change.b,
            reaction: change.key.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntegratedRow {
    pub reaction: String,
    pub integrated_flux: Real,
    pub log10_integrated_flux: Real,
}

impl From<&IntegratedFlux> for IntegratedRow {
    fn from(flux: &IntegratedFlux) -> Self {
        Self {
            reaction: flux.key.to_string(),
            integrated_flux: flux.integrated_flux,
            log10_integrated_flux: flux.log10_integrated_flux(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeriesRow {
    pub step: u64,
    pub abs_flux: Real,
    pub log10_abs_flux: Real,
}

impl From<&SeriesPoint> for SeriesRow {
    fn from(point: &SeriesPoint) -> Self {
        Self {
            step: point.step,
            abs_flux: point.abs_flux,
            log10_abs_flux: point.log10_abs_flux(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeCategory {
    Created,
    Destroyed,
    Enhanced,
    Depleted,
}

/// One isotope of an abundance comparison, flattened for CSV.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChangeRow {
    pub isotope: String,
    pub category: ChangeCategory,
    pub x_a: Real,
    pub x_b: Real,
    pub ratio: Option<Real>,
    pub log_ratio: Option<Real>,
}

impl ChangeRow {
    fn joined(entry: &Joined<String>, category: ChangeCategory) -> Self {
        Self {
            isotope: entry.key.clone(),
            category,
            x_a: entry.a,
            x_b: entry.b,
            ratio: None,
            log_ratio: None,
        }
    }

    fn ratio(change: &RatioChange<String>) -> Self {
        let category = if change.is_enhanced() {
            ChangeCategory::Enhanced
        } else {
            ChangeCategory::Depleted
        };
        Self {
            isotope: change.key.clone(),
            category,
            x_a: change.a,
            x_b: change.b,
            ratio: Some(change.ratio),
            log_ratio: Some(change.log_ratio),
        }
    }
}

/// Created, destroyed, then the ranked top-N changes.
///
/// Ranked entries with a log ratio of exactly zero are neither enhanced nor
/// depleted and are left out.
pub fn change_rows(comparison: &Comparison<String>) -> Vec<ChangeRow> {
    let created = comparison
        .created
        .iter()
        .map(|e| ChangeRow::joined(e, ChangeCategory::Created));
    let destroyed = comparison
        .destroyed
        .iter()
        .map(|e| ChangeRow::joined(e, ChangeCategory::Destroyed));
    let ranked = comparison
        .top()
        .iter()
        .filter(|c| c.log_ratio != 0.0)
        .map(ChangeRow::ratio);
    created.chain(destroyed).chain(ranked).collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PairedRow {
    pub isotope: String,
    pub x_initial: Real,
    pub x_final: Real,
    pub ratio: Option<Real>,
}

impl From<&nf_abundance::PairedAbundance> for PairedRow {
    fn from(p: &nf_abundance::PairedAbundance) -> Self {
        Self {
            isotope: p.isotope.clone(),
            x_initial: p.x_initial,
            x_final: p.x_final,
            ratio: p.ratio,
        }
    }
}

/// One isotope of a top-N abundance listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AbundanceRow {
    pub isotope: String,
    #[serde(rename = "X")]
    pub x: Real,
}

impl From<&nf_abundance::AbundanceEntry> for AbundanceRow {
    fn from(e: &nf_abundance::AbundanceEntry) -> Self {
        Self {
            isotope: e.isotope.clone(),
            x: e.x,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvolutionRow {
    pub file: String,
    pub time: Real,
    #[serde(rename = "X")]
    pub x: Real,
}

impl From<&nf_abundance::EvolutionPoint> for EvolutionRow {
    fn from(p: &nf_abundance::EvolutionPoint) -> Self {
        Self {
            file: p.file.clone(),
            time: p.time,
            x: p.x,
        }
    }
}

/// Single-isotope sweep row.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FactorRow {
    pub factor: Real,
    pub final_abundance: Real,
    pub ratio_to_baseline: Option<Real>,
}

impl From<&SweepRow> for FactorRow {
    fn from(row: &SweepRow) -> Self {
        Self {
            factor: row.factor,
            final_abundance: row.abundance,
            ratio_to_baseline: row.ratio,
        }
    }
}

/// One isotope of the sensitivity ranking. An undefined slope is `None`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SensitivityRow {
    pub isotope: String,
    pub mass_number: Option<u32>,
    pub s: Real,
    pub alpha: Option<Real>,
    pub points: usize,
    pub clamped: bool,
}

impl From<&RankedSensitivity> for SensitivityRow {
    fn from(r: &RankedSensitivity) -> Self {
        Self {
            isotope: r.isotope.clone(),
            mass_number: r.mass_number,
            s: r.magnitude(),
            alpha: r.fit.has_slope().then_some(r.slope()),
            points: r.fit.points.len(),
            clamped: r.fit.clamped,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CurvePoint {
    pub factor: Real,
    pub ratio: Real,
}

/// Everything the sensitivity command produces, for JSON output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SensitivitySummary {
    pub pattern: String,
    pub mass_number_max: Option<u32>,
    pub min_s: Real,
    pub ranking: Vec<SensitivityRow>,
    /// Top-N isotopes with a defined slope, largest |α| first.
    pub slopes: Vec<SensitivityRow>,
    /// Ratio curves of the top-N isotopes.
    pub curves: BTreeMap<String, Vec<CurvePoint>>,
}

/// Write rows as CSV with a header taken from the row type.
pub fn write_csv<T: Serialize>(path: &Path, rows: &[T]) -> AppResult<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush().map_err(|e| AppError::ReportWrite {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(())
}

/// Write a value as pretty-printed JSON.
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> AppResult<()> {
    let json = serde_json::to_string_pretty(value)?;
    std::fs::write(path, json).map_err(|e| AppError::ReportWrite {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use nf_compare::{ClassifyOptions, classify};

    #[test]
    fn change_rows_cover_every_bucket() {
        let a = vec![
            ("O-16".to_string(), 0.01),
            ("F-19".to_string(), 1e-8),
            ("N-14".to_string(), 0.02),
        ];
        let b = vec![
            ("O-16".to_string(), 0.02),
            ("Ne-20".to_string(), 0.001),
            ("N-14".to_string(), 0.002),
        ];
        let cmp = classify(a, b, &ClassifyOptions::default());
        let rows = change_rows(&cmp);

        let cats: Vec<_> = rows.iter().map(|r| (r.isotope.as_str(), r.category)).collect();
        assert_eq!(
            cats,
            vec![
                ("Ne-20", ChangeCategory::Created),
                ("F-19", ChangeCategory::Destroyed),
                ("N-14", ChangeCategory::Depleted),
                ("O-16", ChangeCategory::Enhanced),
            ]
        );
        assert_eq!(rows[0].ratio, None);
        assert!((rows[2].log_ratio.unwrap() + 1.0).abs() < 1e-12);
    }

    #[test]
    fn categories_serialize_lowercase() {
        let json = serde_json::to_string(&ChangeCategory::Created).unwrap();
        assert_eq!(json, "\"created\"");
    }
}
