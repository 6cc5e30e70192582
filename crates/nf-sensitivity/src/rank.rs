//! Ranking isotopes by how strongly they respond to a sweep.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use nf_core::{Real, mass_number_of};

use crate::fit::{SensitivityFit, SensitivityPoint, fit_power_law};

#[derive(Debug, Clone, PartialEq)]
pub struct RankedSensitivity {
    pub isotope: String,
    pub mass_number: Option<u32>,
    pub fit: SensitivityFit,
}

impl RankedSensitivity {
    pub fn magnitude(&self) -> Real {
        self.fit.magnitude
    }

    pub fn slope(&self) -> Real {
        self.fit.slope
    }
}

/// Fit every isotope's points. Output follows the isotope order of `ratios`.
pub fn fit_all(ratios: BTreeMap<String, Vec<SensitivityPoint>>) -> Vec<RankedSensitivity> {
    ratios
        .into_iter()
        .map(|(isotope, points)| RankedSensitivity {
            mass_number: mass_number_of(&isotope),
            fit: fit_power_law(points),
            isotope,
        })
        .collect()
}

/// Descending with NaN after every number.
fn desc_nan_last(a: Real, b: Real) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => b.total_cmp(&a),
    }
}

/// Sort by S descending, NaN last. With `min_s`, entries below it (and
/// NaN entries) are dropped.
pub fn rank_by_magnitude(
    mut results: Vec<RankedSensitivity>,
    min_s: Option<Real>,
) -> Vec<RankedSensitivity> {
    results.sort_by(|a, b| desc_nan_last(a.magnitude(), b.magnitude()));
    if let Some(min_s) = min_s {
        results.retain(|r| r.magnitude() >= min_s);
    }
    results
}

/// Entries with a defined slope, sorted by |α| descending.
pub fn rank_by_slope(results: &[RankedSensitivity]) -> Vec<&RankedSensitivity> {
    let mut ranked: Vec<_> = results.iter().filter(|r| r.fit.has_slope()).collect();
    ranked.sort_by(|a, b| b.slope().abs().total_cmp(&a.slope().abs()));
    ranked
}
