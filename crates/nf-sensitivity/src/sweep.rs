//! Rate-multiplier sweeps: runs that differ only in one reaction's factor.

use std::collections::BTreeMap;

use nf_abundance::AbundanceSnapshot;
use nf_core::{Real, Tolerances, nearly_equal};
use tracing::debug;

use crate::error::{SensitivityError, SensitivityResult};
use crate::fit::SensitivityPoint;

/// Final abundances of one run together with its multiplier.
#[derive(Debug, Clone)]
pub struct SweepRun {
    pub name: String,
    pub factor: Real,
    pub abundances: AbundanceSnapshot,
}

/// One row of a single-isotope sweep, ordered by factor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepRow {
    pub factor: Real,
    pub abundance: Real,
    /// `abundance / abundance(baseline)`; `None` outside ratio mode.
    pub ratio: Option<Real>,
}

/// Final X of `isotope` in every run that lists it, sorted by factor.
///
/// In ratio mode the run with factor 1 must be among them; each row then
/// also carries the ratio to that baseline.
pub fn isotope_sweep(
    isotope: &str,
    runs: &[SweepRun],
    ratio_mode: bool,
) -> SensitivityResult<Vec<SweepRow>> {
    let mut rows: Vec<SweepRow> = runs
        .iter()
        .filter_map(|run| {
            run.abundances.get(isotope).map(|abundance| SweepRow {
                factor: run.factor,
                abundance,
                ratio: None,
            })
        })
        .collect();

    if rows.is_empty() {
        return Err(SensitivityError::IsotopeNotFound {
            isotope: isotope.to_string(),
        });
    }
    rows.sort_by(|a, b| a.factor.total_cmp(&b.factor));

    if ratio_mode {
        let baseline = rows
            .iter()
            .find(|row| nearly_equal(row.factor, 1.0, Tolerances::default()))
            .map(|row| row.abundance)
            .ok_or(SensitivityError::MissingBaseline)?;
        if baseline == 0.0 {
            return Err(SensitivityError::ZeroBaseline {
                isotope: isotope.to_string(),
            });
        }
        for row in &mut rows {
            row.ratio = Some(row.abundance / baseline);
        }
    }

    Ok(rows)
}

/// Isotope filters for a multi-isotope sweep.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepOptions {
    /// Keep isotopes with mass number strictly below this.
    pub mass_number_max: Option<u32>,
    /// Ignore isotopes whose baseline X is at or below this.
    pub min_baseline: Real,
}

impl Default for SweepOptions {
    fn default() -> Self {
        Self {
            mass_number_max: Some(40),
            min_baseline: 1e-30,
        }
    }
}

/// Ratio points `(factor, X_run / X_baseline)` per isotope.
///
/// Isotopes come from the baseline. A run that does not list an isotope
/// contributes no point for it.
pub fn collect_ratios(
    baseline: &AbundanceSnapshot,
    runs: &[SweepRun],
    options: &SweepOptions,
) -> BTreeMap<String, Vec<SensitivityPoint>> {
    let cut = |snapshot: &AbundanceSnapshot| match options.mass_number_max {
        Some(max) => snapshot.with_mass_number_below(max),
        None => snapshot.clone(),
    };

    let base = cut(baseline);
    let min_baseline = options.min_baseline.max(0.0);
    let mut ratios: BTreeMap<String, Vec<SensitivityPoint>> = BTreeMap::new();

    for run in runs {
        let run_x = cut(&run.abundances);
        let mut added = 0usize;
        for entry in base.entries() {
            if entry.x <= min_baseline {
                continue;
            }
            let Some(x) = run_x.get(&entry.isotope) else {
                continue;
            };
            ratios
                .entry(entry.isotope.clone())
                .or_default()
                .push(SensitivityPoint::new(run.factor, x / entry.x));
            added += 1;
        }
        debug!(run = %run.name, factor = run.factor, points = added, "collected sweep ratios");
    }

    ratios
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(name: &str, factor: Real, pairs: &[(&str, Real)]) -> SweepRun {
        SweepRun {
            name: name.to_string(),
            factor,
            abundances: AbundanceSnapshot::from_pairs(pairs.iter().copied()),
        }
    }

    #[test]
    fn sweep_sorted_with_ratios() {
        let runs = vec![
            run("fact_10", 10.0, &[("F-19", 4e-8)]),
            run("baseline", 1.0, &[("F-19", 2e-8)]),
            run("fact_0.1", 0.1, &[("F-19", 1e-8), ("O-16", 0.01)]),
        ];
        let rows = isotope_sweep("F-19", &runs, true).unwrap();
        let factors: Vec<_> = rows.iter().map(|r| r.factor).collect();
        assert_eq!(factors, vec![0.1, 1.0, 10.0]);
        assert!((rows[0].ratio.unwrap() - 0.5).abs() < 1e-12);
        assert!((rows[2].ratio.unwrap() - 2.0).abs() < 1e-12);

        let raw = isotope_sweep("F-19", &runs, false).unwrap();
        assert!(raw.iter().all(|r| r.ratio.is_none()));
    }

    #[test]
    fn ratio_mode_needs_baseline() {
        let runs = vec![run("fact_10", 10.0, &[("F-19", 4e-8)])];
        assert_eq!(
            isotope_sweep("F-19", &runs, true),
            Err(SensitivityError::MissingBaseline)
        );
        assert!(isotope_sweep("F-19", &runs, false).is_ok());
    }

    #[test]
    fn zero_baseline_and_unknown_isotope() {
        let runs = vec![
            run("baseline", 1.0, &[("F-19", 0.0)]),
            run("fact_10", 10.0, &[("F-19", 4e-8)]),
        ];
        assert!(matches!(
            isotope_sweep("F-19", &runs, true),
            Err(SensitivityError::ZeroBaseline { .. })
        ));
        assert!(matches!(
            isotope_sweep("Na-23", &runs, true),
            Err(SensitivityError::IsotopeNotFound { .. })
        ));
    }

    #[test]
    fn collect_applies_filters() {
        let baseline = AbundanceSnapshot::from_pairs([
            ("O-16", 0.01),
            ("F-19", 1e-8),
            ("Ne-20", 1e-40),
            ("Ca-40", 1e-3),
        ]);
        let runs = vec![
            run("fact_10", 10.0, &[("O-16", 0.02), ("F-19", 2e-8), ("Ne-20", 1.0), ("Ca-40", 1.0)]),
            run("fact_0.1", 0.1, &[("O-16", 0.005)]),
        ];
        let ratios = collect_ratios(&baseline, &runs, &SweepOptions::default());

        let isotopes: Vec<_> = ratios.keys().map(String::as_str).collect();
        assert_eq!(isotopes, vec!["F-19", "O-16"]);
        assert_eq!(ratios["O-16"].len(), 2);
        assert_eq!(ratios["F-19"].len(), 1);
        assert!((ratios["F-19"][0].ratio - 2.0).abs() < 1e-12);
    }

    #[test]
    fn no_mass_cut() {
        let baseline = AbundanceSnapshot::from_pairs([("Ca-40", 1e-3)]);
        let runs = vec![run("fact_2", 2.0, &[("Ca-40", 2e-3)])];
        let opts = SweepOptions {
            mass_number_max: None,
            ..Default::default()
        };
        assert_eq!(collect_ratios(&baseline, &runs, &opts).len(), 1);
    }
}
