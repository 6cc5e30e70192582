//! High-level analyses behind each CLI command.

use std::collections::BTreeMap;
use std::path::Path;

use nf_abundance::{
    compare_snapshots, isotope_evolution, paired_top, read_initial_abundances, read_summary,
};
use nf_compare::{ClassifyOptions, Comparison, RatioChange};
use nf_core::Real;
use nf_flux::{FluxTable, ReactionKey, compare_tables, integrate, time_series};
use nf_sensitivity::{
    SensitivityError, collect_ratios, fit_all, isotope_sweep, rank_by_magnitude, rank_by_slope,
};
use tracing::{info, warn};

use crate::config::SensitivityConfig;
use crate::error::AppResult;
use crate::report::{
    AbundanceRow, CurvePoint, EvolutionRow, FactorRow, FluxChangeRow, FluxRow, IntegratedRow, PairedRow, SensitivityRow,
    SensitivitySummary, SeriesRow,
};
use crate::run_service::{RunDir, scan_factor_runs, scan_pattern_runs};

/// Top-N reactions of one flux file by |flux|.
pub fn flux_snapshot(path: &Path, min_flux: Real, top: usize) -> AppResult<Vec<FluxRow>> {
    let table = FluxTable::read(path, min_flux)?;
    Ok(table.top(top).into_iter().map(FluxRow::from).collect())
}

/// Producers and destroyers of one isotope within a flux file.
#[derive(Debug, Clone, PartialEq)]
pub struct IsotopeFluxReport {
    pub isotope: String,
    /// Reactions with the isotope among the products, largest |flux| first.
    pub producers: Vec<FluxRow>,
    /// Reactions with the isotope among the reactants, largest |flux| first.
    pub destroyers: Vec<FluxRow>,
    /// The file had no reaction above the threshold at all.
    pub table_empty: bool,
}

pub fn isotope_flux(path: &Path, isotope: &str, min_flux: Real) -> AppResult<IsotopeFluxReport> {
    let table = FluxTable::read(path, min_flux)?;
    Ok(IsotopeFluxReport {
        isotope: isotope.to_string(),
        producers: table
            .producers_of(isotope)
            .into_iter()
            .map(FluxRow::from)
            .collect(),
        destroyers: table
            .destroyers_of(isotope)
            .into_iter()
            .map(FluxRow::from)
            .collect(),
        table_empty: table.is_empty(),
    })
}

/// Per-reaction flux change between two files.
#[derive(Debug, Clone, PartialEq)]
pub struct FluxChangeReport {
    /// Largest |Δlog10|flux|| first, truncated to top-N.
    pub largest: Vec<FluxChangeRow>,
    /// Focus-isotope views; empty without a focus isotope.
    pub production: Vec<FluxChangeRow>,
    pub destruction: Vec<FluxChangeRow>,
    pub only_in_a: usize,
    pub only_in_b: usize,
}

pub fn compare_flux(
    path_a: &Path,
    path_b: &Path,
    focus: Option<&str>,
    top: usize,
) -> AppResult<FluxChangeReport> {
    let a = FluxTable::read(path_a, 0.0)?;
    let b = FluxTable::read(path_b, 0.0)?;
    let cmp = compare_tables(&a, &b, 0.0);

    let (production, destruction) = match focus {
        Some(label) => (
            flux_change_rows(cmp.production_changes(label, top)),
            flux_change_rows(cmp.destruction_changes(label, top)),
        ),
        None => (Vec::new(), Vec::new()),
    };

    Ok(FluxChangeReport {
        largest: cmp
            .largest_changes(top)
            .iter()
            .map(FluxChangeRow::from)
            .collect(),
        production,
        destruction,
        only_in_a: cmp.comparison.destroyed.len(),
        only_in_b: cmp.comparison.created.len(),
    })
}

fn flux_change_rows(changes: Vec<&RatioChange<ReactionKey>>) -> Vec<FluxChangeRow> {
    changes.into_iter().map(FluxChangeRow::from).collect()
}

/// Integrated |flux| per reaction over every step of a run.
pub fn integrate_run(run: &RunDir, min_flux: Real) -> AppResult<Vec<IntegratedRow>> {
    let steps = run.load_steps(min_flux)?;
    let integrated = integrate(steps.iter().map(|s| &s.table));
    Ok(integrated.iter().map(IntegratedRow::from).collect())
}

/// |flux| of one reaction at every step of a run.
pub fn reaction_time_series(
    run: &RunDir,
    reaction: &str,
    min_flux: Real,
) -> AppResult<Vec<SeriesRow>> {
    let key = ReactionKey::from(reaction);
    let steps = run.load_steps(min_flux)?;
    let series = time_series(&steps, &key);

    if series.iter().all(|p| p.abs_flux == 0.0) {
        warn!(reaction = %key, run = %run.name(), "reaction never appears in run");
    }
    Ok(series.iter().map(SeriesRow::from).collect())
}

/// A classified abundance comparison with the labels of both sides.
#[derive(Debug, Clone)]
pub struct AbundanceComparison {
    pub reference: String,
    pub subject: String,
    pub comparison: Comparison<String>,
}

/// Final abundances of `run_b` relative to `run_a`.
pub fn compare_runs(
    run_a: &RunDir,
    run_b: &RunDir,
    options: &ClassifyOptions,
) -> AppResult<AbundanceComparison> {
    let a = run_a.final_abundances()?;
    let b = run_b.final_abundances()?;
    info!(reference = %run_a.name(), subject = %run_b.name(), "comparing final abundances");

    Ok(AbundanceComparison {
        reference: run_a.name(),
        subject: run_b.name(),
        comparison: compare_snapshots(&a, &b, options),
    })
}

/// Final abundances of `run` relative to the initial composition.
pub fn synthesis(
    initial: &Path,
    run: &RunDir,
    options: &ClassifyOptions,
) -> AppResult<AbundanceComparison> {
    let initial_x = read_initial_abundances(initial)?;
    let final_x = run.final_abundances()?;

    Ok(AbundanceComparison {
        reference: "initial".to_string(),
        subject: run.name(),
        comparison: compare_snapshots(&initial_x, &final_x, options),
    })
}

/// Initial and final X side by side for the top-N final isotopes.
pub fn abundance_ratios(initial: &Path, run: &RunDir, top: usize) -> AppResult<Vec<PairedRow>> {
    let initial_x = read_initial_abundances(initial)?;
    let final_x = run.final_abundances()?;
    Ok(paired_top(&initial_x, &final_x, top)
        .iter()
        .map(PairedRow::from)
        .collect())
}

/// The `top` most abundant isotopes at the end of a run.
pub fn final_top(run: &RunDir, top: usize) -> AppResult<Vec<AbundanceRow>> {
    let final_x = run.final_abundances()?;
    Ok(final_x.top(top).iter().map(AbundanceRow::from).collect())
}

/// The `top` most abundant initial isotopes. A positive `threshold` keeps
/// only isotopes with X above it.
pub fn initial_top(initial: &Path, top: usize, threshold: Real) -> AppResult<Vec<AbundanceRow>> {
    let initial_x = read_initial_abundances(initial)?;
    Ok(initial_x
        .entries()
        .iter()
        .filter(|e| threshold <= 0.0 || e.x > threshold)
        .take(top)
        .map(AbundanceRow::from)
        .collect())
}

/// X of one isotope at every dump of a run, in time order.
pub fn time_evolution(run: &RunDir, isotope: &str) -> AppResult<Vec<EvolutionRow>> {
    let rows = read_summary(&run.summary_path())?;
    let times = run.dump_times()?;
    let points = isotope_evolution(&rows, &times, isotope)?;
    Ok(points.iter().map(EvolutionRow::from).collect())
}

/// One isotope across every factor run of `runs_dir`.
pub fn factor_sweep(runs_dir: &Path, isotope: &str, ratio_mode: bool) -> AppResult<Vec<FactorRow>> {
    let runs = scan_factor_runs(runs_dir)?;
    let rows = isotope_sweep(isotope, &runs, ratio_mode)?;
    Ok(rows.iter().map(FactorRow::from).collect())
}

/// Rank isotopes by their response to the runs matching `pattern`.
pub fn sensitivity(
    runs_dir: &Path,
    baseline: &Path,
    pattern: &str,
    config: &SensitivityConfig,
) -> AppResult<SensitivitySummary> {
    let baseline_x = RunDir::open(baseline)?.final_abundances()?;
    let runs = scan_pattern_runs(runs_dir, pattern)?;

    let ratios = collect_ratios(&baseline_x, &runs, &config.sweep_options());
    if ratios.is_empty() {
        return Err(SensitivityError::NoData {
            pattern: pattern.to_string(),
        }
        .into());
    }

    let ranked = rank_by_magnitude(fit_all(ratios), Some(config.min_s));
    let top = &ranked[..config.top_n.min(ranked.len())];
    info!(pattern, isotopes = ranked.len(), "ranked sensitivities");

    let curves: BTreeMap<String, Vec<CurvePoint>> = top
        .iter()
        .map(|r| {
            let points = r
                .fit
                .points
                .iter()
                .map(|p| CurvePoint {
                    factor: p.factor,
                    ratio: p.ratio,
                })
                .collect();
            (r.isotope.clone(), points)
        })
        .collect();

    Ok(SensitivitySummary {
        pattern: pattern.to_string(),
        mass_number_max: config.mass_number_max,
        min_s: config.min_s,
        ranking: ranked.iter().map(SensitivityRow::from).collect(),
        slopes: rank_by_slope(top)
            .into_iter()
            .map(SensitivityRow::from)
            .collect(),
        curves,
    })
}
