//! Flux aggregation across time-step files.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use nf_core::{Real, floored_log10, safe_log10};
use rayon::prelude::*;
use regex::Regex;
use tracing::debug;

use crate::error::{FluxError, FluxResult};
use crate::reaction::ReactionKey;
use crate::table::FluxTable;

/// Floor applied to |flux| before the log in time-series views.
pub const SERIES_LOG_FLOOR: Real = 1e-30;

static STEP_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"flux_(\d+)\.DAT").expect("step pattern is valid"));

/// Step index embedded in a `flux_<digits>.DAT` file name.
pub fn step_index(path: &Path) -> Option<u64> {
    let name = path.file_name()?.to_str()?;
    STEP_PATTERN
        .captures(name)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// A decoded flux file together with its step index.
#[derive(Debug, Clone, PartialEq)]
pub struct StepTable {
    pub step: u64,
    pub table: FluxTable,
}

/// Decode many step files in parallel.
///
/// Output is ordered by step index whatever order the paths come in.
pub fn load_step_tables(paths: &[PathBuf], min_abs_flux: Real) -> FluxResult<Vec<StepTable>> {
    let mut tables = paths
        .par_iter()
        .map(|path| -> FluxResult<StepTable> {
            let step = step_index(path).ok_or_else(|| FluxError::NoStepIndex { path: path.clone() })?;
            let table = FluxTable::read(path, min_abs_flux)?;
            Ok(StepTable { step, table })
        })
        .collect::<FluxResult<Vec<_>>>()?;

    tables.sort_by_key(|t| t.step);
    debug!(files = tables.len(), "loaded step tables");
    Ok(tables)
}

/// Integrated flow through one reaction.
#[derive(Debug, Clone, PartialEq)]
pub struct IntegratedFlux {
    pub key: ReactionKey,
    /// Σ|flux| over every file the reaction appeared in.
    pub integrated_flux: Real,
}

impl IntegratedFlux {
    /// `log10` of the sum, floored at `log10(1e-300)`.
    pub fn log10_integrated_flux(&self) -> Real {
        safe_log10(self.integrated_flux)
    }
}

/// Sum |flux| per reaction over all tables.
///
/// A reaction missing from a file contributes nothing for that file.
/// Result is sorted by integrated flux descending, ties by key.
pub fn integrate<'a, I>(tables: I) -> Vec<IntegratedFlux>
where
    I: IntoIterator<Item = &'a FluxTable>,
{
    let mut sums: BTreeMap<ReactionKey, Real> = BTreeMap::new();
    for table in tables {
        for entry in table.entries() {
            *sums.entry(entry.key.clone()).or_insert(0.0) += entry.abs_flux();
        }
    }

    let mut integrated: Vec<IntegratedFlux> = sums
        .into_iter()
        .map(|(key, integrated_flux)| IntegratedFlux {
            key,
            integrated_flux,
        })
        .collect();
    integrated.sort_by(|a, b| b.integrated_flux.total_cmp(&a.integrated_flux));
    integrated
}

/// One point of a reaction's flux history.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesPoint {
    pub step: u64,
    pub abs_flux: Real,
}

impl SeriesPoint {
    pub fn log10_abs_flux(&self) -> Real {
        floored_log10(self.abs_flux, SERIES_LOG_FLOOR)
    }
}

/// |flux| of `key` at every step, 0.0 where the reaction is absent.
///
/// One point per table, in the order given.
pub fn time_series(tables: &[StepTable], key: &ReactionKey) -> Vec<SeriesPoint> {
    tables
        .iter()
        .map(|t| SeriesPoint {
            step: t.step,
            abs_flux: t.table.abs_flux_of(key),
        })
        .collect()
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn row(i: usize, (z, a, flux): (u32, u32, f64)) -> String {
        format!("{i} {z} {a} 1 1 {} {} 0 0 {flux:e}\n", z + 1, a + 1)
    }

    proptest! {
        #[test]
        fn integration_ignores_file_order(
            files in prop::collection::vec(
                prop::collection::vec((1_u32..6, 1_u32..12, -1.0_f64..1.0), 0..6),
                1..6,
            ),
            rotate in 0_usize..6,
        ) {
            let tables: Vec<FluxTable> = files
                .iter()
                .map(|rows| {
                    let content: String = rows.iter().enumerate().map(|(i, r)| row(i, *r)).collect();
                    FluxTable::parse(&content, Path::new("flux_1.DAT"), 0.0).unwrap()
                })
                .collect();

            let forward = integrate(tables.iter());
            let mut shuffled: Vec<&FluxTable> = tables.iter().rev().collect();
            let len = shuffled.len();
            shuffled.rotate_left(rotate % len);
            let reordered = integrate(shuffled);

            let a: BTreeMap<_, _> = forward.into_iter().map(|i| (i.key, i.integrated_flux)).collect();
            let b: BTreeMap<_, _> = reordered.into_iter().map(|i| (i.key, i.integrated_flux)).collect();
            prop_assert_eq!(a.len(), b.len());
            for (key, sum) in &a {
                let other = b[key];
                prop_assert!((sum - other).abs() <= 1e-12 * sum.abs().max(1.0));
            }

            for (key, sum) in &a {
                let expected: f64 = tables.iter().map(|t| t.abs_flux_of(key)).sum();
                prop_assert!((sum - expected).abs() <= 1e-12 * expected.max(1.0));
            }
        }
    }
}
