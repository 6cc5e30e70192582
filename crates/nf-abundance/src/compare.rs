//! Snapshot-to-snapshot comparisons.

use nf_compare::{ClassifyOptions, Comparison, classify};
use nf_core::Real;

use crate::snapshot::AbundanceSnapshot;

/// Classify every isotope of `b` relative to `a`.
pub fn compare_snapshots(
    a: &AbundanceSnapshot,
    b: &AbundanceSnapshot,
    options: &ClassifyOptions,
) -> Comparison<String> {
    classify(a.pairs(), b.pairs(), options)
}

/// Initial and final X of one isotope side by side.
#[derive(Debug, Clone, PartialEq)]
pub struct PairedAbundance {
    pub isotope: String,
    pub x_initial: Real,
    pub x_final: Real,
    /// `x_final / x_initial`; `None` when the initial value is zero.
    pub ratio: Option<Real>,
}

/// Isotopes listed in both snapshots, most abundant in `final_` first.
pub fn paired_top(
    initial: &AbundanceSnapshot,
    final_: &AbundanceSnapshot,
    top: usize,
) -> Vec<PairedAbundance> {
    final_
        .entries()
        .iter()
        .filter_map(|entry| {
            let x_initial = initial.get(&entry.isotope)?;
            Some(PairedAbundance {
                isotope: entry.isotope.clone(),
                x_initial,
                x_final: entry.x,
                ratio: (x_initial != 0.0).then(|| entry.x / x_initial),
            })
        })
        .take(top)
        .collect()
}
