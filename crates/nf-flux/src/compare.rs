//! Flux snapshot comparison between two files.

use std::collections::BTreeMap;

use nf_compare::{ClassifyOptions, Comparison, RatioChange, classify};
use nf_core::Real;

use crate::reaction::{ReactionEvent, ReactionKey};
use crate::table::FluxTable;

/// Per-reaction change in |flux| from table A to table B.
#[derive(Debug, Clone)]
pub struct FluxComparison {
    pub comparison: Comparison<ReactionKey>,
    events: BTreeMap<ReactionKey, ReactionEvent>,
}

impl FluxComparison {
    /// Reactions present in both tables, largest |Δlog10|flux|| first.
    pub fn largest_changes(&self, top: usize) -> &[RatioChange<ReactionKey>] {
        let ranked = &self.comparison.ranked;
        &ranked[..top.min(ranked.len())]
    }

    /// Changed reactions that produce `label`.
    pub fn production_changes(&self, label: &str, top: usize) -> Vec<&RatioChange<ReactionKey>> {
        self.filtered(top, |event| event.produces(label))
    }

    /// Changed reactions that consume `label`.
    pub fn destruction_changes(&self, label: &str, top: usize) -> Vec<&RatioChange<ReactionKey>> {
        self.filtered(top, |event| event.consumes(label))
    }

    fn filtered<F>(&self, top: usize, keep: F) -> Vec<&RatioChange<ReactionKey>>
    where
        F: Fn(&ReactionEvent) -> bool,
    {
        self.comparison
            .ranked
            .iter()
            .filter(|change| self.events.get(&change.key).is_some_and(&keep))
            .take(top)
            .collect()
    }
}

/// Compare the summed |flux| per reaction of `a` and `b`.
///
/// `log_ratio` of each both-present entry is `log10|flux_B| - log10|flux_A|`.
/// Reactions present on one side only land in `created`/`destroyed`.
pub fn compare_tables(a: &FluxTable, b: &FluxTable, floor: Real) -> FluxComparison {
    let options = ClassifyOptions {
        floor,
        log_tolerance: None,
        top: None,
    };
    let comparison = classify(a.abs_flux_by_reaction(), b.abs_flux_by_reaction(), &options);

    let mut events = BTreeMap::new();
    for entry in b.entries().iter().chain(a.entries()) {
        events.insert(entry.key.clone(), entry.event.clone());
    }

    FluxComparison { comparison, events }
}
