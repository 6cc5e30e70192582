//! Isotope mass-fraction snapshots.

use std::collections::BTreeMap;

use nf_core::{Real, mass_number_of};
use tracing::warn;

/// One isotope's mass fraction.
#[derive(Debug, Clone, PartialEq)]
pub struct AbundanceEntry {
    pub isotope: String,
    pub x: Real,
}

/// Mass fractions keyed by isotope label, kept sorted by X descending.
///
/// Labels are unique. An X of exactly zero is a legitimate "absent" value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AbundanceSnapshot {
    entries: Vec<AbundanceEntry>,
}

impl AbundanceSnapshot {
    /// Build a snapshot; repeated labels have their mass fractions summed.
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, Real)>,
        S: Into<String>,
    {
        let mut merged: BTreeMap<String, Real> = BTreeMap::new();
        for (label, x) in pairs {
            let label = label.into();
            if let Some(existing) = merged.get_mut(&label) {
                warn!(isotope = %label, "repeated isotope in abundance table, summing");
                *existing += x;
            } else {
                merged.insert(label, x);
            }
        }

        let mut entries: Vec<AbundanceEntry> = merged
            .into_iter()
            .map(|(isotope, x)| AbundanceEntry { isotope, x })
            .collect();
        entries.sort_by(|a, b| b.x.total_cmp(&a.x));
        Self { entries }
    }

    /// Entries in descending X order.
    pub fn entries(&self) -> &[AbundanceEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// X for `label`, or `None` if the isotope is not listed.
    pub fn get(&self, label: &str) -> Option<Real> {
        self.entries
            .iter()
            .find(|e| e.isotope == label)
            .map(|e| e.x)
    }

    pub fn pairs(&self) -> impl Iterator<Item = (String, Real)> + '_ {
        self.entries.iter().map(|e| (e.isotope.clone(), e.x))
    }

    /// The `n` most abundant isotopes.
    pub fn top(&self, n: usize) -> &[AbundanceEntry] {
        &self.entries[..n.min(self.entries.len())]
    }

    /// Keep isotopes whose mass number is strictly below `max`.
    ///
    /// Labels without a readable mass number are dropped.
    pub fn with_mass_number_below(&self, max: u32) -> Self {
        let entries = self
            .entries
            .iter()
            .filter(|e| match mass_number_of(&e.isotope) {
                Some(a) => a < max,
                None => {
                    warn!(isotope = %e.isotope, "cannot read mass number, dropping");
                    false
                }
            })
            .cloned()
            .collect();
        Self { entries }
    }
}
