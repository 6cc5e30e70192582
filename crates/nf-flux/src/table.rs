//! Per-file flux tables.

use std::collections::BTreeMap;
use std::path::Path;

use nf_core::{Real, safe_log10};
use tracing::debug;

use crate::error::{FluxError, FluxResult};
use crate::reaction::{ReactionEvent, ReactionKey};
use crate::record::{RawRecord, decode, parse_records};

/// Threshold used when only "significant" reactions are wanted.
pub const SIGNIFICANT_FLUX: Real = 1e-30;

/// One decoded reaction that passed the table's flux threshold.
#[derive(Debug, Clone, PartialEq)]
pub struct FluxEntry {
    pub key: ReactionKey,
    pub event: ReactionEvent,
}

impl FluxEntry {
    pub fn flux(&self) -> Real {
        self.event.flux
    }

    pub fn abs_flux(&self) -> Real {
        self.event.abs_flux()
    }

    pub fn log10_abs_flux(&self) -> Real {
        safe_log10(self.abs_flux())
    }
}

/// All reactions decoded from one flux file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FluxTable {
    entries: Vec<FluxEntry>,
}

impl FluxTable {
    /// Decode `records`, dropping every row with `|flux| < min_abs_flux`.
    pub fn from_records(
        records: &[RawRecord],
        min_abs_flux: Real,
        origin: &Path,
    ) -> FluxResult<Self> {
        let mut entries = Vec::with_capacity(records.len());
        let mut dropped = 0usize;

        for record in records {
            let event = decode(&record.fields).map_err(|reason| FluxError::Malformed {
                path: origin.to_path_buf(),
                line: record.line,
                reason,
            })?;
            if event.abs_flux() < min_abs_flux {
                dropped += 1;
                continue;
            }
            entries.push(FluxEntry {
                key: event.key(),
                event,
            });
        }

        debug!(
            path = %origin.display(),
            kept = entries.len(),
            dropped,
            "decoded flux table"
        );

        Ok(Self { entries })
    }

    /// Parse and decode file content.
    pub fn parse(content: &str, origin: &Path, min_abs_flux: Real) -> FluxResult<Self> {
        let records = parse_records(content, origin)?;
        Self::from_records(&records, min_abs_flux, origin)
    }

    /// Read and decode a flux file from disk.
    pub fn read(path: &Path, min_abs_flux: Real) -> FluxResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| FluxError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(&content, path, min_abs_flux)
    }

    pub fn entries(&self) -> &[FluxEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries sorted by |flux| descending; equal fluxes keep file order.
    pub fn ranked_by_abs_flux(&self) -> Vec<&FluxEntry> {
        let mut ranked: Vec<&FluxEntry> = self.entries.iter().collect();
        ranked.sort_by(|a, b| b.abs_flux().total_cmp(&a.abs_flux()));
        ranked
    }

    pub fn top(&self, n: usize) -> Vec<&FluxEntry> {
        let mut ranked = self.ranked_by_abs_flux();
        ranked.truncate(n);
        ranked
    }

    /// Reactions with `label` among their products, ranked by |flux|.
    pub fn producers_of(&self, label: &str) -> Vec<&FluxEntry> {
        self.ranked_by_abs_flux()
            .into_iter()
            .filter(|e| e.event.produces(label))
            .collect()
    }

    /// Reactions with `label` among their reactants, ranked by |flux|.
    pub fn destroyers_of(&self, label: &str) -> Vec<&FluxEntry> {
        self.ranked_by_abs_flux()
            .into_iter()
            .filter(|e| e.event.consumes(label))
            .collect()
    }

    /// Σ|flux| per reaction key. Repeated keys are summed.
    pub fn abs_flux_by_reaction(&self) -> BTreeMap<ReactionKey, Real> {
        let mut map = BTreeMap::new();
        for entry in &self.entries {
            *map.entry(entry.key.clone()).or_insert(0.0) += entry.abs_flux();
        }
        map
    }

    /// Σ|flux| of every entry whose key equals `key`; 0.0 when absent.
    pub fn abs_flux_of(&self, key: &ReactionKey) -> Real {
        self.entries
            .iter()
            .filter(|e| &e.key == key)
            .map(FluxEntry::abs_flux)
            .sum()
    }
}
