//! nf-abundance: isotope mass-fraction tables for nucleoflux.
//!
//! Provides:
//! - `AbundanceSnapshot` (label → X, sorted by X descending)
//! - Initial-abundance composition parsing
//! - Final-abundance CSV loading
//! - Per-dump summaries joined with dump times
//! - Snapshot comparison helpers built on `nf-compare`

pub mod compare;
pub mod error;
pub mod evolution;
pub mod final_table;
pub mod initial;
pub mod snapshot;

// Re-exports for ergonomics
pub use compare::{PairedAbundance, compare_snapshots, paired_top};
pub use error::{AbundanceError, AbundanceResult};
pub use evolution::{
    DUMP_PREFIX, EvolutionPoint, SUMMARY_FILE, SummaryRow, isotope_evolution, read_agej,
    read_summary,
};
pub use final_table::{FINAL_ABUNDANCE_FILE, parse_final_abundances, read_final_abundances};
pub use initial::{DEFAULT_INITIAL_FILE, parse_initial_abundances, read_initial_abundances};
pub use snapshot::{AbundanceEntry, AbundanceSnapshot};
