//! nf-flux: reaction flux records for nucleoflux.
//!
//! Provides:
//! - Decoding of fixed-layout flux records into reaction events
//! - Per-file flux tables with threshold filtering
//! - Integration and time series across time-step files
//! - Flux snapshot comparison between two files
//!
//! # Example
//!
//! ```
//! use std::path::Path;
//! use nf_flux::FluxTable;
//!
//! let content = "1 8 15 1 1 9 16 0 0 2.5e-6 0 0\n";
//! let table = FluxTable::parse(content, Path::new("flux_00001.DAT"), 0.0).unwrap();
//! assert_eq!(table.entries()[0].key.as_str(), "O-15 + H-1 -> F-16");
//! ```

pub mod aggregate;
pub mod compare;
pub mod error;
pub mod reaction;
pub mod record;
pub mod table;

// Re-exports for ergonomics
pub use aggregate::{
    IntegratedFlux, SERIES_LOG_FLOOR, SeriesPoint, StepTable, integrate, load_step_tables,
    step_index, time_series,
};
pub use compare::{FluxComparison, compare_tables};
pub use error::{FluxError, FluxResult, RecordError};
pub use reaction::{ReactionEvent, ReactionKey};
pub use record::{MIN_COLUMNS, RawRecord, decode, decode_with, parse_records};
pub use table::{FluxEntry, FluxTable, SIGNIFICANT_FLUX};
