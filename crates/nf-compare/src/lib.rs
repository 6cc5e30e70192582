//! nf-compare: ratio/change classification between two keyed data sets.
//!
//! Works on anything that can be flattened to `(key, value)` pairs, so the
//! same classifier serves abundance snapshots (keyed by isotope label) and
//! flux maps (keyed by reaction).

pub mod classify;

pub use classify::{ClassifyOptions, Comparison, Joined, RatioChange, Significance, classify};
