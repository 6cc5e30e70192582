//! nf-core: stable foundation for nucleoflux.
//!
//! Contains:
//! - isotope (element table, isotope identity and labels)
//! - numeric (Real + tolerances + log helpers)
//! - error (shared error types)

pub mod error;
pub mod isotope;
pub mod numeric;

// Re-exports: nice ergonomics for downstream crates
pub use error::{NfError, NfResult};
pub use isotope::{ELEMENTS, ElementTable, Isotope, mass_number_of};
pub use numeric::*;
