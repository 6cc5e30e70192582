//! Decoded reaction events and their canonical keys.

use core::fmt;

use nf_core::{Isotope, Real};

/// Canonical reaction identity, e.g. `O-15 + H-1 -> F-16`.
///
/// Two events with the same key are the same reaction; aggregation sums
/// their fluxes.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ReactionKey(String);

impl ReactionKey {
    /// Render the key from present participants only.
    pub fn from_participants(reactants: &[Isotope], products: &[Isotope]) -> Self {
        let lhs = join(reactants);
        let rhs = join(products);
        let key = match (lhs.is_empty(), rhs.is_empty()) {
            (false, false) => format!("{lhs} -> {rhs}"),
            (false, true) => format!("{lhs} ->"),
            (true, false) => format!("-> {rhs}"),
            (true, true) => "->".to_string(),
        };
        Self(key)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn join(isotopes: &[Isotope]) -> String {
    isotopes
        .iter()
        .map(Isotope::label)
        .collect::<Vec<_>>()
        .join(" + ")
}

impl From<&str> for ReactionKey {
    /// Wrap a user-supplied key. Surrounding whitespace is ignored and runs
    /// of inner whitespace collapse to one space so hand-typed keys match.
    fn from(s: &str) -> Self {
        Self(s.split_whitespace().collect::<Vec<_>>().join(" "))
    }
}

impl fmt::Debug for ReactionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ReactionKey({})", self.0)
    }
}

impl fmt::Display for ReactionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One decoded flux record.
#[derive(Debug, Clone, PartialEq)]
pub struct ReactionEvent {
    /// Up to two reactants, in slot order.
    pub reactants: Vec<Isotope>,
    /// Up to two products, in slot order.
    pub products: Vec<Isotope>,
    /// Signed flux as written by the simulator.
    pub flux: Real,
}

impl ReactionEvent {
    pub fn key(&self) -> ReactionKey {
        ReactionKey::from_participants(&self.reactants, &self.products)
    }

    pub fn abs_flux(&self) -> Real {
        self.flux.abs()
    }

    pub fn produces(&self, label: &str) -> bool {
        self.products.iter().any(|iso| iso.label() == label)
    }

    pub fn consumes(&self, label: &str) -> bool {
        self.reactants.iter().any(|iso| iso.label() == label)
    }
}
