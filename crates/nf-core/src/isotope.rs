//! Isotope identity and the element symbol table.

use core::cmp::Ordering;
use core::fmt;
use core::hash::{Hash, Hasher};
use core::str::FromStr;
use std::borrow::Cow;

use crate::error::NfError;

/// Fixed proton-number → element-symbol table.
///
/// Index 0 holds Z = 1. Built once as a `static` and only ever read.
#[derive(Debug)]
pub struct ElementTable {
    symbols: &'static [&'static str],
}

/// Hydrogen through calcium.
pub static ELEMENTS: ElementTable = ElementTable {
    symbols: &[
        "H", "He", "Li", "Be", "B", "C", "N", "O", "F", "Ne", "Na", "Mg", "Al", "Si", "P", "S",
        "Cl", "Ar", "K", "Ca",
    ],
};

impl ElementTable {
    /// Element symbol for `z`, or the `Z<z>` fallback outside the table.
    pub fn symbol(&self, z: u32) -> Cow<'static, str> {
        match z.checked_sub(1).and_then(|i| self.symbols.get(i as usize)) {
            Some(sym) => Cow::Borrowed(*sym),
            None => Cow::Owned(format!("Z{z}")),
        }
    }

    /// Proton number for a symbol. Accepts the `Z<z>` fallback form too.
    pub fn proton_number(&self, symbol: &str) -> Option<u32> {
        if let Some(i) = self.symbols.iter().position(|s| *s == symbol) {
            return Some(i as u32 + 1);
        }
        symbol
            .strip_prefix('Z')
            .and_then(|digits| digits.parse::<u32>().ok())
            .filter(|z| *z > 0)
    }

    /// Resolve a reaction-record slot.
    ///
    /// `z == 0` marks an empty slot and yields `None`; every other proton
    /// number maps to an isotope.
    pub fn resolve(&self, z: u32, a: u32) -> Option<Isotope> {
        if z == 0 {
            return None;
        }
        Some(Isotope::new(self.symbol(z), a))
    }
}

/// A nuclide identified by its `<Symbol>-<A>` label.
///
/// Equality, hashing and ordering all go through the label.
#[derive(Clone)]
pub struct Isotope {
    label: String,
    mass_number: u32,
}

impl Isotope {
    pub fn new(symbol: impl AsRef<str>, mass_number: u32) -> Self {
        Self {
            label: format!("{}-{}", symbol.as_ref(), mass_number),
            mass_number,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn symbol(&self) -> &str {
        self.label
            .rsplit_once('-')
            .map(|(sym, _)| sym)
            .unwrap_or(&self.label)
    }

    pub fn mass_number(&self) -> u32 {
        self.mass_number
    }
}

impl PartialEq for Isotope {
    fn eq(&self, other: &Self) -> bool {
        self.label == other.label
    }
}

impl Eq for Isotope {}

impl Hash for Isotope {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.label.hash(state);
    }
}

impl PartialOrd for Isotope {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Isotope {
    fn cmp(&self, other: &Self) -> Ordering {
        self.label.cmp(&other.label)
    }
}

impl fmt::Debug for Isotope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Isotope({})", self.label)
    }
}

impl fmt::Display for Isotope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

impl FromStr for Isotope {
    type Err = NfError;

    /// Parse a `<Symbol>-<A>` label such as `O-16` or `Z21-45`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || NfError::InvalidLabel {
            label: s.to_string(),
        };
        let (symbol, mass) = s.trim().rsplit_once('-').ok_or_else(invalid)?;
        if symbol.is_empty() || !symbol.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(invalid());
        }
        if mass.is_empty() || !mass.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let mass_number = mass.parse::<u32>().map_err(|_| invalid())?;
        Ok(Isotope::new(symbol, mass_number))
    }
}

/// Mass number of an isotope label, if the label is well formed.
pub fn mass_number_of(label: &str) -> Option<u32> {
    label.parse::<Isotope>().ok().map(|iso| iso.mass_number())
}

/// Normalize element-symbol case: `NE` → `Ne`, `o` → `O`.
pub fn capitalize_symbol(raw: &str) -> String {
    let mut chars = raw.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn resolved_label_round_trips(z in 1_u32..40, a in 0_u32..300) {
            let iso = ELEMENTS.resolve(z, a).unwrap();
            let parsed: Isotope = iso.label().parse().unwrap();
            prop_assert_eq!(&parsed, &iso);
            prop_assert_eq!(ELEMENTS.proton_number(parsed.symbol()), Some(z));
        }
    }
}
