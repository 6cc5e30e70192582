//! Initial-abundance composition files.
//!
//! Each data line ends with a mass fraction. The isotope is taken either
//! from explicit element and mass-number columns, e.g.
//!
//! ```text
//!   5  O   16   9.5e-03
//! ```
//!
//! or from a fused token in the second column (`O16`, `ne20`). The explicit
//! form wins when the line has at least four tokens, the second is
//! alphabetic and the third is all digits.

use std::path::Path;
use std::sync::LazyLock;

use nf_core::Real;
use nf_core::isotope::capitalize_symbol;
use regex::Regex;
use tracing::debug;

use crate::error::{AbundanceError, AbundanceResult};
use crate::snapshot::AbundanceSnapshot;

/// File name looked up in the project root when none is given.
pub const DEFAULT_INITIAL_FILE: &str = "initial_abundance.dat";

static FUSED_ISOTOPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([a-zA-Z]+)(\d+)").expect("isotope pattern is valid"));

fn is_alphabetic(token: &str) -> bool {
    !token.is_empty() && token.chars().all(char::is_alphabetic)
}

fn is_digits(token: &str) -> bool {
    !token.is_empty() && token.chars().all(|c| c.is_ascii_digit())
}

/// Parse one line into `(label, X)`; `None` for anything that is not a
/// usable data line.
pub fn parse_line(line: &str) -> Option<(String, Real)> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }

    let parts: Vec<&str> = line.split_whitespace().collect();
    let x: Real = parts.last()?.parse().ok()?;

    let (element, mass) = if parts.len() >= 4 && is_alphabetic(parts[1]) && is_digits(parts[2]) {
        (parts[1], parts[2])
    } else {
        let caps = FUSED_ISOTOPE.captures(parts.get(1)?)?;
        let (_, [element, mass]) = caps.extract();
        (element, mass)
    };

    Some((format!("{}-{}", capitalize_symbol(element), mass), x))
}

/// Parse initial-abundance content. Unusable lines are skipped.
pub fn parse_initial_abundances(content: &str) -> AbundanceSnapshot {
    let mut skipped = 0usize;
    let pairs: Vec<(String, Real)> = content
        .lines()
        .filter_map(|line| {
            let parsed = parse_line(line);
            let trimmed = line.trim();
            if parsed.is_none() && !trimmed.is_empty() && !trimmed.starts_with('#') {
                skipped += 1;
            }
            parsed
        })
        .collect();

    if skipped > 0 {
        debug!(skipped, "skipped unparseable initial-abundance lines");
    }
    AbundanceSnapshot::from_pairs(pairs)
}

/// Read an initial-abundance file.
pub fn read_initial_abundances(path: &Path) -> AbundanceResult<AbundanceSnapshot> {
    if !path.exists() {
        return Err(AbundanceError::NotFound {
            path: path.to_path_buf(),
        });
    }
    let content = std::fs::read_to_string(path).map_err(|e| AbundanceError::Read {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(parse_initial_abundances(&content))
}
