//! Rate multipliers encoded in run folder names.

use std::sync::LazyLock;

use nf_core::Real;
use regex::Regex;

/// Folder name of the reference run; its multiplier is 1.
pub const BASELINE_NAME: &str = "baseline";

static FACTOR_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"fact_([0-9eE.\-]+)").expect("factor pattern is valid"));

/// Multiplier from a `fact_<number>` fragment anywhere in `name`.
///
/// Only finite, strictly positive multipliers are accepted.
pub fn factor_from_name(name: &str) -> Option<Real> {
    let caps = FACTOR_PATTERN.captures(name)?;
    let factor: Real = caps.get(1)?.as_str().parse().ok()?;
    (factor.is_finite() && factor > 0.0).then_some(factor)
}

/// Like [`factor_from_name`], but the literal baseline folder maps to 1.0.
pub fn sweep_factor(name: &str) -> Option<Real> {
    if name == BASELINE_NAME {
        Some(1.0)
    } else {
        factor_from_name(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_embedded_factor() {
        assert_eq!(factor_from_name("fact_10"), Some(10.0));
        assert_eq!(factor_from_name("15O_ag_fact_0.1"), Some(0.1));
        assert_eq!(factor_from_name("fact_1e-2"), Some(0.01));
        assert_eq!(factor_from_name("fact_2.5_run3"), Some(2.5));
    }

    #[test]
    fn rejects_unusable_names() {
        assert_eq!(factor_from_name("baseline"), None);
        assert_eq!(factor_from_name("fact_"), None);
        assert_eq!(factor_from_name("fact_1.2.3"), None);
        assert_eq!(factor_from_name("fact_0"), None);
        assert_eq!(factor_from_name("fact_-1"), None);
    }

    #[test]
    fn baseline_is_unity() {
        assert_eq!(sweep_factor(BASELINE_NAME), Some(1.0));
        assert_eq!(sweep_factor("fact_3"), Some(3.0));
        assert_eq!(sweep_factor("baseline_old"), None);
    }
}
