use crate::NfError;

/// Floating point type used throughout system
pub type Real = f64;

/// Smallest value fed to `log10` by the clamped helpers.
pub const LOG_FLOOR: Real = 1e-300;

/// One tolerance for everything
#[derive(Clone, Copy, Debug)]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-12,
            rel: 1e-9,
        }
    }
}

pub fn nearly_equal(a: Real, b: Real, tol: Tolerances) -> bool {
    let diff = (a - b).abs();
    if diff <= tol.abs {
        return true;
    }
    diff <= tol.rel * a.abs().max(b.abs())
}

pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, NfError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(NfError::NonFinite { what, value: v })
    }
}

/// Finite and `>= 0`, for thresholds and floors.
pub fn ensure_non_negative(v: Real, what: &'static str) -> Result<Real, NfError> {
    let v = ensure_finite(v, what)?;
    if v < 0.0 {
        return Err(NfError::Negative { what, value: v });
    }
    Ok(v)
}

/// `log10(max(x, floor))`.
///
/// Zero, negative and NaN inputs all map to `log10(floor)`, so the result is
/// always finite for a positive finite floor.
pub fn floored_log10(x: Real, floor: Real) -> Real {
    x.max(floor).log10()
}

/// `log10` clamped at [`LOG_FLOOR`].
pub fn safe_log10(x: Real) -> Real {
    floored_log10(x, LOG_FLOOR)
}

/// True when `safe_log10` would substitute the floor for `x`.
pub fn is_clamped(x: Real) -> bool {
    !(x >= LOG_FLOOR)
}
