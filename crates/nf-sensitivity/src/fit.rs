//! Power-law fit of abundance ratio against rate multiplier.
//!
//! For one isotope the sweep gives points `(r, X(r)/X(1))`. In log-log space
//! a power law `X ∝ r^α` is a straight line, so the slope of
//! `log10(ratio)` against `log10(r)` estimates α. The peak deviation
//! `S = max |log10(ratio)|` measures how far the isotope moves at all.
//!
//! Non-positive values are clamped to [`LOG_FLOOR`](nf_core::LOG_FLOOR)
//! before the log. This is a deliberate clamp, surfaced as
//! [`SensitivityFit::clamped`], and not an estimate of the real value.

use nalgebra::{DMatrix, DVector};
use nf_core::{Real, is_clamped, safe_log10};

/// One sweep point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensitivityPoint {
    pub factor: Real,
    pub ratio: Real,
}

impl SensitivityPoint {
    pub fn new(factor: Real, ratio: Real) -> Self {
        Self { factor, ratio }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SensitivityFit {
    /// Points sorted by factor ascending.
    pub points: Vec<SensitivityPoint>,
    /// `S = max |log10(ratio)|`; NaN for an empty sweep.
    pub magnitude: Real,
    /// Least-squares slope α; NaN when it cannot be determined.
    pub slope: Real,
    /// Some factor or ratio was clamped to the log floor.
    pub clamped: bool,
}

impl SensitivityFit {
    pub fn has_slope(&self) -> bool {
        !self.slope.is_nan()
    }
}

/// Fit S and α to a set of sweep points.
pub fn fit_power_law(points: impl Into<Vec<SensitivityPoint>>) -> SensitivityFit {
    let mut points = points.into();
    points.sort_by(|a, b| a.factor.total_cmp(&b.factor));

    let log_r: Vec<Real> = points.iter().map(|p| safe_log10(p.factor)).collect();
    let log_y: Vec<Real> = points.iter().map(|p| safe_log10(p.ratio)).collect();
    let clamped = points
        .iter()
        .any(|p| is_clamped(p.factor) || is_clamped(p.ratio));

    let magnitude = log_y.iter().map(|y| y.abs()).fold(Real::NAN, Real::max);
    let slope = least_squares_slope(&log_r, &log_y);

    SensitivityFit {
        points,
        magnitude,
        slope,
        clamped,
    }
}

/// Slope of the degree-1 least-squares fit `y = a·x + b`.
///
/// Returns NaN for fewer than two points or when every `x` is identical.
pub fn least_squares_slope(x: &[Real], y: &[Real]) -> Real {
    let n = x.len().min(y.len());
    if n < 2 || x[..n].iter().all(|&xi| xi == x[0]) {
        return Real::NAN;
    }

    // Centering x keeps the normal equations well conditioned.
    let mean = x[..n].iter().sum::<Real>() / n as Real;
    let design = DMatrix::from_fn(n, 2, |i, j| if j == 0 { x[i] - mean } else { 1.0 });
    let rhs = DVector::from_column_slice(&y[..n]);

    let normal = design.transpose() * &design;
    let projected = design.transpose() * rhs;
    match normal.lu().solve(&projected) {
        Some(coeffs) => coeffs[0],
        None => Real::NAN,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn three_point_sweep() {
        let fit = fit_power_law(vec![
            SensitivityPoint::new(10.0, 0.316),
            SensitivityPoint::new(0.1, 3.16),
            SensitivityPoint::new(1.0, 1.0),
        ]);
        let factors: Vec<_> = fit.points.iter().map(|p| p.factor).collect();
        assert_eq!(factors, vec![0.1, 1.0, 10.0]);
        assert!((fit.slope + 0.5).abs() < 1e-3);
        assert!((fit.magnitude - 0.5).abs() < 1e-3);
        assert!(!fit.clamped);
    }

    #[test]
    fn single_point_has_no_slope() {
        let fit = fit_power_law(vec![SensitivityPoint::new(10.0, 2.0)]);
        assert!(fit.slope.is_nan());
        assert!(!fit.has_slope());
        assert!((fit.magnitude - 2.0f64.log10()).abs() < 1e-12);
    }

    #[test]
    fn identical_factors_have_no_slope() {
        let fit = fit_power_law(vec![
            SensitivityPoint::new(2.0, 1.0),
            SensitivityPoint::new(2.0, 3.0),
        ]);
        assert!(fit.slope.is_nan());
    }

    #[test]
    fn empty_sweep_is_nan() {
        let fit = fit_power_law(Vec::<SensitivityPoint>::new());
        assert!(fit.magnitude.is_nan());
        assert!(fit.slope.is_nan());
        assert!(fit.points.is_empty());
    }

    #[test]
    fn zero_ratio_is_clamped() {
        let fit = fit_power_law(vec![
            SensitivityPoint::new(1.0, 1.0),
            SensitivityPoint::new(10.0, 0.0),
        ]);
        assert!(fit.clamped);
        assert!((fit.magnitude - 300.0).abs() < 1e-9);
        assert!(fit.slope.is_finite());
    }

    #[test]
    fn straight_line() {
        let x = [0.0, 1.0, 2.0, 3.0];
        let y = [1.0, 3.0, 5.0, 7.0];
        assert!((least_squares_slope(&x, &y) - 2.0).abs() < 1e-12);
    }
}
