//! Average Precision (AP) and mean Average Precision (mAP) calculation.

use crate::types::PrCurve;

/// Integrate `y` over `x` with the trapezoidal rule.
///
/// Extra values in the longer slice are ignored. Fewer than two points give 0.0.
///
/// # Example
///
/// ```
/// use map_eval::metrics::ap::trapezoid;
///
/// let area = trapezoid(&[1.0, 1.0, 0.5], &[0.0, 0.5, 1.0]);
/// assert!((area - 0.875).abs() < 1e-12);
/// ```
pub fn trapezoid(y: &[f64], x: &[f64]) -> f64 {
    let n = y.len().min(x.len());
    if n < 2 {
        return 0.0;
    }

    (1..n)
        .map(|i| (x[i] - x[i - 1]) * (y[i] + y[i - 1]) / 2.0)
        .sum()
}

/// Calculate Average Precision as the area under a precision-recall curve.
///
/// A curve holding only the boundary point has zero area.
///
/// # Example
///
/// ```
/// use map_eval::metrics::ap::calculate_ap;
/// use map_eval::types::PrCurve;
///
/// let curve = PrCurve { recalls: vec![0.0, 1.0], precisions: vec![1.0, 1.0] };
/// assert!((calculate_ap(&curve) - 1.0).abs() < 1e-12);
/// ```
pub fn calculate_ap(curve: &PrCurve) -> f64 {
    trapezoid(&curve.precisions, &curve.recalls)
}

/// Calculate mean Average Precision (mAP) across multiple classes.
///
/// # Example
///
/// ```
/// use map_eval::metrics::ap::calculate_map;
///
/// let class_aps = vec![0.8, 0.9, 0.75, 0.85];
/// let map = calculate_map(&class_aps);
/// assert!((map - 0.825).abs() < 1e-10);
/// ```
pub fn calculate_map(class_aps: &[f64]) -> f64 {
    if class_aps.is_empty() {
        return 0.0;
    }

    class_aps.iter().sum::<f64>() / class_aps.len() as f64
}
