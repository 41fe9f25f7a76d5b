//! Precision and Recall calculation over ranked detections.

use crate::types::{Outcome, PrCurve};

/// Added to both denominators so empty inputs never divide by zero.
pub const CURVE_EPSILON: f64 = 1e-6;

/// Running true/false positive counts over predictions in ranked order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CumulativeCounts {
    pub true_positives: Vec<f64>,
    pub false_positives: Vec<f64>,
}

/// Compute `TP_cumsum` and `FP_cumsum` for outcomes sorted by descending confidence.
///
/// Duplicates count as false positives.
pub fn cumulative_counts(outcomes: &[Outcome]) -> CumulativeCounts {
    let mut counts = CumulativeCounts {
        true_positives: Vec::with_capacity(outcomes.len()),
        false_positives: Vec::with_capacity(outcomes.len()),
    };

    let mut tp = 0.0;
    let mut fp = 0.0;
    for outcome in outcomes {
        if outcome.is_true_positive() {
            tp += 1.0;
        } else {
            fp += 1.0;
        }
        counts.true_positives.push(tp);
        counts.false_positives.push(fp);
    }

    counts
}

/// Build the precision-recall curve from ranked outcomes.
///
/// `recall[i] = TP_cumsum[i] / (total + eps)` and
/// `precision[i] = TP_cumsum[i] / (TP_cumsum[i] + FP_cumsum[i] + eps)`, with the
/// boundary point `(0, 1)` prepended.
///
/// # Arguments
///
/// * `outcomes` - Outcome of each prediction, sorted by confidence (descending)
/// * `total_ground_truths` - Number of ground-truth boxes across all images
///
/// # Example
///
/// ```
/// use map_eval::metrics::precision_recall::build_curve;
/// use map_eval::types::Outcome;
///
/// let curve = build_curve(&[Outcome::TruePositive, Outcome::FalsePositive], 2);
/// assert_eq!(curve.len(), 3);
/// assert_eq!(curve.recalls[0], 0.0);
/// assert_eq!(curve.precisions[0], 1.0);
/// ```
pub fn build_curve(outcomes: &[Outcome], total_ground_truths: usize) -> PrCurve {
    let counts = cumulative_counts(outcomes);
    let total = total_ground_truths as f64;

    let mut curve = PrCurve::boundary();
    curve.recalls.reserve(outcomes.len());
    curve.precisions.reserve(outcomes.len());

    for (&tp, &fp) in counts.true_positives.iter().zip(&counts.false_positives) {
        curve.recalls.push(tp / (total + CURVE_EPSILON));
        curve.precisions.push(tp / (tp + fp + CURVE_EPSILON));
    }

    curve
}
