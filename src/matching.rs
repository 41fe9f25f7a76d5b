//! Detection matching utilities for evaluating predictions against ground truth.

use crate::metrics::iou::calculate_iou;
use crate::types::{BoundingBox, BoxFormat, BoxRecord, Outcome};
use log::trace;
use std::collections::HashMap;

/// Per-image claimed flags for ground-truth boxes.
///
/// One flag per ground truth, in the order the boxes appear in the input for
/// that image. A flag goes from unclaimed to claimed at most once; the table
/// lives only as long as the evaluation call that built it.
#[derive(Debug, Clone, Default)]
pub struct GroundTruthUsage {
    claimed: HashMap<String, Vec<bool>>,
}

impl GroundTruthUsage {
    /// Allocate an unclaimed flag for every ground truth, grouped by image.
    pub fn from_ground_truths(ground_truths: &[BoxRecord]) -> Self {
        let mut claimed: HashMap<String, Vec<bool>> = HashMap::new();
        for gt in ground_truths {
            claimed
                .entry(gt.image_id().to_string())
                .or_default()
                .push(false);
        }
        Self { claimed }
    }

    /// Number of ground truths recorded for an image (0 if unknown).
    pub fn count_for(&self, image_id: &str) -> usize {
        self.claimed.get(image_id).map_or(0, Vec::len)
    }

    /// Number of distinct images with ground truth.
    pub fn image_count(&self) -> usize {
        self.claimed.len()
    }

    pub fn is_claimed(&self, image_id: &str, index: usize) -> bool {
        self.claimed
            .get(image_id)
            .and_then(|flags| flags.get(index))
            .copied()
            .unwrap_or(false)
    }

    /// Claim a ground truth. Returns `false` if it was already claimed or does
    /// not exist.
    pub fn claim(&mut self, image_id: &str, index: usize) -> bool {
        match self.claimed.get_mut(image_id).and_then(|flags| flags.get_mut(index)) {
            Some(flag) if !*flag => {
                *flag = true;
                true
            }
            _ => false,
        }
    }

    /// Total number of claimed ground truths across all images.
    pub fn claimed_count(&self) -> usize {
        self.claimed
            .values()
            .map(|flags| flags.iter().filter(|&&f| f).count())
            .sum()
    }
}

/// Result of matching one prediction.
#[derive(Debug, Clone)]
pub struct Match {
    pub image_id: String,
    pub confidence: f64,
    /// Best IoU against any ground truth of the same image (0.0 if none).
    pub iou: f64,
    /// Index of the best ground truth within its image, if any overlapped.
    pub ground_truth_index: Option<usize>,
    /// Number of ground truths the prediction was compared against.
    pub candidates: usize,
    pub outcome: Outcome,
}

/// Group ground-truth geometry by image id, preserving input order.
pub fn group_by_image(
    ground_truths: &[BoxRecord],
    format: BoxFormat,
) -> HashMap<&str, Vec<BoundingBox>> {
    let mut groups: HashMap<&str, Vec<BoundingBox>> = HashMap::new();

    for gt in ground_truths {
        groups
            .entry(gt.image_id())
            .or_default()
            .push(gt.to_bbox(format));
    }

    groups
}

/// Order predictions by descending confidence.
///
/// The sort is stable, so predictions with exactly equal confidence keep their
/// input order.
pub fn sort_by_confidence(predictions: &[BoxRecord]) -> Vec<&BoxRecord> {
    let mut sorted: Vec<&BoxRecord> = predictions.iter().collect();
    sorted.sort_by(|a, b| b.confidence().total_cmp(&a.confidence()));
    sorted
}

/// Find the ground truth with the highest IoU against `prediction`.
///
/// Claimed boxes are not skipped. The first maximum wins, and a candidate must
/// overlap (IoU > 0) to be selected.
pub fn best_match(prediction: &BoundingBox, ground_truths: &[BoundingBox]) -> (f64, Option<usize>) {
    let mut best_iou = 0.0;
    let mut best_idx = None;

    for (idx, gt) in ground_truths.iter().enumerate() {
        let iou = calculate_iou(prediction, gt);
        if iou > best_iou {
            best_iou = iou;
            best_idx = Some(idx);
        }
    }

    (best_iou, best_idx)
}

/// Match predictions to ground truth with the greedy detect-once policy.
///
/// Predictions are visited in descending confidence order. Each one is scored
/// against every ground truth of its image; when the best IoU is strictly above
/// `iou_threshold`, the prediction is a true positive if that ground truth is
/// still unclaimed in `usage` (and claims it), otherwise a duplicate. Anything
/// else is a false positive.
///
/// # Arguments
///
/// * `ground_truths` - All ground-truth records
/// * `predictions` - All prediction records
/// * `iou_threshold` - IoU that the best match must exceed
/// * `format` - Coordinate convention for every record
/// * `usage` - Claimed flags for this evaluation call
///
/// # Returns
///
/// Returns one `Match` per prediction, sorted by confidence (descending).
pub fn match_predictions(
    ground_truths: &[BoxRecord],
    predictions: &[BoxRecord],
    iou_threshold: f64,
    format: BoxFormat,
    usage: &mut GroundTruthUsage,
) -> Vec<Match> {
    let gt_groups = group_by_image(ground_truths, format);

    sort_by_confidence(predictions)
        .into_iter()
        .map(|pred| {
            let candidates = gt_groups
                .get(pred.image_id())
                .map(Vec::as_slice)
                .unwrap_or_default();

            let (iou, best_idx) = best_match(&pred.to_bbox(format), candidates);

            let outcome = match best_idx {
                Some(idx) if iou > iou_threshold => {
                    if usage.claim(pred.image_id(), idx) {
                        Outcome::TruePositive
                    } else {
                        Outcome::Duplicate
                    }
                }
                _ => Outcome::FalsePositive,
            };

            trace!(
                "prediction image={} conf={:.4} best_iou={:.4} gt={:?} -> {:?}",
                pred.image_id(),
                pred.confidence(),
                iou,
                best_idx,
                outcome
            );

            Match {
                image_id: pred.image_id().to_string(),
                confidence: pred.confidence(),
                iou,
                ground_truth_index: best_idx,
                candidates: candidates.len(),
                outcome,
            }
        })
        .collect()
}
