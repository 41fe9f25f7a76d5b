//! Statistics tracking for one evaluation call
//!
//! Counters gathered while predictions are matched against ground truth. They
//! are reported alongside the mAP value and logged at the end of an evaluation.

use crate::types::Outcome;
use serde::{Deserialize, Serialize};

/// Statistics collected during matching
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvaluationStats {
    /// Number of ground-truth boxes across all images
    pub total_ground_truths: usize,

    /// Number of predictions that took part in matching
    pub total_predictions: usize,

    /// Number of predictions matched to an unclaimed ground truth
    pub true_positives: usize,

    /// Number of predictions whose best IoU did not pass the threshold
    pub false_positives: usize,

    /// Number of predictions whose best match was already claimed
    pub duplicate_detections: usize,

    /// Number of predictions for images that have no ground truth at all
    pub unmatched_image_predictions: usize,

    /// Number of distinct images with at least one ground truth
    pub images_with_ground_truth: usize,
}

impl EvaluationStats {
    /// Create a new `EvaluationStats` with all counters at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the outcome of one prediction
    pub fn record(&mut self, outcome: Outcome) {
        self.total_predictions += 1;
        match outcome {
            Outcome::TruePositive => self.true_positives += 1,
            Outcome::FalsePositive => self.false_positives += 1,
            Outcome::Duplicate => self.duplicate_detections += 1,
        }
    }

    /// Record a prediction for an image with no ground truth
    pub fn record_unmatched_image(&mut self) {
        self.unmatched_image_predictions += 1;
    }

    /// All predictions that were not true positives, duplicates included
    pub fn total_false_positives(&self) -> usize {
        self.false_positives + self.duplicate_detections
    }

    /// Ground truths never claimed by any prediction
    pub fn missed_ground_truths(&self) -> usize {
        self.total_ground_truths.saturating_sub(self.true_positives)
    }

    /// Get a formatted string summary of the statistics
    pub fn summary_string(&self) -> String {
        format!(
            "EvaluationStats {{ ground_truths: {}, predictions: {}, tp: {}, fp: {}, duplicates: {}, unmatched_images: {} }}",
            self.total_ground_truths,
            self.total_predictions,
            self.true_positives,
            self.false_positives,
            self.duplicate_detections,
            self.unmatched_image_predictions
        )
    }
}
