//! Main evaluation orchestrator for mean Average Precision.

use crate::config::EvaluationConfig;
use crate::error::Result;
use crate::matching::{match_predictions, GroundTruthUsage};
use crate::metrics::ap::{calculate_ap, calculate_map};
use crate::metrics::precision_recall::build_curve;
use crate::plot::CurveSink;
use crate::stats::EvaluationStats;
use crate::threshold::filter_by_confidence;
use crate::types::{BoxFormat, BoxRecord, EvaluationResult, Outcome};
use log::{debug, info, warn};
use std::borrow::Cow;

/// Evaluate predictions against ground truth.
///
/// All records are treated as one class. The steps are:
///
/// 1. drop predictions below `config.min_confidence`, if set,
/// 2. match predictions in descending confidence order with the detect-once
///    rule (see [`match_predictions`]),
/// 3. build the precision-recall curve anchored at `(0, 1)` and emit it to `sink`,
/// 4. integrate the curve with the trapezoidal rule.
///
/// Empty predictions or empty ground truth are not errors: both give an AP of
/// 0.0. A sink failure is logged and does not affect the result.
///
/// # Errors
///
/// Returns `InvalidThreshold` if a threshold in `config` is outside [0.0, 1.0].
///
/// # Example
///
/// ```
/// use map_eval::config::EvaluationConfig;
/// use map_eval::evaluator::evaluate;
/// use map_eval::plot::NullSink;
/// use map_eval::types::BoxRecord;
///
/// let gt = vec![BoxRecord::new("img", 0.0, 0.0, [0.0, 0.0, 10.0, 10.0]).unwrap()];
/// let pred = vec![BoxRecord::new("img", 0.0, 0.9, [0.0, 0.0, 10.0, 10.0]).unwrap()];
///
/// let result = evaluate(&gt, &pred, &EvaluationConfig::default(), &mut NullSink).unwrap();
/// assert!((result.map - 1.0).abs() < 1e-5);
/// ```
pub fn evaluate<S: CurveSink + ?Sized>(
    ground_truths: &[BoxRecord],
    predictions: &[BoxRecord],
    config: &EvaluationConfig,
    sink: &mut S,
) -> Result<EvaluationResult> {
    config.validate()?;

    let predictions: Cow<'_, [BoxRecord]> = match config.min_confidence {
        Some(min_confidence) => {
            let kept = filter_by_confidence(predictions, min_confidence)?;
            debug!(
                "confidence filter {} kept {} of {} predictions",
                min_confidence,
                kept.len(),
                predictions.len()
            );
            Cow::Owned(kept)
        }
        None => Cow::Borrowed(predictions),
    };

    if predictions.is_empty() {
        warn!("no predictions to evaluate; AP is 0.0");
    }
    if ground_truths.is_empty() {
        warn!("no ground truth boxes; every prediction is a false positive");
    }

    let mut usage = GroundTruthUsage::from_ground_truths(ground_truths);
    let mut stats = EvaluationStats::new();
    stats.total_ground_truths = ground_truths.len();
    stats.images_with_ground_truth = usage.image_count();

    let matches = match_predictions(
        ground_truths,
        &predictions,
        config.iou_threshold,
        config.box_format,
        &mut usage,
    );

    let outcomes: Vec<Outcome> = matches
        .iter()
        .map(|m| {
            stats.record(m.outcome);
            if m.candidates == 0 {
                stats.record_unmatched_image();
            }
            m.outcome
        })
        .collect();

    let curve = build_curve(&outcomes, ground_truths.len());
    debug!(
        "TP cumsum end: {}, FP cumsum end: {}",
        stats.true_positives,
        stats.total_false_positives()
    );

    if let Err(e) = sink.emit(&curve) {
        warn!("curve sink failed: {}", e);
    }

    let ap_per_class = vec![calculate_ap(&curve)];
    let map = calculate_map(&ap_per_class);

    info!(
        "mAP@{} ({}) = {:.4}; {}",
        config.iou_threshold,
        config.box_format,
        map,
        stats.summary_string()
    );

    Ok(EvaluationResult {
        map,
        ap_per_class,
        curve,
        stats,
        iou_threshold: config.iou_threshold,
        box_format: config.box_format,
    })
}

/// Compute the mAP value at one IoU threshold.
///
/// Shorthand for [`evaluate`] without a confidence filter, returning only the
/// scalar.
///
/// # Example
///
/// ```
/// use map_eval::evaluator::mean_average_precision;
/// use map_eval::plot::RecordingSink;
/// use map_eval::types::{BoxFormat, BoxRecord};
///
/// let gt = vec![BoxRecord::new("img", 0.0, 0.0, [0.0, 0.0, 10.0, 10.0]).unwrap()];
/// let pred = vec![BoxRecord::new("img", 0.0, 0.9, [50.0, 50.0, 60.0, 60.0]).unwrap()];
///
/// let mut sink = RecordingSink::new();
/// let map = mean_average_precision(&gt, &pred, 0.5, BoxFormat::Corners, &mut sink).unwrap();
/// assert_eq!(map, 0.0);
/// assert_eq!(sink.curves.len(), 1);
/// ```
pub fn mean_average_precision<S: CurveSink + ?Sized>(
    ground_truths: &[BoxRecord],
    predictions: &[BoxRecord],
    iou_threshold: f64,
    box_format: BoxFormat,
    sink: &mut S,
) -> Result<f64> {
    let config = EvaluationConfig {
        iou_threshold,
        box_format,
        min_confidence: None,
    };
    Ok(evaluate(ground_truths, predictions, &config, sink)?.map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plot::{NullSink, RecordingSink};

    fn record(image_id: &str, confidence: f64, bbox: [f64; 4]) -> BoxRecord {
        BoxRecord::new(image_id, 0.0, confidence, bbox).unwrap()
    }

    #[test]
    fn test_evaluate_basic() {
        let gt = vec![record("1", 0.0, [10.0, 10.0, 60.0, 60.0])];
        let result = evaluate(&gt, &gt, &EvaluationConfig::default(), &mut NullSink);
        assert!(result.is_ok());
    }

    #[test]
    fn test_sink_receives_curve_once() {
        let gt = vec![record("1", 0.0, [0.0, 0.0, 10.0, 10.0])];
        let pred = vec![record("1", 0.9, [0.0, 0.0, 10.0, 10.0])];
        let mut sink = RecordingSink::new();

        let result = evaluate(&gt, &pred, &EvaluationConfig::default(), &mut sink).unwrap();
        assert_eq!(sink.curves.len(), 1);
        assert_eq!(sink.last(), Some(&result.curve));
    }

    #[test]
    fn test_min_confidence_filter() {
        let gt = vec![record("1", 0.0, [0.0, 0.0, 10.0, 10.0])];
        let pred = vec![
            record("1", 0.9, [0.0, 0.0, 10.0, 10.0]),
            record("1", 0.1, [50.0, 50.0, 60.0, 60.0]),
        ];
        let config = EvaluationConfig {
            min_confidence: Some(0.5),
            ..EvaluationConfig::default()
        };

        let result = evaluate(&gt, &pred, &config, &mut NullSink).unwrap();
        assert_eq!(result.stats.total_predictions, 1);
        assert_eq!(result.curve.len(), 2);
    }

    #[test]
    fn test_invalid_iou_threshold() {
        let result = mean_average_precision(&[], &[], 1.2, BoxFormat::Corners, &mut NullSink);
        assert!(result.is_err());
    }

    #[test]
    fn test_failing_sink_does_not_fail_evaluation() {
        struct Broken;
        impl CurveSink for Broken {
            fn emit(&mut self, _curve: &crate::types::PrCurve) -> Result<()> {
                Err(crate::error::MapEvalError::InvalidBoxFormat("broken".into()))
            }
        }

        let gt = vec![record("1", 0.0, [0.0, 0.0, 10.0, 10.0])];
        let map = mean_average_precision(&gt, &gt, 0.5, BoxFormat::Corners, &mut Broken).unwrap();
        assert!(map > 0.99);
    }
}
