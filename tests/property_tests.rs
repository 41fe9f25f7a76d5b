//! Property-based tests using proptest
//!
//! These tests verify mathematical properties and invariants that should
//! always hold regardless of the input values.

use map_eval::evaluator::evaluate;
use map_eval::config::EvaluationConfig;
use map_eval::metrics::{build_curve, intersection_over_union, trapezoid};
use map_eval::plot::NullSink;
use map_eval::types::{BoxFormat, BoxRecord, Outcome};
use proptest::prelude::*;

fn corner_box() -> impl Strategy<Value = [f64; 4]> {
    (0.0f64..100.0, 0.0f64..100.0, 1.0f64..50.0, 1.0f64..50.0)
        .prop_map(|(x, y, w, h)| [x, y, x + w, y + h])
}

fn outcome() -> impl Strategy<Value = Outcome> {
    prop_oneof![
        Just(Outcome::TruePositive),
        Just(Outcome::FalsePositive),
        Just(Outcome::Duplicate),
    ]
}

// Property: IoU is symmetric
proptest! {
    #[test]
    fn prop_iou_symmetric(a in corner_box(), b in corner_box()) {
        let iou1 = intersection_over_union(&a, &b, BoxFormat::Corners);
        let iou2 = intersection_over_union(&b, &a, BoxFormat::Corners);

        assert!((iou1 - iou2).abs() < 1e-12,
                "IoU should be symmetric: {} vs {}", iou1, iou2);
    }
}

// Property: IoU is always between 0 and 1
proptest! {
    #[test]
    fn prop_iou_range(a in corner_box(), b in corner_box()) {
        let iou = intersection_over_union(&a, &b, BoxFormat::Corners);
        assert!((0.0..=1.0).contains(&iou), "IoU should be in [0,1], got {}", iou);
    }
}

// Property: a box overlaps itself completely
proptest! {
    #[test]
    fn prop_iou_identity(a in corner_box()) {
        let iou = intersection_over_union(&a, &a, BoxFormat::Corners);
        assert!((iou - 1.0).abs() < 1e-5, "IoU(A, A) should be ~1, got {}", iou);
    }
}

// Property: boxes separated along x never overlap
proptest! {
    #[test]
    fn prop_iou_disjoint(a in corner_box(), gap in 0.0f64..20.0, w in 1.0f64..50.0) {
        let b = [a[2] + gap, a[1], a[2] + gap + w, a[3]];
        let iou = intersection_over_union(&a, &b, BoxFormat::Corners);
        assert_eq!(iou, 0.0);
    }
}

// Property: midpoint and corner forms of the same boxes agree
proptest! {
    #[test]
    fn prop_convention_equivalence(a in corner_box(), b in corner_box()) {
        let to_mid = |c: &[f64; 4]| {
            [(c[0] + c[2]) / 2.0, (c[1] + c[3]) / 2.0, c[2] - c[0], c[3] - c[1]]
        };
        let from_corners = intersection_over_union(&a, &b, BoxFormat::Corners);
        let from_midpoint = intersection_over_union(&to_mid(&a), &to_mid(&b), BoxFormat::Midpoint);

        assert!((from_corners - from_midpoint).abs() < 1e-9,
                "{} vs {}", from_corners, from_midpoint);
    }
}

// Property: recall never decreases and the curve starts at (0, 1)
proptest! {
    #[test]
    fn prop_recall_monotonic(outcomes in prop::collection::vec(outcome(), 0..100), extra in 0usize..20) {
        let tp = outcomes.iter().filter(|o| o.is_true_positive()).count();
        let curve = build_curve(&outcomes, tp + extra);

        assert_eq!(curve.len(), outcomes.len() + 1);
        assert_eq!(curve.recalls[0], 0.0);
        assert_eq!(curve.precisions[0], 1.0);
        for pair in curve.recalls.windows(2) {
            assert!(pair[1] >= pair[0], "recall decreased: {:?}", pair);
        }
        for &p in &curve.precisions {
            assert!((0.0..=1.0).contains(&p));
        }
    }
}

// Property: AP stays within [0, 1] when ground truths cover every true positive
proptest! {
    #[test]
    fn prop_ap_range(outcomes in prop::collection::vec(outcome(), 0..100), extra in 0usize..20) {
        let tp = outcomes.iter().filter(|o| o.is_true_positive()).count();
        let curve = build_curve(&outcomes, tp + extra);
        let ap = trapezoid(&curve.precisions, &curve.recalls);

        assert!((0.0..=1.0).contains(&ap), "AP should be in [0,1], got {}", ap);
    }
}

// Property: each ground truth is claimed by at most one prediction
proptest! {
    #[test]
    fn prop_true_positives_bounded_by_ground_truths(
        gts in prop::collection::vec(corner_box(), 0..10),
        preds in prop::collection::vec((corner_box(), 0.0f64..1.0), 0..30),
    ) {
        let ground_truths: Vec<BoxRecord> = gts
            .iter()
            .map(|b| BoxRecord::new("img", 0.0, 0.0, *b).unwrap())
            .collect();
        let predictions: Vec<BoxRecord> = preds
            .iter()
            .map(|(b, conf)| BoxRecord::new("img", 0.0, *conf, *b).unwrap())
            .collect();

        let result = evaluate(&ground_truths, &predictions, &EvaluationConfig::default(), &mut NullSink)
            .unwrap();

        assert!(result.stats.true_positives <= ground_truths.len());
        assert_eq!(result.stats.total_predictions, predictions.len());
        assert!((0.0..=1.0).contains(&result.map));
    }
}
