use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use map_eval::config::EvaluationConfig;
use map_eval::evaluator::evaluate;
use map_eval::metrics::{build_curve, calculate_ap, intersection_over_union};
use map_eval::plot::NullSink;
use map_eval::types::{BoxFormat, BoxRecord, Outcome};

fn bench_iou_calculation(c: &mut Criterion) {
    let bbox1 = [10.0, 10.0, 60.0, 60.0];
    let bbox2 = [30.0, 30.0, 80.0, 80.0];

    c.bench_function("iou_corners", |b| {
        b.iter(|| intersection_over_union(black_box(&bbox1), black_box(&bbox2), BoxFormat::Corners));
    });

    c.bench_function("iou_midpoint", |b| {
        b.iter(|| intersection_over_union(black_box(&bbox1), black_box(&bbox2), BoxFormat::Midpoint));
    });
}

fn bench_curve_and_ap(c: &mut Criterion) {
    let mut group = c.benchmark_group("curve_and_ap");

    for num_detections in [10, 100, 1000, 10000].iter() {
        let outcomes: Vec<Outcome> = (0..*num_detections)
            .map(|i| {
                if i % 3 == 0 {
                    Outcome::FalsePositive
                } else {
                    Outcome::TruePositive
                }
            })
            .collect();

        group.bench_with_input(BenchmarkId::from_parameter(num_detections), num_detections, |b, &n| {
            b.iter(|| {
                let curve = build_curve(black_box(&outcomes), n);
                calculate_ap(&curve)
            });
        });
    }
    group.finish();
}

fn bench_evaluate(c: &mut Criterion) {
    let mut group = c.benchmark_group("evaluate");

    for num_images in [10, 50, 200].iter() {
        let mut ground_truth = Vec::new();
        let mut predictions = Vec::new();

        for image in 0..*num_images {
            let image_id = image.to_string();
            for obj in 0..10 {
                let x = obj as f64 * 60.0;
                ground_truth.push(BoxRecord::new(&image_id, 0.0, 0.0, [x, 0.0, x + 50.0, 50.0]).unwrap());
                predictions.push(
                    BoxRecord::new(&image_id, 0.0, 0.5 + obj as f64 * 0.04, [x + 3.0, 2.0, x + 52.0, 51.0])
                        .unwrap(),
                );
            }
        }

        let config = EvaluationConfig::default();
        group.bench_with_input(BenchmarkId::from_parameter(num_images), num_images, |b, _| {
            b.iter(|| {
                evaluate(black_box(&ground_truth), black_box(&predictions), &config, &mut NullSink)
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_iou_calculation, bench_curve_and_ap, bench_evaluate);
criterion_main!(benches);
