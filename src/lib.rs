//! # map-eval
//!
//! A Rust library for computing mean Average Precision (mAP) of object
//! detection predictions against ground-truth labels at a fixed IoU threshold.
//!
//! This library provides:
//! - **IoU** between axis-aligned boxes in corner or midpoint form
//! - **Greedy matching** of predictions to ground truth, where each ground-truth
//!   box can be detected only once
//! - **Precision-recall curves** anchored at `(recall = 0, precision = 1)`
//! - **AP** as the trapezoidal area under that curve
//! - Loading of whitespace-separated label directories
//! - Curve sinks for JSON output or a terminal chart
//!
//! ## Quick Start
//!
//! ```rust
//! use map_eval::evaluator::mean_average_precision;
//! use map_eval::plot::RecordingSink;
//! use map_eval::types::{BoxFormat, BoxRecord};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // In actual use:
//! // let ground_truths = map_eval::load_from_dir("gt_labels")?;
//! // let predictions = map_eval::load_from_dir("pred_labels")?;
//! let ground_truths = vec![BoxRecord::new("img_0", 0.0, 0.0, [10.0, 10.0, 50.0, 50.0])?];
//! let predictions = vec![BoxRecord::new("img_0", 0.0, 0.87, [12.0, 10.0, 50.0, 52.0])?];
//!
//! let mut curves = RecordingSink::new();
//! let map = mean_average_precision(&ground_truths, &predictions, 0.5, BoxFormat::Corners, &mut curves)?;
//! println!("mAP: {:.1}%", map * 100.0);
//! # Ok(())
//! # }
//! ```
//!
//! ## Label Format
//!
//! One file per image, one box per line:
//!
//! ```text
//! <image_id> <class> <confidence> <x1|xc> <y1|yc> <x2|w> <y2|h>
//! ```
//!
//! Ground-truth files put a placeholder in the confidence column.

pub mod error;
pub mod types;
pub mod config;
pub mod loader;
pub mod threshold;
pub mod metrics;
pub mod matching;
pub mod stats;
pub mod plot;
pub mod evaluator;

// Re-export commonly used types and functions
pub use error::{MapEvalError, Result};
pub use types::{BoundingBox, BoxFormat, BoxRecord, EvaluationResult, Outcome, PrCurve};
pub use config::EvaluationConfig;
pub use loader::{load_from_dir, load_from_file, load_from_str};
pub use evaluator::{evaluate, mean_average_precision};
pub use plot::{AsciiPlot, CurveSink, JsonCurveWriter, MultiSink, NullSink, RecordingSink};
pub use stats::EvaluationStats;
