//! Metrics calculation modules for detection evaluation.

pub mod iou;
pub mod ap;
pub mod precision_recall;

pub use iou::{calculate_iou, intersection_over_union};
pub use ap::{calculate_ap, calculate_map, trapezoid};
pub use precision_recall::{build_curve, cumulative_counts, CumulativeCounts};
