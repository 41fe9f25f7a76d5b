//! Intersection over Union (IoU) calculation.

use crate::types::{BoundingBox, BoxFormat};

/// Added to the union so zero-area boxes do not divide by zero.
pub const IOU_EPSILON: f64 = 1e-6;

/// Calculate the IoU between two raw coordinate vectors.
///
/// Both boxes are interpreted under `format` before the overlap is computed.
/// Inverted or degenerate boxes are not rejected.
///
/// # Arguments
///
/// * `box_a` - First box, four coordinates
/// * `box_b` - Second box, four coordinates
/// * `format` - Coordinate convention shared by both boxes
///
/// # Returns
///
/// Returns a value between 0.0 (no overlap) and just under 1.0 (identical boxes)
/// for well-formed input.
///
/// # Example
///
/// ```
/// use map_eval::metrics::iou::intersection_over_union;
/// use map_eval::types::BoxFormat;
///
/// let a = [0.0, 0.0, 10.0, 10.0];
/// let b = [5.0, 5.0, 15.0, 15.0];
/// let iou = intersection_over_union(&a, &b, BoxFormat::Corners);
/// assert!((iou - 25.0 / 175.0).abs() < 1e-6);
/// ```
pub fn intersection_over_union(box_a: &[f64; 4], box_b: &[f64; 4], format: BoxFormat) -> f64 {
    calculate_iou(
        &BoundingBox::from_format(box_a, format),
        &BoundingBox::from_format(box_b, format),
    )
}

/// Calculate the IoU between two corner-form bounding boxes.
///
/// The intersection is clamped at zero per axis and the union carries
/// [`IOU_EPSILON`].
pub fn calculate_iou(bbox1: &BoundingBox, bbox2: &BoundingBox) -> f64 {
    let x_left = bbox1.x1.max(bbox2.x1);
    let y_top = bbox1.y1.max(bbox2.y1);
    let x_right = bbox1.x2.min(bbox2.x2);
    let y_bottom = bbox1.y2.min(bbox2.y2);

    let intersection_area = (x_right - x_left).max(0.0) * (y_bottom - y_top).max(0.0);
    let union_area = bbox1.area() + bbox2.area() - intersection_area;

    intersection_area / (union_area + IOU_EPSILON)
}
