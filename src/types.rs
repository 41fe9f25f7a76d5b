//! Core data types for box records and evaluation results.

use crate::error::{MapEvalError, Result};
use crate::stats::EvaluationStats;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Coordinate convention used to interpret the four geometry fields of a record.
///
/// The convention is chosen once per evaluation call and applies to every
/// ground truth and prediction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoxFormat {
    /// Opposite corners: `[x1, y1, x2, y2]`.
    #[default]
    Corners,
    /// Center and size: `[xc, yc, w, h]`.
    Midpoint,
}

impl FromStr for BoxFormat {
    type Err = MapEvalError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "corners" => Ok(BoxFormat::Corners),
            "midpoint" => Ok(BoxFormat::Midpoint),
            other => Err(MapEvalError::InvalidBoxFormat(format!(
                "expected \"corners\" or \"midpoint\", got \"{}\"",
                other
            ))),
        }
    }
}

impl fmt::Display for BoxFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoxFormat::Corners => write!(f, "corners"),
            BoxFormat::Midpoint => write!(f, "midpoint"),
        }
    }
}

/// Axis-aligned bounding box in corner form.
///
/// Coordinates are not reordered: a box with `x2 < x1` keeps its inverted
/// geometry and produces whatever area the arithmetic gives.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl BoundingBox {
    /// Create a new bounding box from corner coordinates.
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Interpret four raw coordinates under the given convention.
    ///
    /// # Example
    ///
    /// ```
    /// use map_eval::types::{BoundingBox, BoxFormat};
    ///
    /// let bbox = BoundingBox::from_format(&[10.0, 10.0, 4.0, 6.0], BoxFormat::Midpoint);
    /// assert_eq!(bbox, BoundingBox::new(8.0, 7.0, 12.0, 13.0));
    /// ```
    pub fn from_format(coords: &[f64; 4], format: BoxFormat) -> Self {
        match format {
            BoxFormat::Corners => Self::new(coords[0], coords[1], coords[2], coords[3]),
            BoxFormat::Midpoint => {
                let half_w = coords[2] / 2.0;
                let half_h = coords[3] / 2.0;
                Self::new(
                    coords[0] - half_w,
                    coords[1] - half_h,
                    coords[0] + half_w,
                    coords[1] + half_h,
                )
            }
        }
    }

    /// Width (`x2 - x1`), negative for inverted boxes.
    pub fn width(&self) -> f64 {
        self.x2 - self.x1
    }

    /// Height (`y2 - y1`), negative for inverted boxes.
    pub fn height(&self) -> f64 {
        self.y2 - self.y1
    }

    /// Get the area of the bounding box.
    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    /// Check if the bounding box is valid (positive dimensions).
    pub fn is_valid(&self) -> bool {
        self.width() > 0.0 && self.height() > 0.0
    }
}

/// One line of a label file: a ground-truth box or a scored prediction.
///
/// Ground truths carry a class id and a placeholder in `class_id` and
/// `confidence`; predictions rank on `confidence`.
///
/// Fields are only reachable through [`BoxRecord::new`], which deserialization
/// also goes through, so every record has a non-empty id and finite numbers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawBoxRecord")]
pub struct BoxRecord {
    image_id: String,
    class_id: f64,
    confidence: f64,
    /// Raw geometry, interpreted under the evaluation's [`BoxFormat`].
    bbox: [f64; 4],
}

/// Unchecked wire form of a [`BoxRecord`].
#[derive(Deserialize)]
struct RawBoxRecord {
    image_id: String,
    class_id: f64,
    confidence: f64,
    bbox: [f64; 4],
}

impl TryFrom<RawBoxRecord> for BoxRecord {
    type Error = MapEvalError;

    fn try_from(raw: RawBoxRecord) -> Result<Self> {
        BoxRecord::new(raw.image_id, raw.class_id, raw.confidence, raw.bbox)
    }
}

impl BoxRecord {
    /// Create a record, rejecting an empty image id and non-finite fields.
    ///
    /// # Errors
    ///
    /// Returns `MalformedRecord` when a field is unusable. Coordinate order is
    /// not checked.
    ///
    /// # Example
    ///
    /// ```
    /// use map_eval::types::BoxRecord;
    ///
    /// let record = BoxRecord::new("img_0", 0.0, 0.9, [0.0, 0.0, 10.0, 10.0]).unwrap();
    /// assert_eq!(record.image_id(), "img_0");
    /// assert!(BoxRecord::new("img_0", 0.0, f64::NAN, [0.0; 4]).is_err());
    /// ```
    pub fn new(
        image_id: impl Into<String>,
        class_id: f64,
        confidence: f64,
        bbox: [f64; 4],
    ) -> Result<Self> {
        let image_id = image_id.into();
        if image_id.is_empty() {
            return Err(MapEvalError::malformed("image id must not be empty"));
        }
        if !class_id.is_finite() {
            return Err(MapEvalError::malformed(format!(
                "class id must be finite, got {}",
                class_id
            )));
        }
        if !confidence.is_finite() {
            return Err(MapEvalError::malformed(format!(
                "confidence must be finite, got {}",
                confidence
            )));
        }
        if let Some(bad) = bbox.iter().find(|v| !v.is_finite()) {
            return Err(MapEvalError::malformed(format!(
                "coordinates must be finite, got {}",
                bad
            )));
        }

        Ok(Self {
            image_id,
            class_id,
            confidence,
            bbox,
        })
    }

    pub fn image_id(&self) -> &str {
        &self.image_id
    }

    pub fn class_id(&self) -> f64 {
        self.class_id
    }

    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    /// Raw geometry, interpreted under the evaluation's [`BoxFormat`].
    pub fn bbox(&self) -> [f64; 4] {
        self.bbox
    }

    /// Geometry as a corner-form box under the given convention.
    pub fn to_bbox(&self, format: BoxFormat) -> BoundingBox {
        BoundingBox::from_format(&self.bbox, format)
    }
}

/// Classification of one prediction after matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// Matched an unclaimed ground truth above the IoU threshold.
    TruePositive,
    /// Best IoU at or below the threshold, or no ground truth in the image.
    FalsePositive,
    /// Best match above the threshold had already been claimed.
    Duplicate,
}

impl Outcome {
    pub fn is_true_positive(self) -> bool {
        matches!(self, Outcome::TruePositive)
    }
}

/// Precision-recall curve, anchored at `(recall = 0, precision = 1)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrCurve {
    pub recalls: Vec<f64>,
    pub precisions: Vec<f64>,
}

impl PrCurve {
    /// Curve holding only the boundary point.
    pub fn boundary() -> Self {
        Self {
            recalls: vec![0.0],
            precisions: vec![1.0],
        }
    }

    pub fn len(&self) -> usize {
        self.recalls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recalls.is_empty()
    }

    /// Iterate over `(recall, precision)` pairs.
    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.recalls
            .iter()
            .copied()
            .zip(self.precisions.iter().copied())
    }

    /// Ensure both sequences have the same length.
    pub fn check_lengths(&self) -> Result<()> {
        if self.recalls.len() != self.precisions.len() {
            return Err(MapEvalError::CurveLength {
                recalls: self.recalls.len(),
                precisions: self.precisions.len(),
            });
        }
        Ok(())
    }
}

/// Output of one evaluation call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationResult {
    /// Mean Average Precision across evaluated classes
    pub map: f64,
    /// Per-class AP; a single entry for the implicit class
    pub ap_per_class: Vec<f64>,
    pub curve: PrCurve,
    pub stats: EvaluationStats,
    pub iou_threshold: f64,
    pub box_format: BoxFormat,
}

impl EvaluationResult {
    /// mAP as a percentage rounded to one decimal, e.g. `mAP: 79.2%`.
    pub fn summary_line(&self) -> String {
        format!("mAP: {:.1}%", (self.map * 1000.0).round() / 10.0)
    }
}
