//! Evaluation settings.

use crate::error::Result;
use crate::threshold::validate_threshold;
use crate::types::BoxFormat;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

pub const DEFAULT_IOU_THRESHOLD: f64 = 0.5;

fn default_iou_threshold() -> f64 {
    DEFAULT_IOU_THRESHOLD
}

/// Settings for one evaluation call.
///
/// Missing fields in a JSON file fall back to the defaults: IoU threshold 0.5,
/// corner coordinates, no confidence filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EvaluationConfig {
    /// IoU the best match must exceed to count as a true positive
    #[serde(default = "default_iou_threshold")]
    pub iou_threshold: f64,
    #[serde(default)]
    pub box_format: BoxFormat,
    /// Predictions below this confidence are dropped before matching
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_confidence: Option<f64>,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            iou_threshold: DEFAULT_IOU_THRESHOLD,
            box_format: BoxFormat::default(),
            min_confidence: None,
        }
    }
}

impl EvaluationConfig {
    /// Load settings from a JSON file and validate them.
    ///
    /// ```no_run
    /// use map_eval::config::EvaluationConfig;
    ///
    /// let config = EvaluationConfig::from_file("eval.json").unwrap();
    /// println!("IoU threshold: {}", config.iou_threshold);
    /// ```
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        let config: EvaluationConfig = serde_json::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse settings from a JSON string and validate them.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: EvaluationConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Replace the fields given as `Some` and validate the result.
    ///
    /// Command-line flags are applied this way on top of a config file, so a
    /// flag always wins over the file value.
    ///
    /// ```
    /// use map_eval::config::EvaluationConfig;
    /// use map_eval::types::BoxFormat;
    ///
    /// let config = EvaluationConfig::from_json(r#"{"iou_threshold": 0.3}"#)
    ///     .unwrap()
    ///     .with_overrides(Some(0.75), None, None)
    ///     .unwrap();
    /// assert_eq!(config.iou_threshold, 0.75);
    /// assert_eq!(config.box_format, BoxFormat::Corners);
    /// ```
    pub fn with_overrides(
        mut self,
        iou_threshold: Option<f64>,
        box_format: Option<BoxFormat>,
        min_confidence: Option<f64>,
    ) -> Result<Self> {
        if let Some(iou_threshold) = iou_threshold {
            self.iou_threshold = iou_threshold;
        }
        if let Some(box_format) = box_format {
            self.box_format = box_format;
        }
        if min_confidence.is_some() {
            self.min_confidence = min_confidence;
        }
        self.validate()?;
        Ok(self)
    }

    /// Check both thresholds are within [0.0, 1.0].
    pub fn validate(&self) -> Result<()> {
        validate_threshold(self.iou_threshold, "IoU threshold")?;
        if let Some(min_confidence) = self.min_confidence {
            validate_threshold(min_confidence, "confidence threshold")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EvaluationConfig::default();
        assert_eq!(config.iou_threshold, 0.5);
        assert_eq!(config.box_format, BoxFormat::Corners);
        assert!(config.min_confidence.is_none());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = EvaluationConfig::from_json(r#"{"box_format": "midpoint"}"#).unwrap();
        assert_eq!(config.iou_threshold, 0.5);
        assert_eq!(config.box_format, BoxFormat::Midpoint);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(EvaluationConfig::from_json(r#"{"iou_threshold": 1.5}"#).is_err());
        assert!(EvaluationConfig::from_json(r#"{"min_confidence": -0.2}"#).is_err());
        assert!(EvaluationConfig::from_json(r#"{"box_format": "xywh"}"#).is_err());
        assert!(EvaluationConfig::from_json(r#"{"iou": 0.5}"#).is_err());
    }

    #[test]
    fn test_overrides_take_precedence_over_file_values() {
        let file = EvaluationConfig::from_json(
            r#"{"iou_threshold": 0.3, "box_format": "midpoint", "min_confidence": 0.2}"#,
        )
        .unwrap();

        let config = file
            .clone()
            .with_overrides(Some(0.7), Some(BoxFormat::Corners), Some(0.6))
            .unwrap();
        assert_eq!(config.iou_threshold, 0.7);
        assert_eq!(config.box_format, BoxFormat::Corners);
        assert_eq!(config.min_confidence, Some(0.6));

        let untouched = file.clone().with_overrides(None, None, None).unwrap();
        assert_eq!(untouched, file);
    }

    #[test]
    fn test_override_is_validated() {
        let result = EvaluationConfig::default().with_overrides(Some(2.0), None, None);
        assert!(result.is_err());
    }
}
