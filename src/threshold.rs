//! IoU and confidence threshold utilities.

use crate::error::{MapEvalError, Result};
use crate::types::BoxRecord;

/// Validate that a threshold is in the valid range [0.0, 1.0].
///
/// `name` is used in the error message ("IoU threshold", "confidence threshold").
///
/// # Errors
///
/// Returns `InvalidThreshold` for values outside the range and for NaN.
pub fn validate_threshold(threshold: f64, name: &str) -> Result<()> {
    if !(0.0..=1.0).contains(&threshold) {
        return Err(MapEvalError::InvalidThreshold(format!(
            "{} must be between 0.0 and 1.0, got {}",
            name, threshold
        )));
    }
    Ok(())
}

/// Filter records by confidence score threshold.
///
/// # Arguments
///
/// * `records` - Predictions to filter
/// * `threshold` - Minimum confidence score (0.0 to 1.0)
///
/// # Returns
///
/// Returns a new vector containing only records with confidence >= threshold,
/// in their original order.
///
/// # Errors
///
/// Returns an error if the threshold is not in the valid range [0.0, 1.0].
///
/// # Example
///
/// ```
/// use map_eval::threshold::filter_by_confidence;
/// use map_eval::types::BoxRecord;
///
/// let records = vec![
///     BoxRecord::new("img", 0.0, 0.9, [10.0, 20.0, 30.0, 40.0]).unwrap(),
///     BoxRecord::new("img", 0.0, 0.3, [50.0, 60.0, 70.0, 80.0]).unwrap(),
/// ];
///
/// let filtered = filter_by_confidence(&records, 0.5).unwrap();
/// assert_eq!(filtered.len(), 1);
/// ```
pub fn filter_by_confidence(records: &[BoxRecord], threshold: f64) -> Result<Vec<BoxRecord>> {
    validate_threshold(threshold, "confidence threshold")?;

    Ok(records
        .iter()
        .filter(|record| record.confidence() >= threshold)
        .cloned()
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_by_confidence() {
        let records = vec![
            BoxRecord::new("a", 0.0, 0.9, [10.0, 20.0, 30.0, 40.0]).unwrap(),
            BoxRecord::new("b", 0.0, 0.3, [50.0, 60.0, 70.0, 80.0]).unwrap(),
        ];

        let filtered = filter_by_confidence(&records, 0.5).unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].image_id(), "a");
    }

    #[test]
    fn test_filter_keeps_threshold_value() {
        let records = vec![BoxRecord::new("a", 0.0, 0.5, [0.0, 0.0, 1.0, 1.0]).unwrap()];
        assert_eq!(filter_by_confidence(&records, 0.5).unwrap().len(), 1);
    }

    #[test]
    fn test_invalid_threshold() {
        let records = vec![];
        assert!(filter_by_confidence(&records, 1.5).is_err());
        assert!(filter_by_confidence(&records, -0.1).is_err());
        assert!(validate_threshold(f64::NAN, "IoU threshold").is_err());
    }

    #[test]
    fn test_error_names_threshold() {
        let err = validate_threshold(2.0, "IoU threshold").unwrap_err();
        assert!(err.to_string().contains("IoU threshold"));
    }
}
