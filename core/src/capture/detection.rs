use crate::math::stats::StatsHelper;
use serde::{Deserialize, Serialize};

/// One decode attempt reported by the camera decoder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawDetection {
    pub code: String,
    /// Per-character decode error, when the decoder reports it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub per_character_errors: Option<Vec<f32>>,
}

impl RawDetection {
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            per_character_errors: None,
        }
    }

    pub fn with_errors(code: impl Into<String>, errors: Vec<f32>) -> Self {
        Self {
            code: code.into(),
            per_character_errors: Some(errors),
        }
    }

    /// Mean decode error; `None` when no metrics were reported.
    pub fn average_error(&self) -> Option<f32> {
        self.per_character_errors
            .as_deref()
            .and_then(StatsHelper::mean)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn average_error_absent_without_metrics() {
        assert_eq!(RawDetection::new("123456").average_error(), None);
        assert_eq!(
            RawDetection::with_errors("123456", Vec::new()).average_error(),
            None
        );
    }

    #[test]
    fn average_error_is_mean_of_metrics() {
        let detection = RawDetection::with_errors("123456", vec![0.1, 0.3]);
        let avg = detection.average_error().unwrap();
        assert!((avg - 0.2).abs() < 1e-6);
    }

    #[test]
    fn deserializes_without_metrics() {
        let detection: RawDetection = serde_json::from_str(r#"{"code":"012345"}"#).unwrap();
        assert_eq!(detection, RawDetection::new("012345"));
    }
}
