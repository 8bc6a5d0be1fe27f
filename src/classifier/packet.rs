//! Classifier fed by predictions that arrive inside tracker packets
//!
//! The tracker helper runs the model next to the landmark detector and ships
//! its output with the landmarks. Rust stores the latest result and hands it
//! to the engine when the frame is processed.

use serde::{Deserialize, Serialize};

use super::{labels::STATIC_LETTERS, Classifier, ClassifierOutput};
use crate::error::ClassifierError;
use crate::tracking::FeatureVector;

/// Model output as sent by the tracker helper
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    /// Predicted label, if the model reports one directly
    #[serde(default)]
    pub label: Option<String>,
    /// Confidence of `label`; falls back to the top probability
    #[serde(default)]
    pub confidence: Option<f32>,
    /// Full class distribution
    #[serde(default)]
    pub probabilities: Vec<f32>,
    /// Class names for `probabilities` (defaults to the static letters)
    #[serde(default)]
    pub labels: Option<Vec<String>>,
}

impl Prediction {
    pub fn to_output(&self) -> Result<ClassifierOutput, ClassifierError> {
        if let Some(ref label) = self.label {
            let confidence = self
                .confidence
                .or_else(|| self.probabilities.iter().copied().reduce(f32::max))
                .ok_or_else(|| {
                    ClassifierError::Inference(format!("no confidence for label {}", label))
                })?;
            return Ok(ClassifierOutput::new(label.clone(), confidence));
        }

        match self.labels {
            Some(ref labels) => {
                ClassifierOutput::from_distribution(labels.as_slice(), &self.probabilities)
            }
            None => ClassifierOutput::from_distribution(&STATIC_LETTERS, &self.probabilities),
        }
    }
}

/// Classifier backed by the predictions carried in tracker packets
#[derive(Debug, Default)]
pub struct PacketClassifier {
    model_ready: bool,
    pending: Option<Prediction>,
}

impl PacketClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record whether the helper has finished loading its model
    pub fn set_model_ready(&mut self, ready: bool) {
        if ready != self.model_ready {
            if ready {
                tracing::info!("Letter classifier ready");
            } else {
                tracing::warn!("Letter classifier no longer ready");
            }
        }
        self.model_ready = ready;
    }

    pub fn is_ready(&self) -> bool {
        self.model_ready
    }

    /// Store the prediction for the frame about to be processed
    pub fn submit(&mut self, prediction: Option<Prediction>) {
        self.pending = prediction;
    }
}

impl Classifier for PacketClassifier {
    fn classify(&mut self, _features: &FeatureVector) -> Result<ClassifierOutput, ClassifierError> {
        if !self.model_ready {
            return Err(ClassifierError::NotReady);
        }

        self.pending
            .take()
            .ok_or_else(|| ClassifierError::Inference("no prediction for this frame".to_string()))?
            .to_output()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracking::{normalize, sample_hand};

    fn features() -> FeatureVector {
        normalize(&sample_hand((0.5, 0.5, 0.0))).unwrap()
    }

    #[test]
    fn test_prediction_with_label_and_probabilities() {
        let pred: Prediction =
            serde_json::from_str(r#"{"label":"B","probabilities":[0.1,0.8,0.1]}"#).unwrap();
        let out = pred.to_output().unwrap();
        assert_eq!(out.label, "B");
        assert!((out.confidence - 0.8).abs() < f32::EPSILON);
    }

    #[test]
    fn test_prediction_distribution_only() {
        let mut probs = vec![0.01; STATIC_LETTERS.len()];
        probs[2] = 0.75;
        let pred = Prediction {
            probabilities: probs,
            ..Default::default()
        };
        let out = pred.to_output().unwrap();
        assert_eq!(out.label, "C");
    }

    #[test]
    fn test_prediction_custom_labels() {
        let pred: Prediction = serde_json::from_str(
            r#"{"labels":["yes","no"],"probabilities":[0.3,0.7]}"#,
        )
        .unwrap();
        assert_eq!(pred.to_output().unwrap().label, "no");
    }

    #[test]
    fn test_prediction_label_without_confidence() {
        let pred = Prediction {
            label: Some("A".to_string()),
            ..Default::default()
        };
        assert!(pred.to_output().is_err());
    }

    #[test]
    fn test_not_ready_until_model_loaded() {
        let mut classifier = PacketClassifier::new();
        classifier.submit(Some(Prediction {
            label: Some("A".to_string()),
            confidence: Some(0.9),
            ..Default::default()
        }));

        assert_eq!(classifier.classify(&features()), Err(ClassifierError::NotReady));

        classifier.set_model_ready(true);
        let out = classifier.classify(&features()).unwrap();
        assert_eq!(out, ClassifierOutput::new("A", 0.9));
    }

    #[test]
    fn test_prediction_consumed_once() {
        let mut classifier = PacketClassifier::new();
        classifier.set_model_ready(true);
        classifier.submit(Some(Prediction {
            label: Some("L".to_string()),
            confidence: Some(0.7),
            ..Default::default()
        }));

        assert!(classifier.classify(&features()).is_ok());
        assert!(matches!(
            classifier.classify(&features()),
            Err(ClassifierError::Inference(_))
        ));
    }
}
