//! Classifier seam
//!
//! Inference itself happens outside this crate (the tracker helper runs the
//! ONNX model). This module defines what a classifier hands back per frame and
//! how a raw probability distribution is decoded into a label.

mod labels;
mod packet;

pub use labels::{label_for_index, STATIC_LETTERS};
pub use packet::{PacketClassifier, Prediction};

use serde::{Deserialize, Serialize};

use crate::error::ClassifierError;
use crate::tracking::FeatureVector;

/// One frame's classification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifierOutput {
    pub label: String,
    /// Probability of `label` (0.0 - 1.0)
    pub confidence: f32,
}

impl ClassifierOutput {
    pub fn new(label: impl Into<String>, confidence: f32) -> Self {
        Self {
            label: label.into(),
            confidence,
        }
    }

    /// Pick the most probable label from a distribution.
    ///
    /// Ties resolve to the lowest class index.
    pub fn from_distribution<S: AsRef<str>>(
        labels: &[S],
        probabilities: &[f32],
    ) -> Result<Self, ClassifierError> {
        if probabilities.is_empty() {
            return Err(ClassifierError::Inference(
                "empty probability distribution".to_string(),
            ));
        }
        if labels.len() != probabilities.len() {
            return Err(ClassifierError::Inference(format!(
                "{} labels for {} probabilities",
                labels.len(),
                probabilities.len()
            )));
        }
        if probabilities.iter().any(|p| p.is_nan()) {
            return Err(ClassifierError::Inference(
                "NaN in probability distribution".to_string(),
            ));
        }

        let mut best = 0;
        for (i, p) in probabilities.iter().enumerate().skip(1) {
            if *p > probabilities[best] {
                best = i;
            }
        }

        Ok(Self::new(labels[best].as_ref(), probabilities[best]))
    }
}

/// Maps a feature vector to a label and confidence
pub trait Classifier {
    fn classify(&mut self, features: &FeatureVector) -> Result<ClassifierOutput, ClassifierError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_distribution_argmax() {
        let out = ClassifierOutput::from_distribution(&["A", "B", "C"], &[0.1, 0.7, 0.2]).unwrap();
        assert_eq!(out.label, "B");
        assert!((out.confidence - 0.7).abs() < f32::EPSILON);
    }

    #[test]
    fn test_from_distribution_tie_takes_first() {
        let out = ClassifierOutput::from_distribution(&["A", "B", "C"], &[0.4, 0.2, 0.4]).unwrap();
        assert_eq!(out.label, "A");
    }

    #[test]
    fn test_from_distribution_rejects_bad_input() {
        let empty: [&str; 0] = [];
        assert!(ClassifierOutput::from_distribution(&empty, &[]).is_err());
        assert!(ClassifierOutput::from_distribution(&["A"], &[0.5, 0.5]).is_err());
        assert!(ClassifierOutput::from_distribution(&["A", "B"], &[f32::NAN, 0.5]).is_err());
    }

    #[test]
    fn test_from_distribution_static_letters() {
        let mut probs = vec![0.0; STATIC_LETTERS.len()];
        probs[9] = 0.9;
        let out = ClassifierOutput::from_distribution(&STATIC_LETTERS, &probs).unwrap();
        // J is not a static letter, so index 9 is K
        assert_eq!(out.label, "K");
    }
}
