//! Confidence-gated majority vote over recent classifier labels
//!
//! A frame below the confidence threshold empties the window instead of being
//! skipped, so an ambiguous pose breaks any consensus that was building up.

use std::collections::VecDeque;

use crate::classifier::ClassifierOutput;
use crate::config::GestureConfig;

/// Rolling window of accepted labels
#[derive(Debug, Clone)]
pub struct VoteBuffer {
    window: VecDeque<String>,
    capacity: usize,
    confidence_threshold: f32,
    required_consensus: f32,
}

impl VoteBuffer {
    pub fn new(capacity: usize, confidence_threshold: f32, required_consensus: f32) -> Self {
        let capacity = capacity.max(1);
        Self {
            window: VecDeque::with_capacity(capacity),
            capacity,
            confidence_threshold,
            required_consensus,
        }
    }

    pub fn from_config(config: &GestureConfig) -> Self {
        Self::new(
            config.buffer_size,
            config.confidence_threshold,
            config.required_consensus,
        )
    }

    /// Feed one classification; returns the label once the window agrees on it
    pub fn accept(&mut self, output: &ClassifierOutput) -> Option<String> {
        if output.confidence.is_nan() || output.confidence < self.confidence_threshold {
            if !self.window.is_empty() {
                tracing::debug!(
                    "Low confidence {:.2} for {}, clearing vote window",
                    output.confidence,
                    output.label
                );
            }
            self.window.clear();
            return None;
        }

        if self.window.len() == self.capacity {
            self.window.pop_front();
        }
        self.window.push_back(output.label.clone());

        let (label, count) = self.mode()?;
        let consensus = count as f32 / self.window.len() as f32;
        if consensus < self.required_consensus {
            return None;
        }

        Some(label.to_string())
    }

    /// Most frequent label and its count; ties go to the label seen first
    pub fn mode(&self) -> Option<(&str, usize)> {
        let mut counts: Vec<(&str, usize)> = Vec::with_capacity(self.window.len());
        for label in &self.window {
            match counts.iter_mut().find(|(l, _)| *l == label.as_str()) {
                Some((_, n)) => *n += 1,
                None => counts.push((label.as_str(), 1)),
            }
        }

        let mut best: Option<(&str, usize)> = None;
        for (label, count) in counts {
            if best.map_or(true, |(_, n)| count > n) {
                best = Some((label, count));
            }
        }
        best
    }

    pub fn len(&self) -> usize {
        self.window.len()
    }

    pub fn is_empty(&self) -> bool {
        self.window.is_empty()
    }

    pub fn clear(&mut self) {
        self.window.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buffer() -> VoteBuffer {
        VoteBuffer::from_config(&GestureConfig::default())
    }

    #[test]
    fn test_low_confidence_clears() {
        let mut votes = buffer();
        votes.accept(&ClassifierOutput::new("A", 0.9));
        votes.accept(&ClassifierOutput::new("A", 0.9));
        assert_eq!(votes.len(), 2);

        for c in [0.0, 0.3, 0.5, 0.649] {
            assert_eq!(votes.accept(&ClassifierOutput::new("A", c)), None);
            assert!(votes.is_empty());
        }
    }

    #[test]
    fn test_nan_confidence_clears() {
        let mut votes = buffer();
        votes.accept(&ClassifierOutput::new("A", 0.9));
        assert_eq!(votes.accept(&ClassifierOutput::new("A", f32::NAN)), None);
        assert!(votes.is_empty());
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let mut votes = buffer();
        assert_eq!(
            votes.accept(&ClassifierOutput::new("B", 0.65)),
            Some("B".to_string())
        );
    }

    #[test]
    fn test_fresh_window_agrees_immediately() {
        // Consensus is measured against the current length, not the capacity
        let mut votes = buffer();
        assert_eq!(
            votes.accept(&ClassifierOutput::new("A", 0.9)),
            Some("A".to_string())
        );
    }

    #[test]
    fn test_disagreement_blocks_until_window_settles() {
        let mut votes = buffer();
        assert_eq!(votes.accept(&ClassifierOutput::new("A", 0.9)), Some("A".to_string()));
        // [A, B] -> 0.5
        assert_eq!(votes.accept(&ClassifierOutput::new("B", 0.9)), None);
        // [A, B, B] -> 0.67
        assert_eq!(votes.accept(&ClassifierOutput::new("B", 0.9)), None);
        // [B, B, B] -> 1.0
        assert_eq!(votes.accept(&ClassifierOutput::new("B", 0.9)), Some("B".to_string()));
    }

    #[test]
    fn test_identical_labels_reach_consensus() {
        // ceil(0.9 * 3) = 3 identical labels always settle, whatever came before
        let mut votes = buffer();
        votes.accept(&ClassifierOutput::new("X", 0.9));
        votes.accept(&ClassifierOutput::new("Y", 0.9));

        let results: Vec<_> = (0..3)
            .map(|_| votes.accept(&ClassifierOutput::new("C", 0.8)))
            .collect();
        assert_eq!(results.last().unwrap().as_deref(), Some("C"));
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let mut votes = buffer();
        for label in ["A", "B", "C", "D"] {
            votes.accept(&ClassifierOutput::new(label, 0.9));
        }
        assert_eq!(votes.len(), 3);
        // A was evicted, so B is the first-seen of the tied labels
        assert_eq!(votes.mode(), Some(("B", 1)));
    }

    #[test]
    fn test_mode_tie_break_insertion_order() {
        let mut votes = VoteBuffer::new(4, 0.5, 0.5);
        for label in ["B", "A", "A", "B"] {
            votes.accept(&ClassifierOutput::new(label, 0.9));
        }
        assert_eq!(votes.mode(), Some(("B", 2)));
    }

    #[test]
    fn test_lower_consensus_accepts_majority() {
        let mut votes = VoteBuffer::new(3, 0.65, 0.6);
        votes.accept(&ClassifierOutput::new("A", 0.9));
        votes.accept(&ClassifierOutput::new("B", 0.9));
        assert_eq!(votes.accept(&ClassifierOutput::new("A", 0.9)), Some("A".to_string()));
    }
}
