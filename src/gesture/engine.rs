//! Frame-by-frame gesture engine
//!
//! Owns the vote window and the word accumulator. Every entry point runs to
//! completion on the caller's thread, so frames and timer polls never
//! interleave.

use crate::classifier::Classifier;
use crate::config::GestureConfig;
use crate::error::{ClassifierError, TrackingError};
use crate::output::WordEvent;
use crate::tracking::{normalize, LandmarkPoint, HAND_LANDMARK_COUNT};

use super::accumulator::{TrackingState, WordAccumulator};
use super::clock::{Clock, SystemClock};
use super::vote::VoteBuffer;

/// What happened to the classification step of a frame
#[derive(Debug, Clone, PartialEq)]
pub enum FrameStatus {
    /// No hand in view
    NoHand,
    /// Hand present but skipped by frame decimation
    Skipped,
    /// An overdue grace timer finalized the word; the frame is not classified
    GraceExpired,
    /// Classifier has no model yet; vote window untouched
    ClassifierNotReady,
    /// Classifier failed for this frame
    ClassifierFailed(String),
    /// Classified, but the vote window has not settled
    NoStableSymbol,
    /// The vote window settled on this letter
    Stable(String),
}

/// Result of one processed frame. `events` holds at most one event.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameOutput {
    pub events: Vec<WordEvent>,
    pub status: FrameStatus,
}

impl FrameOutput {
    fn new(events: Vec<WordEvent>, status: FrameStatus) -> Self {
        Self { events, status }
    }
}

pub struct GestureEngine<C: Clock = SystemClock> {
    votes: VoteBuffer,
    accumulator: WordAccumulator,
    clock: C,
    classify_every: u64,
    present_frames: u64,
}

impl GestureEngine<SystemClock> {
    pub fn with_system_clock(config: &GestureConfig) -> Self {
        Self::new(config, SystemClock)
    }
}

impl<C: Clock> GestureEngine<C> {
    pub fn new(config: &GestureConfig, clock: C) -> Self {
        Self {
            votes: VoteBuffer::from_config(config),
            accumulator: WordAccumulator::from_config(config),
            clock,
            classify_every: u64::from(config.classify_every.max(1)),
            present_frames: 0,
        }
    }

    /// Process one detector frame.
    ///
    /// Landmarks are validated before anything else; a malformed frame is
    /// rejected with no state change. An expired grace timer fires before the
    /// frame's own hand signal is applied; when it does, the hand is still
    /// marked present but classification waits for the next frame, so a frame
    /// never yields more than one event.
    pub fn process_frame(
        &mut self,
        hand_present: bool,
        landmarks: Option<&[LandmarkPoint]>,
        classifier: &mut dyn Classifier,
    ) -> Result<FrameOutput, TrackingError> {
        let features = if hand_present {
            let points = landmarks.ok_or(TrackingError::InvalidInput {
                expected: HAND_LANDMARK_COUNT,
                actual: 0,
            })?;
            Some(normalize(points)?)
        } else {
            None
        };

        let now = self.clock.now();
        let finalized = self.accumulator.poll_grace(now);

        let Some(features) = features else {
            self.accumulator.hand_lost(now);
            return Ok(FrameOutput::new(finalized.into_iter().collect(), FrameStatus::NoHand));
        };

        self.accumulator.hand_seen();

        if let Some(event) = finalized {
            return Ok(FrameOutput::new(vec![event], FrameStatus::GraceExpired));
        }

        let frame_index = self.present_frames;
        self.present_frames += 1;
        if frame_index % self.classify_every != 0 {
            return Ok(FrameOutput::new(Vec::new(), FrameStatus::Skipped));
        }

        let output = match classifier.classify(&features) {
            Ok(output) => output,
            Err(ClassifierError::NotReady) => {
                tracing::debug!("Classifier not ready, frame not classified");
                return Ok(FrameOutput::new(Vec::new(), FrameStatus::ClassifierNotReady));
            }
            Err(ClassifierError::Inference(msg)) => {
                tracing::warn!("Classifier failed: {}", msg);
                return Ok(FrameOutput::new(
                    Vec::new(),
                    FrameStatus::ClassifierFailed(msg),
                ));
            }
        };

        tracing::trace!("Classified {} ({:.2})", output.label, output.confidence);

        let (events, status) = match self.votes.accept(&output) {
            Some(letter) => {
                let appended = self.accumulator.accept_letter(&letter, now);
                (appended.into_iter().collect(), FrameStatus::Stable(letter))
            }
            None => (Vec::new(), FrameStatus::NoStableSymbol),
        };

        Ok(FrameOutput::new(events, status))
    }

    /// Fire the grace timer if it has expired
    pub fn tick(&mut self) -> Option<WordEvent> {
        let now = self.clock.now();
        self.accumulator.poll_grace(now)
    }

    /// Drop the word in progress
    pub fn clear_word(&mut self) -> Option<WordEvent> {
        self.accumulator.clear()
    }

    pub fn state(&self) -> TrackingState {
        self.accumulator.state()
    }

    pub fn word(&self) -> &str {
        self.accumulator.word()
    }

    pub fn votes(&self) -> &VoteBuffer {
        &self.votes
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }
}
