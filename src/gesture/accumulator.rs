//! Word accumulation state machine
//!
//! Tracks hand presence and turns stable letters into a word. A held pose
//! keeps producing the same stable letter every frame, so a repeat within the
//! cooldown is swallowed. When the hand disappears a grace deadline is armed;
//! if it passes before the hand returns, the word is finalized.

use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

use crate::config::GestureConfig;
use crate::output::WordEvent;

/// Hand tracking phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackingState {
    /// No hand tracked
    #[default]
    Idle,
    /// Hand tracked, letters accepted
    Tracking,
    /// Hand lost, waiting for it to come back
    GraceTimer,
}

impl std::fmt::Display for TrackingState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrackingState::Idle => write!(f, "idle"),
            TrackingState::Tracking => write!(f, "tracking"),
            TrackingState::GraceTimer => write!(f, "grace_timer"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct WordAccumulator {
    state: TrackingState,
    word: String,
    last_letter: Option<(String, Instant)>,
    /// Outstanding grace deadline; only set in `GraceTimer`
    grace_deadline: Option<Instant>,
    letter_cooldown: Duration,
    no_hand_reset: Duration,
}

impl WordAccumulator {
    pub fn new(letter_cooldown: Duration, no_hand_reset: Duration) -> Self {
        Self {
            state: TrackingState::Idle,
            word: String::new(),
            last_letter: None,
            grace_deadline: None,
            letter_cooldown,
            no_hand_reset,
        }
    }

    pub fn from_config(config: &GestureConfig) -> Self {
        Self::new(config.letter_cooldown(), config.no_hand_reset())
    }

    pub fn state(&self) -> TrackingState {
        self.state
    }

    pub fn word(&self) -> &str {
        &self.word
    }

    pub fn last_letter(&self) -> Option<&str> {
        self.last_letter.as_ref().map(|(l, _)| l.as_str())
    }

    pub fn grace_deadline(&self) -> Option<Instant> {
        self.grace_deadline
    }

    /// Hand visible this frame
    pub fn hand_seen(&mut self) {
        if self.grace_deadline.take().is_some() {
            tracing::debug!("Hand back before grace period ended");
        }
        if self.state != TrackingState::Tracking {
            tracing::debug!("Tracking state: {} -> tracking", self.state);
        }
        self.state = TrackingState::Tracking;
    }

    /// Hand missing this frame
    pub fn hand_lost(&mut self, now: Instant) {
        if self.state != TrackingState::Tracking {
            return;
        }
        self.grace_deadline = Some(now + self.no_hand_reset);
        self.state = TrackingState::GraceTimer;
        tracing::debug!(
            "Hand lost, finalizing in {}ms unless it returns",
            self.no_hand_reset.as_millis()
        );
    }

    /// A stable letter came out of the vote window
    pub fn accept_letter(&mut self, letter: &str, now: Instant) -> Option<WordEvent> {
        if self.state != TrackingState::Tracking {
            return None;
        }

        if let Some((ref last, at)) = self.last_letter {
            if last == letter && now.duration_since(at) < self.letter_cooldown {
                return None;
            }
        }

        self.word.push_str(letter);
        self.last_letter = Some((letter.to_string(), now));
        Some(WordEvent::LetterAppended {
            letter: letter.to_string(),
        })
    }

    /// Fire the grace timer if its deadline has passed
    pub fn poll_grace(&mut self, now: Instant) -> Option<WordEvent> {
        match self.grace_deadline {
            Some(deadline) if now >= deadline => {}
            _ => return None,
        }

        self.grace_deadline = None;
        self.state = TrackingState::Idle;
        self.last_letter = None;

        if self.word.is_empty() {
            tracing::debug!("Grace period over with no letters");
            return None;
        }

        Some(WordEvent::WordFinalized {
            word: std::mem::take(&mut self.word),
        })
    }

    /// Discard the word in progress
    pub fn clear(&mut self) -> Option<WordEvent> {
        self.last_letter = None;
        if self.word.is_empty() {
            return None;
        }
        Some(WordEvent::WordCleared {
            word: std::mem::take(&mut self.word),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const COOLDOWN: Duration = Duration::from_millis(1500);
    const GRACE: Duration = Duration::from_millis(600);

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn tracking() -> (WordAccumulator, Instant) {
        let mut acc = WordAccumulator::new(COOLDOWN, GRACE);
        acc.hand_seen();
        (acc, Instant::now())
    }

    fn appended(l: &str) -> Option<WordEvent> {
        Some(WordEvent::LetterAppended {
            letter: l.to_string(),
        })
    }

    #[test]
    fn test_initial_state() {
        let acc = WordAccumulator::new(COOLDOWN, GRACE);
        assert_eq!(acc.state(), TrackingState::Idle);
        assert_eq!(acc.word(), "");
        assert!(acc.grace_deadline().is_none());
    }

    #[test]
    fn test_repeat_within_cooldown_suppressed() {
        let (mut acc, t0) = tracking();
        assert_eq!(acc.accept_letter("A", t0), appended("A"));
        assert_eq!(acc.accept_letter("A", t0 + ms(500)), None);
        assert_eq!(acc.accept_letter("A", t0 + ms(1499)), None);
        assert_eq!(acc.word(), "A");
    }

    #[test]
    fn test_suppression_does_not_extend_cooldown() {
        let (mut acc, t0) = tracking();
        acc.accept_letter("A", t0);
        acc.accept_letter("A", t0 + ms(1400));
        assert_eq!(acc.accept_letter("A", t0 + ms(1500)), appended("A"));
        assert_eq!(acc.word(), "AA");
    }

    #[test]
    fn test_different_letter_not_suppressed() {
        let (mut acc, t0) = tracking();
        acc.accept_letter("H", t0);
        assert_eq!(acc.accept_letter("I", t0 + ms(10)), appended("I"));
        assert_eq!(acc.accept_letter("H", t0 + ms(20)), appended("H"));
        assert_eq!(acc.word(), "HIH");
        assert_eq!(acc.last_letter(), Some("H"));
    }

    #[test]
    fn test_letters_ignored_when_not_tracking() {
        let mut acc = WordAccumulator::new(COOLDOWN, GRACE);
        assert_eq!(acc.accept_letter("A", Instant::now()), None);

        let (mut acc, t0) = tracking();
        acc.hand_lost(t0);
        assert_eq!(acc.accept_letter("A", t0), None);
        assert_eq!(acc.word(), "");
    }

    #[test]
    fn test_hand_returns_within_grace() {
        let (mut acc, t0) = tracking();
        acc.accept_letter("B", t0);
        acc.hand_lost(t0 + ms(100));
        assert_eq!(acc.state(), TrackingState::GraceTimer);

        assert_eq!(acc.poll_grace(t0 + ms(500)), None);
        acc.hand_seen();
        assert_eq!(acc.state(), TrackingState::Tracking);
        assert!(acc.grace_deadline().is_none());

        // The cancelled deadline must not fire later
        assert_eq!(acc.poll_grace(t0 + ms(5000)), None);
        assert_eq!(acc.word(), "B");
    }

    #[test]
    fn test_grace_expiry_finalizes_once() {
        let (mut acc, t0) = tracking();
        acc.accept_letter("O", t0);
        acc.accept_letter("K", t0 + ms(50));
        acc.hand_lost(t0 + ms(100));

        assert_eq!(
            acc.poll_grace(t0 + ms(700)),
            Some(WordEvent::WordFinalized {
                word: "OK".to_string()
            })
        );
        assert_eq!(acc.state(), TrackingState::Idle);
        assert_eq!(acc.word(), "");
        assert_eq!(acc.last_letter(), None);
        assert_eq!(acc.poll_grace(t0 + ms(2000)), None);
    }

    #[test]
    fn test_grace_expiry_with_empty_word() {
        let (mut acc, t0) = tracking();
        acc.hand_lost(t0);
        assert_eq!(acc.poll_grace(t0 + GRACE), None);
        assert_eq!(acc.state(), TrackingState::Idle);
    }

    #[test]
    fn test_hand_lost_only_arms_from_tracking() {
        let mut acc = WordAccumulator::new(COOLDOWN, GRACE);
        let t0 = Instant::now();
        acc.hand_lost(t0);
        assert_eq!(acc.state(), TrackingState::Idle);
        assert!(acc.grace_deadline().is_none());

        acc.hand_seen();
        acc.hand_lost(t0);
        // A second loss keeps the original deadline
        acc.hand_lost(t0 + ms(300));
        assert_eq!(acc.grace_deadline(), Some(t0 + GRACE));
    }

    #[test]
    fn test_finalize_forgets_last_letter() {
        let (mut acc, t0) = tracking();
        acc.accept_letter("A", t0);
        acc.hand_lost(t0);
        acc.poll_grace(t0 + GRACE);

        acc.hand_seen();
        // Same letter right after a new word starts is a new letter
        assert_eq!(acc.accept_letter("A", t0 + ms(700)), appended("A"));
    }

    #[test]
    fn test_clear() {
        let (mut acc, t0) = tracking();
        assert_eq!(acc.clear(), None);

        acc.accept_letter("N", t0);
        assert_eq!(
            acc.clear(),
            Some(WordEvent::WordCleared {
                word: "N".to_string()
            })
        );
        assert_eq!(acc.word(), "");
        assert_eq!(acc.state(), TrackingState::Tracking);
    }
}
