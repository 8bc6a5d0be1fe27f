//! Output module
//!
//! Word events leave the engine here. Anything that speaks, displays or
//! exports words subscribes through a [`WordSink`]; the engine never calls
//! those collaborators itself.

pub mod json;
pub mod transcript;

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

pub use json::JsonLinesSink;
pub use transcript::Transcript;

/// Event produced by the gesture engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum WordEvent {
    /// A stable letter was added to the word in progress
    LetterAppended { letter: String },
    /// The hand left long enough for the word to be complete
    WordFinalized { word: String },
    /// The word in progress was discarded on request
    WordCleared { word: String },
}

impl std::fmt::Display for WordEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WordEvent::LetterAppended { letter } => write!(f, "letter {}", letter),
            WordEvent::WordFinalized { word } => write!(f, "word \"{}\"", word),
            WordEvent::WordCleared { word } => write!(f, "cleared \"{}\"", word),
        }
    }
}

/// Consumer of word events
pub trait WordSink {
    fn handle(&mut self, event: &WordEvent);
}

/// Deliver each event to every sink, in order
pub fn dispatch(events: &[WordEvent], sinks: &mut [&mut dyn WordSink]) {
    for event in events {
        for sink in sinks.iter_mut() {
            sink.handle(event);
        }
    }
}

/// Logs events through `tracing`
#[derive(Debug, Default)]
pub struct TracingSink;

impl WordSink for TracingSink {
    fn handle(&mut self, event: &WordEvent) {
        match event {
            WordEvent::LetterAppended { letter } => tracing::info!("Letter appended: {}", letter),
            WordEvent::WordFinalized { word } => tracing::info!("Word finalized: {}", word),
            WordEvent::WordCleared { word } => tracing::info!("Word cleared: {}", word),
        }
    }
}

/// Forwards events to a broadcast channel
#[derive(Debug, Clone)]
pub struct BroadcastSink {
    tx: broadcast::Sender<WordEvent>,
}

impl BroadcastSink {
    pub fn new(tx: broadcast::Sender<WordEvent>) -> Self {
        Self { tx }
    }
}

impl WordSink for BroadcastSink {
    fn handle(&mut self, event: &WordEvent) {
        // No subscribers is fine
        let _ = self.tx.send(event.clone());
    }
}
