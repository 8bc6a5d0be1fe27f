//! signspell - fingerspelling recognizer core
//!
//! Turns a noisy per-frame stream of hand-pose classifications into stable
//! letters and finished words:
//! - Wrist-relative landmark normalization
//! - Confidence-gated majority vote over recent labels
//! - Letter cooldown and no-hand grace timing for word boundaries
//! - Word events for downstream speech, display or export

pub mod classifier;
pub mod config;
pub mod error;
pub mod gesture;
pub mod output;
pub mod tracking;

pub use config::Config;
pub use error::{Result, SignspellError};

use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};

use output::WordEvent;

/// Application state shared across all tasks
#[derive(Debug)]
pub struct AppState {
    /// Current configuration
    pub config: RwLock<Config>,
    /// Channel for word events
    pub event_tx: broadcast::Sender<WordEvent>,
    /// Shutdown signal
    pub shutdown_tx: broadcast::Sender<()>,
}

impl AppState {
    /// Create a new application state with the given configuration
    pub fn new(config: Config) -> Arc<Self> {
        let (event_tx, _) = broadcast::channel(64);
        let (shutdown_tx, _) = broadcast::channel(1);

        Arc::new(Self {
            config: RwLock::new(config),
            event_tx,
            shutdown_tx,
        })
    }

    /// Subscribe to word events
    pub fn subscribe_events(&self) -> broadcast::Receiver<WordEvent> {
        self.event_tx.subscribe()
    }

    /// Subscribe to shutdown signal
    pub fn subscribe_shutdown(&self) -> broadcast::Receiver<()> {
        self.shutdown_tx.subscribe()
    }

    /// Signal shutdown
    pub fn shutdown(&self) {
        let _ = self.shutdown_tx.send(());
    }
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
