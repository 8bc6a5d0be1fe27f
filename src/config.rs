//! Configuration parsing and management for signspell

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{ConfigError, SignspellError};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub gesture: GestureConfig,
    pub tracking: TrackingConfig,
    pub output: OutputConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SignspellError> {
        let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            ConfigError::ReadFile(format!("{}: {}", path.as_ref().display(), e))
        })?;

        Self::from_str(&contents)
    }

    /// Parse configuration from a TOML string
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Result<Self, SignspellError> {
        toml::from_str(s).map_err(|e| ConfigError::Parse(e.to_string()).into())
    }

    /// Load configuration from default paths
    pub fn load() -> Result<Self, SignspellError> {
        let paths = [
            PathBuf::from("signspell.toml"),
            PathBuf::from("config/signspell.toml"),
            dirs_path().join("config.toml"),
        ];

        for path in &paths {
            if path.exists() {
                tracing::info!("Loading config from: {}", path.display());
                return Self::from_file(path);
            }
        }

        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), SignspellError> {
        let gesture = &self.gesture;

        for (field, value) in [
            ("gesture.confidence_threshold", gesture.confidence_threshold),
            ("gesture.required_consensus", gesture.required_consensus),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(invalid(field, "Value must be between 0.0 and 1.0"));
            }
        }

        if gesture.buffer_size == 0 {
            return Err(invalid(
                "gesture.buffer_size",
                "Buffer size must be at least 1",
            ));
        }

        if gesture.classify_every == 0 {
            return Err(invalid(
                "gesture.classify_every",
                "Decimation factor must be at least 1",
            ));
        }

        if gesture.no_hand_reset_ms == 0 {
            return Err(invalid(
                "gesture.no_hand_reset_ms",
                "Grace period must be greater than 0",
            ));
        }

        if gesture.tick_interval_ms == 0 {
            return Err(invalid(
                "gesture.tick_interval_ms",
                "Tick interval must be greater than 0",
            ));
        }

        if gesture.no_hand_reset_ms < gesture.tick_interval_ms {
            tracing::warn!(
                "Grace period ({}ms) is shorter than the tick interval ({}ms); \
                 words will finalize late",
                gesture.no_hand_reset_ms,
                gesture.tick_interval_ms
            );
        }

        if self.tracking.port == 0 {
            return Err(invalid("tracking.port", "Port must be greater than 0"));
        }

        Ok(())
    }
}

fn invalid(field: &str, message: &str) -> SignspellError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        message: message.to_string(),
    }
    .into()
}

/// Letter smoothing and word timing parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    /// Classifier outputs below this confidence clear the vote window
    pub confidence_threshold: f32,
    /// Number of recent labels kept for the majority vote
    pub buffer_size: usize,
    /// Fraction of the window that must agree before a letter is stable
    pub required_consensus: f32,
    /// Minimum time before the same letter may be appended again
    pub letter_cooldown_ms: u64,
    /// How long the hand may be missing before the word is finalized
    pub no_hand_reset_ms: u64,
    /// Classify only every Nth frame with a hand present (1 = every frame)
    pub classify_every: u32,
    /// How often the grace timer is polled
    pub tick_interval_ms: u64,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: 0.65,
            buffer_size: 3,
            required_consensus: 0.90,
            letter_cooldown_ms: 1500,
            no_hand_reset_ms: 600,
            classify_every: 1,
            tick_interval_ms: 50,
        }
    }
}

impl GestureConfig {
    pub fn letter_cooldown(&self) -> Duration {
        Duration::from_millis(self.letter_cooldown_ms)
    }

    pub fn no_hand_reset(&self) -> Duration {
        Duration::from_millis(self.no_hand_reset_ms)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

/// Hand tracker packet receiver configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackingConfig {
    /// UDP port to receive hand packets on
    pub port: u16,
    /// Listen address for UDP socket
    pub listen_address: String,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            port: 12347,
            listen_address: "127.0.0.1".to_string(),
        }
    }
}

/// Event output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Print every word event to stdout as a JSON line
    pub json_events: bool,
    /// Number of finalized words kept in the transcript
    pub transcript_words: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            json_events: true,
            transcript_words: 32,
        }
    }
}

/// Get the platform-specific configuration directory
fn dirs_path() -> PathBuf {
    #[cfg(target_os = "linux")]
    {
        if let Some(config_dir) = std::env::var_os("XDG_CONFIG_HOME") {
            return PathBuf::from(config_dir).join("signspell");
        }
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home).join(".config/signspell");
        }
    }

    #[cfg(target_os = "macos")]
    {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home).join("Library/Application Support/signspell");
        }
    }

    #[cfg(target_os = "windows")]
    {
        if let Some(appdata) = std::env::var_os("APPDATA") {
            return PathBuf::from(appdata).join("signspell");
        }
    }

    PathBuf::from(".")
}
