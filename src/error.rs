//! Error types for signspell

use thiserror::Error;

/// Main error type for signspell
#[derive(Error, Debug)]
pub enum SignspellError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Tracking error: {0}")]
    Tracking(#[from] TrackingError),

    #[error("Classifier error: {0}")]
    Classifier(#[from] ClassifierError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadFile(String),

    #[error("Failed to parse config: {0}")]
    Parse(String),

    #[error("Invalid configuration value: {field} - {message}")]
    InvalidValue { field: String, message: String },
}

/// Tracking-related errors (landmark input + hand packet receiver)
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TrackingError {
    #[error("Invalid landmark input: expected {expected} points, got {actual}")]
    InvalidInput { expected: usize, actual: usize },

    #[error("Hand receiver error: {0}")]
    Receiver(String),

    #[error("Hand packet parse error: {0}")]
    Parse(String),
}

/// Classifier-related errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClassifierError {
    #[error("Classifier not ready")]
    NotReady,

    #[error("Inference failed: {0}")]
    Inference(String),
}

/// Result type alias for signspell operations
pub type Result<T> = std::result::Result<T, SignspellError>;
