//! Core error types for toastkit-core.
//!
//! The toast engine itself has no runtime failures: dismissing, updating or
//! removing an absent toast is a no-op. Errors only come from the edges of
//! the crate (configuration files and scripted scenarios).

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for toastkit-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Scenario script errors
    #[error("Scenario error: {0}")]
    Scenario(#[from] ScenarioError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to locate or create the configuration directory
    #[error("Failed to access config directory: {0}")]
    DataDir(String),

    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Key does not exist in the configuration
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),
}

/// Errors raised while loading or running a scripted scenario.
#[derive(Error, Debug)]
pub enum ScenarioError {
    #[error("Failed to read scenario file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse scenario TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// The scenario overrides a setting with a value the engine rejects
    #[error("Invalid scenario setting: {0}")]
    Config(#[from] ConfigError),

    /// A step refers to a label no earlier `toast` step defined
    #[error("Step {step}: unknown toast label '{label}'")]
    UnknownLabel { step: usize, label: String },

    /// Two `toast` steps share a label
    #[error("Step {step}: label '{label}' is already in use")]
    DuplicateLabel { step: usize, label: String },
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
