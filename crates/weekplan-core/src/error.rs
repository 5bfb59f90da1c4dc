//! Core error types for weekplan-core.
//!
//! This module defines the error hierarchy using thiserror. Validation
//! failures abort a whole scheduling run; a chunk that does not fit in the
//! week is not an error and never shows up here.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for weekplan-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Malformed scheduling input
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Failed to read an input file
    #[error("Failed to read {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Validation errors raised while reading tasks and busy intervals.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Busy interval outside `0 <= start < end <= 1440`
    #[error("Invalid busy interval: start ({start}) must be before end ({end}) and both within 0..=1440")]
    InvalidInterval { start: i64, end: i64 },

    /// Day index outside Monday..=Sunday
    #[error("Day index {day} out of range (expected 0-6)")]
    DayOutOfRange { day: i64 },

    /// Task without an id
    #[error("Task is missing an id")]
    MissingTaskId,

    /// Unrecognized priority class
    #[error("Invalid priority class '{0}' (expected low, medium or high)")]
    InvalidPriorityClass(String),

    /// Due date that is neither a date nor an "unspecified" sentinel
    #[error("Invalid due date '{value}' for task '{task_id}'")]
    InvalidDueDate { task_id: String, value: String },

    /// Negative, non-finite or oversized effort estimate
    #[error("Invalid estimated hours {hours} for task '{task_id}'")]
    InvalidEstimate { task_id: String, hours: f64 },
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Key not present in the configuration document
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// No place to keep the configuration file
    #[error("Could not determine configuration directory")]
    NoConfigDir,
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
