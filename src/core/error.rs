//! Error types for configuration and data loading.

use thiserror::Error;

/// Errors that can occur when loading simulation or enemy data.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File could not be read.
    #[error("Failed to read file '{path}': {details}")]
    Read { path: String, details: String },

    /// RON parsing failed.
    #[error("Parse error in '{path}': {details}")]
    Parse { path: String, details: String },

    /// Parsed fine but holds values the simulation cannot run with.
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
