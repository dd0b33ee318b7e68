//! # Error Handling
//!
//! This module defines the centralized error type for the generator. It uses
//! the `thiserror` library to create an `Error` enum covering every failure
//! mode of the discovery pipeline and its collaborators.
//!
//! ## Error Kinds
//!
//! - **`Discovery`**: a directory walk failed (missing or unreadable path,
//!   permission denied) or discovery produced colliding project names.
//! - **`Configuration`**: a setting is malformed or a required value is
//!   missing. Carries an optional hint for the user.
//! - **`Filter`**: an include/exclude regular expression did not compile.
//! - **`ExternalService`**: the pull request change-set could not be fetched.
//! - **`DeadlineExceeded`**: the run took longer than the caller allowed.
//! - **`Io`** / **`Yaml`**: the rendered configuration could not be written.
//!
//! Every error is terminal for a run. No stage retries or recovers locally,
//! and the first error is returned to the caller unchanged.

use thiserror::Error;

/// Main error type for atlantis-yaml-generator operations
#[derive(Error, Debug)]
pub enum Error {
    /// Walking the directory tree failed.
    #[error("Discovery error at {path}: {message}")]
    Discovery { path: String, message: String },

    /// A setting could not be parsed or a required value is missing.
    #[error("Configuration error: {message}{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    Configuration {
        message: String,
        /// Optional hint for how to fix the setting
        hint: Option<String>,
    },

    /// An include or exclude pattern is not a valid regular expression.
    #[error("Invalid project filter '{pattern}': {source}")]
    Filter {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// Retrieving the pull request change-set failed.
    #[error("External service error for {url}: {message}")]
    ExternalService { url: String, message: String },

    /// The run deadline expired before the named stage finished.
    #[error("Deadline exceeded during {stage}")]
    DeadlineExceeded { stage: String },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A YAML serialization error, wrapped from `serde_yaml::Error`.
    #[error("YAML serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl Error {
    /// Shorthand for a `Configuration` error without a hint.
    pub fn config(message: impl Into<String>) -> Self {
        Error::Configuration {
            message: message.into(),
            hint: None,
        }
    }

    /// Shorthand for a `Configuration` error with a hint.
    pub fn config_with_hint(message: impl Into<String>, hint: impl Into<String>) -> Self {
        Error::Configuration {
            message: message.into(),
            hint: Some(hint.into()),
        }
    }
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
