//! Error types for the preview server.
//!
//! [`PreviewError`] covers configuration errors and server start failures.
//! Discovery problems (unreadable manifest, malformed label files) are not
//! errors here; they degrade to empty results and are recorded as
//! [`Diagnostic`](crate::locator::Diagnostic) values instead.

use std::path::PathBuf;

/// Errors that abort a preview invocation.
#[derive(Debug, thiserror::Error)]
pub enum PreviewError {
    /// The component reference does not name a usable component directory.
    #[error("Invalid component '{path}': {reason}")]
    InvalidComponent {
        /// Component reference as given, resolved against the project dir.
        path: PathBuf,
        /// Why the reference was rejected.
        reason: String,
    },

    /// The server configuration file exists but could not be read.
    #[error("Failed to read config file '{path}': {source}")]
    ConfigRead {
        /// Path of the configuration file.
        path: PathBuf,
        /// Underlying I/O failure.
        source: std::io::Error,
    },

    /// The server configuration file does not match the expected schema.
    #[error("Failed to parse config file '{path}': {source}")]
    ConfigParse {
        /// Path of the configuration file.
        path: PathBuf,
        /// Underlying JSON failure.
        source: serde_json::Error,
    },

    /// The configuration parsed but contains values that cannot be served.
    #[error("Config validation error: {message}")]
    ConfigValidation { message: String },

    /// Every probed port was in use.
    #[error("No free port found after {attempts} attempts starting at {start}")]
    NoFreePort { start: u16, attempts: usize },

    /// Binding the HTTP listener failed.
    #[error("Failed to bind preview server on port {port}: {source}")]
    Bind {
        port: u16,
        source: std::io::Error,
    },

    /// Other I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl PreviewError {
    /// Returns `true` for errors caused by caller input (bad component
    /// reference, bad config file) as opposed to runtime resource failures.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidComponent { .. }
                | Self::ConfigRead { .. }
                | Self::ConfigParse { .. }
                | Self::ConfigValidation { .. }
        )
    }
}

/// Result type for preview operations.
pub type Result<T> = std::result::Result<T, PreviewError>;
