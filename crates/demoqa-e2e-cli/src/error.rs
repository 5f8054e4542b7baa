//! Error types for the CLI

use thiserror::Error;

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;

/// Errors that can occur in the CLI
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {message}")]
    Config {
        /// Error message
        message: String,
    },

    /// Some scenarios failed
    #[error("{failed} of {total} tests failed")]
    TestsFailed {
        /// Failed count
        failed: usize,
        /// Total count
        total: usize,
    },

    /// Command needs a feature this binary was built without
    #[error("{command} requires the `{feature}` feature. Rebuild with --features {feature}")]
    FeatureDisabled {
        /// Command name
        command: &'static str,
        /// Cargo feature
        feature: &'static str,
    },

    /// IO error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Suite library error
    #[error("{0}")]
    Suite(#[from] demoqa_e2e::FormError),
}

impl CliError {
    /// Create a configuration error
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}
