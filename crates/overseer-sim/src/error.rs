//! Error types for the headless driver.
//!
//! [`SimError`] wraps every failure mode between startup and printing the
//! run report.

/// Top-level error for the `overseer-sim` binary.
///
/// Each variant wraps a specific subsystem error, providing a single
/// error type that `main` can propagate with `?`.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    /// Configuration loading or validation failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: overseer_core::ConfigError,
    },

    /// Scenario loading or playback failed.
    #[error("scenario error: {source}")]
    Scenario {
        /// The underlying scenario error.
        #[from]
        source: overseer_core::ScenarioError,
    },

    /// The run report could not be serialized.
    #[error("report error: {source}")]
    Report {
        /// The underlying serialization error.
        #[from]
        source: serde_json::Error,
    },

    /// The run report could not be written to stdout.
    #[error("output error: {source}")]
    Output {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },
}
