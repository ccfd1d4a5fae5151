//! Error types for the engine binary.
//!
//! [`EngineError`] is the top-level error type that wraps all possible
//! failure modes during engine startup.

/// Top-level error for the engine binary.
///
/// Each variant wraps a specific subsystem error, providing a single
/// error type that `main` can propagate with `?`. The playback loop
/// itself is infallible, so every variant here is a startup failure.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: flyway_core::config::ConfigError,
    },

    /// Flight catalog loading failed.
    #[error("data error: {source}")]
    Data {
        /// The underlying data error.
        #[from]
        source: flyway_data::DataError,
    },

    /// Timeline construction failed.
    #[error("timeline error: {source}")]
    Timeline {
        /// The underlying timeline error.
        #[from]
        source: flyway_core::error::TimelineError,
    },

    /// Observer API server failed to start.
    #[error("observer error: {source}")]
    Observer {
        /// The underlying startup error.
        #[from]
        source: flyway_observer::startup::StartupError,
    },
}
