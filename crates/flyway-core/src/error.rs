//! Error types for the `flyway-core` crate.
//!
//! The tick path itself is infallible; errors here cover construction
//! and configuration only.

/// Errors that can occur when building a timeline.
#[derive(Debug, thiserror::Error)]
pub enum TimelineError {
    /// The playback configuration is unusable.
    #[error("invalid playback configuration: {reason}")]
    InvalidConfig {
        /// What was wrong with the configuration.
        reason: String,
    },
}
