//! Error types for the `flyway-data` crate.
//!
//! Only files that exist but cannot be read or parsed are errors.
//! A candidate file that is simply absent is skipped by the loader --
//! partial data degrades to a smaller catalog, never to a failure.

use std::path::PathBuf;

/// Errors that can occur while loading flight files.
#[derive(Debug, thiserror::Error)]
pub enum DataError {
    /// A flight file exists but could not be read.
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        /// The file that failed.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// A flight file was read but is not valid JSON in the expected
    /// schema.
    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        /// The file that failed.
        path: PathBuf,
        /// The underlying JSON error.
        source: serde_json::Error,
    },
}
