//! Flight-file loading and route catalog for the Flyway animation.
//!
//! This crate turns a directory of per-month flight JSON files into
//! the immutable, ordered, route-deduplicated record sequence the
//! playback engine consumes. Loading is tolerant of gaps: absent
//! files shrink the catalog, they never fail it.
//!
//! # Modules
//!
//! - [`loader`] -- File discovery and parsing (current and legacy
//!   naming schemes, metadata stamping).
//! - [`catalog`] -- [`FlightCatalog`]: route dedup, playback order,
//!   load statistics.
//! - [`error`] -- Error types for files that exist but will not parse.

pub mod catalog;
pub mod error;
pub mod loader;

// Re-export primary types at crate root.
pub use catalog::FlightCatalog;
pub use error::DataError;
pub use loader::{load_flight_files, LoadedFlights};
