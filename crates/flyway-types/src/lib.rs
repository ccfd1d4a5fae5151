//! Shared type definitions for the Flyway route animation.
//!
//! This crate is the single source of truth for all types used across
//! the Flyway workspace. Types defined here flow downstream to
//! `TypeScript` via `ts-rs` for the map dashboard, so field names and
//! serialized shapes are part of the wire contract.
//!
//! # Modules
//!
//! - [`keys`] -- Coordinate-derived string keys for locations and routes
//! - [`enums`] -- Playback phase and direction
//! - [`structs`] -- Flight records, markers, periods, frames, catalog stats

pub mod enums;
pub mod keys;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{Direction, Phase};
pub use keys::{LocationKey, RouteKey};
pub use structs::{CatalogStats, FlightRecord, Frame, Marker, Period, RouteMeta};

#[cfg(test)]
mod tests {
    //! Integration tests for type exports and `TypeScript` binding
    //! generation.

    #[test]
    fn export_bindings() {
        // ts-rs generates TypeScript bindings when types with
        // #[ts(export)] are used. Importing them here triggers
        // generation. The actual files are written to the `bindings/`
        // directory relative to the crate root.
        use ts_rs::TS;

        // Keys
        let _ = crate::keys::LocationKey::export_all();
        let _ = crate::keys::RouteKey::export_all();

        // Enums
        let _ = crate::enums::Phase::export_all();
        let _ = crate::enums::Direction::export_all();

        // Structs
        let _ = crate::structs::RouteMeta::export_all();
        let _ = crate::structs::FlightRecord::export_all();
        let _ = crate::structs::Period::export_all();
        let _ = crate::structs::Marker::export_all();
        let _ = crate::structs::Frame::export_all();
        let _ = crate::structs::CatalogStats::export_all();
    }
}
