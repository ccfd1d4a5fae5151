//! The deduplicated, ordered flight catalog.
//!
//! The catalog is the engine's input contract: an immutable record
//! sequence in playback order. Construction deduplicates by route --
//! the first record seen for an origin/destination pair wins, later
//! duplicates are dropped -- while preserving the chronological order
//! the loader produced.

use std::collections::BTreeSet;
use std::path::Path;

use flyway_types::{CatalogStats, FlightRecord, Period};
use tracing::info;

use crate::error::DataError;
use crate::loader::{self, LoadedFlights};

/// An ordered, route-deduplicated set of flight records.
#[derive(Debug, Clone)]
pub struct FlightCatalog {
    records: Vec<FlightRecord>,
    stats: CatalogStats,
}

impl FlightCatalog {
    /// Load and deduplicate all flight files under `dir`.
    ///
    /// # Errors
    ///
    /// Returns [`DataError`] if a file that exists cannot be read or
    /// parsed; missing files only shrink the catalog.
    pub fn load_from_dir(dir: &Path) -> Result<Self, DataError> {
        let loaded = loader::load_flight_files(dir)?;
        Ok(Self::from_loaded(loaded))
    }

    /// Build a catalog from records already in playback order.
    ///
    /// Used directly by tests and by callers that source records from
    /// somewhere other than the flight-file directory.
    pub fn from_records(records: Vec<FlightRecord>) -> Self {
        Self::from_loaded(LoadedFlights {
            records,
            files_loaded: 0,
        })
    }

    fn from_loaded(loaded: LoadedFlights) -> Self {
        let raw_count = loaded.records.len();

        let mut seen = BTreeSet::new();
        let mut records = Vec::with_capacity(raw_count);
        for record in loaded.records {
            if seen.insert(record.route_key()) {
                records.push(record);
            }
        }

        let duplicate_routes_dropped = raw_count.saturating_sub(records.len());

        let unique_locations: BTreeSet<_> = records
            .iter()
            .flat_map(|r| [r.origin_key(), r.dest_key()])
            .collect();

        let stats = CatalogStats {
            record_count: records.len(),
            duplicate_routes_dropped,
            files_loaded: loaded.files_loaded,
            unique_location_count: unique_locations.len(),
            first_period: records.first().map(FlightRecord::period),
            last_period: records.last().map(FlightRecord::period),
        };

        info!(
            records = stats.record_count,
            duplicates_dropped = stats.duplicate_routes_dropped,
            unique_locations = stats.unique_location_count,
            "Flight catalog built"
        );

        Self { records, stats }
    }

    /// The records in playback order.
    pub fn records(&self) -> &[FlightRecord] {
        &self.records
    }

    /// Number of records after deduplication.
    pub const fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the catalog holds no records.
    pub const fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Load-time statistics.
    pub const fn stats(&self) -> &CatalogStats {
        &self.stats
    }

    /// Distinct coordinate keys across all origins and destinations.
    pub const fn unique_location_count(&self) -> usize {
        self.stats.unique_location_count
    }

    /// Period of the first record in playback order.
    pub const fn first_period(&self) -> Option<Period> {
        self.stats.first_period
    }

    /// Period of the last record in playback order.
    pub const fn last_period(&self) -> Option<Period> {
        self.stats.last_period
    }

    /// Split the catalog into its record sequence and statistics.
    pub fn into_parts(self) -> (Vec<FlightRecord>, CatalogStats) {
        (self.records, self.stats)
    }
}
