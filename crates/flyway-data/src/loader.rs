//! Flight-file discovery and parsing.
//!
//! Flight data lives in a directory of per-month JSON files produced
//! by the upstream pipeline. Two naming schemes exist:
//!
//! - `flights_{year}-{MM}.json` -- the current format, one file per
//!   calendar month. Probed for every year/month combination the
//!   pipeline has ever emitted, in chronological order, so the
//!   concatenated records come out already sorted by period.
//! - `flights_m{MM}.json` -- the legacy format with no year in the
//!   name. Consulted only when no current-format file was found; its
//!   records are tagged with a default year.
//!
//! Each file holds `{"flights": [...]}` where a flight carries only
//! coordinates and optional labels; the loader stamps `month`, `year`,
//! and the `timeKey` tag onto every record from the file name.

use std::path::Path;

use flyway_types::{FlightRecord, RouteMeta};
use serde::Deserialize;
use tracing::{debug, info};

use crate::error::DataError;

/// Years probed for current-format files. Extend when the pipeline
/// emits a new data year.
const CANDIDATE_YEARS: [i32; 6] = [2020, 2021, 2022, 2023, 2024, 2025];

/// Year stamped onto records from legacy files, which carry no year
/// in the file name.
const LEGACY_DEFAULT_YEAR: i32 = 2025;

/// A record as it appears on disk, before the loader stamps temporal
/// metadata onto it.
#[derive(Debug, Deserialize)]
struct RawFlight {
    olng: f64,
    olat: f64,
    dlng: f64,
    dlat: f64,
    #[serde(default)]
    meta: Option<RouteMeta>,
}

/// The on-disk schema of one flight file.
#[derive(Debug, Deserialize)]
struct FlightFile {
    flights: Vec<RawFlight>,
}

/// Everything the loader found, before deduplication.
#[derive(Debug)]
pub struct LoadedFlights {
    /// Records in chronological file order, duplicates included.
    pub records: Vec<FlightRecord>,
    /// Number of files that existed and parsed.
    pub files_loaded: usize,
}

/// Load all flight files from `dir`, in chronological order.
///
/// Probes every current-format candidate first; if none exist, falls
/// back to the legacy naming scheme. Absent files are skipped.
///
/// # Errors
///
/// Returns [`DataError`] if a file that exists cannot be read or
/// parsed. Missing files are not errors.
pub fn load_flight_files(dir: &Path) -> Result<LoadedFlights, DataError> {
    let mut records = Vec::new();
    let mut files_loaded: usize = 0;

    for year in CANDIDATE_YEARS {
        for month in 1..=12u32 {
            let filename = format!("flights_{year}-{month:02}.json");
            let path = dir.join(filename);
            if let Some(count) = load_file(&path, year, month, &mut records)? {
                files_loaded = files_loaded.saturating_add(1);
                info!(path = %path.display(), count, "Loaded flight file");
            }
        }
    }

    // Legacy fallback: only when the current format yielded nothing.
    if files_loaded == 0 {
        debug!(dir = %dir.display(), "No year-month files found, trying legacy format");
        for month in 1..=12u32 {
            let filename = format!("flights_m{month:02}.json");
            let path = dir.join(filename);
            if let Some(count) = load_file(&path, LEGACY_DEFAULT_YEAR, month, &mut records)? {
                files_loaded = files_loaded.saturating_add(1);
                info!(path = %path.display(), count, "Loaded legacy flight file");
            }
        }
    }

    info!(
        total = records.len(),
        files_loaded, "Flight file loading complete"
    );

    Ok(LoadedFlights {
        records,
        files_loaded,
    })
}

/// Read one candidate file and append its stamped records.
///
/// Returns `Ok(None)` when the file does not exist, `Ok(Some(count))`
/// with the number of records appended when it does.
fn load_file(
    path: &Path,
    year: i32,
    month: u32,
    records: &mut Vec<FlightRecord>,
) -> Result<Option<usize>, DataError> {
    if !path.exists() {
        debug!(path = %path.display(), "Flight file absent, skipping");
        return Ok(None);
    }

    let contents = std::fs::read_to_string(path).map_err(|source| DataError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let file: FlightFile =
        serde_json::from_str(&contents).map_err(|source| DataError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    let time_key = time_key_for(path, year, month);
    let count = file.flights.len();
    records.reserve(count);
    for raw in file.flights {
        records.push(FlightRecord {
            olng: raw.olng,
            olat: raw.olat,
            dlng: raw.dlng,
            dlat: raw.dlat,
            month,
            year,
            time_key: time_key.clone(),
            meta: raw.meta,
        });
    }

    Ok(Some(count))
}

/// Derive the `timeKey` tag from the file's naming scheme.
fn time_key_for(path: &Path, year: i32, month: u32) -> String {
    let is_legacy = path
        .file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with("flights_m"));
    if is_legacy {
        format!("m{month:02}")
    } else {
        format!("{year}-{month:02}")
    }
}
