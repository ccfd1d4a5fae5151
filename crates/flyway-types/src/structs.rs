//! Core entity structs for the route animation.
//!
//! Everything here crosses a boundary: records arrive from the flight
//! files, frames leave for the dashboard. Field names and serialized
//! shapes therefore match the upstream data pipeline (`olng`, `olat`,
//! `timeKey`, ...) rather than being renamed to taste.

use std::fmt;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{Direction, Phase};
use crate::keys::{LocationKey, RouteKey};

// ---------------------------------------------------------------------------
// Flight records
// ---------------------------------------------------------------------------

/// Optional endpoint labels carried by a flight record.
///
/// `o` and `d` are short airport codes for the origin and destination.
/// They surface as marker labels; a missing meta block simply yields
/// unlabeled markers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct RouteMeta {
    /// Origin airport code.
    #[serde(default)]
    pub o: Option<String>,
    /// Destination airport code.
    #[serde(default)]
    pub d: Option<String>,
}

/// One flight route: an origin/destination coordinate pair with
/// temporal metadata.
///
/// Records are immutable once loaded. Their position in the catalog's
/// ordered sequence is the playback order; the engine never reorders
/// or mutates them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct FlightRecord {
    /// Origin longitude.
    pub olng: f64,
    /// Origin latitude.
    pub olat: f64,
    /// Destination longitude.
    pub dlng: f64,
    /// Destination latitude.
    pub dlat: f64,
    /// Month of the flight (1--12).
    pub month: u32,
    /// Year of the flight.
    pub year: i32,
    /// Source-file tag, `"{year}-{MM}"` or legacy `"m{MM}"`.
    #[serde(rename = "timeKey")]
    pub time_key: String,
    /// Optional endpoint labels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<RouteMeta>,
}

impl FlightRecord {
    /// The route identity used for load-time deduplication.
    pub fn route_key(&self) -> RouteKey {
        RouteKey::new(self.olng, self.olat, self.dlng, self.dlat)
    }

    /// The location key of the origin endpoint.
    pub fn origin_key(&self) -> LocationKey {
        LocationKey::new(self.olng, self.olat)
    }

    /// The location key of the destination endpoint.
    pub fn dest_key(&self) -> LocationKey {
        LocationKey::new(self.dlng, self.dlat)
    }

    /// The origin label, if the record carries one.
    pub fn origin_label(&self) -> Option<&str> {
        self.meta.as_ref().and_then(|m| m.o.as_deref())
    }

    /// The destination label, if the record carries one.
    pub fn dest_label(&self) -> Option<&str> {
        self.meta.as_ref().and_then(|m| m.d.as_deref())
    }

    /// The period this record belongs to.
    pub const fn period(&self) -> Period {
        Period {
            year: self.year,
            month: self.month,
        }
    }
}

// ---------------------------------------------------------------------------
// Periods
// ---------------------------------------------------------------------------

/// A calendar month, the animation's unit of display time.
///
/// Ordering is chronological (`year` before `month` in the struct so
/// the derived `Ord` compares years first).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[ts(export, export_to = "bindings/")]
pub struct Period {
    /// Calendar year.
    pub year: i32,
    /// Calendar month, 1--12.
    pub month: u32,
}

impl Period {
    /// Create a period from a year and month.
    pub const fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }

    /// The following calendar month; December rolls into January of
    /// the next year.
    pub const fn succ(self) -> Self {
        if self.month >= 12 {
            Self {
                year: self.year.saturating_add(1),
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month.saturating_add(1),
            }
        }
    }

    /// The English month name, or `"Unknown"` for out-of-range months.
    pub const fn month_name(self) -> &'static str {
        match self.month {
            1 => "January",
            2 => "February",
            3 => "March",
            4 => "April",
            5 => "May",
            6 => "June",
            7 => "July",
            8 => "August",
            9 => "September",
            10 => "October",
            11 => "November",
            12 => "December",
            _ => "Unknown",
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.month_name(), self.year)
    }
}

// ---------------------------------------------------------------------------
// Markers
// ---------------------------------------------------------------------------

/// A persistent point on the map at one coordinate.
///
/// Markers accumulate as arcs appear and remain after the arcs leave
/// the window. The label is captured from the first record that
/// touched the coordinate and is never overwritten.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Marker {
    /// Position as `[lng, lat]`, the renderer's coordinate order.
    pub position: [f64; 2],
    /// The coordinate-derived uniqueness key.
    pub key: LocationKey,
    /// Airport code, if the first record touching this coordinate
    /// carried one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl Marker {
    /// Build a marker from a coordinate pair and optional label.
    pub fn new(lng: f64, lat: f64, label: Option<String>) -> Self {
        Self {
            position: [lng, lat],
            key: LocationKey::new(lng, lat),
            label,
        }
    }
}

// ---------------------------------------------------------------------------
// Frames
// ---------------------------------------------------------------------------

/// One rendered animation frame: everything the map needs for a tick.
///
/// This is the engine's output contract. `arcs` is the visible window
/// slice, `markers` the accumulated marker set in insertion-stable
/// key order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Frame {
    /// Tick number this frame was produced on.
    pub tick: u64,
    /// Active playback phase.
    pub phase: Phase,
    /// Cursor position (record index; runs past the end while
    /// draining).
    pub cursor: usize,
    /// Configured playback direction.
    pub direction: Direction,
    /// Whether the playback loop is running.
    pub playing: bool,
    /// Display period label source, when the catalog is non-empty.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period: Option<Period>,
    /// Records currently visible as arcs.
    pub arcs: Vec<FlightRecord>,
    /// Accumulated location markers.
    pub markers: Vec<Marker>,
}

// ---------------------------------------------------------------------------
// Catalog statistics
// ---------------------------------------------------------------------------

/// Load-time statistics about the flight catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct CatalogStats {
    /// Number of records after route deduplication.
    pub record_count: usize,
    /// Duplicate routes dropped during deduplication.
    pub duplicate_routes_dropped: usize,
    /// Number of flight files that were found and parsed.
    pub files_loaded: usize,
    /// Distinct coordinate keys across all origins and destinations.
    pub unique_location_count: usize,
    /// Period of the first record in playback order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_period: Option<Period>,
    /// Period of the last record in playback order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_period: Option<Period>,
}
