//! Deterministic string keys derived from coordinate pairs.
//!
//! Identity in the animation is *coordinate* identity, not record
//! identity: two flights touching the same airport share one marker,
//! and two flights between the same endpoints are one route. Both key
//! types are plain formatted strings so they survive serialization,
//! map lookups, and the trip to the dashboard unchanged.
//!
//! The component order differs on purpose and matches the upstream
//! data pipeline: [`LocationKey`] is longitude-first (the renderer's
//! `[lng, lat]` position order), [`RouteKey`] is latitude-first.

use std::fmt;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Key identifying one geographic location (one arc endpoint).
///
/// Formatted as `"{lng},{lat}"`. Used as the uniqueness key for
/// markers: inserting a marker for a key that already exists is a
/// no-op.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct LocationKey(String);

impl LocationKey {
    /// Derive the key for a coordinate pair, longitude first.
    pub fn new(lng: f64, lat: f64) -> Self {
        Self(format!("{lng},{lat}"))
    }

    /// Borrow the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the key and return the inner string.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for LocationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for LocationKey {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

/// Key identifying one origin/destination route.
///
/// Formatted as `"{olat},{olng}-{dlat},{dlng}"` (latitude first).
/// Used to deduplicate the record sequence at load time: the first
/// record seen for a route wins and later duplicates are dropped.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct RouteKey(String);

impl RouteKey {
    /// Derive the key for an origin/destination coordinate pair.
    pub fn new(olng: f64, olat: f64, dlng: f64, dlat: f64) -> Self {
        Self(format!("{olat},{olng}-{dlat},{dlng}"))
    }

    /// Borrow the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the key and return the inner string.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for RouteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
