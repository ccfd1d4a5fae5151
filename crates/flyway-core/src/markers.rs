//! The accumulated marker set.
//!
//! Markers are keyed by coordinate, not by record: two routes touching
//! the same airport contribute one marker. Insertion is first-writer-wins
//! so the label captured when a coordinate first appears is never
//! overwritten by later records sharing it.

use std::collections::BTreeMap;

use flyway_types::{FlightRecord, LocationKey, Marker};

/// Deduplicated location markers, ordered by key for deterministic
/// output.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MarkerBoard {
    entries: BTreeMap<LocationKey, Marker>,
}

impl MarkerBoard {
    /// Create an empty board.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert both endpoints of a record.
    ///
    /// Keys already on the board are left untouched, including their
    /// labels.
    pub fn insert_record(&mut self, record: &FlightRecord) {
        self.insert_endpoint(
            record.origin_key(),
            record.olng,
            record.olat,
            record.origin_label(),
        );
        self.insert_endpoint(
            record.dest_key(),
            record.dlng,
            record.dlat,
            record.dest_label(),
        );
    }

    fn insert_endpoint(&mut self, key: LocationKey, lng: f64, lat: f64, label: Option<&str>) {
        self.entries
            .entry(key)
            .or_insert_with(|| Marker::new(lng, lat, label.map(str::to_owned)));
    }

    /// Throw away the current board and rebuild it from a record
    /// window.
    ///
    /// Used on backward steps: rather than patching markers out
    /// incrementally, the board is recomputed from what is actually
    /// visible, so it can never drift from the window.
    pub fn rebuild_from<'a, I>(&mut self, window: I)
    where
        I: IntoIterator<Item = &'a FlightRecord>,
    {
        self.entries.clear();
        for record in window {
            self.insert_record(record);
        }
    }

    /// Whether a coordinate key is on the board.
    pub fn contains(&self, key: &LocationKey) -> bool {
        self.entries.contains_key(key)
    }

    /// Look up the marker for a coordinate key.
    pub fn get(&self, key: &LocationKey) -> Option<&Marker> {
        self.entries.get(key)
    }

    /// Number of markers on the board.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the board is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Remove every marker.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// The markers in key order.
    pub fn markers(&self) -> Vec<Marker> {
        self.entries.values().cloned().collect()
    }

    /// The keys on the board, in order.
    pub fn keys(&self) -> impl Iterator<Item = &LocationKey> {
        self.entries.keys()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use flyway_types::RouteMeta;

    use super::*;

    fn make_record(
        olng: f64,
        olat: f64,
        dlng: f64,
        dlat: f64,
        o: Option<&str>,
        d: Option<&str>,
    ) -> FlightRecord {
        FlightRecord {
            olng,
            olat,
            dlng,
            dlat,
            month: 6,
            year: 2024,
            time_key: String::from("2024-06"),
            meta: Some(RouteMeta {
                o: o.map(str::to_owned),
                d: d.map(str::to_owned),
            }),
        }
    }

    #[test]
    fn one_record_yields_two_markers() {
        let mut board = MarkerBoard::new();
        board.insert_record(&make_record(1.0, 2.0, 3.0, 4.0, Some("AAA"), Some("BBB")));
        assert_eq!(board.len(), 2);
        assert!(board.contains(&LocationKey::new(1.0, 2.0)));
        assert!(board.contains(&LocationKey::new(3.0, 4.0)));
    }

    #[test]
    fn shared_coordinate_yields_one_marker() {
        let mut board = MarkerBoard::new();
        board.insert_record(&make_record(1.0, 2.0, 3.0, 4.0, Some("AAA"), Some("BBB")));
        board.insert_record(&make_record(1.0, 2.0, 5.0, 6.0, Some("AAA"), Some("CCC")));
        // Origin (1,2) is shared; only three distinct coordinates exist.
        assert_eq!(board.len(), 3);
    }

    #[test]
    fn first_label_wins() {
        let mut board = MarkerBoard::new();
        board.insert_record(&make_record(1.0, 2.0, 3.0, 4.0, Some("FIRST"), None));
        board.insert_record(&make_record(1.0, 2.0, 5.0, 6.0, Some("SECOND"), None));

        let marker = board.get(&LocationKey::new(1.0, 2.0)).unwrap();
        assert_eq!(marker.label.as_deref(), Some("FIRST"));
    }

    #[test]
    fn missing_meta_gives_unlabeled_marker() {
        let mut board = MarkerBoard::new();
        let mut record = make_record(1.0, 2.0, 3.0, 4.0, None, None);
        record.meta = None;
        board.insert_record(&record);

        let marker = board.get(&LocationKey::new(1.0, 2.0)).unwrap();
        assert!(marker.label.is_none());
    }

    #[test]
    fn rebuild_drops_markers_outside_the_window() {
        let records = vec![
            make_record(1.0, 1.0, 2.0, 2.0, None, None),
            make_record(3.0, 3.0, 4.0, 4.0, None, None),
            make_record(5.0, 5.0, 6.0, 6.0, None, None),
        ];

        let mut board = MarkerBoard::new();
        for record in &records {
            board.insert_record(record);
        }
        assert_eq!(board.len(), 6);

        board.rebuild_from(records.get(0..2).unwrap());
        assert_eq!(board.len(), 4);
        assert!(board.contains(&LocationKey::new(1.0, 1.0)));
        assert!(!board.contains(&LocationKey::new(5.0, 5.0)));
    }

    #[test]
    fn markers_come_out_in_key_order() {
        let mut board = MarkerBoard::new();
        board.insert_record(&make_record(9.0, 9.0, 1.0, 1.0, None, None));
        let keys: Vec<String> = board
            .markers()
            .into_iter()
            .map(|m| m.key.into_inner())
            .collect();
        assert_eq!(keys, vec![String::from("1,1"), String::from("9,9")]);
    }

    #[test]
    fn clear_empties_the_board() {
        let mut board = MarkerBoard::new();
        board.insert_record(&make_record(1.0, 2.0, 3.0, 4.0, None, None));
        board.clear();
        assert!(board.is_empty());
    }
}
