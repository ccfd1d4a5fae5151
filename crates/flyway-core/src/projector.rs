//! Pure projection of engine state onto renderable collections.
//!
//! Nothing in this module holds state. Given the record sequence, the
//! cursor, the phase, and the window size, these functions derive the
//! visible arc slice and the coordinate keys it references. Calling
//! them twice with the same inputs yields identical results.

use std::collections::BTreeSet;

use flyway_types::{FlightRecord, LocationKey, Phase};

use crate::markers::MarkerBoard;

/// The half-open index range of the visible window.
///
/// The window is the up-to-`window_size` records ending at the cursor:
/// `[cursor - window_size + 1, cursor + 1)`, clamped to the record
/// sequence. The upper bound clamps at `len`, so while the cursor runs
/// past the end during draining the window shrinks from the left.
pub fn window_bounds(cursor: usize, len: usize, window_size: usize) -> (usize, usize) {
    let end = cursor.saturating_add(1).min(len);
    let start = cursor.saturating_sub(window_size.saturating_sub(1)).min(end);
    (start, end)
}

/// The records currently visible as arcs.
///
/// Empty once the animation has settled into its dots-only phase, and
/// empty for an empty record sequence.
pub fn visible_arcs(
    records: &[FlightRecord],
    cursor: usize,
    phase: Phase,
    window_size: usize,
) -> &[FlightRecord] {
    if !phase.shows_arcs() {
        return &[];
    }
    let (start, end) = window_bounds(cursor, records.len(), window_size);
    records.get(start..end).unwrap_or(&[])
}

/// The set of coordinate keys referenced by the visible window.
///
/// A marker survives a backward step only if its key is in this set.
pub fn window_marker_keys(
    records: &[FlightRecord],
    cursor: usize,
    window_size: usize,
) -> BTreeSet<LocationKey> {
    let (start, end) = window_bounds(cursor, records.len(), window_size);
    records
        .get(start..end)
        .unwrap_or(&[])
        .iter()
        .flat_map(|record| [record.origin_key(), record.dest_key()])
        .collect()
}

/// The full marker projection of the visible window.
///
/// First-writer-wins per coordinate, exactly as the live board would
/// have accumulated them. Backward steps swap the board for this
/// projection, so markers can never drift out of sync with the arcs.
pub fn window_markers(
    records: &[FlightRecord],
    cursor: usize,
    window_size: usize,
) -> MarkerBoard {
    let (start, end) = window_bounds(cursor, records.len(), window_size);
    let mut board = MarkerBoard::new();
    board.rebuild_from(records.get(start..end).unwrap_or(&[]));
    board
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn make_records(n: u32) -> Vec<FlightRecord> {
        (0..n)
            .map(|i| {
                let coord = f64::from(i);
                FlightRecord {
                    olng: coord,
                    olat: 0.0,
                    dlng: coord,
                    dlat: 1.0,
                    month: 11,
                    year: 2024,
                    time_key: String::from("2024-11"),
                    meta: None,
                }
            })
            .collect()
    }

    #[test]
    fn window_grows_from_the_start() {
        let records = make_records(10);
        assert_eq!(visible_arcs(&records, 0, Phase::Showing, 3).len(), 1);
        assert_eq!(visible_arcs(&records, 1, Phase::Showing, 3).len(), 2);
        assert_eq!(visible_arcs(&records, 2, Phase::Showing, 3).len(), 3);
        // Once full, the window slides instead of growing.
        assert_eq!(visible_arcs(&records, 5, Phase::Showing, 3).len(), 3);
    }

    #[test]
    fn window_slides_with_the_cursor() {
        let records = make_records(10);
        let arcs = visible_arcs(&records, 5, Phase::Showing, 3);
        let lngs: Vec<f64> = arcs.iter().map(|r| r.olng).collect();
        assert_eq!(lngs, vec![3.0, 4.0, 5.0]);
    }

    #[test]
    fn window_never_exceeds_its_size_or_the_catalog() {
        let records = make_records(10);
        for cursor in 0..20 {
            let arcs = visible_arcs(&records, cursor, Phase::Showing, 3);
            assert!(arcs.len() <= 3, "cursor {cursor}");
        }
        // While the cursor is inside the catalog the count is exactly
        // min(cursor + 1, window, len).
        for cursor in 0..10 {
            let arcs = visible_arcs(&records, cursor, Phase::Showing, 3);
            assert_eq!(arcs.len(), cursor.saturating_add(1).min(3), "cursor {cursor}");
        }
    }

    #[test]
    fn window_shrinks_from_the_left_past_the_end() {
        let records = make_records(5);
        // Cursor past the last index: upper bound clamps at len.
        assert_eq!(visible_arcs(&records, 5, Phase::Removing, 3).len(), 2);
        assert_eq!(visible_arcs(&records, 6, Phase::Removing, 3).len(), 1);
        assert_eq!(visible_arcs(&records, 7, Phase::Removing, 3).len(), 0);
    }

    #[test]
    fn dots_only_shows_no_arcs() {
        let records = make_records(10);
        assert!(visible_arcs(&records, 4, Phase::DotsOnly, 3).is_empty());
    }

    #[test]
    fn empty_catalog_yields_empty_window() {
        let records = make_records(0);
        assert!(visible_arcs(&records, 0, Phase::Showing, 3).is_empty());
        assert!(window_marker_keys(&records, 0, 3).is_empty());
    }

    #[test]
    fn marker_keys_cover_both_endpoints() {
        let records = make_records(10);
        let keys = window_marker_keys(&records, 1, 3);
        // Records 0 and 1, two endpoints each, all distinct.
        assert_eq!(keys.len(), 4);
        assert!(keys.contains(&LocationKey::new(0.0, 0.0)));
        assert!(keys.contains(&LocationKey::new(1.0, 1.0)));
    }

    #[test]
    fn window_markers_match_the_window_keys() {
        let records = make_records(10);
        let board = window_markers(&records, 5, 3);
        let keys = window_marker_keys(&records, 5, 3);

        assert_eq!(board.len(), keys.len());
        for key in &keys {
            assert!(board.contains(key));
        }
    }

    #[test]
    fn projection_is_deterministic() {
        let records = make_records(10);
        let first = visible_arcs(&records, 5, Phase::Showing, 3).to_vec();
        let second = visible_arcs(&records, 5, Phase::Showing, 3).to_vec();
        assert_eq!(first, second);

        let keys_first = window_marker_keys(&records, 5, 3);
        let keys_second = window_marker_keys(&records, 5, 3);
        assert_eq!(keys_first, keys_second);

        assert_eq!(window_markers(&records, 5, 3), window_markers(&records, 5, 3));
    }
}
