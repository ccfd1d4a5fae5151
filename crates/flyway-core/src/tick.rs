//! Single-tick execution: one step of the animation state machine.
//!
//! [`run_tick`] advances a [`TimelineState`] by exactly one step and
//! reports what happened. A tick never fails: the machine operates on
//! validated in-memory data, and the one external edge case (an empty
//! record sequence) is a no-op steady state rather than an error.
//!
//! Phase behavior per tick:
//!
//! 1. **Showing** -- the cursor moves by the configured direction.
//!    Forward steps insert the endpoints of the record the cursor
//!    lands on into the marker board; backward steps rebuild the board
//!    from the visible window. Stepping past the last record enters
//!    the removing phase.
//! 2. **Removing** -- the cursor keeps incrementing regardless of
//!    direction, shrinking the window from the left, until the window
//!    has fully drained; then the machine settles into dots-only and
//!    playback stops.
//! 3. **`DotsOnly`** -- nothing moves. Only a reset or a direction
//!    reversal (handled by the control surface) leaves this phase.

use flyway_types::{Direction, FlightRecord, Phase};
use tracing::{debug, info};

use crate::period::PeriodTicker;
use crate::projector;
use crate::timeline::TimelineState;

/// What one tick did, for callbacks and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickSummary {
    /// The tick number that just ran.
    pub tick: u64,
    /// Phase after the step.
    pub phase: Phase,
    /// Cursor after the step.
    pub cursor: usize,
    /// Direction the step was taken under.
    pub direction: Direction,
    /// Number of records visible as arcs after the step.
    pub visible_count: usize,
    /// Number of markers on the board after the step.
    pub marker_count: usize,
    /// Whether the animation is in its settled, dots-only state.
    pub settled: bool,
}

/// Advance the timeline by one tick.
///
/// Deterministic: the resulting state depends only on the state passed
/// in. With an empty record sequence the tick counter still advances
/// but the machine stays in the showing phase at cursor `0`.
pub fn run_tick(state: &mut TimelineState) -> TickSummary {
    state.tick = state.tick.saturating_add(1);

    if !state.records.is_empty() {
        match state.phase {
            Phase::Showing => step_showing(state),
            Phase::Removing => step_removing(state),
            Phase::DotsOnly => state.playing = false,
        }
    }

    summarize(state)
}

/// Summarize the current state without ticking it.
///
/// The loop uses this to publish the effect of operator commands that
/// land while playback is parked.
pub(crate) fn summarize(state: &TimelineState) -> TickSummary {
    TickSummary {
        tick: state.tick,
        phase: state.phase,
        cursor: state.cursor,
        direction: state.direction,
        visible_count: state.visible_arcs().len(),
        marker_count: state.markers.len(),
        settled: state.phase == Phase::DotsOnly,
    }
}

/// One showing-phase step: move the cursor, maintain the marker board.
fn step_showing(state: &mut TimelineState) {
    match state.direction {
        Direction::Forward => {
            // The cursor starts on record 0, so the first forward step
            // has to pick up that record's endpoints as well as the
            // one it lands on.
            if state.cursor == 0 {
                if let Some(first) = state.records.first() {
                    state.markers.insert_record(first);
                }
            }

            let next = state.cursor.saturating_add(1);
            if next >= state.records.len() {
                enter_removing(state);
            } else {
                state.cursor = next;
                if let Some(record) = state.records.get(next) {
                    state.markers.insert_record(record);
                }
            }
        }
        Direction::Backward => {
            state.cursor = state.cursor.saturating_sub(1);
            state.markers =
                projector::window_markers(&state.records, state.cursor, state.window_size);
        }
    }
}

/// One removing-phase step: drain the window from the left.
///
/// This phase is one-directional; the cursor increments even when the
/// configured direction is backward.
fn step_removing(state: &mut TimelineState) {
    let last = state.records.len().saturating_sub(1);
    let drained = last.saturating_add(state.window_size);

    let next = state.cursor.saturating_add(1);
    if next >= drained {
        state.phase = Phase::DotsOnly;
        state.cursor = last;
        state.playing = false;
        debug!(tick = state.tick, "Window drained");
    } else {
        state.cursor = next;
    }

    if let Some(ticker) = state.drain_period.as_mut() {
        ticker.advance();
    }
}

/// Transition from showing into removing: clamp the cursor onto the
/// last record and start the drain-period ticker at that record's
/// period.
fn enter_removing(state: &mut TimelineState) {
    state.cursor = state.records.len().saturating_sub(1);
    state.phase = Phase::Removing;
    info!(
        tick = state.tick,
        markers = state.markers.len(),
        "All records shown, draining the window"
    );

    let ceiling = state.period_ceiling;
    let start = state
        .records
        .last()
        .map_or(ceiling, FlightRecord::period);
    state.drain_period = Some(PeriodTicker::new(start, ceiling));
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use flyway_types::{LocationKey, Period, RouteMeta};

    use super::*;
    use crate::config::PlaybackConfig;

    fn make_records(n: u32) -> Vec<FlightRecord> {
        (0..n)
            .map(|i| {
                let coord = f64::from(i);
                FlightRecord {
                    olng: coord,
                    olat: 0.0,
                    dlng: coord,
                    dlat: 1.0,
                    month: 9,
                    year: 2024,
                    time_key: String::from("2024-09"),
                    meta: Some(RouteMeta {
                        o: Some(format!("O{i}")),
                        d: Some(format!("D{i}")),
                    }),
                }
            })
            .collect()
    }

    fn make_state(n: u32, window_size: usize) -> TimelineState {
        let config = PlaybackConfig {
            window_size,
            ..PlaybackConfig::default()
        };
        TimelineState::new(make_records(n), &config).unwrap()
    }

    #[test]
    fn first_forward_tick_picks_up_record_zero() {
        let mut state = make_state(5, 3);
        let summary = run_tick(&mut state);

        assert_eq!(summary.cursor, 1);
        // Records 0 and 1, two endpoints each.
        assert_eq!(summary.marker_count, 4);
        assert!(state.markers().contains(&LocationKey::new(0.0, 0.0)));
        assert!(state.markers().contains(&LocationKey::new(1.0, 1.0)));
    }

    #[test]
    fn forward_ticks_accumulate_markers() {
        let mut state = make_state(5, 3);
        for _ in 0..4 {
            run_tick(&mut state);
        }
        assert_eq!(state.cursor(), 4);
        assert_eq!(state.phase(), Phase::Showing);
        // All five records seen, ten distinct endpoints.
        assert_eq!(state.markers().len(), 10);
    }

    #[test]
    fn backward_step_rebuilds_markers_from_the_window() {
        let mut state = make_state(5, 3);
        for _ in 0..4 {
            run_tick(&mut state);
        }
        state.set_direction(Direction::Backward);

        run_tick(&mut state);
        run_tick(&mut state);

        // Cursor 2, window [0, 2]: exactly records 0..=2 remain.
        assert_eq!(state.cursor(), 2);
        assert_eq!(state.markers().len(), 6);
        for i in 0_u32..3 {
            let coord = f64::from(i);
            assert!(state.markers().contains(&LocationKey::new(coord, 0.0)));
            assert!(state.markers().contains(&LocationKey::new(coord, 1.0)));
        }
        assert!(!state.markers().contains(&LocationKey::new(3.0, 0.0)));
        assert!(!state.markers().contains(&LocationKey::new(4.0, 1.0)));
    }

    #[test]
    fn backward_step_clamps_at_zero() {
        let mut state = make_state(5, 3);
        state.set_direction(Direction::Backward);

        let summary = run_tick(&mut state);

        assert_eq!(summary.cursor, 0);
        assert_eq!(summary.phase, Phase::Showing);
        // The rebuild runs even on the clamped step; window is [0, 0].
        assert_eq!(summary.marker_count, 2);
    }

    #[test]
    fn phases_run_in_order_and_never_revisit_showing() {
        let mut state = make_state(4, 2);
        let mut phases = Vec::new();
        for _ in 0..8 {
            phases.push(run_tick(&mut state).phase);
        }
        assert_eq!(
            phases,
            vec![
                Phase::Showing,
                Phase::Showing,
                Phase::Showing,
                Phase::Removing,
                Phase::Removing,
                Phase::DotsOnly,
                Phase::DotsOnly,
                Phase::DotsOnly,
            ]
        );
    }

    #[test]
    fn removing_drains_the_window_over_exactly_window_size_ticks() {
        let mut state = make_state(4, 2);
        // Three showing steps reach the last record; the fourth
        // transitions.
        for _ in 0..4 {
            run_tick(&mut state);
        }
        assert_eq!(state.phase(), Phase::Removing);
        assert_eq!(state.cursor(), 3);

        let first = run_tick(&mut state);
        assert_eq!(first.phase, Phase::Removing);
        assert_eq!(first.visible_count, 1);

        let second = run_tick(&mut state);
        assert_eq!(second.phase, Phase::DotsOnly);
        assert_eq!(second.visible_count, 0);
        assert!(second.settled);
        assert!(!state.is_playing());
    }

    #[test]
    fn removing_ignores_direction() {
        let mut state = make_state(4, 2);
        for _ in 0..4 {
            run_tick(&mut state);
        }
        assert_eq!(state.phase(), Phase::Removing);

        state.set_direction(Direction::Backward);
        let summary = run_tick(&mut state);

        assert_eq!(summary.phase, Phase::Removing);
        assert_eq!(summary.cursor, 4);
    }

    #[test]
    fn settling_parks_the_cursor_on_the_last_record() {
        let mut state = make_state(4, 2);
        for _ in 0..6 {
            run_tick(&mut state);
        }
        assert_eq!(state.phase(), Phase::DotsOnly);
        assert_eq!(state.cursor(), 3);
    }

    #[test]
    fn settled_ticks_are_no_ops_that_hold_playing_off() {
        let mut state = make_state(4, 2);
        for _ in 0..6 {
            run_tick(&mut state);
        }
        let markers_before = state.markers().len();

        state.set_playing(true);
        let summary = run_tick(&mut state);

        assert_eq!(summary.phase, Phase::DotsOnly);
        assert_eq!(summary.cursor, 3);
        assert_eq!(summary.marker_count, markers_before);
        assert!(summary.settled);
        assert!(!state.is_playing());
    }

    #[test]
    fn empty_catalog_ticks_are_no_ops() {
        let mut state = make_state(0, 150);
        for _ in 0..100 {
            run_tick(&mut state);
        }
        assert_eq!(state.phase(), Phase::Showing);
        assert_eq!(state.cursor(), 0);
        assert!(state.markers().is_empty());
        assert!(state.visible_arcs().is_empty());
        // The tick counter still counts loop passes.
        assert_eq!(state.tick(), 100);
    }

    #[test]
    fn window_count_is_bounded_for_the_whole_run() {
        let mut state = make_state(10, 4);
        loop {
            let summary = run_tick(&mut state);
            assert!(summary.visible_count <= 4);
            if summary.settled {
                break;
            }
        }
    }

    #[test]
    fn reverse_from_settled_drains_forward_again() {
        let mut state = make_state(4, 2);
        for _ in 0..6 {
            run_tick(&mut state);
        }
        assert_eq!(state.phase(), Phase::DotsOnly);

        state.set_direction(Direction::Backward);
        assert_eq!(state.phase(), Phase::Removing);
        assert_eq!(state.cursor(), 3);
        // The window is visible again.
        assert_eq!(state.visible_arcs().len(), 2);

        // Draining stays one-directional even after the re-entry.
        let summary = run_tick(&mut state);
        assert_eq!(summary.cursor, 4);
        assert_eq!(summary.phase, Phase::Removing);
    }

    #[test]
    fn drain_period_starts_at_the_last_record_and_walks_forward() {
        let mut state =
            make_state(4, 2).with_period_ceiling(Period::new(2025, 6));
        // Reach the removing transition; the ticker starts at the last
        // record's period without advancing on the transition tick.
        for _ in 0..4 {
            run_tick(&mut state);
        }
        assert_eq!(state.current_period(), Some(Period::new(2024, 9)));

        run_tick(&mut state);
        assert_eq!(state.current_period(), Some(Period::new(2024, 10)));

        // The settling tick advances the label once more; settled
        // ticks leave it frozen.
        for _ in 0..10 {
            run_tick(&mut state);
        }
        assert_eq!(state.current_period(), Some(Period::new(2024, 11)));
    }

    #[test]
    fn drain_period_saturates_at_its_ceiling() {
        let mut state =
            make_state(4, 2).with_period_ceiling(Period::new(2024, 10));
        for _ in 0..6 {
            run_tick(&mut state);
        }
        assert_eq!(state.current_period(), Some(Period::new(2024, 10)));
    }

    #[test]
    fn full_run_settles_with_every_location_marked() {
        let mut state = make_state(300, 150);
        for _ in 0..300 {
            run_tick(&mut state);
        }
        assert_eq!(state.phase(), Phase::Removing);
        assert_eq!(state.cursor(), 299);

        for _ in 0..150 {
            run_tick(&mut state);
        }
        assert_eq!(state.phase(), Phase::DotsOnly);
        assert!(!state.is_playing());
        assert!(state.visible_arcs().is_empty());
        // Two distinct endpoints per record.
        assert_eq!(state.markers().len(), 600);
    }

    #[test]
    fn reset_after_settling_replays_from_the_top() {
        let mut state = make_state(4, 2);
        for _ in 0..6 {
            run_tick(&mut state);
        }
        assert_eq!(state.phase(), Phase::DotsOnly);

        state.reset();
        assert_eq!(state.phase(), Phase::Showing);
        assert_eq!(state.cursor(), 0);
        assert!(state.markers().is_empty());
        assert!(state.is_playing());

        let summary = run_tick(&mut state);
        assert_eq!(summary.cursor, 1);
        assert_eq!(summary.marker_count, 4);
    }
}
