//! The timeline state: cursor, phase, direction, and the marker board.
//!
//! One `TimelineState` owns everything the animation mutates. The tick
//! function advances it, the projector reads it, and the control
//! surface (play, pause, direction, reset) mutates it between ticks.
//! Nothing else touches these fields.

use chrono::{Datelike, Utc};
use flyway_types::{Direction, FlightRecord, Frame, Period, Phase};

use crate::config::PlaybackConfig;
use crate::error::TimelineError;
use crate::markers::MarkerBoard;
use crate::period::PeriodTicker;
use crate::projector;

/// Mutable playback state over an immutable record sequence.
#[derive(Debug, Clone)]
pub struct TimelineState {
    /// The ordered record sequence. Loaded once, never reordered.
    pub(crate) records: Vec<FlightRecord>,
    /// Maximum number of records visible as arcs at once.
    pub(crate) window_size: usize,
    /// Ticks processed since construction. Monotonic; survives resets.
    pub(crate) tick: u64,
    /// Current record index; runs past the end while draining.
    pub(crate) cursor: usize,
    /// Active playback phase.
    pub(crate) phase: Phase,
    /// Cursor step sign during the showing phase.
    pub(crate) direction: Direction,
    /// Whether playback is running. Mirrors the operator's pause gate
    /// and is forced off when the animation settles.
    pub(crate) playing: bool,
    /// The accumulated marker set.
    pub(crate) markers: MarkerBoard,
    /// Display-period ticker, present once draining has started.
    pub(crate) drain_period: Option<PeriodTicker>,
    /// Upper bound for the drain ticker.
    pub(crate) period_ceiling: Period,
}

impl TimelineState {
    /// Build a timeline over `records` using the given playback
    /// configuration.
    ///
    /// # Errors
    ///
    /// Returns [`TimelineError::InvalidConfig`] if the configured
    /// window size is zero.
    pub fn new(
        records: Vec<FlightRecord>,
        playback: &PlaybackConfig,
    ) -> Result<Self, TimelineError> {
        if playback.window_size == 0 {
            return Err(TimelineError::InvalidConfig {
                reason: String::from("window_size must be at least 1"),
            });
        }
        Ok(Self {
            records,
            window_size: playback.window_size,
            tick: 0,
            cursor: 0,
            phase: Phase::Showing,
            direction: Direction::Forward,
            playing: playback.autoplay,
            markers: MarkerBoard::new(),
            drain_period: None,
            period_ceiling: present_period(),
        })
    }

    /// Replace the drain-ticker ceiling.
    ///
    /// The ceiling defaults to the current calendar month; fixing it
    /// makes drain-phase period labels reproducible.
    #[must_use]
    pub const fn with_period_ceiling(mut self, ceiling: Period) -> Self {
        self.period_ceiling = ceiling;
        self
    }

    // -----------------------------------------------------------------------
    // Read access
    // -----------------------------------------------------------------------

    /// The record sequence being played.
    pub fn records(&self) -> &[FlightRecord] {
        &self.records
    }

    /// Number of records in the sequence.
    pub const fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the record sequence is empty.
    pub const fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The configured window size.
    pub const fn window_size(&self) -> usize {
        self.window_size
    }

    /// Ticks processed since construction.
    pub const fn tick(&self) -> u64 {
        self.tick
    }

    /// The current cursor position.
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    /// The active phase.
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// The configured direction.
    pub const fn direction(&self) -> Direction {
        self.direction
    }

    /// Whether playback is running.
    pub const fn is_playing(&self) -> bool {
        self.playing
    }

    /// The accumulated marker board.
    pub const fn markers(&self) -> &MarkerBoard {
        &self.markers
    }

    /// The records currently visible as arcs.
    pub fn visible_arcs(&self) -> &[FlightRecord] {
        projector::visible_arcs(&self.records, self.cursor, self.phase, self.window_size)
    }

    /// The display period for the current frame.
    ///
    /// While showing, this is the period of the record under the
    /// cursor. Once draining has begun it comes from the drain ticker
    /// instead. `None` only for an empty record sequence.
    pub fn current_period(&self) -> Option<Period> {
        match self.phase {
            Phase::Showing => {
                let last = self.records.len().saturating_sub(1);
                self.records
                    .get(self.cursor.min(last))
                    .map(FlightRecord::period)
            }
            Phase::Removing | Phase::DotsOnly => self
                .drain_period
                .as_ref()
                .map(PeriodTicker::current)
                .or_else(|| self.records.last().map(FlightRecord::period)),
        }
    }

    /// Snapshot the full render state for this tick.
    pub fn frame(&self) -> Frame {
        Frame {
            tick: self.tick,
            phase: self.phase,
            cursor: self.cursor,
            direction: self.direction,
            playing: self.playing,
            period: self.current_period(),
            arcs: self.visible_arcs().to_vec(),
            markers: self.markers.markers(),
        }
    }

    // -----------------------------------------------------------------------
    // Control surface
    // -----------------------------------------------------------------------

    /// Set whether playback is running.
    pub const fn set_playing(&mut self, playing: bool) {
        self.playing = playing;
    }

    /// Set the playback direction.
    ///
    /// Reversing out of the settled phase re-enters the draining phase
    /// with the cursor back on the last record, so arcs reappear.
    pub fn set_direction(&mut self, direction: Direction) {
        self.direction = direction;
        if direction == Direction::Backward
            && self.phase == Phase::DotsOnly
            && !self.records.is_empty()
        {
            self.phase = Phase::Removing;
            self.cursor = self.records.len().saturating_sub(1);
        }
    }

    /// Return to the start: cursor `0`, showing phase, empty marker
    /// board, playback running. Direction is left as configured.
    pub fn reset(&mut self) {
        self.cursor = 0;
        self.phase = Phase::Showing;
        self.playing = true;
        self.markers.clear();
        self.drain_period = None;
    }
}

/// The calendar month the process is running in.
fn present_period() -> Period {
    let now = Utc::now();
    Period::new(now.year(), now.month())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use flyway_types::RouteMeta;

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
                    month: 5,
                    year: 2023,
                    time_key: String::from("2023-05"),
                    meta: Some(RouteMeta {
                        o: Some(format!("O{i}")),
                        d: Some(format!("D{i}")),
                    }),
                }
            })
            .collect()
    }

    fn playback(window_size: usize) -> PlaybackConfig {
        PlaybackConfig {
            window_size,
            ..PlaybackConfig::default()
        }
    }

    #[test]
    fn new_starts_at_the_beginning() {
        let state = TimelineState::new(make_records(10), &playback(3)).unwrap();
        assert_eq!(state.cursor(), 0);
        assert_eq!(state.phase(), Phase::Showing);
        assert_eq!(state.direction(), Direction::Forward);
        assert!(state.is_playing());
        assert!(state.markers().is_empty());
        assert_eq!(state.tick(), 0);
    }

    #[test]
    fn zero_window_is_rejected() {
        let result = TimelineState::new(make_records(10), &playback(0));
        assert!(matches!(
            result,
            Err(TimelineError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn autoplay_off_starts_paused() {
        let config = PlaybackConfig {
            autoplay: false,
            ..playback(3)
        };
        let state = TimelineState::new(make_records(10), &config).unwrap();
        assert!(!state.is_playing());
    }

    #[test]
    fn showing_period_follows_the_cursor_record() {
        let mut records = make_records(3);
        if let Some(r) = records.get_mut(1) {
            r.month = 7;
            r.year = 2024;
        }
        let mut state = TimelineState::new(records, &playback(3)).unwrap();
        assert_eq!(state.current_period(), Some(Period::new(2023, 5)));
        state.cursor = 1;
        assert_eq!(state.current_period(), Some(Period::new(2024, 7)));
    }

    #[test]
    fn empty_catalog_has_no_period() {
        let state = TimelineState::new(Vec::new(), &playback(3)).unwrap();
        assert_eq!(state.current_period(), None);
    }

    #[test]
    fn reset_restores_initial_playback_state() {
        let mut state = TimelineState::new(make_records(5), &playback(3)).unwrap();
        state.cursor = 4;
        state.phase = Phase::DotsOnly;
        state.playing = false;
        state.set_direction(Direction::Backward);
        if let Some(record) = state.records.first().cloned() {
            state.markers.insert_record(&record);
        }

        state.reset();

        assert_eq!(state.cursor(), 0);
        assert_eq!(state.phase(), Phase::Showing);
        assert!(state.is_playing());
        assert!(state.markers().is_empty());
        // Direction is a configured parameter, not playback state.
        assert_eq!(state.direction(), Direction::Backward);
    }

    #[test]
    fn reverse_from_settled_reenters_draining_at_the_last_record() {
        let mut state = TimelineState::new(make_records(5), &playback(3)).unwrap();
        state.phase = Phase::DotsOnly;
        state.cursor = 4;

        state.set_direction(Direction::Backward);

        assert_eq!(state.phase(), Phase::Removing);
        assert_eq!(state.cursor(), 4);
        assert_eq!(state.direction(), Direction::Backward);
    }

    #[test]
    fn reverse_elsewhere_only_sets_direction() {
        let mut state = TimelineState::new(make_records(5), &playback(3)).unwrap();
        state.cursor = 2;
        state.set_direction(Direction::Backward);
        assert_eq!(state.phase(), Phase::Showing);
        assert_eq!(state.cursor(), 2);
    }

    #[test]
    fn frame_carries_the_visible_window_and_markers() {
        let mut state = TimelineState::new(make_records(5), &playback(3)).unwrap();
        state.cursor = 2;
        if let Some(record) = state.records.first().cloned() {
            state.markers.insert_record(&record);
        }

        let frame = state.frame();
        assert_eq!(frame.arcs.len(), 3);
        assert_eq!(frame.markers.len(), 2);
        assert_eq!(frame.cursor, 2);
        assert_eq!(frame.phase, Phase::Showing);
    }
}
