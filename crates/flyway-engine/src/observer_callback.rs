//! Frame callback that updates the Observer API state.
//!
//! After each tick, this callback broadcasts a [`FrameBroadcast`] to
//! all connected `WebSocket` clients and refreshes the in-memory
//! [`PlaybackSnapshot`](flyway_observer::state::PlaybackSnapshot) that
//! the REST endpoints serve.

use std::sync::Arc;

use flyway_core::runner::FrameCallback;
use flyway_core::tick::TickSummary;
use flyway_core::timeline::TimelineState;
use flyway_observer::state::{AppState, FrameBroadcast};
use tracing::debug;

/// Callback that bridges the tick loop to the Observer API.
pub struct ObserverCallback {
    state: Arc<AppState>,
}

impl ObserverCallback {
    /// Create a new observer callback backed by the given app state.
    pub const fn new(state: Arc<AppState>) -> Self {
        Self { state }
    }
}

impl FrameCallback for ObserverCallback {
    fn on_frame(&mut self, summary: &TickSummary, timeline: &TimelineState) {
        // Build the lightweight broadcast message.
        let broadcast = FrameBroadcast {
            tick: summary.tick,
            phase: summary.phase,
            cursor: summary.cursor,
            direction: summary.direction,
            playing: timeline.is_playing(),
            visible_count: summary.visible_count,
            marker_count: summary.marker_count,
            period: timeline.current_period().map(|p| p.to_string()),
        };

        // Broadcast to WebSocket clients.
        let receivers = self.state.broadcast(&broadcast);
        debug!(tick = summary.tick, receivers, "Frame broadcast sent");

        // Update the snapshot. Use try_write to avoid blocking the tick
        // loop -- if a REST handler holds the read lock, skip this
        // update; the next tick will catch up.
        if let Ok(mut snap) = self.state.snapshot.try_write() {
            snap.frame = Some(timeline.frame());
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use flyway_core::config::PlaybackConfig;
    use flyway_core::tick::run_tick;
    use flyway_types::{FlightRecord, RouteMeta};

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

    fn make_timeline() -> TimelineState {
        let config = PlaybackConfig {
            window_size: 2,
            ..PlaybackConfig::default()
        };
        TimelineState::new(make_records(4), &config).unwrap()
    }

    #[tokio::test]
    async fn on_frame_broadcasts_and_updates_snapshot() {
        let state = Arc::new(AppState::new());
        let mut rx = state.subscribe();
        let mut callback = ObserverCallback::new(Arc::clone(&state));

        let mut timeline = make_timeline();
        let summary = run_tick(&mut timeline);
        callback.on_frame(&summary, &timeline);

        let broadcast = rx.recv().await.unwrap();
        assert_eq!(broadcast.tick, 1);
        assert_eq!(broadcast.marker_count, summary.marker_count);
        assert!(broadcast.playing);
        assert_eq!(broadcast.period.as_deref(), Some("September 2024"));

        let snap = state.snapshot.read().await;
        let frame = snap.frame.as_ref().unwrap();
        assert_eq!(frame.tick, 1);
        assert_eq!(frame.markers.len(), summary.marker_count);
    }

    #[tokio::test]
    async fn snapshot_update_skipped_while_a_reader_holds_the_lock() {
        let state = Arc::new(AppState::new());
        let mut callback = ObserverCallback::new(Arc::clone(&state));
        let mut timeline = make_timeline();

        // A REST handler reading the snapshot must not stall the tick.
        let guard = state.snapshot.read().await;
        let summary = run_tick(&mut timeline);
        callback.on_frame(&summary, &timeline);
        assert!(guard.frame.is_none());
        drop(guard);

        // The next frame catches the snapshot up.
        let summary = run_tick(&mut timeline);
        callback.on_frame(&summary, &timeline);
        let snap = state.snapshot.read().await;
        assert_eq!(snap.frame.as_ref().unwrap().tick, 2);
    }
}
