//! Shared application state for the Observer API server.
//!
//! [`AppState`] holds the broadcast channel for per-tick frame
//! summaries and an in-memory snapshot of the latest full frame that
//! the REST endpoints serve. The engine writes both from its frame
//! callback; the observer only ever reads.

use std::sync::Arc;

use flyway_core::operator::PlaybackOperator;
use flyway_types::{CatalogStats, Direction, Frame, Phase};
use tokio::sync::{broadcast, RwLock};

/// Capacity of the broadcast channel for frame summaries.
///
/// If a subscriber falls behind by more than this many messages it will
/// receive a [`broadcast::error::RecvError::Lagged`] and skip to the
/// newest message.
const BROADCAST_CAPACITY: usize = 256;

/// JSON-serializable frame summary pushed over the `WebSocket`.
///
/// This is a lightweight projection of one tick: counts and cursor
/// state only, no arc or marker payloads. Clients that need the full
/// geometry fetch `GET /api/frame`.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct FrameBroadcast {
    /// The tick number.
    pub tick: u64,
    /// Active playback phase.
    pub phase: Phase,
    /// Current cursor position.
    pub cursor: usize,
    /// Configured playback direction.
    pub direction: Direction,
    /// Whether playback is running.
    pub playing: bool,
    /// Number of records currently visible as arcs.
    pub visible_count: usize,
    /// Number of accumulated markers.
    pub marker_count: usize,
    /// Display label of the current period (e.g. `"March 2024"`).
    pub period: Option<String>,
}

/// In-memory snapshot of the playback state served by REST endpoints.
///
/// Updated each tick by the engine. All reads are served from this
/// snapshot so the observer never blocks the tick loop.
#[derive(Debug, Clone, Default)]
pub struct PlaybackSnapshot {
    /// The latest full animation frame, once the first tick has run.
    pub frame: Option<Frame>,
    /// Load-time statistics about the flight catalog.
    pub catalog: CatalogStats,
}

/// Shared state for the Axum application.
///
/// Wrapped in [`Arc`] and injected via Axum's `State` extractor.
/// The broadcast sender is used to push frame summaries to all
/// connected `WebSocket` clients. The snapshot is a read-write
/// lock protecting the latest frame.
#[derive(Clone)]
pub struct AppState {
    /// Broadcast sender for frame summary messages.
    pub tx: broadcast::Sender<FrameBroadcast>,
    /// The current playback snapshot (updated each tick).
    pub snapshot: Arc<RwLock<PlaybackSnapshot>>,
    /// Shared operator control state (present when the engine is
    /// running).
    pub operator: Option<Arc<PlaybackOperator>>,
}

impl AppState {
    /// Create a new application state with an empty snapshot.
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(BROADCAST_CAPACITY);
        Self {
            tx,
            snapshot: Arc::new(RwLock::new(PlaybackSnapshot::default())),
            operator: None,
        }
    }

    /// Create a new application state with operator control state
    /// attached.
    pub fn with_operator(operator: Arc<PlaybackOperator>) -> Self {
        let (tx, _) = broadcast::channel(BROADCAST_CAPACITY);
        Self {
            tx,
            snapshot: Arc::new(RwLock::new(PlaybackSnapshot::default())),
            operator: Some(operator),
        }
    }

    /// Subscribe to the frame broadcast channel.
    ///
    /// Returns a receiver that will yield [`FrameBroadcast`] messages
    /// for every tick the engine publishes.
    pub fn subscribe(&self) -> broadcast::Receiver<FrameBroadcast> {
        self.tx.subscribe()
    }

    /// Publish a frame summary to all connected clients.
    ///
    /// Returns the number of receivers that received the message.
    /// Returns 0 if no clients are connected (this is not an error).
    pub fn broadcast(&self, summary: &FrameBroadcast) -> usize {
        // send returns Err only when there are zero receivers,
        // which is normal when no WebSocket clients are connected.
        self.tx.send(summary.clone()).unwrap_or(0)
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
