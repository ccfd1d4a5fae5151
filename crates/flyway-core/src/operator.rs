//! Operator control state for runtime playback management.
//!
//! This module provides shared atomic state used by the tick loop and
//! the operator REST API. The operator can pause/resume, change tick
//! speed, flip the playback direction, reset the animation, and
//! trigger a clean shutdown -- all without stopping the process.
//!
//! # Architecture
//!
//! All mutable control fields use [`std::sync::atomic`] types wrapped
//! in [`Arc`] so they can be shared between the tick loop task and the
//! Axum handler tasks without locks on the hot path. Commands that
//! mutate the timeline itself (direction, reset) go through a queue
//! drained by the loop, so the timeline stays single-writer.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use flyway_types::{Direction, Phase};
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, Notify};

use crate::config::PlaybackConfig;

/// Smallest accepted tick interval. The animation is meant to run
/// fast; the floor only guards against a zero interval busy-spinning
/// the loop.
pub const MIN_TICK_INTERVAL_MS: u64 = 1;

/// Reason why a playback session ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionEndReason {
    /// The animation drained into its settled, dots-only state.
    Settled,
    /// Reached the configured `max_ticks` limit.
    MaxTicksReached,
    /// An operator issued a stop command.
    OperatorStop,
}

/// An operator command that mutates the timeline.
///
/// Applied by the tick loop between ticks, never concurrently with
/// one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimelineCommand {
    /// Set the playback direction.
    SetDirection(Direction),
    /// Return the animation to its starting state. `resume` restarts
    /// playback; otherwise the loop parks on the reset frame.
    Reset {
        /// Whether playback resumes after the reset.
        resume: bool,
    },
}

/// Shared operator control state.
///
/// This struct is wrapped in [`Arc`] and shared between the tick loop
/// and operator API handlers. Atomic fields are used for lock-free
/// reads on the tick loop hot path.
#[derive(Debug)]
pub struct PlaybackOperator {
    /// Whether playback is currently paused.
    paused: AtomicBool,

    /// Notification used to wake the tick loop on resume, on a queued
    /// command, or on a stop request.
    resume_notify: Notify,

    /// Whether a stop has been requested.
    stop_requested: AtomicBool,

    /// Current tick interval in milliseconds (runtime-adjustable).
    tick_interval_ms: AtomicU64,

    /// Whether any timeline commands are waiting. Mirrors the queue so
    /// the loop can check without taking the lock.
    commands_pending: AtomicBool,

    /// Wall-clock time when playback started.
    started_at: DateTime<Utc>,

    /// Maximum number of ticks (0 = unlimited).
    max_ticks: u64,

    /// Whether the loop should end, rather than park, when the
    /// animation settles.
    exit_when_settled: bool,

    /// Queue of timeline commands awaiting the next loop pass.
    commands: Mutex<Vec<TimelineCommand>>,

    /// Reason the session ended, if it has.
    end_reason: Mutex<Option<SessionEndReason>>,
}

impl PlaybackOperator {
    /// Create a new operator from the playback configuration.
    ///
    /// Playback starts paused when `autoplay` is off.
    pub fn new(playback: &PlaybackConfig) -> Self {
        Self {
            paused: AtomicBool::new(!playback.autoplay),
            resume_notify: Notify::new(),
            stop_requested: AtomicBool::new(false),
            tick_interval_ms: AtomicU64::new(playback.tick_interval_ms),
            commands_pending: AtomicBool::new(false),
            started_at: Utc::now(),
            max_ticks: playback.max_ticks,
            exit_when_settled: playback.exit_when_settled,
            commands: Mutex::new(Vec::new()),
            end_reason: Mutex::new(None),
        }
    }

    // -----------------------------------------------------------------------
    // Pause / Resume
    // -----------------------------------------------------------------------

    /// Check whether playback is paused.
    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::Acquire)
    }

    /// Pause playback. The tick loop will park until resumed.
    pub fn pause(&self) {
        self.paused.store(true, Ordering::Release);
    }

    /// Resume playback and wake the tick loop.
    pub fn resume(&self) {
        self.paused.store(false, Ordering::Release);
        self.resume_notify.notify_one();
    }

    /// Wait until there is something for the tick loop to do.
    ///
    /// Returns immediately when playback is running. While paused,
    /// blocks until [`resume`](Self::resume) is called, a command is
    /// queued, or a stop is requested -- a parked loop must still
    /// apply operator commands.
    pub async fn wait_if_paused(&self) {
        while self.paused.load(Ordering::Acquire)
            && !self.commands_pending.load(Ordering::Acquire)
            && !self.stop_requested.load(Ordering::Acquire)
        {
            self.resume_notify.notified().await;
        }
    }

    // -----------------------------------------------------------------------
    // Stop
    // -----------------------------------------------------------------------

    /// Request a clean playback stop, waking the loop if parked.
    pub fn request_stop(&self) {
        self.stop_requested.store(true, Ordering::Release);
        self.resume_notify.notify_one();
    }

    /// Check whether a stop has been requested.
    pub fn is_stop_requested(&self) -> bool {
        self.stop_requested.load(Ordering::Acquire)
    }

    /// Record the reason the session ended.
    pub async fn set_end_reason(&self, reason: SessionEndReason) {
        let mut guard = self.end_reason.lock().await;
        *guard = Some(reason);
    }

    /// Get the reason the session ended, if it has.
    pub async fn end_reason(&self) -> Option<SessionEndReason> {
        self.end_reason.lock().await.clone()
    }

    // -----------------------------------------------------------------------
    // Tick Speed
    // -----------------------------------------------------------------------

    /// Get the current tick interval in milliseconds.
    pub fn tick_interval_ms(&self) -> u64 {
        self.tick_interval_ms.load(Ordering::Acquire)
    }

    /// Set the tick interval in milliseconds.
    ///
    /// Returns the previous interval on success, or `None` if the
    /// value was rejected (below [`MIN_TICK_INTERVAL_MS`]).
    pub fn set_tick_interval_ms(&self, ms: u64) -> Option<u64> {
        if ms < MIN_TICK_INTERVAL_MS {
            return None;
        }
        let prev = self.tick_interval_ms.swap(ms, Ordering::AcqRel);
        Some(prev)
    }

    // -----------------------------------------------------------------------
    // Boundaries
    // -----------------------------------------------------------------------

    /// Check whether the tick limit has been reached.
    ///
    /// Returns `true` if `max_ticks > 0` and `current_tick >= max_ticks`.
    pub const fn tick_limit_reached(&self, current_tick: u64) -> bool {
        self.max_ticks > 0 && current_tick >= self.max_ticks
    }

    /// Return the wall-clock start time.
    pub const fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Return elapsed seconds since playback start.
    pub fn elapsed_seconds(&self) -> u64 {
        let elapsed = Utc::now()
            .signed_duration_since(self.started_at)
            .num_seconds();
        u64::try_from(elapsed.max(0)).unwrap_or(u64::MAX)
    }

    /// Get the configured max ticks.
    pub const fn max_ticks(&self) -> u64 {
        self.max_ticks
    }

    /// Whether the loop ends, rather than parks, on settle.
    pub const fn exit_when_settled(&self) -> bool {
        self.exit_when_settled
    }

    // -----------------------------------------------------------------------
    // Timeline Commands
    // -----------------------------------------------------------------------

    /// Queue a command for the next loop pass, waking the loop if
    /// parked.
    pub async fn inject_command(&self, command: TimelineCommand) {
        let mut queue = self.commands.lock().await;
        queue.push(command);
        self.commands_pending.store(true, Ordering::Release);
        self.resume_notify.notify_one();
    }

    /// Drain all queued commands in arrival order.
    pub async fn drain_commands(&self) -> Vec<TimelineCommand> {
        let mut queue = self.commands.lock().await;
        self.commands_pending.store(false, Ordering::Release);
        std::mem::take(&mut *queue)
    }

    /// Whether any commands are waiting.
    pub fn has_pending_commands(&self) -> bool {
        self.commands_pending.load(Ordering::Acquire)
    }
}

/// JSON-serializable status of the playback session for the operator
/// API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaybackStatus {
    /// Current tick number.
    pub tick: u64,
    /// Active playback phase.
    pub phase: Phase,
    /// Current cursor position.
    pub cursor: usize,
    /// Configured playback direction.
    pub direction: Direction,
    /// Whether playback is running.
    pub playing: bool,
    /// Whether the operator has paused the loop.
    pub paused: bool,
    /// Whether a stop has been requested.
    pub stop_requested: bool,
    /// Current tick interval in milliseconds.
    pub tick_interval_ms: u64,
    /// Elapsed wall-clock seconds since start.
    pub elapsed_seconds: u64,
    /// Configured maximum ticks (0 = unlimited).
    pub max_ticks: u64,
    /// Number of records in the catalog.
    pub record_count: usize,
    /// Number of markers currently on the board.
    pub marker_count: usize,
    /// The reason the session ended, if applicable.
    pub end_reason: Option<SessionEndReason>,
    /// ISO 8601 timestamp of when playback started.
    pub started_at: String,
}
