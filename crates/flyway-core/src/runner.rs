//! Playback loop runner with operator controls.
//!
//! This module provides [`run_playback`], the top-level async function
//! that drives the tick loop with support for:
//!
//! - **Bounded playback**: stop after `max_ticks`
//! - **Pause/resume**: operator can halt and continue the tick loop
//! - **Variable tick speed**: tick interval adjustable at runtime
//! - **Direction and reset commands**: applied between ticks, even
//!   while parked
//! - **Settling**: park (or end) once the animation drains to dots
//! - **Operator stop**: immediate clean stop via REST API
//!
//! The runner wraps the single-tick [`run_tick`] function and adds the
//! control plane around it. Exactly one runner drives a timeline at a
//! time, so the cursor can never be advanced by two loops at once.
//!
//! [`run_tick`]: crate::tick::run_tick

use std::sync::Arc;

use tracing::{info, warn};

use crate::operator::{PlaybackOperator, SessionEndReason, TimelineCommand};
use crate::tick::{self, TickSummary};
use crate::timeline::TimelineState;

/// Result of a playback session.
#[derive(Debug)]
pub struct PlaybackResult {
    /// The reason the session ended.
    pub end_reason: SessionEndReason,
    /// The last tick summary, if any tick completed.
    pub final_summary: Option<TickSummary>,
    /// Total number of ticks executed.
    pub total_ticks: u64,
}

/// Callback invoked with each new frame.
///
/// Implementations can use this to update the observer snapshot,
/// broadcast frames over `WebSocket`, etc. The callback receives the
/// tick summary and the full timeline state.
pub trait FrameCallback: Send {
    /// Called after a tick completes, and after operator commands are
    /// applied while playback is parked.
    fn on_frame(&mut self, summary: &TickSummary, state: &TimelineState);
}

/// A no-op frame callback for testing.
pub struct NoOpCallback;

impl FrameCallback for NoOpCallback {
    fn on_frame(&mut self, _summary: &TickSummary, _state: &TimelineState) {}
}

/// Run the playback loop until a termination condition is met.
///
/// This is the main entry point for a playback session. It integrates
/// the tick cycle with operator controls (pause, resume, speed,
/// direction, reset, stop) and the `max_ticks` boundary. When the
/// animation settles it either ends the session or parks the loop,
/// depending on the operator's `exit_when_settled` flag; a parked loop
/// still applies operator commands, so a reset or a direction reversal
/// can revive it.
///
/// # Arguments
///
/// * `state` - Mutable timeline state (records, cursor, markers)
/// * `operator` - Shared operator control state
/// * `callback` - Called with each new frame for observer updates
///
/// # Returns
///
/// Returns a [`PlaybackResult`] describing why the session ended and
/// the final tick summary. The tick path is infallible, so the runner
/// is too.
pub async fn run_playback(
    state: &mut TimelineState,
    operator: &Arc<PlaybackOperator>,
    callback: &mut dyn FrameCallback,
) -> PlaybackResult {
    let mut last_summary: Option<TickSummary> = None;
    let mut total_ticks: u64 = 0;

    info!(
        records = state.len(),
        window_size = state.window_size(),
        tick_interval_ms = operator.tick_interval_ms(),
        max_ticks = operator.max_ticks(),
        "Playback starting"
    );

    loop {
        // --- Park while paused (commands and stop still wake us) ---
        if operator.is_paused()
            && !operator.has_pending_commands()
            && !operator.is_stop_requested()
        {
            info!("Playback paused, waiting for resume...");
            operator.wait_if_paused().await;
            info!("Playback loop woken");
        }

        // --- Apply queued operator commands (before tick) ---
        let applied = apply_commands(state, operator, operator.drain_commands().await);

        // --- Check stop request (before tick) ---
        if operator.is_stop_requested() {
            info!("Operator stop requested");
            let reason = SessionEndReason::OperatorStop;
            operator.set_end_reason(reason.clone()).await;
            return PlaybackResult {
                end_reason: reason,
                final_summary: last_summary,
                total_ticks,
            };
        }

        // --- Still paused: publish command effects without ticking ---
        if operator.is_paused() {
            state.set_playing(false);
            if applied > 0 {
                callback.on_frame(&tick::summarize(state), state);
            }
            continue;
        }
        state.set_playing(true);

        // --- Execute tick ---
        let summary = tick::run_tick(state);
        total_ticks = total_ticks.saturating_add(1);

        // --- Notify callback ---
        callback.on_frame(&summary, state);

        // --- Check settled (after tick) ---
        if summary.settled {
            if operator.exit_when_settled() {
                info!(tick = summary.tick, "Animation settled");
                let reason = SessionEndReason::Settled;
                operator.set_end_reason(reason.clone()).await;
                return PlaybackResult {
                    end_reason: reason,
                    final_summary: Some(summary),
                    total_ticks,
                };
            }
            info!(
                tick = summary.tick,
                markers = summary.marker_count,
                "Animation settled, parking until reset or reversal"
            );
            operator.pause();
            last_summary = Some(summary);
            continue;
        }

        // --- Check tick limit (after tick) ---
        // run_tick advances the counter internally, so summary.tick is
        // the tick number that just ran. If max_ticks is 5, we stop
        // after tick 5 has completed.
        if operator.tick_limit_reached(summary.tick) {
            info!(
                tick = summary.tick,
                max_ticks = operator.max_ticks(),
                "Tick limit reached"
            );
            let reason = SessionEndReason::MaxTicksReached;
            operator.set_end_reason(reason.clone()).await;
            return PlaybackResult {
                end_reason: reason,
                final_summary: Some(summary),
                total_ticks,
            };
        }

        last_summary = Some(summary);

        // --- Sleep for tick interval ---
        let interval_ms = operator.tick_interval_ms();
        if interval_ms > 0 {
            tokio::time::sleep(tokio::time::Duration::from_millis(interval_ms)).await;
        }
    }
}

/// Apply drained operator commands to the timeline, returning how many
/// were applied.
fn apply_commands(
    state: &mut TimelineState,
    operator: &PlaybackOperator,
    commands: Vec<TimelineCommand>,
) -> usize {
    let count = commands.len();
    for command in commands {
        match command {
            TimelineCommand::SetDirection(direction) => {
                info!(?direction, phase = ?state.phase(), "Applying direction change");
                state.set_direction(direction);
            }
            TimelineCommand::Reset { resume } => {
                info!(resume, "Applying reset");
                state.reset();
                if resume {
                    operator.resume();
                } else {
                    operator.pause();
                }
            }
        }
    }
    count
}

/// Log the playback end sequence.
///
/// This should be called after [`run_playback`] returns. The HTTP
/// server should remain running after this returns so observers can
/// still read the final state.
pub fn log_playback_end(result: &PlaybackResult) {
    info!(
        reason = ?result.end_reason,
        total_ticks = result.total_ticks,
        final_tick = result.final_summary.as_ref().map(|s| s.tick),
        final_phase = ?result.final_summary.as_ref().map(|s| s.phase),
        "Playback ended"
    );

    if let Some(ref summary) = result.final_summary {
        info!(
            tick = summary.tick,
            cursor = summary.cursor,
            visible = summary.visible_count,
            markers = summary.marker_count,
            "Final tick summary"
        );
    } else {
        warn!("Playback ended with no ticks executed");
    }
}
