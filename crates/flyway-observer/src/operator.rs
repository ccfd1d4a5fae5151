//! Operator REST API handlers for runtime playback control.
//!
//! These endpoints are separate from the observer read-only API. They
//! provide one-way command authority from the operator to the engine:
//! pause/resume flip shared atomics directly, while commands that
//! mutate the timeline (direction, reset) go through the operator's
//! command queue and are applied by the tick loop between ticks.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `POST` | `/api/operator/play` | Resume the playback loop |
//! | `POST` | `/api/operator/pause` | Park the playback loop |
//! | `POST` | `/api/operator/direction` | Set playback direction |
//! | `POST` | `/api/operator/reset` | Replay from the first record |
//! | `POST` | `/api/operator/speed` | Set tick interval (ms) |
//! | `GET` | `/api/operator/status` | Current playback status |
//! | `POST` | `/api/operator/stop` | End the playback session |

use std::sync::Arc;

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use flyway_core::operator::{PlaybackStatus, TimelineCommand};
use flyway_types::{Direction, Phase};

use crate::error::ObserverError;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /api/operator/speed`.
#[derive(Debug, serde::Deserialize)]
pub struct SetSpeedRequest {
    /// New tick interval in milliseconds (minimum 1).
    pub tick_interval_ms: u64,
}

/// Request body for `POST /api/operator/direction`.
#[derive(Debug, serde::Deserialize)]
pub struct SetDirectionRequest {
    /// New playback direction, `"forward"` or `"backward"`.
    pub direction: String,
}

/// Request body for `POST /api/operator/reset`.
#[derive(Debug, serde::Deserialize)]
pub struct ResetRequest {
    /// Whether playback resumes after the reset (default true).
    #[serde(default = "default_resume")]
    pub resume: bool,
}

const fn default_resume() -> bool {
    true
}

/// Generic success response.
#[derive(Debug, serde::Serialize)]
struct OperatorResponse {
    /// Whether the operation succeeded.
    ok: bool,
    /// Human-readable message.
    message: String,
}

// ---------------------------------------------------------------------------
// POST /api/operator/play
// ---------------------------------------------------------------------------

/// Resume the playback loop after a pause.
///
/// Also wakes a loop that parked itself when the animation settled;
/// with no reset or reversal queued the settled frame simply re-parks.
/// Returns an error if no operator state is attached.
pub async fn play(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, ObserverError> {
    let operator = state
        .operator
        .as_ref()
        .ok_or_else(|| ObserverError::Internal("operator state not available".to_owned()))?;

    operator.resume();

    Ok(Json(OperatorResponse {
        ok: true,
        message: "Playback resumed".to_owned(),
    }))
}

// ---------------------------------------------------------------------------
// POST /api/operator/pause
// ---------------------------------------------------------------------------

/// Pause the playback loop.
///
/// The loop will park until resumed. All timeline state is preserved
/// in memory; queued operator commands are still applied while parked.
pub async fn pause(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, ObserverError> {
    let operator = state
        .operator
        .as_ref()
        .ok_or_else(|| ObserverError::Internal("operator state not available".to_owned()))?;

    operator.pause();

    Ok(Json(OperatorResponse {
        ok: true,
        message: "Playback paused".to_owned(),
    }))
}

// ---------------------------------------------------------------------------
// POST /api/operator/direction
// ---------------------------------------------------------------------------

/// Set the playback direction.
///
/// The command is queued and applied by the tick loop before its next
/// tick. Backward from the settled dots-only frame re-enters the
/// removing phase; the drain itself always runs forward.
pub async fn set_direction(
    State(state): State<Arc<AppState>>,
    Json(body): Json<SetDirectionRequest>,
) -> Result<impl IntoResponse, ObserverError> {
    let operator = state
        .operator
        .as_ref()
        .ok_or_else(|| ObserverError::Internal("operator state not available".to_owned()))?;

    let direction = match body.direction.as_str() {
        "forward" => Direction::Forward,
        "backward" => Direction::Backward,
        other => {
            return Err(ObserverError::InvalidQuery(format!(
                "unknown direction '{other}' (expected 'forward' or 'backward')"
            )));
        }
    };

    operator
        .inject_command(TimelineCommand::SetDirection(direction))
        .await;

    Ok(Json(OperatorResponse {
        ok: true,
        message: format!("Direction set to {} for the next tick", body.direction),
    }))
}

// ---------------------------------------------------------------------------
// POST /api/operator/reset
// ---------------------------------------------------------------------------

/// Return the animation to its starting state.
///
/// Cursor back to the first record, markers cleared, phase back to
/// showing. With `resume: false` the loop publishes the reset frame
/// and stays parked. The body is optional; an empty request resumes.
pub async fn reset(
    State(state): State<Arc<AppState>>,
    body: Option<Json<ResetRequest>>,
) -> Result<impl IntoResponse, ObserverError> {
    let operator = state
        .operator
        .as_ref()
        .ok_or_else(|| ObserverError::Internal("operator state not available".to_owned()))?;

    let resume = body.is_none_or(|Json(r)| r.resume);

    operator
        .inject_command(TimelineCommand::Reset { resume })
        .await;

    Ok(Json(OperatorResponse {
        ok: true,
        message: if resume {
            "Reset queued, replaying from the first record".to_owned()
        } else {
            "Reset queued, parked on the starting frame".to_owned()
        },
    }))
}

// ---------------------------------------------------------------------------
// POST /api/operator/speed
// ---------------------------------------------------------------------------

/// Change the tick interval at runtime.
///
/// The new interval takes effect before the next tick's sleep. Minimum
/// 1ms to prevent a busy-spinning loop.
pub async fn set_speed(
    State(state): State<Arc<AppState>>,
    Json(body): Json<SetSpeedRequest>,
) -> Result<impl IntoResponse, ObserverError> {
    let operator = state
        .operator
        .as_ref()
        .ok_or_else(|| ObserverError::Internal("operator state not available".to_owned()))?;

    operator.set_tick_interval_ms(body.tick_interval_ms).map_or_else(
        || {
            Err(ObserverError::InvalidQuery(
                "tick_interval_ms must be at least 1".to_owned(),
            ))
        },
        |prev| {
            Ok(Json(serde_json::json!({
                "ok": true,
                "message": format!("Tick interval changed from {prev}ms to {}ms", body.tick_interval_ms),
                "previous_interval_ms": prev,
                "new_interval_ms": body.tick_interval_ms,
            })))
        },
    )
}

// ---------------------------------------------------------------------------
// GET /api/operator/status
// ---------------------------------------------------------------------------

/// Return the current playback status including tick, phase, cursor,
/// pause state, speed, elapsed time, and catalog size.
pub async fn status(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ObserverError> {
    let operator = state
        .operator
        .as_ref()
        .ok_or_else(|| ObserverError::Internal("operator state not available".to_owned()))?;

    let snapshot = state.snapshot.read().await;
    let frame = snapshot.frame.as_ref();

    let end_reason = operator.end_reason().await;

    let status = PlaybackStatus {
        tick: frame.map_or(0, |f| f.tick),
        phase: frame.map_or(Phase::Showing, |f| f.phase),
        cursor: frame.map_or(0, |f| f.cursor),
        direction: frame.map_or(Direction::Forward, |f| f.direction),
        playing: frame.is_some_and(|f| f.playing),
        paused: operator.is_paused(),
        stop_requested: operator.is_stop_requested(),
        tick_interval_ms: operator.tick_interval_ms(),
        elapsed_seconds: operator.elapsed_seconds(),
        max_ticks: operator.max_ticks(),
        record_count: snapshot.catalog.record_count,
        marker_count: frame.map_or(0, |f| f.markers.len()),
        end_reason,
        started_at: operator.started_at().to_rfc3339(),
    };

    Ok(Json(status))
}

// ---------------------------------------------------------------------------
// POST /api/operator/stop
// ---------------------------------------------------------------------------

/// Trigger a clean playback stop.
///
/// The tick loop will finish its current tick, record the end reason,
/// and return. The HTTP server continues running so the observer can
/// still serve the final frame.
pub async fn stop(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, ObserverError> {
    let operator = state
        .operator
        .as_ref()
        .ok_or_else(|| ObserverError::Internal("operator state not available".to_owned()))?;

    operator.request_stop();

    Ok(Json(OperatorResponse {
        ok: true,
        message: "Stop requested -- playback will end after the current tick".to_owned(),
    }))
}
