//! REST API endpoint handlers for the Observer server.
//!
//! All handlers read from the in-memory [`PlaybackSnapshot`] via the
//! shared [`AppState`]. The engine is the only writer; a request never
//! touches the timeline itself.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/` | Minimal HTML status page |
//! | `GET` | `/api/frame` | Full current frame (arcs + markers) |
//! | `GET` | `/api/markers` | List accumulated markers |
//! | `GET` | `/api/markers/:key` | Single marker by location key |
//! | `GET` | `/api/catalog` | Flight catalog statistics |
//!
//! [`PlaybackSnapshot`]: crate::state::PlaybackSnapshot

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::response::{Html, IntoResponse};
use axum::Json;
use flyway_types::{Direction, LocationKey, Phase};

use crate::error::ObserverError;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// GET / -- minimal HTML status page
// ---------------------------------------------------------------------------

/// Serve a minimal HTML page showing playback status and API links.
///
/// This is the placeholder dashboard until the map frontend consumes
/// the JSON API directly.
pub async fn index(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let snapshot = state.snapshot.read().await;
    let frame = snapshot.frame.as_ref();

    let tick = frame.map_or(0, |f| f.tick);
    let phase = format!("{:?}", frame.map_or(Phase::Showing, |f| f.phase));
    let cursor = frame.map_or(0, |f| f.cursor);
    let arc_count = frame.map_or(0, |f| f.arcs.len());
    let marker_count = frame.map_or(0, |f| f.markers.len());
    let period = frame
        .and_then(|f| f.period)
        .map_or_else(|| String::from("-"), |p| p.to_string());
    let route_count = snapshot.catalog.record_count;
    let status = if frame.is_some_and(|f| f.playing) {
        "PLAYING"
    } else {
        "PAUSED"
    };

    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <title>Flyway Observer</title>
    <style>
        body {{
            background: #0d1117;
            color: #c9d1d9;
            font-family: 'Cascadia Code', 'Fira Code', 'Consolas', monospace;
            padding: 2rem;
            max-width: 800px;
            margin: 0 auto;
        }}
        h1 {{ color: #58a6ff; margin-bottom: 0.25rem; }}
        .subtitle {{ color: #8b949e; margin-top: 0; }}
        .metric {{
            display: inline-block;
            background: #161b22;
            border: 1px solid #30363d;
            border-radius: 6px;
            padding: 1rem 1.5rem;
            margin: 0.5rem 0.5rem 0.5rem 0;
            min-width: 120px;
        }}
        .metric .label {{ color: #8b949e; font-size: 0.85rem; }}
        .metric .value {{ color: #58a6ff; font-size: 1.5rem; font-weight: bold; }}
        a {{ color: #58a6ff; text-decoration: none; }}
        a:hover {{ text-decoration: underline; }}
        ul {{ list-style: none; padding: 0; }}
        li {{ padding: 0.3rem 0; }}
        ul.reads li::before {{ content: "GET "; color: #7ee787; font-weight: bold; }}
        ul.commands li::before {{ content: "POST "; color: #d2a8ff; font-weight: bold; }}
        .status {{ color: #3fb950; font-weight: bold; }}
        hr {{ border: none; border-top: 1px solid #30363d; margin: 1.5rem 0; }}
    </style>
</head>
<body>
    <h1>Flyway Observer</h1>
    <p class="subtitle">Flight route animation -- playback monitor</p>

    <p>Status: <span class="status">{status}</span></p>

    <div>
        <div class="metric">
            <div class="label">Tick</div>
            <div class="value">{tick}</div>
        </div>
        <div class="metric">
            <div class="label">Phase</div>
            <div class="value">{phase}</div>
        </div>
        <div class="metric">
            <div class="label">Cursor</div>
            <div class="value">{cursor}</div>
        </div>
        <div class="metric">
            <div class="label">Arcs</div>
            <div class="value">{arc_count}</div>
        </div>
        <div class="metric">
            <div class="label">Markers</div>
            <div class="value">{marker_count}</div>
        </div>
        <div class="metric">
            <div class="label">Period</div>
            <div class="value">{period}</div>
        </div>
        <div class="metric">
            <div class="label">Routes</div>
            <div class="value">{route_count}</div>
        </div>
    </div>

    <hr>

    <h2>API Endpoints</h2>
    <ul class="reads">
        <li><a href="/api/frame">/api/frame</a> -- Full current frame (arcs + markers)</li>
        <li><a href="/api/markers">/api/markers</a> -- List accumulated markers</li>
        <li><a href="/api/markers/:key">/api/markers/:key</a> -- Single marker by location key</li>
        <li><a href="/api/catalog">/api/catalog</a> -- Flight catalog statistics</li>
        <li><a href="/api/operator/status">/api/operator/status</a> -- Playback session status</li>
    </ul>

    <h2>Operator</h2>
    <ul class="commands">
        <li>/api/operator/play -- Resume playback</li>
        <li>/api/operator/pause -- Park the playback loop</li>
        <li>/api/operator/direction -- Set direction (forward | backward)</li>
        <li>/api/operator/reset -- Replay from the first record</li>
        <li>/api/operator/speed -- Set tick interval (ms)</li>
        <li>/api/operator/stop -- End the playback session</li>
    </ul>

    <h2>WebSocket</h2>
    <ul>
        <li style="list-style:none;"><code>ws://host:port/ws/frames</code> -- Live frame summary stream</li>
    </ul>
</body>
</html>"#
    ))
}

// ---------------------------------------------------------------------------
// GET /api/frame -- full current frame
// ---------------------------------------------------------------------------

/// Return the latest full animation frame: tick, phase, cursor,
/// direction, period, and the complete arc and marker payloads.
pub async fn get_frame(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ObserverError> {
    let snapshot = state.snapshot.read().await;

    if let Some(frame) = &snapshot.frame {
        Ok(Json(serde_json::to_value(frame)?))
    } else {
        // No tick has run yet -- return the empty starting frame.
        let body = serde_json::json!({
            "tick": 0,
            "phase": Phase::Showing,
            "cursor": 0,
            "direction": Direction::Forward,
            "playing": false,
            "arcs": [],
            "markers": [],
        });
        Ok(Json(body))
    }
}

// ---------------------------------------------------------------------------
// GET /api/markers -- list markers
// ---------------------------------------------------------------------------

/// List all markers accumulated so far, in key order.
pub async fn list_markers(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ObserverError> {
    let snapshot = state.snapshot.read().await;

    let markers = snapshot
        .frame
        .as_ref()
        .map_or(&[][..], |f| f.markers.as_slice());

    Ok(Json(serde_json::json!({
        "count": markers.len(),
        "markers": markers,
    })))
}

// ---------------------------------------------------------------------------
// GET /api/markers/:key -- single marker detail
// ---------------------------------------------------------------------------

/// Return a single marker by its location key (`"{lng},{lat}"`),
/// along with whether any arc in the current window touches it.
pub async fn get_marker(
    State(state): State<Arc<AppState>>,
    Path(raw_key): Path<String>,
) -> Result<impl IntoResponse, ObserverError> {
    let key = LocationKey::from(raw_key);

    let snapshot = state.snapshot.read().await;

    let marker = snapshot
        .frame
        .as_ref()
        .and_then(|f| f.markers.iter().find(|m| m.key == key))
        .ok_or_else(|| ObserverError::NotFound(format!("marker {key}")))?;

    // An arc touches the marker when either endpoint shares its key.
    let in_window = snapshot.frame.as_ref().is_some_and(|f| {
        f.arcs
            .iter()
            .any(|r| r.origin_key() == key || r.dest_key() == key)
    });

    Ok(Json(serde_json::json!({
        "marker": marker,
        "in_window": in_window,
    })))
}

// ---------------------------------------------------------------------------
// GET /api/catalog -- catalog statistics
// ---------------------------------------------------------------------------

/// Return load-time statistics about the flight catalog: record and
/// file counts, routes dropped by deduplication, and the period span.
pub async fn get_catalog(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ObserverError> {
    let snapshot = state.snapshot.read().await;
    Ok(Json(serde_json::to_value(&snapshot.catalog)?))
}
