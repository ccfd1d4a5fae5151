//! Observer API server for the Flyway route animation.
//!
//! This crate provides an Axum HTTP server that exposes:
//!
//! - **`WebSocket` endpoint** (`/ws/frames`) for real-time frame
//!   summary streaming via [`tokio::sync::broadcast`]
//! - **REST endpoints** for querying playback state (current frame,
//!   markers, catalog statistics)
//! - **Operator REST endpoints** for runtime control (play, pause,
//!   direction, reset, speed, status, stop)
//! - **Minimal HTML status page** (`GET /`) showing current tick,
//!   phase, period, and links to API endpoints
//!
//! # Architecture
//!
//! The observer reads from an in-memory [`PlaybackSnapshot`] that is
//! updated each tick by the engine's frame callback. All REST reads
//! are served from this snapshot so the observer never blocks the
//! tick loop. `WebSocket` clients receive frame summaries via a
//! broadcast channel with automatic lag handling. Map rendering lives
//! entirely in the dashboard; this crate serves data only.
//!
//! [`PlaybackSnapshot`]: state::PlaybackSnapshot

pub mod error;
pub mod handlers;
pub mod operator;
pub mod router;
pub mod server;
pub mod startup;
pub mod state;
pub mod ws;

// Re-export primary types for convenience.
pub use router::build_router;
pub use server::{start_server, ServerConfig, ServerError};
pub use startup::spawn_observer;
pub use state::{AppState, FrameBroadcast, PlaybackSnapshot};
