//! Timeline engine, windowing, and playback orchestration for the
//! Flyway route animation.
//!
//! This crate owns the three-phase animation state machine: showing
//! (the cursor walks the record sequence and arcs accumulate into a
//! sliding window), removing (the window drains from the left), and
//! dots-only (the settled state where only location markers remain).
//!
//! # Modules
//!
//! - [`config`] -- Configuration loading from `flyway-config.yaml`
//!   into strongly-typed structs.
//! - [`error`] -- [`TimelineError`].
//! - [`markers`] -- The deduplicated, first-writer-wins marker board.
//! - [`operator`] -- Shared pause/speed/direction/stop control state
//!   for the tick loop and the REST API.
//! - [`period`] -- The drain-phase display-period ticker.
//! - [`projector`] -- Pure projection of engine state onto the visible
//!   arc window and its coordinate keys.
//! - [`runner`] -- The async playback loop around [`run_tick`].
//! - [`tick`] -- Single-tick execution of the state machine.
//! - [`timeline`] -- [`TimelineState`], the mutable playback state.
//!
//! [`TimelineError`]: error::TimelineError
//! [`TimelineState`]: timeline::TimelineState
//! [`run_tick`]: tick::run_tick

pub mod config;
pub mod error;
pub mod markers;
pub mod operator;
pub mod period;
pub mod projector;
pub mod runner;
pub mod tick;
pub mod timeline;
