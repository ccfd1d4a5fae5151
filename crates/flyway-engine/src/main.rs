//! Engine binary for the Flyway route animation.
//!
//! This is the main entry point that wires together the flight
//! catalog, the timeline tick loop, the operator controls, and the
//! Observer API server. It loads configuration, initializes all
//! subsystems, and runs the playback loop until a termination
//! condition is met.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `flyway-config.yaml`
//! 2. Initialize structured logging (tracing)
//! 3. Load the flight catalog from the data directory
//! 4. Build the timeline state
//! 5. Create operator state
//! 6. Start the Observer API server
//! 7. Run the playback loop
//! 8. Log the result

mod error;
mod observer_callback;

use std::path::Path;
use std::sync::Arc;

use flyway_core::config::FlywayConfig;
use flyway_core::operator::PlaybackOperator;
use flyway_core::runner;
use flyway_core::timeline::TimelineState;
use flyway_data::FlightCatalog;
use flyway_observer::state::AppState;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;
use crate::observer_callback::ObserverCallback;

/// Configuration file looked up relative to the working directory.
const CONFIG_FILE: &str = "flyway-config.yaml";

/// Application entry point for the engine.
///
/// Initializes all subsystems and runs the playback loop.
///
/// # Errors
///
/// Returns an error if any startup step fails. The playback loop
/// itself is infallible.
#[tokio::main]
async fn main() -> Result<(), EngineError> {
    // 1. Load configuration. Logging is not up yet, so the config has
    //    to load silently; the values are logged in step 2.
    let config = load_config()?;

    // 2. Initialize structured logging. RUST_LOG wins over the config
    //    file's level when both are set.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_target(true)
        .init();

    info!("flyway-engine starting");
    if !Path::new(CONFIG_FILE).exists() {
        info!("Config file not found, using defaults");
    }
    info!(
        window_size = config.playback.window_size,
        tick_interval_ms = config.playback.tick_interval_ms,
        autoplay = config.playback.autoplay,
        exit_when_settled = config.playback.exit_when_settled,
        flights_dir = %config.data.flights_dir,
        "Configuration loaded"
    );

    // 3. Load the flight catalog.
    let flights_dir = Path::new(&config.data.flights_dir);
    let catalog = FlightCatalog::load_from_dir(flights_dir)?;
    if catalog.is_empty() {
        warn!(
            dir = %flights_dir.display(),
            "No flight records found, the animation will idle on an empty catalog"
        );
    }
    info!(
        records = catalog.len(),
        unique_locations = catalog.unique_location_count(),
        files_loaded = catalog.stats().files_loaded,
        "Flight catalog loaded"
    );

    // 4. Build the timeline.
    let (records, stats) = catalog.into_parts();
    let mut timeline = TimelineState::new(records, &config.playback)?;
    info!(
        records = timeline.len(),
        window_size = timeline.window_size(),
        "Timeline initialized"
    );

    // 5. Create operator state.
    let operator = Arc::new(PlaybackOperator::new(&config.playback));
    info!(
        tick_interval_ms = operator.tick_interval_ms(),
        max_ticks = operator.max_ticks(),
        paused = operator.is_paused(),
        "Operator state initialized"
    );

    // 6. Start the Observer API server.
    let app_state = Arc::new(AppState::with_operator(Arc::clone(&operator)));
    {
        // Seed the snapshot with catalog statistics so /api/catalog
        // is meaningful before the first tick.
        let mut snap = app_state.snapshot.write().await;
        snap.catalog = stats;
    }
    let _observer_handle = flyway_observer::spawn_observer(
        &config.infrastructure.observer_host,
        config.infrastructure.observer_port,
        Arc::clone(&app_state),
    )?;
    info!(
        host = %config.infrastructure.observer_host,
        port = config.infrastructure.observer_port,
        "Observer API server started"
    );

    // 7. Run the playback loop.
    let mut callback = ObserverCallback::new(app_state);
    let result = runner::run_playback(&mut timeline, &operator, &mut callback).await;

    // 8. Log results.
    runner::log_playback_end(&result);
    info!(
        end_reason = ?result.end_reason,
        total_ticks = result.total_ticks,
        "flyway-engine shutdown complete"
    );

    Ok(())
}

/// Load the engine configuration from `flyway-config.yaml`.
///
/// Looks for the config file relative to the current working
/// directory. A missing file yields the defaults; environment
/// overrides apply either way.
fn load_config() -> Result<FlywayConfig, EngineError> {
    let config_path = Path::new(CONFIG_FILE);
    if config_path.exists() {
        Ok(FlywayConfig::from_file(config_path)?)
    } else {
        let mut config = FlywayConfig::default();
        config.apply_env_overrides();
        Ok(config)
    }
}
