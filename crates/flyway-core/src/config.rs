//! Configuration loading from `flyway-config.yaml` into strongly-typed
//! structs.
//!
//! Every field has a serde default so a missing file, an empty file,
//! and a partial file all produce a runnable configuration. Environment
//! variables override the values that change between deployments.

use std::path::Path;

use serde::Deserialize;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level configuration for the Flyway engine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct FlywayConfig {
    /// Playback parameters (window, tick interval, autoplay).
    #[serde(default)]
    pub playback: PlaybackConfig,

    /// Flight-data location.
    #[serde(default)]
    pub data: DataConfig,

    /// Observer server binding.
    #[serde(default)]
    pub infrastructure: InfrastructureConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl FlywayConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// Environment variables override YAML values:
    /// - `FLYWAY_DATA_DIR` overrides `data.flights_dir`
    /// - `FLYWAY_OBSERVER_PORT` overrides `infrastructure.observer_port`
    /// - `FLYWAY_TICK_INTERVAL_MS` overrides `playback.tick_interval_ms`
    /// - `FLYWAY_WINDOW_SIZE` overrides `playback.window_size`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let mut config: Self = serde_yml::from_str(&contents)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config: Self = serde_yml::from_str(yaml)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Override deployment-dependent values with environment variables
    /// when set.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("FLYWAY_DATA_DIR") {
            self.data.flights_dir = val;
        }
        if let Ok(val) = std::env::var("FLYWAY_OBSERVER_PORT") {
            if let Ok(port) = val.parse() {
                self.infrastructure.observer_port = port;
            }
        }
        if let Ok(val) = std::env::var("FLYWAY_TICK_INTERVAL_MS") {
            if let Ok(ms) = val.parse() {
                self.playback.tick_interval_ms = ms;
            }
        }
        if let Ok(val) = std::env::var("FLYWAY_WINDOW_SIZE") {
            if let Ok(size) = val.parse() {
                self.playback.window_size = size;
            }
        }
    }
}

/// Playback parameters for the timeline engine.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PlaybackConfig {
    /// Maximum number of records visible as arcs at once.
    #[serde(default = "default_window_size")]
    pub window_size: usize,

    /// Real-time milliseconds per tick.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,

    /// Start playing immediately instead of waiting for an operator
    /// `play` command.
    #[serde(default = "default_autoplay")]
    pub autoplay: bool,

    /// End the playback loop once the animation settles into its
    /// terminal frame. When false the loop parks paused instead, so
    /// an operator can reset or reverse.
    #[serde(default)]
    pub exit_when_settled: bool,

    /// Maximum number of ticks to run (0 = unlimited).
    #[serde(default)]
    pub max_ticks: u64,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            window_size: default_window_size(),
            tick_interval_ms: default_tick_interval_ms(),
            autoplay: default_autoplay(),
            exit_when_settled: false,
            max_ticks: 0,
        }
    }
}

/// Flight-data location.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DataConfig {
    /// Directory holding the per-month flight JSON files.
    #[serde(default = "default_flights_dir")]
    pub flights_dir: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            flights_dir: default_flights_dir(),
        }
    }
}

/// Observer server binding.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct InfrastructureConfig {
    /// Host address the observer binds to.
    #[serde(default = "default_observer_host")]
    pub observer_host: String,

    /// TCP port the observer binds to.
    #[serde(default = "default_observer_port")]
    pub observer_port: u16,
}

impl Default for InfrastructureConfig {
    fn default() -> Self {
        Self {
            observer_host: default_observer_host(),
            observer_port: default_observer_port(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error). Used when
    /// `RUST_LOG` is not set.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

const fn default_window_size() -> usize {
    150
}

const fn default_tick_interval_ms() -> u64 {
    15
}

const fn default_autoplay() -> bool {
    true
}

fn default_flights_dir() -> String {
    String::from("data/flights")
}

fn default_observer_host() -> String {
    String::from("0.0.0.0")
}

const fn default_observer_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    String::from("info")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = FlywayConfig::default();
        assert_eq!(config.playback.window_size, 150);
        assert_eq!(config.playback.tick_interval_ms, 15);
        assert!(config.playback.autoplay);
        assert!(!config.playback.exit_when_settled);
        assert_eq!(config.playback.max_ticks, 0);
        assert_eq!(config.data.flights_dir, "data/flights");
        assert_eq!(config.infrastructure.observer_port, 8080);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn parse_full_yaml() {
        let yaml = r"
playback:
  window_size: 25
  tick_interval_ms: 40
  autoplay: false
  exit_when_settled: true
  max_ticks: 5000
data:
  flights_dir: /srv/flights
infrastructure:
  observer_host: 127.0.0.1
  observer_port: 9090
logging:
  level: debug
";
        let config = FlywayConfig::parse(yaml).unwrap();
        assert_eq!(config.playback.window_size, 25);
        assert_eq!(config.playback.tick_interval_ms, 40);
        assert!(!config.playback.autoplay);
        assert!(config.playback.exit_when_settled);
        assert_eq!(config.playback.max_ticks, 5000);
        assert_eq!(config.data.flights_dir, "/srv/flights");
        assert_eq!(config.infrastructure.observer_host, "127.0.0.1");
        assert_eq!(config.infrastructure.observer_port, 9090);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn parse_minimal_yaml_fills_defaults() {
        let yaml = r"
playback:
  tick_interval_ms: 30
";
        let config = FlywayConfig::parse(yaml).unwrap();
        assert_eq!(config.playback.tick_interval_ms, 30);
        // Everything else falls back to defaults.
        assert_eq!(config.playback.window_size, 150);
        assert_eq!(config.data.flights_dir, "data/flights");
    }

    #[test]
    fn parse_empty_yaml_is_all_defaults() {
        let config = FlywayConfig::parse("{}").unwrap();
        assert_eq!(config, FlywayConfig::default());
    }

    #[test]
    fn invalid_yaml_is_an_error() {
        let result = FlywayConfig::parse(": not yaml :");
        assert!(matches!(result, Err(ConfigError::Yaml { .. })));
    }
}
