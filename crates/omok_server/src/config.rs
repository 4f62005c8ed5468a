//! Server configuration: TOML file, environment, then CLI overrides.

use crate::cli::Cli;
use derive_getters::Getters;
use derive_more::{Display, Error};
use omok_game::SessionConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, instrument};

/// Runtime configuration for the room host.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    host: String,

    /// Port to bind to.
    #[serde(default = "default_port")]
    port: u16,

    /// Session parameters for rooms opened without their own.
    #[serde(default)]
    room: SessionConfig,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    2567
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            room: SessionConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Loads configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ServerConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            ServerConfigError::new(format!("Failed to read config file: {}", e))
        })?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| ServerConfigError::new(format!("Failed to parse config: {}", e)))?;

        info!(host = %config.host, port = config.port, "Config loaded successfully");
        Ok(config)
    }

    /// Resolves the effective configuration.
    ///
    /// Precedence, highest first: CLI flags, the `PORT` environment
    /// variable (port only), the config file, built-in defaults.
    #[instrument(skip(cli))]
    pub fn load(cli: &Cli) -> Result<Self, ServerConfigError> {
        let mut config = match &cli.config {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };

        if let Some(port) = std::env::var("PORT").ok().and_then(|p| p.parse().ok()) {
            debug!(port, "Port from environment");
            config.port = port;
        }
        config.apply_overrides(cli);
        config.validate()?;

        info!(
            host = %config.host,
            port = config.port,
            variant = %config.room.win_variant(),
            "Server config resolved"
        );
        Ok(config)
    }

    /// Applies CLI flags on top of the current values.
    pub fn apply_overrides(&mut self, cli: &Cli) {
        if let Some(host) = &cli.host {
            self.host = host.clone();
        }
        if let Some(port) = cli.port {
            self.port = port;
        }
        if let Some(variant) = cli.variant {
            self.room = SessionConfig::for_variant(variant);
        }
    }

    /// Checks the default room config.
    pub fn validate(&self) -> Result<(), ServerConfigError> {
        self.room
            .validate()
            .map_err(|e| ServerConfigError::new(format!("Invalid room config: {}", e.message)))
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ServerConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ServerConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use omok_game::WinVariant;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(contents.as_bytes()).expect("Failed to write config");
        file
    }

    #[test]
    fn test_from_file_reads_room_section() {
        let file = write_config(
            r#"
            host = "0.0.0.0"
            port = 9000

            [room]
            board_width = 3
            win_variant = "occupancy-exhaustion"
            max_moves = 9
            "#,
        );
        let config = ServerConfig::from_file(file.path()).unwrap();
        assert_eq!(config.host(), "0.0.0.0");
        assert_eq!(*config.port(), 9000);
        assert_eq!(*config.room(), SessionConfig::occupancy_exhaustion());
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let file = write_config("port = 4000\n");
        let config = ServerConfig::from_file(file.path()).unwrap();
        assert_eq!(config.host(), "127.0.0.1");
        assert_eq!(*config.room(), SessionConfig::five_in_a_row());
    }

    #[test]
    fn test_missing_file_is_error() {
        let err = ServerConfig::from_file("/definitely/not/here.toml").unwrap_err();
        assert!(err.message.contains("Failed to read config file"));
    }

    #[test]
    fn test_cli_overrides_file_values() {
        let mut config = ServerConfig::default();
        let cli = Cli {
            host: Some("0.0.0.0".into()),
            port: Some(8080),
            variant: Some(WinVariant::OccupancyExhaustion),
            ..Cli::default()
        };
        config.apply_overrides(&cli);

        assert_eq!(config.host(), "0.0.0.0");
        assert_eq!(*config.port(), 8080);
        assert_eq!(*config.room(), SessionConfig::occupancy_exhaustion());
    }

    #[test]
    fn test_invalid_room_config_rejected() {
        let file = write_config(
            r#"
            [room]
            board_width = 3
            win_variant = "five-in-a-row"
            max_moves = 361
            "#,
        );
        let config = ServerConfig::from_file(file.path()).unwrap();
        assert!(config.validate().is_err());
    }
}
