//! Server configuration loading from file and environment variables.

use aria_dialogue::EnginesConfig;
use serde::Deserialize;
use std::net::{IpAddr, Ipv4Addr};
use thiserror::Error;

/// Top-level server configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Server network settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Database settings.
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// External engine settings (transcription, generation, classification,
    /// synthesis).
    #[serde(default)]
    pub engines: EnginesConfig,
}

/// Network configuration for the HTTP server.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind to.
    #[serde(default = "default_host")]
    pub host: IpAddr,

    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Directory for transient audio spool files. Defaults to the system
    /// temp directory when unset.
    #[serde(default)]
    pub spool_dir: Option<String>,
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_db_path")]
    pub path: String,

    /// Maximum number of pooled SQLite connections.
    #[serde(default = "default_pool_max_size")]
    pub pool_max_size: u32,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "aria_server=debug,info").
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Whether to output logs in JSON format.
    #[serde(default)]
    pub json: bool,
}

fn default_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1))
}

fn default_port() -> u16 {
    8000
}

fn default_db_path() -> String {
    "aria.db".to_string()
}

fn default_pool_max_size() -> u32 {
    8
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            spool_dir: None,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
            pool_max_size: default_pool_max_size(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse the configuration file.
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Loads configuration from a TOML file, falling back to defaults.
///
/// Environment variable overrides:
/// - `ARIA_HOST` overrides `server.host`
/// - `ARIA_PORT` overrides `server.port`
/// - `ARIA_SPOOL_DIR` overrides `server.spool_dir`
/// - `ARIA_DB_PATH` overrides `database.path`
/// - `ARIA_LOG_LEVEL` overrides `logging.level`
/// - `ARIA_LOG_JSON` overrides `logging.json` (set to "true" to enable)
/// - `ARIA_OPENAI_API_KEY` overrides the transcription and generation keys
/// - `ARIA_HF_API_KEY` overrides the classification key
/// - `ARIA_TTS_API_KEY` overrides the synthesis key
///
/// # Errors
///
/// Returns `ConfigError` if the file exists but cannot be read or parsed.
pub fn load_config(path: Option<&str>) -> Result<Config, ConfigError> {
    let mut config = match path {
        Some(p) => match std::fs::read_to_string(p) {
            Ok(contents) => toml::from_str(&contents)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = p, "config file not found, using defaults");
                Config::default()
            }
            Err(e) => return Err(ConfigError::FileRead(e)),
        },
        None => Config::default(),
    };

    // Environment variable overrides
    if let Ok(host) = std::env::var("ARIA_HOST") {
        if let Ok(parsed) = host.parse() {
            config.server.host = parsed;
        }
    }
    if let Ok(port) = std::env::var("ARIA_PORT") {
        if let Ok(parsed) = port.parse() {
            config.server.port = parsed;
        }
    }
    if let Ok(spool_dir) = std::env::var("ARIA_SPOOL_DIR") {
        config.server.spool_dir = Some(spool_dir);
    }
    if let Ok(db_path) = std::env::var("ARIA_DB_PATH") {
        config.database.path = db_path;
    }
    if let Ok(level) = std::env::var("ARIA_LOG_LEVEL") {
        config.logging.level = level;
    }
    if let Ok(json) = std::env::var("ARIA_LOG_JSON") {
        config.logging.json = json == "true" || json == "1";
    }
    if let Ok(key) = std::env::var("ARIA_OPENAI_API_KEY") {
        config.engines.transcription.api_key = key.clone();
        config.engines.generation.api_key = key;
    }
    if let Ok(key) = std::env::var("ARIA_HF_API_KEY") {
        config.engines.classification.api_key = key;
    }
    if let Ok(key) = std::env::var("ARIA_TTS_API_KEY") {
        config.engines.synthesis.api_key = key;
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let config = load_config(Some("/nonexistent/aria-config.toml")).expect("load");
        assert_eq!(config.server.port, default_port());
        assert_eq!(config.database.path, "aria.db");
        assert_eq!(config.logging.level, "info");
        assert!(config.engines.generation.api_key.is_empty());
    }

    #[test]
    fn toml_sections_parse() {
        let toml_str = r#"
            [server]
            host = "0.0.0.0"
            port = 9000

            [database]
            path = "/var/lib/aria/aria.db"
            pool_max_size = 4

            [logging]
            level = "debug"
            json = true

            [engines.generation]
            api_key = "sk-test"
            max_tokens = 200
        "#;

        let config: Config = toml::from_str(toml_str).expect("parse");
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.database.pool_max_size, 4);
        assert!(config.logging.json);
        assert_eq!(config.engines.generation.max_tokens, 200);
        // Untouched sections keep their defaults.
        assert_eq!(config.engines.transcription.model, "whisper-1");
    }
}
