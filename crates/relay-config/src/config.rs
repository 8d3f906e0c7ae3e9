use crate::{
    ConfigError, ConfigErrorResult, DirectoryConfig, IntakeConfig, LoggingConfig, WebSocketConfig,
};

use std::path::PathBuf;

use log::info;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub directory: DirectoryConfig,
    pub intake: IntakeConfig,
    pub websocket: WebSocketConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// Load config with full production error handling.
    ///
    /// Loading order:
    /// 1. Check for RELAY_CONFIG_DIR env var, else use ./.relay/
    /// 2. Load config.toml if it exists, else use defaults
    /// 3. Apply RELAY_* environment variable overrides
    ///
    /// Does NOT validate - call validate() after load().
    pub fn load() -> ConfigErrorResult<Self> {
        let config_dir = Self::config_dir()?;
        let config_path = config_dir.join("config.toml");

        let mut config = if config_path.exists() {
            Self::load_toml(&config_path)?
        } else {
            Config::default()
        };

        config.apply_env_overrides();

        Ok(config)
    }

    /// Load and parse TOML file with detailed error context.
    fn load_toml(path: &PathBuf) -> ConfigErrorResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.clone(),
            source: e,
        })?;

        toml::from_str(&contents).map_err(|e| ConfigError::Toml {
            path: path.clone(),
            source: e,
        })
    }

    /// Get the config directory.
    /// Priority: RELAY_CONFIG_DIR env var > ./.relay/ (relative to cwd)
    pub fn config_dir() -> Result<PathBuf, ConfigError> {
        if let Ok(dir) = std::env::var("RELAY_CONFIG_DIR") {
            return Ok(PathBuf::from(dir));
        }

        let cwd = std::env::current_dir()
            .map_err(|_| ConfigError::config("Cannot determine current working directory"))?;
        Ok(cwd.join(".relay"))
    }

    /// Validate all configuration.
    /// Call after load() and CLI overrides to catch all errors at startup.
    pub fn validate(&self) -> ConfigErrorResult<()> {
        self.directory.validate()?;
        self.intake.validate()?;
        self.websocket.validate()?;

        Ok(())
    }

    /// Log configuration summary.
    pub fn log_summary(&self) {
        info!("Configuration loaded:");
        info!(
            "  directory: {}",
            self.directory.host.as_deref().unwrap_or("<unset>")
        );
        info!("  intake: {}:{}", self.intake.host, self.intake.port);
        info!(
            "  websocket: buffer={}, ping={}ms/{}ms",
            self.websocket.send_buffer_size,
            self.websocket.ping_interval_ms,
            self.websocket.ping_timeout_ms
        );
        info!(
            "  logging: {} (colored: {})",
            *self.logging.level, self.logging.colored
        );
    }

    fn apply_env_overrides(&mut self) {
        // Directory
        Self::apply_env_option_string("RELAY_DIRECTORY_HOST", &mut self.directory.host);

        // Intake
        Self::apply_env_string("RELAY_INTAKE_HOST", &mut self.intake.host);
        Self::apply_env_parse("RELAY_INTAKE_PORT", &mut self.intake.port);

        // WebSocket
        Self::apply_env_parse(
            "RELAY_WS_SEND_BUFFER_SIZE",
            &mut self.websocket.send_buffer_size,
        );
        Self::apply_env_parse(
            "RELAY_WS_PING_INTERVAL_MS",
            &mut self.websocket.ping_interval_ms,
        );
        Self::apply_env_parse(
            "RELAY_WS_PING_TIMEOUT_MS",
            &mut self.websocket.ping_timeout_ms,
        );

        // Logging
        Self::apply_env_parse("RELAY_LOG_LEVEL", &mut self.logging.level);
        Self::apply_env_bool("RELAY_LOG_COLORED", &mut self.logging.colored);
        Self::apply_env_option_string("RELAY_LOG_FILE", &mut self.logging.file);
    }

    /// Helper: Apply environment variable override for String values
    fn apply_env_string(var_name: &str, target: &mut String) {
        if let Ok(val) = std::env::var(var_name) {
            *target = val;
        }
    }

    /// Helper: Apply environment variable override for bool values (accepts "true"/"1")
    fn apply_env_bool(var_name: &str, target: &mut bool) {
        if let Ok(val) = std::env::var(var_name) {
            *target = val == "true" || val == "1";
        }
    }

    /// Helper: Apply environment variable override for parseable values
    fn apply_env_parse<T: std::str::FromStr>(var_name: &str, target: &mut T) {
        if let Ok(val) = std::env::var(var_name)
            && let Ok(parsed) = val.parse()
        {
            *target = parsed;
        }
    }

    /// Helper: Apply environment variable override for Option<String> values
    fn apply_env_option_string(var_name: &str, target: &mut Option<String>) {
        if let Ok(val) = std::env::var(var_name) {
            *target = Some(val);
        }
    }
}
