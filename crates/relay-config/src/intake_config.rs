use crate::{ConfigError, ConfigErrorResult, DEFAULT_INTAKE_HOST, DEFAULT_INTAKE_PORT};

use serde::Deserialize;

pub const MIN_INTAKE_PORT: u16 = 1024;

/// Event intake HTTP listener settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct IntakeConfig {
    pub host: String,
    pub port: u16,
}

impl Default for IntakeConfig {
    fn default() -> Self {
        Self {
            host: String::from(DEFAULT_INTAKE_HOST),
            port: DEFAULT_INTAKE_PORT,
        }
    }
}

impl IntakeConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        // Port 0 means "auto-assign" - OS picks an available port.
        if self.port != 0 && self.port < MIN_INTAKE_PORT {
            return Err(ConfigError::intake(format!(
                "intake.port must be 0 (auto) or >= {}, got {}",
                MIN_INTAKE_PORT, self.port
            )));
        }

        Ok(())
    }

    /// Bind address as string
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
