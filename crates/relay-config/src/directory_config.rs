use crate::{ConfigError, ConfigErrorResult};

use serde::Deserialize;

/// Tenant directory service settings.
/// The host is the only required configuration value in the system; it has
/// no sensible default and must come from the config file, the environment
/// or the command line.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct DirectoryConfig {
    /// Directory service host, `host` or `host:port`
    pub host: Option<String>,
}

impl DirectoryConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        match self.host.as_deref() {
            None => Err(ConfigError::directory("directory.host is required")),
            Some("") => Err(ConfigError::directory("directory.host must not be empty")),
            Some(host) if host.contains('/') => Err(ConfigError::directory(format!(
                "directory.host must be host[:port] without a path, got {host}"
            ))),
            Some(_) => Ok(()),
        }
    }

    /// Base URL of the directory service
    pub fn base_url(&self) -> String {
        format!("https://{}", self.host.as_deref().unwrap_or_default())
    }
}
