mod config;
mod directory_config;
mod error;
mod intake_config;
mod log_level;
mod logging_config;
mod websocket_config;

pub use config::Config;
pub use directory_config::DirectoryConfig;
pub use error::{ConfigError, ConfigErrorResult};
pub use intake_config::IntakeConfig;
pub use log_level::LogLevel;
pub use logging_config::LoggingConfig;
pub use websocket_config::WebSocketConfig;

const DEFAULT_INTAKE_HOST: &str = "0.0.0.0";
const DEFAULT_INTAKE_PORT: u16 = 10001;
const DEFAULT_LOG_LEVEL_STRING: &str = "info";
const DEFAULT_LOG_LEVEL: log::LevelFilter = log::LevelFilter::Info;
const DEFAULT_LOG_DIRECTORY: &str = "log";

#[cfg(test)]
mod tests;
