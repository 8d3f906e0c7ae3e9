use crate::{ConfigError, ConfigErrorResult};

use serde::Deserialize;

// Send buffer size constraints
pub const MIN_SEND_BUFFER_SIZE: usize = 1;
pub const MAX_SEND_BUFFER_SIZE: usize = 10000;
pub const DEFAULT_SEND_BUFFER_SIZE: usize = 100;

// Ping interval constraints (milliseconds)
pub const MIN_PING_INTERVAL_MS: u64 = 1000;
pub const MAX_PING_INTERVAL_MS: u64 = 300_000;
pub const DEFAULT_PING_INTERVAL_MS: u64 = 25_000;

// Ping timeout constraints (milliseconds)
pub const MIN_PING_TIMEOUT_MS: u64 = 2000;
pub const MAX_PING_TIMEOUT_MS: u64 = 600_000;
pub const DEFAULT_PING_TIMEOUT_MS: u64 = 60_000;

/// Push endpoint connection settings, shared by every tenant endpoint.
/// All values validated to be within reasonable operational ranges.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WebSocketConfig {
    /// Send buffer size per connection
    pub send_buffer_size: usize,
    /// Heartbeat ping interval in milliseconds
    pub ping_interval_ms: u64,
    /// Heartbeat timeout in milliseconds
    pub ping_timeout_ms: u64,
}

impl Default for WebSocketConfig {
    fn default() -> Self {
        Self {
            send_buffer_size: DEFAULT_SEND_BUFFER_SIZE,
            ping_interval_ms: DEFAULT_PING_INTERVAL_MS,
            ping_timeout_ms: DEFAULT_PING_TIMEOUT_MS,
        }
    }
}

impl WebSocketConfig {
    /// Validate all fields are within acceptable ranges.
    pub fn validate(&self) -> ConfigErrorResult<()> {
        if self.send_buffer_size < MIN_SEND_BUFFER_SIZE
            || self.send_buffer_size > MAX_SEND_BUFFER_SIZE
        {
            return Err(ConfigError::config(format!(
                "websocket.send_buffer_size must be {}-{}, got {}",
                MIN_SEND_BUFFER_SIZE, MAX_SEND_BUFFER_SIZE, self.send_buffer_size
            )));
        }

        if self.ping_interval_ms < MIN_PING_INTERVAL_MS
            || self.ping_interval_ms > MAX_PING_INTERVAL_MS
        {
            return Err(ConfigError::config(format!(
                "websocket.ping_interval_ms must be {}-{}, got {}",
                MIN_PING_INTERVAL_MS, MAX_PING_INTERVAL_MS, self.ping_interval_ms
            )));
        }

        if self.ping_timeout_ms < MIN_PING_TIMEOUT_MS || self.ping_timeout_ms > MAX_PING_TIMEOUT_MS
        {
            return Err(ConfigError::config(format!(
                "websocket.ping_timeout_ms must be {}-{}, got {}",
                MIN_PING_TIMEOUT_MS, MAX_PING_TIMEOUT_MS, self.ping_timeout_ms
            )));
        }

        if self.ping_timeout_ms <= self.ping_interval_ms {
            return Err(ConfigError::config(format!(
                "websocket.ping_timeout_ms ({}) must be greater than ping_interval_ms ({})",
                self.ping_timeout_ms, self.ping_interval_ms
            )));
        }

        Ok(())
    }
}
