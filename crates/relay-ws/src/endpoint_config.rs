use std::time::Duration;

/// Configuration shared by every tenant endpoint, fixed at provision time
#[derive(Debug, Clone)]
pub struct EndpointConfig {
    /// Send buffer size per connection (bounded to handle backpressure)
    pub send_buffer_size: usize,
    /// Heartbeat ping interval in milliseconds
    pub ping_interval_ms: u64,
    /// Heartbeat timeout in milliseconds
    pub ping_timeout_ms: u64,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            send_buffer_size: 100,
            ping_interval_ms: 25_000,
            ping_timeout_ms: 60_000,
        }
    }
}

impl EndpointConfig {
    pub fn ping_interval(&self) -> Duration {
        Duration::from_millis(self.ping_interval_ms)
    }

    pub fn ping_timeout(&self) -> Duration {
        Duration::from_millis(self.ping_timeout_ms)
    }
}
