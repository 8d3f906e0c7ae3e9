use crate::EndpointConfig;

use std::time::{Duration, Instant};

use tokio::time::{Interval, MissedTickBehavior, interval};

/// Liveness policy for one endpoint's connections.
///
/// The interval/timeout pair is fixed when the endpoint is provisioned;
/// individual connections cannot override it. A connection is ALIVE while
/// frames keep arriving within the timeout window and EVICTED the moment
/// the window lapses - there is no recovering state, a reconnect is a new
/// connection with a new id.
#[derive(Debug, Clone, Copy)]
pub struct HeartbeatMonitor {
    interval: Duration,
    timeout: Duration,
}

impl HeartbeatMonitor {
    pub fn new(config: &EndpointConfig) -> Self {
        Self {
            interval: config.ping_interval(),
            timeout: config.ping_timeout(),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Whether a connection last seen at `last_seen` must be treated as
    /// dead at `now`
    pub fn expired(&self, last_seen: Instant, now: Instant) -> bool {
        now.duration_since(last_seen) >= self.timeout
    }

    /// Ticker driving the ping/timeout checks of one connection task
    pub fn ticker(&self) -> Interval {
        let mut ticker = interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        ticker
    }
}
