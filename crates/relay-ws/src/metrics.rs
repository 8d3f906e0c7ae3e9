use metrics::{counter, gauge};

/// Metrics collector for relay operations
#[derive(Clone)]
pub struct Metrics {
    prefix: &'static str,
}

impl Metrics {
    pub fn new() -> Self {
        Self { prefix: "relay" }
    }

    /// Record new connection established
    pub fn connection_established(&self, tenant_id: &str) {
        counter!(format!("{}.connections.established", self.prefix)).increment(1);
        gauge!(format!("{}.connections.active.{}", self.prefix, tenant_id)).increment(1.0);
    }

    /// Record connection closed
    pub fn connection_closed(&self, tenant_id: &str, reason: &str) {
        counter!(format!("{}.connections.closed.{}", self.prefix, reason)).increment(1);
        gauge!(format!("{}.connections.active.{}", self.prefix, tenant_id)).decrement(1.0);
    }

    /// Record connection evicted for missing its heartbeat window
    pub fn connection_evicted(&self, tenant_id: &str) {
        counter!(format!("{}.connections.evicted", self.prefix)).increment(1);
        gauge!(format!("{}.connections.active.{}", self.prefix, tenant_id)).decrement(1.0);
    }

    /// Record an event fanned out to a tenant's connections
    pub fn event_dispatched(&self, tenant_id: &str, targeted: usize) {
        counter!(format!("{}.events.dispatched", self.prefix)).increment(1);
        counter!(format!("{}.events.delivered.{}", self.prefix, tenant_id))
            .increment(targeted as u64);
    }

    /// Record an event dropped before dispatch
    pub fn event_dropped(&self, reason: &str) {
        counter!(format!("{}.events.dropped.{}", self.prefix, reason)).increment(1);
    }

    /// Record subscription change
    pub fn subscription_changed(&self, action: &str) {
        counter!(format!("{}.subscriptions.{}", self.prefix, action)).increment(1);
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
