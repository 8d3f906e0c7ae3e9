use std::collections::HashSet;

/// Tracks which named event channels a connection has asked for.
///
/// A connection that never subscribes receives every channel of its
/// tenant; an explicit subscription narrows delivery to the named set.
/// Tenant isolation is enforced by the registry regardless.
#[derive(Debug, Clone, Default)]
pub struct ChannelSubscriptions {
    channels: HashSet<String>,
}

impl ChannelSubscriptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to a named channel; returns false if already subscribed
    pub fn subscribe(&mut self, channel: String) -> bool {
        self.channels.insert(channel)
    }

    /// Unsubscribe from a named channel; returns false if not subscribed
    pub fn unsubscribe(&mut self, channel: &str) -> bool {
        self.channels.remove(channel)
    }

    /// Whether a broadcast on `channel` should reach this connection
    pub fn matches(&self, channel: &str) -> bool {
        self.channels.is_empty() || self.channels.contains(channel)
    }

    /// True when no explicit subscription exists (receive-all mode)
    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    pub fn count(&self) -> usize {
        self.channels.len()
    }

    /// Drop all explicit subscriptions, returning to receive-all mode
    pub fn clear(&mut self) {
        self.channels.clear();
    }
}
