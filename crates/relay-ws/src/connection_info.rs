use crate::{ChannelSubscriptions, ConnectionId};

use std::time::Instant;

use axum::extract::ws::Message;
use chrono::{DateTime, Utc};
use tokio::sync::mpsc;

/// Information about an active connection, owned by its tenant's endpoint
#[derive(Debug, Clone)]
pub struct ConnectionInfo {
    pub connection_id: ConnectionId,
    pub connected_at: DateTime<Utc>,
    /// Last time any frame arrived from the client (monotonic)
    pub last_heartbeat_at: Instant,
    /// Outgoing frames are queued here and drained by the connection's writer task
    pub sender: mpsc::Sender<Message>,
    pub channels: ChannelSubscriptions,
}
