use crate::{RelayError, Result};

use axum::extract::ws::Message;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// An event frame pushed to subscriber connections.
///
/// The whole posted batch travels as one `data` value; intake never splits
/// a posting into per-record frames.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventFrame {
    /// Channel name ("eventname") the posting was addressed to
    pub event: String,
    /// The posted body, forwarded verbatim
    pub data: Value,
}

impl EventFrame {
    pub fn new(event: String, data: Value) -> Self {
        Self { event, data }
    }

    /// Serialize to a WebSocket text frame
    pub fn to_message(&self) -> Result<Message> {
        let text = serde_json::to_string(self)
            .map_err(|e| RelayError::internal(format!("Failed to serialize event frame: {e}")))?;
        Ok(Message::Text(text.into()))
    }
}

/// Control frames sent by subscriber clients
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum ClientMessage {
    Subscribe { channel: String },
    Unsubscribe { channel: String },
}

impl ClientMessage {
    /// Parse a client text frame; anything unrecognized is an error the
    /// connection logs and ignores
    pub fn parse(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| RelayError::invalid_message(e.to_string()))
    }
}
