use crate::{
    ClientMessage, ConnectionId, EndpointConfig, EndpointRegistry, HeartbeatMonitor, RelayError,
    Result, ShutdownGuard,
};

use std::panic::Location;

use axum::extract::ws::{Message, WebSocket};
use bytes::Bytes;
use error_location::ErrorLocation;
use futures::{SinkExt, StreamExt};
use log::{debug, info, warn};
use tokio::sync::mpsc;

/// Manages a single subscriber connection on one tenant's endpoint
pub struct EndpointConnection {
    connection_id: ConnectionId,
    tenant_id: String,
    config: EndpointConfig,
    registry: EndpointRegistry,
}

impl EndpointConnection {
    pub fn new(
        connection_id: ConnectionId,
        tenant_id: String,
        registry: EndpointRegistry,
        config: EndpointConfig,
    ) -> Self {
        Self {
            connection_id,
            tenant_id,
            config,
            registry,
        }
    }

    /// Drive the connection until disconnect, error, timeout or shutdown.
    ///
    /// `tx`/`rx` are the two ends of the send buffer the registry already
    /// holds a sender for: broadcasts and our own pings are queued on `tx`
    /// and drained into the socket by the writer task spawned here.
    pub async fn handle(
        self,
        socket: WebSocket,
        mut shutdown_guard: ShutdownGuard,
        tx: mpsc::Sender<Message>,
        mut rx: mpsc::Receiver<Message>,
    ) -> Result<()> {
        info!(
            "Connection {} established on tenant {}",
            self.connection_id, self.tenant_id
        );

        let (mut ws_sender, mut ws_receiver) = socket.split();

        // Writer task: drains the send buffer into the socket
        let send_task = tokio::spawn(async move {
            while let Some(msg) = rx.recv().await {
                if ws_sender.send(msg).await.is_err() {
                    break;
                }
            }
        });

        let heartbeat = HeartbeatMonitor::new(&self.config);
        let mut ping_ticker = heartbeat.ticker();
        // The first tick of a tokio interval fires immediately
        ping_ticker.tick().await;

        let result = loop {
            tokio::select! {
                // Frames from the client
                msg = ws_receiver.next() => {
                    match msg {
                        Some(Ok(msg)) => {
                            if let Err(e) = self.handle_client_message(msg, &tx).await {
                                break Err(e);
                            }
                        }
                        Some(Err(e)) => {
                            break Err(RelayError::ConnectionClosed {
                                reason: format!("WebSocket error: {e}"),
                                location: ErrorLocation::from(Location::caller()),
                            });
                        }
                        None => {
                            info!("Connection {} closed by client", self.connection_id);
                            break Ok(());
                        }
                    }
                }

                // Heartbeat: ping the client and enforce the timeout window
                _ = ping_ticker.tick() => {
                    if self
                        .registry
                        .heartbeat_expired(&self.tenant_id, self.connection_id)
                        .await
                    {
                        warn!(
                            "Connection {} on tenant {} missed its heartbeat window",
                            self.connection_id, self.tenant_id
                        );
                        break Err(RelayError::HeartbeatTimeout {
                            timeout_ms: self.config.ping_timeout_ms,
                            location: ErrorLocation::from(Location::caller()),
                        });
                    }

                    if tx.send(Message::Ping(Bytes::new())).await.is_err() {
                        // Writer task is gone, nothing left to drive
                        break Ok(());
                    }
                }

                // Process shutdown
                _ = shutdown_guard.wait() => {
                    info!("Shutting down connection {} gracefully", self.connection_id);
                    break Ok(());
                }
            }
        };

        // Close the send buffer to terminate the writer task
        drop(tx);
        let _ = send_task.await;

        info!(
            "Connection {} closed on tenant {}",
            self.connection_id, self.tenant_id
        );

        result
    }

    /// Handle one frame from the client.
    ///
    /// Every inbound frame refreshes the heartbeat window; any traffic
    /// counts as liveness.
    async fn handle_client_message(&self, msg: Message, tx: &mpsc::Sender<Message>) -> Result<()> {
        self.registry
            .touch(&self.tenant_id, self.connection_id)
            .await;

        match msg {
            Message::Text(text) => match ClientMessage::parse(&text) {
                Ok(ClientMessage::Subscribe { channel }) => {
                    self.registry
                        .subscribe(&self.tenant_id, self.connection_id, channel)
                        .await;
                    Ok(())
                }
                Ok(ClientMessage::Unsubscribe { channel }) => {
                    self.registry
                        .unsubscribe(&self.tenant_id, self.connection_id, &channel)
                        .await;
                    Ok(())
                }
                Err(e) => {
                    // Unrecognized chatter is logged and dropped, never fatal
                    debug!(
                        "Ignoring unrecognized message on connection {}: {e}",
                        self.connection_id
                    );
                    Ok(())
                }
            },
            Message::Ping(data) => {
                tx.send(Message::Pong(data)).await.map_err(|_| {
                    RelayError::SendBufferFull {
                        location: ErrorLocation::from(Location::caller()),
                    }
                })?;
                Ok(())
            }
            Message::Pong(_) => {
                // Reply to one of our pings; touch above already recorded it
                Ok(())
            }
            Message::Binary(data) => {
                debug!(
                    "Ignoring {}-byte binary frame on connection {}",
                    data.len(),
                    self.connection_id
                );
                Ok(())
            }
            Message::Close(_) => {
                info!(
                    "Received close frame from connection {}",
                    self.connection_id
                );
                Ok(())
            }
        }
    }
}
