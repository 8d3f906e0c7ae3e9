use crate::{
    ChannelSubscriptions, ConnectionId, ConnectionInfo, EndpointConfig, EventFrame,
    HeartbeatMonitor, Metrics, RelayError, Result,
};

use relay_directory::Tenant;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use axum::extract::ws::Message;
use log::{debug, info, warn};
use serde_json::Value;
use tokio::sync::{RwLock, mpsc};

/// Base port for tenant push endpoints
const ENDPOINT_PORT_BASE: u16 = 10_000;

/// Derive a tenant's endpoint port from its routing-port hint
pub fn derive_endpoint_port(proxyport: u16) -> u16 {
    (proxyport % 100) + ENDPOINT_PORT_BASE
}

/// Canonical form of a tenant id, used for every registry lookup
pub fn normalize_tenant_id(id: &str) -> String {
    id.to_uppercase()
}

/// Registry of per-tenant push endpoints and their live connections.
///
/// One instance is shared by the lifecycle coordinator, every endpoint's
/// upgrade handler and the event intake; all mutation goes through this
/// type under a single lock. The tenant set is closed once startup
/// provisioning finishes - broadcasts referencing anything else fail with
/// `UnknownTenant`.
pub struct EndpointRegistry {
    inner: Arc<RwLock<RegistryInner>>,
    config: EndpointConfig,
    heartbeat: HeartbeatMonitor,
    metrics: Metrics,
}

struct RegistryInner {
    /// Provisioned endpoints by normalized tenant id
    endpoints: HashMap<String, Endpoint>,
}

/// A tenant's push endpoint: exclusive owner of that tenant's connection set
struct Endpoint {
    tenant: Tenant,
    port: u16,
    connections: HashMap<ConnectionId, ConnectionInfo>,
}

impl EndpointRegistry {
    pub fn new(config: EndpointConfig, metrics: Metrics) -> Self {
        let heartbeat = HeartbeatMonitor::new(&config);
        Self {
            inner: Arc::new(RwLock::new(RegistryInner {
                endpoints: HashMap::new(),
            })),
            config,
            heartbeat,
            metrics,
        }
    }

    pub fn config(&self) -> &EndpointConfig {
        &self.config
    }

    /// Record a tenant's endpoint and return its derived port.
    ///
    /// Provisioning the same tenant id twice is a programming error and
    /// fails with `DuplicateTenant`; the coordinator treats that as fatal.
    pub async fn provision(&self, tenant: Tenant) -> Result<u16> {
        let tenant_id = normalize_tenant_id(&tenant.id);
        let port = derive_endpoint_port(tenant.proxyport);

        let mut inner = self.inner.write().await;

        if inner.endpoints.contains_key(&tenant_id) {
            return Err(RelayError::duplicate_tenant(tenant_id));
        }

        info!(
            "Provisioned endpoint for tenant {tenant_id} ({}) on port {port}",
            tenant.name
        );

        inner.endpoints.insert(
            tenant_id,
            Endpoint {
                tenant,
                port,
                connections: HashMap::new(),
            },
        );

        Ok(port)
    }

    /// Register a connection under a tenant's endpoint.
    ///
    /// The accept time seeds the heartbeat window, so a client that never
    /// sends a single frame still times out.
    pub async fn accept(
        &self,
        tenant_id: &str,
        sender: mpsc::Sender<Message>,
    ) -> Result<ConnectionId> {
        let mut inner = self.inner.write().await;

        let endpoint = inner
            .endpoints
            .get_mut(tenant_id)
            .ok_or_else(|| RelayError::unknown_tenant(tenant_id))?;

        let connection_id = ConnectionId::new();
        let info = ConnectionInfo {
            connection_id,
            connected_at: chrono::Utc::now(),
            last_heartbeat_at: Instant::now(),
            sender,
            channels: ChannelSubscriptions::new(),
        };

        endpoint.connections.insert(connection_id, info);
        info!(
            "Registered connection {connection_id} on tenant {tenant_id} ({} total)",
            endpoint.connections.len()
        );

        Ok(connection_id)
    }

    /// Remove a connection from its endpoint.
    ///
    /// Idempotent: removing an id that is already gone is a no-op, which
    /// covers the race between an explicit disconnect and a
    /// heartbeat-timeout eviction.
    pub async fn remove(&self, tenant_id: &str, connection_id: ConnectionId) {
        let mut inner = self.inner.write().await;

        if let Some(endpoint) = inner.endpoints.get_mut(tenant_id)
            && endpoint.connections.remove(&connection_id).is_some()
        {
            info!(
                "Unregistered connection {connection_id} on tenant {tenant_id} ({} remaining)",
                endpoint.connections.len()
            );
        }
    }

    /// Refresh a connection's heartbeat window
    pub async fn touch(&self, tenant_id: &str, connection_id: ConnectionId) {
        let mut inner = self.inner.write().await;

        if let Some(endpoint) = inner.endpoints.get_mut(tenant_id)
            && let Some(info) = endpoint.connections.get_mut(&connection_id)
        {
            info.last_heartbeat_at = Instant::now();
        }
    }

    /// Whether a connection has missed its heartbeat window.
    /// A connection the registry no longer knows counts as expired.
    pub async fn heartbeat_expired(&self, tenant_id: &str, connection_id: ConnectionId) -> bool {
        let inner = self.inner.read().await;

        inner
            .endpoints
            .get(tenant_id)
            .and_then(|endpoint| endpoint.connections.get(&connection_id))
            .is_none_or(|info| self.heartbeat.expired(info.last_heartbeat_at, Instant::now()))
    }

    /// Subscribe a connection to a named channel
    pub async fn subscribe(&self, tenant_id: &str, connection_id: ConnectionId, channel: String) {
        let mut inner = self.inner.write().await;

        if let Some(endpoint) = inner.endpoints.get_mut(tenant_id)
            && let Some(info) = endpoint.connections.get_mut(&connection_id)
            && info.channels.subscribe(channel.clone())
        {
            debug!("Connection {connection_id} on tenant {tenant_id} subscribed to {channel}");
            self.metrics.subscription_changed("subscribe");
        }
    }

    /// Unsubscribe a connection from a named channel
    pub async fn unsubscribe(&self, tenant_id: &str, connection_id: ConnectionId, channel: &str) {
        let mut inner = self.inner.write().await;

        if let Some(endpoint) = inner.endpoints.get_mut(tenant_id)
            && let Some(info) = endpoint.connections.get_mut(&connection_id)
            && info.channels.unsubscribe(channel)
        {
            debug!("Connection {connection_id} on tenant {tenant_id} unsubscribed from {channel}");
            self.metrics.subscription_changed("unsubscribe");
        }
    }

    /// Fan an event out to every live connection of `tenant_id` subscribed
    /// to `channel`.
    ///
    /// Connections whose heartbeat window has lapsed are evicted before the
    /// target set is computed, so a dead connection is never counted.
    /// Returns the number of connections targeted - delivery is not
    /// acknowledged. Fails with `UnknownTenant` when the tenant was never
    /// provisioned; registry state is unchanged in that case.
    pub async fn broadcast(&self, tenant_id: &str, channel: &str, data: &Value) -> Result<usize> {
        let mut inner = self.inner.write().await;

        let endpoint = inner
            .endpoints
            .get_mut(tenant_id)
            .ok_or_else(|| RelayError::unknown_tenant(tenant_id))?;

        let now = Instant::now();
        let expired: Vec<ConnectionId> = endpoint
            .connections
            .values()
            .filter(|info| self.heartbeat.expired(info.last_heartbeat_at, now))
            .map(|info| info.connection_id)
            .collect();

        for connection_id in expired {
            endpoint.connections.remove(&connection_id);
            self.metrics.connection_evicted(tenant_id);
            warn!(
                "Evicted connection {connection_id} on tenant {tenant_id}: no heartbeat within {}ms",
                self.config.ping_timeout_ms
            );
        }

        let frame = EventFrame::new(channel.to_string(), data.clone()).to_message()?;

        let mut targeted = 0;
        for info in endpoint.connections.values() {
            if !info.channels.matches(channel) {
                continue;
            }

            targeted += 1;
            if info.sender.try_send(frame.clone()).is_err() {
                // Slow client; the frame is lost but delivery is unacknowledged by contract
                warn!(
                    "Send buffer full for connection {} on tenant {tenant_id}, dropping frame",
                    info.connection_id
                );
            }
        }

        debug!("Broadcast {channel} to {targeted} connection(s) on tenant {tenant_id}");
        self.metrics.event_dispatched(tenant_id, targeted);

        Ok(targeted)
    }

    /// Number of provisioned tenants
    pub async fn tenant_count(&self) -> usize {
        let inner = self.inner.read().await;
        inner.endpoints.len()
    }

    /// Live connection count for one tenant (zero when unknown)
    pub async fn connection_count(&self, tenant_id: &str) -> usize {
        let inner = self.inner.read().await;
        inner
            .endpoints
            .get(tenant_id)
            .map(|endpoint| endpoint.connections.len())
            .unwrap_or(0)
    }

    /// Live connection count across all tenants
    pub async fn total_connections(&self) -> usize {
        let inner = self.inner.read().await;
        inner
            .endpoints
            .values()
            .map(|endpoint| endpoint.connections.len())
            .sum()
    }

    /// Derived endpoint port of a provisioned tenant
    pub async fn port_of(&self, tenant_id: &str) -> Option<u16> {
        let inner = self.inner.read().await;
        inner.endpoints.get(tenant_id).map(|endpoint| endpoint.port)
    }

    /// Display name of a provisioned tenant
    pub async fn tenant_name(&self, tenant_id: &str) -> Option<String> {
        let inner = self.inner.read().await;
        inner
            .endpoints
            .get(tenant_id)
            .map(|endpoint| endpoint.tenant.name.clone())
    }

    /// All provisioned tenant ids
    pub async fn tenant_ids(&self) -> Vec<String> {
        let inner = self.inner.read().await;
        inner.endpoints.keys().cloned().collect()
    }
}

impl Clone for EndpointRegistry {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            config: self.config.clone(),
            heartbeat: self.heartbeat,
            metrics: self.metrics.clone(),
        }
    }
}
