pub mod channel_subscriptions;
pub mod connection;
pub mod connection_id;
pub mod connection_info;
pub mod endpoint;
pub mod endpoint_config;
pub mod error;
pub mod frame;
pub mod heartbeat;
pub mod metrics;
pub mod registry;
pub mod shutdown;

pub use channel_subscriptions::ChannelSubscriptions;
pub use connection::EndpointConnection;
pub use connection_id::ConnectionId;
pub use connection_info::ConnectionInfo;
pub use endpoint::{EndpointHandle, EndpointState, endpoint_router, handler, spawn_endpoint};
pub use endpoint_config::EndpointConfig;
pub use error::{RelayError, Result};
pub use frame::{ClientMessage, EventFrame};
pub use heartbeat::HeartbeatMonitor;
pub use metrics::Metrics;
pub use registry::{EndpointRegistry, derive_endpoint_port, normalize_tenant_id};
pub use shutdown::{ShutdownCoordinator, ShutdownGuard};

#[cfg(test)]
mod tests;
