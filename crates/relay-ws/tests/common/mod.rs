#![allow(dead_code)]

use relay_directory::Tenant;
use relay_ws::{
    EndpointConfig, EndpointRegistry, EndpointState, Metrics, ShutdownCoordinator, endpoint_router,
};

use axum_test::TestServer;

/// Endpoint config with a heartbeat window short enough for tests.
///
/// The ping interval is kept long so server pings never interleave with
/// frame assertions; the timeout window is still enforced through
/// broadcast-time pruning.
pub fn test_config() -> EndpointConfig {
    EndpointConfig {
        send_buffer_size: 16,
        ping_interval_ms: 5000,
        ping_timeout_ms: 300,
    }
}

pub fn create_registry(config: EndpointConfig) -> EndpointRegistry {
    EndpointRegistry::new(config, Metrics::new())
}

/// Provision a tenant on the shared registry and serve its endpoint router
/// through an in-process test server
pub async fn create_endpoint(
    registry: &EndpointRegistry,
    tenant_id: &str,
    proxyport: u16,
    shutdown: &ShutdownCoordinator,
) -> TestServer {
    registry
        .provision(Tenant {
            id: tenant_id.to_string(),
            name: format!("{tenant_id} test zone"),
            proxyport,
        })
        .await
        .expect("Failed to provision tenant");

    let state = EndpointState {
        tenant_id: tenant_id.to_uppercase(),
        registry: registry.clone(),
        config: registry.config().clone(),
        metrics: Metrics::new(),
        shutdown: shutdown.clone(),
    };

    TestServer::builder()
        .http_transport()
        .build(endpoint_router(state))
        .expect("Failed to create test server")
}
