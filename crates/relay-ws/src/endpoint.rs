use crate::{
    ConnectionId, EndpointConfig, EndpointConnection, EndpointRegistry, Metrics, RelayError,
    Result, ShutdownCoordinator, normalize_tenant_id,
};

use relay_directory::Tenant;

use std::panic::Location;

use axum::extract::State;
use axum::extract::ws::{WebSocket, WebSocketUpgrade};
use axum::http::StatusCode;
use axum::response::Response;
use axum::{Router, routing::get};
use error_location::ErrorLocation;
use log::{error, info};
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Shared state of one tenant's endpoint router
#[derive(Clone)]
pub struct EndpointState {
    pub tenant_id: String,
    pub registry: EndpointRegistry,
    pub config: EndpointConfig,
    pub metrics: Metrics,
    pub shutdown: ShutdownCoordinator,
}

/// Build the router served on a tenant's endpoint port
pub fn endpoint_router(state: EndpointState) -> Router {
    Router::new().route("/ws", get(handler)).with_state(state)
}

/// WebSocket upgrade handler
pub async fn handler(
    State(state): State<EndpointState>,
    ws: WebSocketUpgrade,
) -> std::result::Result<Response, StatusCode> {
    // Register before upgrading so broadcasts can reach the connection as
    // soon as the socket opens
    let (tx, rx) = mpsc::channel(state.config.send_buffer_size);
    let connection_id = state
        .registry
        .accept(&state.tenant_id, tx.clone())
        .await
        .map_err(|e| {
            error!("Failed to register connection: {e}");
            StatusCode::SERVICE_UNAVAILABLE
        })?;

    state.metrics.connection_established(&state.tenant_id);

    Ok(ws.on_upgrade(move |socket| handle_socket(socket, connection_id, state, tx, rx)))
}

/// Handle a connection after upgrade: drive it, then unregister
async fn handle_socket(
    socket: WebSocket,
    connection_id: ConnectionId,
    state: EndpointState,
    tx: mpsc::Sender<axum::extract::ws::Message>,
    rx: mpsc::Receiver<axum::extract::ws::Message>,
) {
    let shutdown_guard = state.shutdown.subscribe_guard();

    let connection = EndpointConnection::new(
        connection_id,
        state.tenant_id.clone(),
        state.registry.clone(),
        state.config.clone(),
    );

    let result = connection.handle(socket, shutdown_guard, tx, rx).await;

    // Idempotent against a broadcast-time eviction that got there first
    state.registry.remove(&state.tenant_id, connection_id).await;

    match result {
        Ok(()) => state.metrics.connection_closed(&state.tenant_id, "normal"),
        Err(e) => {
            error!(
                "Connection {connection_id} on tenant {} ended with error: {e}",
                state.tenant_id
            );
            state.metrics.connection_closed(&state.tenant_id, "error");
        }
    }
}

/// A running tenant endpoint
pub struct EndpointHandle {
    pub tenant_id: String,
    pub port: u16,
    task: JoinHandle<()>,
}

impl EndpointHandle {
    /// Abort the endpoint's serve task
    pub fn abort(&self) {
        self.task.abort();
    }
}

/// Provision a tenant in the registry, bind its derived port and start
/// serving the endpoint router.
///
/// Called once per tenant during startup, in directory order; any failure
/// here is fatal to the process.
pub async fn spawn_endpoint(
    tenant: Tenant,
    registry: EndpointRegistry,
    metrics: Metrics,
    shutdown: ShutdownCoordinator,
    bind_host: &str,
) -> Result<EndpointHandle> {
    let port = registry.provision(tenant.clone()).await?;
    let tenant_id = normalize_tenant_id(&tenant.id);

    let state = EndpointState {
        tenant_id: tenant_id.clone(),
        registry: registry.clone(),
        config: registry.config().clone(),
        metrics,
        shutdown: shutdown.clone(),
    };

    let app = endpoint_router(state);

    let listener =
        TcpListener::bind((bind_host, port))
            .await
            .map_err(|source| RelayError::EndpointBind {
                tenant_id: tenant_id.clone(),
                port,
                source,
                location: ErrorLocation::from(Location::caller()),
            })?;

    info!("Endpoint for tenant {tenant_id} listening on {bind_host}:{port}");

    let mut guard = shutdown.subscribe_guard();
    let task_tenant_id = tenant_id.clone();
    let task = tokio::spawn(async move {
        let serve = axum::serve(listener, app).with_graceful_shutdown(async move {
            guard.wait().await;
        });

        if let Err(e) = serve.await {
            error!("Endpoint server for tenant {task_tenant_id} failed: {e}");
        }
    });

    Ok(EndpointHandle {
        tenant_id,
        port,
        task,
    })
}
