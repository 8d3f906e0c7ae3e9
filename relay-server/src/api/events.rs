use crate::api::dispatcher::Posting;

use relay_ws::{EndpointRegistry, Metrics, RelayError, normalize_tenant_id};

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use log::{error, warn};
use serde_json::Value;
use tokio::sync::mpsc;

/// Fixed location of the tenant identifier within the first posted record
const DEMOZONE_POINTER: &str = "/payload/data/data_demozone";

/// Shared state for the event intake handlers
#[derive(Clone)]
pub struct IntakeState {
    pub registry: EndpointRegistry,
    pub metrics: Metrics,
    pub dispatcher: mpsc::UnboundedSender<Posting>,
}

/// POST /event/{eventname}
///
/// Acknowledges with 204 No Content as soon as the body structurally
/// parses; dispatch is fire-and-forget and its outcome never reaches the
/// publisher. A posting that cannot be routed (missing tenant field,
/// unknown tenant) is logged and dropped without affecting anything else.
pub async fn post_event(
    State(state): State<IntakeState>,
    Path(eventname): Path<String>,
    Json(body): Json<Value>,
) -> StatusCode {
    match extract_demozone(&body) {
        Ok(tenant_id) => {
            let posting = Posting {
                tenant_id,
                channel: eventname,
                body,
            };
            if state.dispatcher.send(posting).is_err() {
                error!("Dispatcher queue is gone, dropping posting");
            }
        }
        Err(e) => {
            warn!("Dropped posting for channel {eventname}: {e}");
            state.metrics.event_dropped("missing_tenant_field");
        }
    }

    StatusCode::NO_CONTENT
}

/// Pull the tenant identifier from the first record of a posting,
/// normalized to the registry's canonical upper case.
///
/// The body must be a non-empty array whose first record carries a string
/// at `payload.data.data_demozone`; anything else is `MissingTenantField`.
fn extract_demozone(body: &Value) -> relay_ws::Result<String> {
    body.as_array()
        .and_then(|records| records.first())
        .and_then(|record| record.pointer(DEMOZONE_POINTER))
        .and_then(Value::as_str)
        .map(normalize_tenant_id)
        .ok_or_else(|| RelayError::missing_tenant_field())
}
