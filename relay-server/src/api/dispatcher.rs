use relay_ws::{EndpointRegistry, Metrics};

use log::{debug, warn};
use serde_json::Value;
use tokio::sync::mpsc;

/// A routed posting waiting for fan-out
#[derive(Debug)]
pub struct Posting {
    pub tenant_id: String,
    pub channel: String,
    pub body: Value,
}

/// Spawn the single dispatcher task and return its queue.
///
/// Intake handlers enqueue postings and answer the publisher immediately;
/// this task drains the queue in arrival order, so broadcasts for the same
/// tenant and channel keep the order intake received them. Routing
/// failures are logged with tenant/channel context and never escape the
/// task.
pub fn spawn_dispatcher(
    registry: EndpointRegistry,
    metrics: Metrics,
) -> mpsc::UnboundedSender<Posting> {
    let (tx, mut rx) = mpsc::unbounded_channel::<Posting>();

    tokio::spawn(async move {
        while let Some(posting) = rx.recv().await {
            match registry
                .broadcast(&posting.tenant_id, &posting.channel, &posting.body)
                .await
            {
                Ok(targeted) => {
                    debug!(
                        "Dispatched {} to {targeted} connection(s) on tenant {}",
                        posting.channel, posting.tenant_id
                    );
                }
                Err(e) => {
                    warn!("Dropped {} posting: {e}", posting.channel);
                    metrics.event_dropped("unknown_tenant");
                }
            }
        }
    });

    tx
}
