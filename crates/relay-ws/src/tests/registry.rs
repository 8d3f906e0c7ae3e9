use crate::tests::tenant;
use crate::{EndpointConfig, EndpointRegistry, Metrics, RelayError};

use std::time::Duration;

use axum::extract::ws::Message;
use serde_json::json;
use tokio::sync::mpsc;
use tokio::time::sleep;

fn registry() -> EndpointRegistry {
    EndpointRegistry::new(EndpointConfig::default(), Metrics::new())
}

/// Registry whose heartbeat window lapses quickly, for eviction tests
fn registry_with_short_timeout() -> EndpointRegistry {
    EndpointRegistry::new(
        EndpointConfig {
            send_buffer_size: 8,
            ping_interval_ms: 50,
            ping_timeout_ms: 300,
        },
        Metrics::new(),
    )
}

fn decode(message: Message) -> serde_json::Value {
    let Message::Text(text) = message else {
        panic!("expected a text frame");
    };
    serde_json::from_str(&text).unwrap()
}

// =========================================================================
// Provisioning
// =========================================================================

#[tokio::test]
async fn given_tenant_when_provisioned_then_port_derived_from_hint() {
    let registry = registry();

    let port = registry.provision(tenant("ZONE1", 4210)).await.unwrap();

    assert_eq!(port, 10010);
    assert_eq!(registry.port_of("ZONE1").await, Some(10010));
    assert_eq!(registry.tenant_count().await, 1);
}

#[tokio::test]
async fn given_provisioned_tenant_when_provisioned_again_then_duplicate_error() {
    let registry = registry();
    registry.provision(tenant("ZONE1", 4210)).await.unwrap();

    let result = registry.provision(tenant("ZONE1", 4299)).await;

    assert!(matches!(
        result,
        Err(RelayError::DuplicateTenant { ref tenant_id, .. }) if tenant_id == "ZONE1"
    ));
    assert_eq!(registry.tenant_count().await, 1);
}

#[tokio::test]
async fn given_lowercase_directory_id_when_provisioned_then_lookup_is_uppercase() {
    let registry = registry();

    registry.provision(tenant("zone1", 4210)).await.unwrap();

    assert_eq!(registry.port_of("ZONE1").await, Some(10010));
    assert_eq!(registry.port_of("zone1").await, None);
}

// =========================================================================
// Connections
// =========================================================================

#[tokio::test]
async fn given_unknown_tenant_when_accepting_then_error() {
    let registry = registry();
    let (tx, _rx) = mpsc::channel(8);

    let result = registry.accept("ZONE9", tx).await;

    assert!(matches!(result, Err(RelayError::UnknownTenant { .. })));
}

#[tokio::test]
async fn given_connection_when_removed_twice_then_second_is_noop() {
    let registry = registry();
    registry.provision(tenant("ZONE1", 4210)).await.unwrap();
    let (tx, _rx) = mpsc::channel(8);
    let connection_id = registry.accept("ZONE1", tx).await.unwrap();

    registry.remove("ZONE1", connection_id).await;
    assert_eq!(registry.connection_count("ZONE1").await, 0);

    // Second removal must not error or underflow anything
    registry.remove("ZONE1", connection_id).await;
    assert_eq!(registry.connection_count("ZONE1").await, 0);
}

// =========================================================================
// Broadcast
// =========================================================================

#[tokio::test]
async fn given_unknown_tenant_when_broadcast_then_error_and_state_unchanged() {
    let registry = registry();
    registry.provision(tenant("ZONE1", 4210)).await.unwrap();
    let (tx, mut rx) = mpsc::channel(8);
    registry.accept("ZONE1", tx).await.unwrap();

    let result = registry.broadcast("ZONE9", "lap", &json!([{}])).await;

    assert!(matches!(
        result,
        Err(RelayError::UnknownTenant { ref tenant_id, .. }) if tenant_id == "ZONE9"
    ));
    assert_eq!(registry.tenant_count().await, 1);
    assert_eq!(registry.connection_count("ZONE1").await, 1);
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn given_two_tenants_when_broadcast_then_other_tenant_never_receives() {
    let registry = registry();
    registry.provision(tenant("ZONE1", 4210)).await.unwrap();
    registry.provision(tenant("ZONE2", 4220)).await.unwrap();

    let (tx1, mut rx1) = mpsc::channel(8);
    let (tx2, mut rx2) = mpsc::channel(8);
    registry.accept("ZONE1", tx1).await.unwrap();
    registry.accept("ZONE2", tx2).await.unwrap();

    let targeted = registry
        .broadcast("ZONE1", "lap", &json!([{ "lap": 1 }]))
        .await
        .unwrap();

    assert_eq!(targeted, 1);

    let frame = decode(rx1.try_recv().unwrap());
    assert_eq!(frame["event"], "lap");
    assert_eq!(frame["data"][0]["lap"], 1);

    assert!(rx2.try_recv().is_err());
}

#[tokio::test]
async fn given_unsubscribed_connection_when_any_channel_broadcast_then_targeted() {
    let registry = registry();
    registry.provision(tenant("ZONE1", 4210)).await.unwrap();
    let (tx, mut rx) = mpsc::channel(8);
    registry.accept("ZONE1", tx).await.unwrap();

    registry.broadcast("ZONE1", "lap", &json!([])).await.unwrap();
    registry
        .broadcast("ZONE1", "telemetry", &json!([]))
        .await
        .unwrap();

    assert_eq!(decode(rx.try_recv().unwrap())["event"], "lap");
    assert_eq!(decode(rx.try_recv().unwrap())["event"], "telemetry");
}

#[tokio::test]
async fn given_subscribed_connection_when_other_channel_broadcast_then_filtered() {
    let registry = registry();
    registry.provision(tenant("ZONE1", 4210)).await.unwrap();
    let (tx, mut rx) = mpsc::channel(8);
    let connection_id = registry.accept("ZONE1", tx).await.unwrap();

    registry
        .subscribe("ZONE1", connection_id, "lap".to_string())
        .await;

    let targeted_other = registry
        .broadcast("ZONE1", "telemetry", &json!([]))
        .await
        .unwrap();
    let targeted_lap = registry.broadcast("ZONE1", "lap", &json!([])).await.unwrap();

    assert_eq!(targeted_other, 0);
    assert_eq!(targeted_lap, 1);
    assert_eq!(decode(rx.try_recv().unwrap())["event"], "lap");
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn given_unsubscribe_when_last_channel_removed_then_receive_all_again() {
    let registry = registry();
    registry.provision(tenant("ZONE1", 4210)).await.unwrap();
    let (tx, mut rx) = mpsc::channel(8);
    let connection_id = registry.accept("ZONE1", tx).await.unwrap();

    registry
        .subscribe("ZONE1", connection_id, "lap".to_string())
        .await;
    registry.unsubscribe("ZONE1", connection_id, "lap").await;

    let targeted = registry
        .broadcast("ZONE1", "telemetry", &json!([]))
        .await
        .unwrap();

    assert_eq!(targeted, 1);
    assert_eq!(decode(rx.try_recv().unwrap())["event"], "telemetry");
}

// =========================================================================
// Heartbeat eviction
// =========================================================================

#[tokio::test]
async fn given_lapsed_heartbeat_when_broadcast_then_evicted_before_targeting() {
    let registry = registry_with_short_timeout();
    registry.provision(tenant("ZONE1", 4210)).await.unwrap();
    let (tx, mut rx) = mpsc::channel(8);
    registry.accept("ZONE1", tx).await.unwrap();

    sleep(Duration::from_millis(400)).await;

    let targeted = registry.broadcast("ZONE1", "lap", &json!([])).await.unwrap();

    assert_eq!(targeted, 0);
    assert_eq!(registry.connection_count("ZONE1").await, 0);
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn given_touched_connection_when_broadcast_then_still_targeted() {
    let registry = registry_with_short_timeout();
    registry.provision(tenant("ZONE1", 4210)).await.unwrap();
    let (tx, _rx) = mpsc::channel(8);
    let connection_id = registry.accept("ZONE1", tx).await.unwrap();

    sleep(Duration::from_millis(200)).await;
    registry.touch("ZONE1", connection_id).await;
    sleep(Duration::from_millis(200)).await;

    // 400ms since accept but only 200ms since the last frame
    let targeted = registry.broadcast("ZONE1", "lap", &json!([])).await.unwrap();

    assert_eq!(targeted, 1);
    assert_eq!(registry.connection_count("ZONE1").await, 1);
}

#[tokio::test]
async fn given_missing_connection_when_heartbeat_checked_then_expired() {
    let registry = registry();
    registry.provision(tenant("ZONE1", 4210)).await.unwrap();
    let (tx, _rx) = mpsc::channel(8);
    let connection_id = registry.accept("ZONE1", tx).await.unwrap();

    assert!(!registry.heartbeat_expired("ZONE1", connection_id).await);

    registry.remove("ZONE1", connection_id).await;

    assert!(registry.heartbeat_expired("ZONE1", connection_id).await);
}
