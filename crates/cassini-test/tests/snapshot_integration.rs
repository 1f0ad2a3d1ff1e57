//! Snapshot materialization and teardown integration tests
//!
//! Drives the snapshot builder against a seeded in-memory store and a
//! state-tracking mock switch.

use cassini_dataplaned::snapshot;
use cassini_test::{topologies, MockSwitch, SwitchOp, TopologyFixture};
use pretty_assertions::assert_eq;

/// Test full materialization of the two-transceiver topology
///
/// Scenario:
/// 1. Physical interfaces trcv-1 and trcv-2 become bridges
/// 2. Client channel 10 becomes port trcv-1/0 on bridge trcv-1, unbound
/// 3. Optical channel 20 becomes port trcv-2/0 on bridge trcv-2, tagged
///    with the VLAN of its configured frequency
#[tokio::test]
async fn test_materialize_builds_topology() {
    let store = topologies::transceiver_pair().build();
    let switch = MockSwitch::new();

    snapshot::materialize(&store, &switch).await.unwrap();

    let bridges: Vec<String> = switch.bridges().await.into_iter().collect();
    assert_eq!(bridges, vec!["trcv-1".to_string(), "trcv-2".to_string()]);

    let client = switch.port("trcv-1/0").await.unwrap();
    assert_eq!(client.bridge, "trcv-1");
    assert_eq!(client.port_id, "10");
    assert_eq!(client.peer, None);
    assert_eq!(client.tag, None);

    let carrier = switch.port("trcv-2/0").await.unwrap();
    assert_eq!(carrier.bridge, "trcv-2");
    assert_eq!(carrier.port_id, "20");
    assert_eq!(carrier.tag.as_deref(), Some("0"));
}

/// Test assignment binding during materialization
///
/// Scenario:
/// 1. Channel 10 is assigned to channel 30 in the store
/// 2. After materialization both directions of the binding hold at once
/// 3. The unassigned channel 40 stays unbound
#[tokio::test]
async fn test_materialize_binds_assignment_bidirectionally() {
    let store = topologies::assigned_quad().build();
    let switch = MockSwitch::new();

    snapshot::materialize(&store, &switch).await.unwrap();

    assert_eq!(
        switch.port("trcv-1/0").await.unwrap().peer.as_deref(),
        Some("trcv-3/0")
    );
    assert_eq!(
        switch.port("trcv-3/0").await.unwrap().peer.as_deref(),
        Some("trcv-1/0")
    );
    assert_eq!(switch.port("trcv-4/0").await.unwrap().peer, None);
}

/// Test materialization ordering
///
/// Scenario:
/// 1. No port is created before its own bridge
/// 2. No peer binding happens before the last port creation
#[tokio::test]
async fn test_materialize_ordering() {
    let store = topologies::assigned_quad().build();
    let switch = MockSwitch::new();

    snapshot::materialize(&store, &switch).await.unwrap();

    let calls = switch.calls().await;
    for (at, call) in calls.iter().enumerate() {
        if let SwitchOp::CreatePatchPort { bridge, port, .. } = call {
            let bridge_created = calls[..at]
                .iter()
                .any(|c| matches!(c, SwitchOp::CreateBridge(name) if name == bridge));
            assert!(bridge_created, "port {} created before bridge {}", port, bridge);
        }
    }

    let last_port = calls
        .iter()
        .rposition(|c| matches!(c, SwitchOp::CreatePatchPort { .. }))
        .unwrap();
    let first_bind = calls
        .iter()
        .position(|c| matches!(c, SwitchOp::SetPeer { .. }))
        .unwrap();
    assert!(
        last_port < first_bind,
        "binding started before all ports existed"
    );
}

/// Test a client channel without a transceiver reference
///
/// Scenario:
/// 1. Channel 10 carries no transceiver leaf and cannot be enabled
/// 2. Channel 20 is still enabled and tagged
#[tokio::test]
async fn test_missing_transceiver_reference_skips_channel() {
    let store = TopologyFixture::new()
        .with_interface("trcv-1")
        .with_interface("trcv-2")
        .with_bare_channel("10", "trcv-1/0", "LOGICAL_CHANNEL")
        .with_optical_channel("20", "trcv-2/0")
        .with_frequency("trcv-2/0", "191500000")
        .build();
    let switch = MockSwitch::new();

    snapshot::materialize(&store, &switch).await.unwrap();

    assert!(switch.port("trcv-1/0").await.is_none());
    assert_eq!(
        switch.port("trcv-2/0").await.unwrap().tag.as_deref(),
        Some("150")
    );
}

/// Test a transceiver reference with no matching bridge
#[tokio::test]
async fn test_unknown_transceiver_bridge_skips_channel() {
    let store = TopologyFixture::new()
        .with_interface("trcv-2")
        .with_logical_channel("10", "trcv-1/0", "trcv-9")
        .with_optical_channel("20", "trcv-2/0")
        .build();
    let switch = MockSwitch::new();

    snapshot::materialize(&store, &switch).await.unwrap();

    assert!(switch.port("trcv-1/0").await.is_none());
    assert!(switch.port("trcv-2/0").await.is_some());
}

/// Test a channel with an unrecognized assignment type
#[tokio::test]
async fn test_unknown_assignment_type_skips_channel() {
    let store = topologies::transceiver_pair()
        .with_bare_channel("50", "trcv-1/1", "PHYSICAL")
        .build();
    let switch = MockSwitch::new();

    snapshot::materialize(&store, &switch).await.unwrap();

    assert!(switch.port("trcv-1/1").await.is_none());
    assert!(switch.port("trcv-1/0").await.is_some());
    assert!(switch.port("trcv-2/0").await.is_some());
}

/// Test that one failing channel does not stop the pass
///
/// Scenario:
/// 1. Creating channel 10's port fails at the switch
/// 2. Channel 20 is still enabled and tagged
#[tokio::test]
async fn test_channel_failure_does_not_stop_the_pass() {
    let store = topologies::transceiver_pair().build();
    let switch = MockSwitch::new();
    switch.fail_on("create_patch_port trcv-1/0").await;

    snapshot::materialize(&store, &switch).await.unwrap();

    assert!(switch.port("trcv-1/0").await.is_none());
    assert_eq!(
        switch.port("trcv-2/0").await.unwrap().tag.as_deref(),
        Some("0")
    );
}

/// Test that one failing bridge does not stop the pass
///
/// Scenario:
/// 1. Creating bridge trcv-1 fails at the switch
/// 2. Bridge trcv-2 and its channel are still built
/// 3. Channel 10, which needs the missing bridge, is skipped
#[tokio::test]
async fn test_bridge_failure_does_not_stop_the_pass() {
    let store = topologies::transceiver_pair().build();
    let switch = MockSwitch::new();
    switch.fail_on("create_bridge trcv-1").await;

    snapshot::materialize(&store, &switch).await.unwrap();

    let bridges: Vec<String> = switch.bridges().await.into_iter().collect();
    assert_eq!(bridges, vec!["trcv-2".to_string()]);
    assert!(switch.port("trcv-1/0").await.is_none());
    assert!(switch.port("trcv-2/0").await.is_some());
}

/// Test rematerialization after teardown
///
/// Scenario:
/// 1. Materialize, then tear everything down
/// 2. Materialize again from the unchanged store
/// 3. The rebuilt bridge/port/tag/peer state matches the first run exactly
#[tokio::test]
async fn test_rematerialization_after_teardown_is_identical() {
    let store = topologies::assigned_quad().build();
    let switch = MockSwitch::new();

    snapshot::materialize(&store, &switch).await.unwrap();
    let bridges_once = switch.bridges().await;
    let ports_once = switch.ports().await;

    snapshot::teardown(&store, &switch).await.unwrap();
    assert!(switch.bridges().await.is_empty());
    assert!(switch.ports().await.is_empty());

    snapshot::materialize(&store, &switch).await.unwrap();
    assert_eq!(switch.bridges().await, bridges_once);
    assert_eq!(switch.ports().await, ports_once);
}

/// Test teardown failure isolation and port cascade
///
/// Scenario:
/// 1. Deleting bridge trcv-1 fails
/// 2. Bridge trcv-2 is still deleted, taking its port with it
#[tokio::test]
async fn test_teardown_continues_after_failure() {
    let store = topologies::transceiver_pair().build();
    let switch = MockSwitch::new();

    snapshot::materialize(&store, &switch).await.unwrap();
    switch.fail_on("delete_bridge trcv-1").await;

    snapshot::teardown(&store, &switch).await.unwrap();

    let bridges: Vec<String> = switch.bridges().await.into_iter().collect();
    assert_eq!(bridges, vec!["trcv-1".to_string()]);
    assert!(switch.port("trcv-1/0").await.is_some());
    assert!(switch.port("trcv-2/0").await.is_none());
}
