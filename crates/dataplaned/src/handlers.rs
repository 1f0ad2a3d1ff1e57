//! Reconciliation handlers for modified configuration.

use crate::events::{AssignmentChange, FrequencyChange};
use crate::freq;
use crate::store::ConfigStore;
use crate::switch::SwitchController;
use crate::topology;
use cassini_common::AgentResult;
use tracing::{info, instrument};

/// Re-tags an optical channel's port after a frequency edit.
///
/// Both the old and the new frequency go through the mapper, the old one
/// only for the log line; a malformed value on either side drops the event
/// before the port is touched.
#[instrument(skip(switch))]
pub async fn handle_frequency<W>(switch: &W, change: &FrequencyChange) -> AgentResult<()>
where
    W: SwitchController,
{
    let old_vlan = freq::vlan_for_frequency(&change.old_frequency)?;
    let new_vlan = freq::vlan_for_frequency(&change.new_frequency)?;

    switch.set_vlan_tag(&change.interface, &new_vlan).await?;

    info!(
        "Optical frequency of {} was modified from {} to {} MHz",
        change.interface, change.old_frequency, change.new_frequency
    );
    info!("VLAN of {} was modified from {} to {}", change.interface, old_vlan, new_vlan);

    Ok(())
}

/// Re-binds patch-port peers after an assignment edit.
///
/// All four channel descriptions are resolved before the dataplane is
/// touched, so an unknown index aborts the whole update with no switch
/// calls. The mutation itself is clear-then-bind: both old ports are
/// unbound first, then the new pair is bound in both directions. Between
/// the two steps the ports are genuinely unbound, and a failure partway
/// through leaves whatever has been applied so far in place.
#[instrument(skip(store, switch))]
pub async fn handle_assignment<S, W>(
    store: &S,
    switch: &W,
    change: &AssignmentChange,
) -> AgentResult<()>
where
    S: ConfigStore,
    W: SwitchController,
{
    let old_source = topology::description(store, &change.old_source).await?;
    let old_destination = topology::description(store, &change.old_destination).await?;
    let new_source = topology::description(store, &change.new_source).await?;
    let new_destination = topology::description(store, &change.new_destination).await?;

    switch.set_peer(&old_source, None).await?;
    switch.set_peer(&old_destination, None).await?;
    switch.set_peer(&new_source, Some(&new_destination)).await?;
    switch.set_peer(&new_destination, Some(&new_source)).await?;

    info!(
        "Logical channel assignment was modified {}<->{} to {}<->{}",
        old_source, old_destination, new_source, new_destination
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory_store::MemoryStore;
    use crate::ovs::OvsCtl;
    use crate::xpath;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_handle_frequency_applies_new_tag() {
        let ovs = OvsCtl::mock();
        let change = FrequencyChange {
            interface: "trcv-2/0".to_string(),
            old_frequency: "190000000".to_string(),
            new_frequency: "191500000".to_string(),
        };

        handle_frequency(&ovs, &change).await.unwrap();
        assert_eq!(
            ovs.captured(),
            vec!["/usr/bin/ovs-vsctl set port \"trcv-2/0\" tag=\"150\"".to_string()]
        );
    }

    #[tokio::test]
    async fn test_handle_frequency_drops_malformed_old_value() {
        let ovs = OvsCtl::mock();
        let change = FrequencyChange {
            interface: "trcv-2/0".to_string(),
            old_frequency: "garbage".to_string(),
            new_frequency: "191500000".to_string(),
        };

        assert!(handle_frequency(&ovs, &change).await.is_err());
        assert!(ovs.captured().is_empty());
    }

    async fn assignment_store() -> MemoryStore {
        let store = MemoryStore::new();
        store.insert(xpath::description_path("10"), "trcv-1/0").await;
        store.insert(xpath::description_path("30"), "trcv-3/0").await;
        store.insert(xpath::description_path("40"), "trcv-4/0").await;
        store
    }

    #[tokio::test]
    async fn test_handle_assignment_clears_then_binds() {
        let store = assignment_store().await;
        let ovs = OvsCtl::mock();
        let change = AssignmentChange {
            old_source: "10".to_string(),
            old_destination: "30".to_string(),
            new_source: "10".to_string(),
            new_destination: "40".to_string(),
        };

        handle_assignment(&store, &ovs, &change).await.unwrap();
        assert_eq!(
            ovs.captured(),
            vec![
                "/usr/bin/ovs-vsctl set interface \"trcv-1/0\" options:peer=\"none\"".to_string(),
                "/usr/bin/ovs-vsctl set interface \"trcv-3/0\" options:peer=\"none\"".to_string(),
                "/usr/bin/ovs-vsctl set interface \"trcv-1/0\" options:peer=\"trcv-4/0\""
                    .to_string(),
                "/usr/bin/ovs-vsctl set interface \"trcv-4/0\" options:peer=\"trcv-1/0\""
                    .to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_handle_assignment_unknown_index_makes_no_switch_calls() {
        let store = assignment_store().await;
        let ovs = OvsCtl::mock();
        let change = AssignmentChange {
            old_source: "10".to_string(),
            old_destination: "30".to_string(),
            new_source: "10".to_string(),
            new_destination: "99".to_string(),
        };

        let err = handle_assignment(&store, &ovs, &change).await.unwrap_err();
        assert!(err.to_string().contains("'99'"));
        assert!(ovs.captured().is_empty());
    }
}
