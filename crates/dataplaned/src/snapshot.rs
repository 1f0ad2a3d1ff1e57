//! Full-topology materialization and teardown.
//!
//! At startup the agent builds the whole dataplane from the store in strict
//! dependency order: bridges first, then ports (pass over every channel),
//! then peer bindings (a second pass over the same channels, so either end
//! of a binding already has its port). Failures are contained to the
//! interface or channel that raised them; the rest of the pass continues.

use crate::freq;
use crate::store::ConfigStore;
use crate::switch::SwitchController;
use crate::topology::{self, AssignmentType};
use cassini_common::{AgentError, AgentResult};
use tracing::{debug, error, info, instrument};

/// Builds every bridge, port, tag and binding the store describes.
///
/// Enumeration failures propagate; per-interface and per-channel failures
/// are logged and skipped.
#[instrument(skip_all)]
pub async fn materialize<S, W>(store: &S, switch: &W) -> AgentResult<()>
where
    S: ConfigStore,
    W: SwitchController,
{
    info!("Materializing topology snapshot");

    for interface in topology::physical_interfaces(store).await? {
        match switch.create_bridge(&interface).await {
            Ok(()) => info!("Created bridge {}", interface),
            Err(e) => error!("Cannot create bridge {}: {}", interface, e),
        }
    }

    let indices = topology::channel_indices(store).await?;

    for index in &indices {
        if let Err(e) = enable_channel(store, switch, index).await {
            error!("Cannot enable channel {}: {}", index, e);
        }
    }

    // Ports for every channel exist by now, so both ends of any
    // assignment can be bound.
    for index in &indices {
        if let Err(e) = enable_assignment(store, switch, index).await {
            error!("Cannot enable assignment of channel {}: {}", index, e);
        }
    }

    Ok(())
}

/// Creates the patch port of one channel, and its VLAN tag when the channel
/// is an optical carrier.
#[instrument(skip(store, switch))]
async fn enable_channel<S, W>(store: &S, switch: &W, index: &str) -> AgentResult<()>
where
    S: ConfigStore,
    W: SwitchController,
{
    let description = topology::description(store, index).await?;

    match topology::assignment_type(store, index).await? {
        AssignmentType::LogicalChannel => {
            let bridge = topology::transceiver(store, index)
                .await?
                .ok_or_else(|| AgentError::not_found("channel transceiver", index))?;
            create_port_on(switch, &bridge, &description, index).await?;
        }
        AssignmentType::OpticalChannel => {
            let bridge = topology::owning_interface(&description).to_string();
            create_port_on(switch, &bridge, &description, index).await?;

            let frequency = topology::frequency(store, &description)
                .await?
                .unwrap_or_else(|| "0".to_string());
            let vlan = freq::vlan_for_frequency(&frequency)?;
            switch.set_vlan_tag(&description, &vlan).await?;
            info!("Tagged port {} with VLAN {} ({} MHz)", description, vlan, frequency);
        }
    }

    Ok(())
}

async fn create_port_on<W>(
    switch: &W,
    bridge: &str,
    port: &str,
    port_id: &str,
) -> AgentResult<()>
where
    W: SwitchController,
{
    if !switch.bridge_exists(bridge).await? {
        return Err(AgentError::not_found("bridge", bridge));
    }
    switch.create_patch_port(bridge, port, port_id, None).await?;
    info!("Created port {} on bridge {}", port, bridge);
    Ok(())
}

/// Binds one channel to its assigned peer, both directions.
#[instrument(skip(store, switch))]
async fn enable_assignment<S, W>(store: &S, switch: &W, index: &str) -> AgentResult<()>
where
    S: ConfigStore,
    W: SwitchController,
{
    if topology::assignment_type(store, index).await? != AssignmentType::LogicalChannel {
        debug!("There is no assignment to configure for channel {}", index);
        return Ok(());
    }

    let peer_index = match topology::assignment_peer(store, index).await? {
        Some(peer) => peer,
        None => {
            debug!("There is no assignment to configure for channel {}", index);
            return Ok(());
        }
    };

    let description = topology::description(store, index).await?;
    let peer_description = topology::description(store, &peer_index).await?;

    switch.set_peer(&description, Some(&peer_description)).await?;
    switch.set_peer(&peer_description, Some(&description)).await?;
    info!("Bound channels {} <-> {}", description, peer_description);

    Ok(())
}

/// Deletes every bridge the store describes. Ports go with their bridge,
/// so nothing is unbound or untagged individually.
#[instrument(skip_all)]
pub async fn teardown<S, W>(store: &S, switch: &W) -> AgentResult<()>
where
    S: ConfigStore,
    W: SwitchController,
{
    info!("Tearing down dataplane bridges");

    for interface in topology::physical_interfaces(store).await? {
        match switch.delete_bridge(&interface).await {
            Ok(()) => info!("Deleted bridge {}", interface),
            Err(e) => error!("Cannot delete bridge {}: {}", interface, e),
        }
    }

    Ok(())
}
