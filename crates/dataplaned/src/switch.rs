//! Dataplane mutation interface.

use async_trait::async_trait;
use cassini_common::AgentResult;

/// Imperative operations the reconciliation engine performs on the switch.
///
/// [`crate::ovs::OvsCtl`] implements this over `ovs-vsctl`; tests substitute
/// a recording implementation.
#[async_trait]
pub trait SwitchController: Send + Sync {
    /// Creates a bridge named after a physical interface.
    async fn create_bridge(&self, name: &str) -> AgentResult<()>;

    /// Deletes a bridge and, with it, every port on it.
    async fn delete_bridge(&self, name: &str) -> AgentResult<()>;

    /// Creates a patch port on `bridge` with a pinned OpenFlow port number.
    /// `peer` of `None` leaves the port unbound.
    async fn create_patch_port(
        &self,
        bridge: &str,
        port: &str,
        port_id: &str,
        peer: Option<&str>,
    ) -> AgentResult<()>;

    /// Points an existing patch port at `peer`, or unbinds it with `None`.
    async fn set_peer(&self, port: &str, peer: Option<&str>) -> AgentResult<()>;

    /// Replaces the VLAN tag on a port.
    async fn set_vlan_tag(&self, port: &str, vlan: &str) -> AgentResult<()>;

    /// Whether a bridge with exactly this name exists.
    async fn bridge_exists(&self, name: &str) -> AgentResult<bool>;
}
