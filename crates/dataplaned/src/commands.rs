//! Shell command builders for Open vSwitch operations

use cassini_common::shell::{shellquote, OVS_VSCTL_CMD};

/// Peer value of an unbound patch port
pub const NO_PEER: &str = "none";

/// Build add bridge command
pub fn build_add_bridge_cmd(name: &str) -> String {
    format!("{} add-br {}", OVS_VSCTL_CMD, shellquote(name))
}

/// Build delete bridge command
pub fn build_del_bridge_cmd(name: &str) -> String {
    format!("{} del-br {}", OVS_VSCTL_CMD, shellquote(name))
}

/// Build list bridges command
pub fn build_list_bridges_cmd() -> String {
    format!("{} list-br", OVS_VSCTL_CMD)
}

/// Build add port command
pub fn build_add_port_cmd(bridge: &str, port: &str) -> String {
    format!(
        "{} add-port {} {}",
        OVS_VSCTL_CMD,
        shellquote(bridge),
        shellquote(port)
    )
}

/// Build set patch type command
///
/// Turns an existing port into a patch port.
pub fn build_set_patch_type_cmd(port: &str) -> String {
    format!("{} set interface {} type=patch", OVS_VSCTL_CMD, shellquote(port))
}

/// Build set peer command
///
/// `None` writes the reserved peer value that leaves the port unbound.
pub fn build_set_peer_cmd(port: &str, peer: Option<&str>) -> String {
    format!(
        "{} set interface {} options:peer={}",
        OVS_VSCTL_CMD,
        shellquote(port),
        shellquote(peer.unwrap_or(NO_PEER))
    )
}

/// Build set OpenFlow port number command
pub fn build_set_port_number_cmd(port: &str, port_id: &str) -> String {
    format!(
        "{} set interface {} ofport_request={}",
        OVS_VSCTL_CMD,
        shellquote(port),
        shellquote(port_id)
    )
}

/// Build set VLAN tag command
pub fn build_set_vlan_tag_cmd(port: &str, vlan: &str) -> String {
    format!(
        "{} set port {} tag={}",
        OVS_VSCTL_CMD,
        shellquote(port),
        shellquote(vlan)
    )
}
