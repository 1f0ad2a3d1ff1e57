//! Open vSwitch switch controller.
//!
//! Every dataplane mutation goes out as an `ovs-vsctl` invocation through
//! the shared shell layer. In tests the adapter runs in mock mode, where it
//! captures the built command strings instead of spawning processes.

use crate::commands;
use crate::switch::SwitchController;
use async_trait::async_trait;
use cassini_common::{shell, AgentResult};
use tracing::debug;

#[derive(Default)]
pub struct OvsCtl {
    #[cfg(test)]
    mock_mode: bool,
    #[cfg(test)]
    captured_commands: std::sync::Mutex<Vec<String>>,
}

impl OvsCtl {
    pub fn new() -> Self {
        OvsCtl::default()
    }

    /// Create an adapter that records commands instead of executing them
    #[cfg(test)]
    pub fn mock() -> Self {
        OvsCtl {
            mock_mode: true,
            captured_commands: std::sync::Mutex::new(Vec::new()),
        }
    }

    /// Get the commands captured in mock mode
    #[cfg(test)]
    pub fn captured(&self) -> Vec<String> {
        self.captured_commands.lock().unwrap().clone()
    }

    async fn run(&self, cmd: &str) -> AgentResult<String> {
        #[cfg(test)]
        if self.mock_mode {
            self.captured_commands.lock().unwrap().push(cmd.to_string());
            return Ok(String::new());
        }

        shell::exec_or_throw(cmd).await
    }
}

#[async_trait]
impl SwitchController for OvsCtl {
    async fn create_bridge(&self, name: &str) -> AgentResult<()> {
        debug!("Creating bridge {}", name);
        self.run(&commands::build_add_bridge_cmd(name)).await?;
        Ok(())
    }

    async fn delete_bridge(&self, name: &str) -> AgentResult<()> {
        debug!("Deleting bridge {}", name);
        self.run(&commands::build_del_bridge_cmd(name)).await?;
        Ok(())
    }

    async fn create_patch_port(
        &self,
        bridge: &str,
        port: &str,
        port_id: &str,
        peer: Option<&str>,
    ) -> AgentResult<()> {
        debug!(
            "Creating patch port {} on bridge {} (ofport {})",
            port, bridge, port_id
        );
        self.run(&commands::build_add_port_cmd(bridge, port)).await?;
        self.run(&commands::build_set_patch_type_cmd(port)).await?;
        self.run(&commands::build_set_peer_cmd(port, peer)).await?;
        self.run(&commands::build_set_port_number_cmd(port, port_id))
            .await?;
        Ok(())
    }

    async fn set_peer(&self, port: &str, peer: Option<&str>) -> AgentResult<()> {
        debug!("Setting peer of {} to {}", port, peer.unwrap_or(commands::NO_PEER));
        self.run(&commands::build_set_peer_cmd(port, peer)).await?;
        Ok(())
    }

    async fn set_vlan_tag(&self, port: &str, vlan: &str) -> AgentResult<()> {
        debug!("Setting VLAN tag of {} to {}", port, vlan);
        self.run(&commands::build_set_vlan_tag_cmd(port, vlan))
            .await?;
        Ok(())
    }

    async fn bridge_exists(&self, name: &str) -> AgentResult<bool> {
        let stdout = self.run(&commands::build_list_bridges_cmd()).await?;
        Ok(stdout.lines().any(|line| line.trim() == name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_create_bridge_command() {
        let ovs = OvsCtl::mock();
        ovs.create_bridge("trcv-1").await.unwrap();
        assert_eq!(
            ovs.captured(),
            vec!["/usr/bin/ovs-vsctl add-br \"trcv-1\"".to_string()]
        );
    }

    #[tokio::test]
    async fn test_create_patch_port_command_sequence() {
        let ovs = OvsCtl::mock();
        ovs.create_patch_port("br", "p", "7", None).await.unwrap();
        assert_eq!(
            ovs.captured(),
            vec![
                "/usr/bin/ovs-vsctl add-port \"br\" \"p\"".to_string(),
                "/usr/bin/ovs-vsctl set interface \"p\" type=patch".to_string(),
                "/usr/bin/ovs-vsctl set interface \"p\" options:peer=\"none\"".to_string(),
                "/usr/bin/ovs-vsctl set interface \"p\" ofport_request=\"7\"".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_create_patch_port_with_peer() {
        let ovs = OvsCtl::mock();
        ovs.create_patch_port("trcv-1", "trcv-1/0", "10", Some("trcv-2/0"))
            .await
            .unwrap();
        let captured = ovs.captured();
        assert_eq!(captured.len(), 4);
        assert!(captured[2].contains("options:peer=\"trcv-2/0\""));
    }

    #[tokio::test]
    async fn test_set_peer_and_unbind() {
        let ovs = OvsCtl::mock();
        ovs.set_peer("trcv-1/0", Some("trcv-2/0")).await.unwrap();
        ovs.set_peer("trcv-1/0", None).await.unwrap();
        let captured = ovs.captured();
        assert!(captured[0].ends_with("options:peer=\"trcv-2/0\""));
        assert!(captured[1].ends_with("options:peer=\"none\""));
    }

    #[tokio::test]
    async fn test_set_vlan_tag_command() {
        let ovs = OvsCtl::mock();
        ovs.set_vlan_tag("trcv-2/0", "150").await.unwrap();
        assert_eq!(
            ovs.captured(),
            vec!["/usr/bin/ovs-vsctl set port \"trcv-2/0\" tag=\"150\"".to_string()]
        );
    }

    #[tokio::test]
    async fn test_bridge_exists_issues_list() {
        // Mock mode returns empty stdout, so nothing exists
        let ovs = OvsCtl::mock();
        assert!(!ovs.bridge_exists("trcv-1").await.unwrap());
        assert_eq!(
            ovs.captured(),
            vec!["/usr/bin/ovs-vsctl list-br".to_string()]
        );
    }
}
