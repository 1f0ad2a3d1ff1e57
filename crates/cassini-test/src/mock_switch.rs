//! State-tracking switch controller for integration tests

use async_trait::async_trait;
use cassini_common::{AgentError, AgentResult};
use cassini_dataplaned::SwitchController;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use tokio::sync::Mutex;

/// One recorded controller call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SwitchOp {
    CreateBridge(String),
    DeleteBridge(String),
    CreatePatchPort {
        bridge: String,
        port: String,
        port_id: String,
        peer: Option<String>,
    },
    SetPeer {
        port: String,
        peer: Option<String>,
    },
    SetVlanTag {
        port: String,
        vlan: String,
    },
    BridgeExists(String),
}

impl SwitchOp {
    /// Whether the call mutates dataplane state.
    pub fn is_mutation(&self) -> bool {
        !matches!(self, SwitchOp::BridgeExists(_))
    }
}

/// Live state of one mock port.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortState {
    pub bridge: String,
    pub port_id: String,
    pub peer: Option<String>,
    pub tag: Option<String>,
}

#[derive(Debug, Default)]
struct SwitchState {
    bridges: BTreeSet<String>,
    ports: BTreeMap<String, PortState>,
    calls: Vec<SwitchOp>,
    failures: HashSet<String>,
}

impl SwitchState {
    fn check_scripted(&self, key: String) -> AgentResult<()> {
        if self.failures.contains(&key) {
            return Err(AgentError::CommandFailed {
                command: key,
                exit_code: 1,
                output: "scripted failure".to_string(),
            });
        }
        Ok(())
    }

    fn port_mut(&mut self, port: &str) -> AgentResult<&mut PortState> {
        self.ports.get_mut(port).ok_or_else(|| AgentError::CommandFailed {
            command: format!("set {}", port),
            exit_code: 1,
            output: format!("no port named {}", port),
        })
    }
}

/// In-memory [`SwitchController`] that keeps the bridge/port tables a real
/// switch would, records every call in order, and enforces that a port can
/// only be created on an existing bridge. Individual calls can be scripted
/// to fail.
#[derive(Debug, Default)]
pub struct MockSwitch {
    state: Mutex<SwitchState>,
}

impl MockSwitch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script one call to fail. Keys are `"<operation> <target>"`:
    /// `create_bridge`, `delete_bridge`, `create_patch_port`, `set_peer` and
    /// `set_vlan_tag` keyed by bridge or port name.
    pub async fn fail_on(&self, key: impl Into<String>) {
        self.state.lock().await.failures.insert(key.into());
    }

    /// Bridges currently present.
    pub async fn bridges(&self) -> BTreeSet<String> {
        self.state.lock().await.bridges.clone()
    }

    /// Current state of one port, if present.
    pub async fn port(&self, name: &str) -> Option<PortState> {
        self.state.lock().await.ports.get(name).cloned()
    }

    /// All ports currently present.
    pub async fn ports(&self) -> BTreeMap<String, PortState> {
        self.state.lock().await.ports.clone()
    }

    /// Every call made so far, in order, existence queries included.
    pub async fn calls(&self) -> Vec<SwitchOp> {
        self.state.lock().await.calls.clone()
    }

    /// Forget recorded calls; dataplane state stays.
    pub async fn clear_calls(&self) {
        self.state.lock().await.calls.clear();
    }
}

#[async_trait]
impl SwitchController for MockSwitch {
    async fn create_bridge(&self, name: &str) -> AgentResult<()> {
        let mut state = self.state.lock().await;
        state.calls.push(SwitchOp::CreateBridge(name.to_string()));
        state.check_scripted(format!("create_bridge {}", name))?;

        if !state.bridges.insert(name.to_string()) {
            return Err(AgentError::CommandFailed {
                command: format!("add-br {}", name),
                exit_code: 1,
                output: format!("bridge {} already exists", name),
            });
        }
        Ok(())
    }

    async fn delete_bridge(&self, name: &str) -> AgentResult<()> {
        let mut state = self.state.lock().await;
        state.calls.push(SwitchOp::DeleteBridge(name.to_string()));
        state.check_scripted(format!("delete_bridge {}", name))?;

        if !state.bridges.remove(name) {
            return Err(AgentError::CommandFailed {
                command: format!("del-br {}", name),
                exit_code: 1,
                output: format!("no bridge named {}", name),
            });
        }
        // Deleting a bridge takes its ports with it
        state.ports.retain(|_, port| port.bridge != name);
        Ok(())
    }

    async fn create_patch_port(
        &self,
        bridge: &str,
        port: &str,
        port_id: &str,
        peer: Option<&str>,
    ) -> AgentResult<()> {
        let mut state = self.state.lock().await;
        state.calls.push(SwitchOp::CreatePatchPort {
            bridge: bridge.to_string(),
            port: port.to_string(),
            port_id: port_id.to_string(),
            peer: peer.map(str::to_string),
        });
        state.check_scripted(format!("create_patch_port {}", port))?;

        if !state.bridges.contains(bridge) {
            return Err(AgentError::CommandFailed {
                command: format!("add-port {} {}", bridge, port),
                exit_code: 1,
                output: format!("no bridge named {}", bridge),
            });
        }
        if state.ports.contains_key(port) {
            return Err(AgentError::CommandFailed {
                command: format!("add-port {} {}", bridge, port),
                exit_code: 1,
                output: format!("port {} already exists", port),
            });
        }

        state.ports.insert(
            port.to_string(),
            PortState {
                bridge: bridge.to_string(),
                port_id: port_id.to_string(),
                peer: peer.map(str::to_string),
                tag: None,
            },
        );
        Ok(())
    }

    async fn set_peer(&self, port: &str, peer: Option<&str>) -> AgentResult<()> {
        let mut state = self.state.lock().await;
        state.calls.push(SwitchOp::SetPeer {
            port: port.to_string(),
            peer: peer.map(str::to_string),
        });
        state.check_scripted(format!("set_peer {}", port))?;

        state.port_mut(port)?.peer = peer.map(str::to_string);
        Ok(())
    }

    async fn set_vlan_tag(&self, port: &str, vlan: &str) -> AgentResult<()> {
        let mut state = self.state.lock().await;
        state.calls.push(SwitchOp::SetVlanTag {
            port: port.to_string(),
            vlan: vlan.to_string(),
        });
        state.check_scripted(format!("set_vlan_tag {}", port))?;

        state.port_mut(port)?.tag = Some(vlan.to_string());
        Ok(())
    }

    async fn bridge_exists(&self, name: &str) -> AgentResult<bool> {
        let mut state = self.state.lock().await;
        state.calls.push(SwitchOp::BridgeExists(name.to_string()));
        Ok(state.bridges.contains(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_port_requires_bridge() {
        let switch = MockSwitch::new();
        assert!(switch
            .create_patch_port("missing", "p", "1", None)
            .await
            .is_err());

        switch.create_bridge("br").await.unwrap();
        switch.create_patch_port("br", "p", "1", None).await.unwrap();
        assert_eq!(switch.port("p").await.unwrap().bridge, "br");
    }

    #[tokio::test]
    async fn test_delete_bridge_cascades() {
        let switch = MockSwitch::new();
        switch.create_bridge("br").await.unwrap();
        switch.create_patch_port("br", "p", "1", None).await.unwrap();

        switch.delete_bridge("br").await.unwrap();
        assert!(switch.bridges().await.is_empty());
        assert!(switch.port("p").await.is_none());
    }

    #[tokio::test]
    async fn test_scripted_failure() {
        let switch = MockSwitch::new();
        switch.fail_on("create_bridge br").await;

        assert!(switch.create_bridge("br").await.is_err());
        assert!(switch.bridges().await.is_empty());
        // The failed call is still recorded
        assert_eq!(
            switch.calls().await,
            vec![SwitchOp::CreateBridge("br".to_string())]
        );
    }

    #[tokio::test]
    async fn test_tag_replacement() {
        let switch = MockSwitch::new();
        switch.create_bridge("br").await.unwrap();
        switch.create_patch_port("br", "p", "1", None).await.unwrap();

        switch.set_vlan_tag("p", "100").await.unwrap();
        switch.set_vlan_tag("p", "150").await.unwrap();
        assert_eq!(switch.port("p").await.unwrap().tag.as_deref(), Some("150"));
    }
}
