//! Read-only accessors over the modeled topology.
//!
//! Thin queries against a [`ConfigStore`], one per leaf the engine acts on.
//! Values come back decoded; absence is `None` where the model allows it and
//! a `NotFound` error where the engine cannot proceed without the leaf.

use crate::store::ConfigStore;
use crate::xpath::{self, leaf};
use cassini_common::{AgentError, AgentResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How a logical channel maps onto the dataplane
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssignmentType {
    /// Client-side channel, patched into its transceiver's bridge
    LogicalChannel,
    /// Line-side channel, carrying a frequency encoded as a VLAN tag
    OpticalChannel,
}

impl AssignmentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssignmentType::LogicalChannel => "LOGICAL_CHANNEL",
            AssignmentType::OpticalChannel => "OPTICAL_CHANNEL",
        }
    }
}

impl fmt::Display for AssignmentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AssignmentType {
    type Err = AgentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "LOGICAL_CHANNEL" => Ok(AssignmentType::LogicalChannel),
            "OPTICAL_CHANNEL" => Ok(AssignmentType::OpticalChannel),
            other => Err(AgentError::parse(other, "unknown assignment type")),
        }
    }
}

/// The physical interface owning a channel, taken from the channel's
/// description (`trcv-1/0` belongs to `trcv-1`).
pub fn owning_interface(description: &str) -> &str {
    description.split('/').next().unwrap_or(description)
}

/// List the names of all physical interfaces.
///
/// Components are physical when their name has no channel suffix; a name
/// with a `/` belongs to a channel of some interface, not to the interface
/// itself.
pub async fn physical_interfaces<S: ConfigStore>(store: &S) -> AgentResult<Vec<String>> {
    let mut interfaces = Vec::new();
    for encoded in store.get_many(&xpath::component_names_query()).await? {
        let name = xpath::leaf_value(&encoded, leaf::NAME)?;
        if !name.contains('/') {
            interfaces.push(name.to_string());
        }
    }
    Ok(interfaces)
}

/// List the indices of all logical channels.
pub async fn channel_indices<S: ConfigStore>(store: &S) -> AgentResult<Vec<String>> {
    let mut indices = Vec::new();
    for encoded in store.get_many(&xpath::channel_indices_query()).await? {
        indices.push(xpath::leaf_value(&encoded, leaf::INDEX)?.to_string());
    }
    Ok(indices)
}

/// Get a channel's description, which doubles as its dataplane port name.
pub async fn description<S: ConfigStore>(store: &S, index: &str) -> AgentResult<String> {
    match store.get(&xpath::description_path(index)).await? {
        Some(encoded) => Ok(xpath::leaf_value(&encoded, leaf::DESCRIPTION)?.to_string()),
        None => Err(AgentError::not_found("channel", index)),
    }
}

/// Get a channel's assignment type.
pub async fn assignment_type<S: ConfigStore>(
    store: &S,
    index: &str,
) -> AgentResult<AssignmentType> {
    match store.get(&xpath::assignment_type_path(index)).await? {
        Some(encoded) => xpath::leaf_value(&encoded, leaf::ASSIGNMENT_TYPE)?.parse(),
        None => Err(AgentError::not_found("channel assignment", index)),
    }
}

/// Get the transceiver a channel ingests from, when one is configured.
pub async fn transceiver<S: ConfigStore>(store: &S, index: &str) -> AgentResult<Option<String>> {
    match store.get(&xpath::transceiver_path(index)).await? {
        Some(encoded) => Ok(Some(
            xpath::leaf_value(&encoded, leaf::TRANSCEIVER)?.to_string(),
        )),
        None => Ok(None),
    }
}

/// Get the channel a channel is assigned to.
///
/// The reserved index `0` means unassigned and comes back as `None`, same
/// as an absent leaf.
pub async fn assignment_peer<S: ConfigStore>(
    store: &S,
    index: &str,
) -> AgentResult<Option<String>> {
    match store.get(&xpath::assignment_peer_path(index)).await? {
        Some(encoded) => {
            let peer = xpath::leaf_value(&encoded, leaf::LOGICAL_CHANNEL)?;
            if peer == "0" {
                Ok(None)
            } else {
                Ok(Some(peer.to_string()))
            }
        }
        None => Ok(None),
    }
}

/// Get the configured frequency of the optical channel named `component`.
pub async fn frequency<S: ConfigStore>(
    store: &S,
    component: &str,
) -> AgentResult<Option<String>> {
    match store.get(&xpath::frequency_path(component)).await? {
        Some(encoded) => Ok(Some(
            xpath::leaf_value(&encoded, leaf::FREQUENCY)?.to_string(),
        )),
        None => Ok(None),
    }
}
