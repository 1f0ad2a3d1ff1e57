//! Topology fixtures for dataplane agent tests
//!
//! Builds the flat path→value documents the agent's configuration store is
//! seeded with, one leaf at a time.

use cassini_dataplaned::xpath;
use cassini_dataplaned::MemoryStore;
use std::collections::BTreeMap;

/// Concrete store path of a component's configured name.
pub fn component_name_path(name: &str) -> String {
    format!(
        "{}/component[name='{}']/config/name",
        xpath::COMPONENTS_ROOT,
        name
    )
}

/// Concrete store path of a channel's list index.
pub fn channel_index_path(index: &str) -> String {
    format!("{}/channel[index='{}']/index", xpath::CHANNELS_ROOT, index)
}

/// Builder for topology documents.
#[derive(Debug, Clone, Default)]
pub struct TopologyFixture {
    entries: BTreeMap<String, String>,
}

impl TopologyFixture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a raw path→value entry
    pub fn with_entry(mut self, path: impl Into<String>, value: impl Into<String>) -> Self {
        self.entries.insert(path.into(), value.into());
        self
    }

    /// Add a physical interface component
    pub fn with_interface(self, name: &str) -> Self {
        self.with_entry(component_name_path(name), name)
    }

    /// Add a channel with only an index, description and assignment type
    ///
    /// Useful for malformed or partial channels; complete channels come from
    /// [`TopologyFixture::with_logical_channel`] and
    /// [`TopologyFixture::with_optical_channel`].
    pub fn with_bare_channel(self, index: &str, description: &str, assignment_type: &str) -> Self {
        self.with_entry(channel_index_path(index), index)
            .with_entry(xpath::description_path(index), description)
            .with_entry(xpath::assignment_type_path(index), assignment_type)
    }

    /// Add a client-side channel patched into its transceiver's bridge
    pub fn with_logical_channel(self, index: &str, description: &str, transceiver: &str) -> Self {
        self.with_bare_channel(index, description, "LOGICAL_CHANNEL")
            .with_entry(xpath::transceiver_path(index), transceiver)
    }

    /// Add a line-side optical channel, including its component entry
    pub fn with_optical_channel(self, index: &str, description: &str) -> Self {
        self.with_bare_channel(index, description, "OPTICAL_CHANNEL")
            .with_entry(component_name_path(description), description)
    }

    /// Set the configured frequency of an optical-channel component
    pub fn with_frequency(self, component: &str, frequency: &str) -> Self {
        self.with_entry(xpath::frequency_path(component), frequency)
    }

    /// Assign a channel to a peer channel
    pub fn with_assignment(self, index: &str, peer_index: &str) -> Self {
        self.with_entry(xpath::assignment_peer_path(index), peer_index)
    }

    /// Seed a store with the built document
    pub fn build(self) -> MemoryStore {
        MemoryStore::from_entries(self.entries)
    }
}

/// Ready-made topologies.
pub mod topologies {
    use super::TopologyFixture;

    /// Two transceivers: channel 10 is a client channel on trcv-1, channel
    /// 20 an optical carrier on trcv-2 parked at the grid base frequency.
    pub fn transceiver_pair() -> TopologyFixture {
        TopologyFixture::new()
            .with_interface("trcv-1")
            .with_interface("trcv-2")
            .with_logical_channel("10", "trcv-1/0", "trcv-1")
            .with_optical_channel("20", "trcv-2/0")
            .with_frequency("trcv-2/0", "190000000")
    }

    /// Four transceivers with client channels 10, 30 and 40; channel 10
    /// starts out assigned to channel 30.
    pub fn assigned_quad() -> TopologyFixture {
        TopologyFixture::new()
            .with_interface("trcv-1")
            .with_interface("trcv-2")
            .with_interface("trcv-3")
            .with_interface("trcv-4")
            .with_logical_channel("10", "trcv-1/0", "trcv-1")
            .with_logical_channel("30", "trcv-3/0", "trcv-3")
            .with_logical_channel("40", "trcv-4/0", "trcv-4")
            .with_assignment("10", "30")
    }
}
