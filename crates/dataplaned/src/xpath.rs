//! Path model for the watched configuration trees.
//!
//! The store exposes every leaf as a `<path> = <value>` string. This module
//! holds the two watched module names, the path builders for the leaves the
//! agent reads, the anchored matchers that classify changed paths, and the
//! parsers for the encoded form.

use cassini_common::{AgentError, AgentResult};
use once_cell::sync::Lazy;
use regex::Regex;

/// Module name of the platform component tree.
pub const MODULE_PLATFORM: &str = "openconfig-platform";

/// Module name of the terminal-device channel tree.
pub const MODULE_TERMINAL_DEVICE: &str = "openconfig-terminal-device";

/// Root of the component list.
pub const COMPONENTS_ROOT: &str = "/openconfig-platform:components";

/// Root of the logical-channel list.
pub const CHANNELS_ROOT: &str = "/openconfig-terminal-device:terminal-device/logical-channels";

/// Leaf names parsed out of encoded values.
pub mod leaf {
    pub const NAME: &str = "name";
    pub const INDEX: &str = "index";
    pub const DESCRIPTION: &str = "description";
    pub const ASSIGNMENT_TYPE: &str = "assignment-type";
    pub const LOGICAL_CHANNEL: &str = "logical-channel";
    pub const TRANSCEIVER: &str = "transceiver";
    pub const FREQUENCY: &str = "frequency";
}

/// Query for the configured names of every component.
pub fn component_names_query() -> String {
    format!("{}/component[node()]/config/name", COMPONENTS_ROOT)
}

/// Path to the optical-channel frequency of the component named `name`.
pub fn frequency_path(name: &str) -> String {
    format!(
        "{}/component[name='{}']/openconfig-terminal-device:optical-channel/config/frequency",
        COMPONENTS_ROOT, name
    )
}

/// Query for the index of every logical channel.
pub fn channel_indices_query() -> String {
    format!("{}/channel[node()]/index", CHANNELS_ROOT)
}

/// Path to a channel's configured description.
pub fn description_path(index: &str) -> String {
    format!("{}/channel[index='{}']/config/description", CHANNELS_ROOT, index)
}

/// Path to a channel's assignment type.
pub fn assignment_type_path(index: &str) -> String {
    format!(
        "{}/channel[index='{}']/logical-channel-assignments/assignment[index='{}']/config/assignment-type",
        CHANNELS_ROOT, index, index
    )
}

/// Path to a channel's assigned peer channel.
pub fn assignment_peer_path(index: &str) -> String {
    format!(
        "{}/channel[index='{}']/logical-channel-assignments/assignment[index='{}']/config/logical-channel",
        CHANNELS_ROOT, index, index
    )
}

/// Path to a channel's ingress transceiver reference.
pub fn transceiver_path(index: &str) -> String {
    format!("{}/channel[index='{}']/ingress/config/transceiver", CHANNELS_ROOT, index)
}

/// Frequency leaf of an optical-channel component. Captures the component
/// name, which doubles as the dataplane port name.
static FREQUENCY_PATH_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^/openconfig-platform:components/component\[name='([^']+)'\]/openconfig-terminal-device:optical-channel/config/frequency$",
    )
    .expect("Invalid regex pattern")
});

/// Assigned-peer leaf of a channel assignment. Captures the source channel
/// index from the enclosing channel entry.
static ASSIGNMENT_PATH_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^/openconfig-terminal-device:terminal-device/logical-channels/channel\[index='([^']+)'\]/logical-channel-assignments/assignment\[index='[^']+'\]/config/logical-channel$",
    )
    .expect("Invalid regex pattern")
});

/// Returns the owning component name when `path` is exactly the frequency
/// leaf of an optical channel.
pub fn match_frequency_path(path: &str) -> Option<String> {
    FREQUENCY_PATH_RE
        .captures(path)
        .map(|c| c[1].to_string())
}

/// Returns the source channel index when `path` is exactly the
/// logical-channel leaf of a channel assignment.
pub fn match_assignment_path(path: &str) -> Option<String> {
    ASSIGNMENT_PATH_RE
        .captures(path)
        .map(|c| c[1].to_string())
}

/// Splits an encoded `<path> = <value>` string into its two halves.
pub fn split_encoded(encoded: &str) -> AgentResult<(String, String)> {
    match encoded.split_once(" = ") {
        Some((path, value)) => Ok((path.trim().to_string(), value.trim().to_string())),
        None => Err(AgentError::parse(encoded, "missing ' = ' separator")),
    }
}

/// Extracts the value of `leaf` from an encoded `<path> = <value>` string.
///
/// The store renders every leaf with its name repeated before the value
/// (`.../config/description = trcv-1/0`), so splitting on the leaf marker is
/// the reliable way to keep values that themselves contain separators.
pub fn leaf_value<'a>(encoded: &'a str, leaf: &str) -> AgentResult<&'a str> {
    let marker = format!("{} = ", leaf);
    match encoded.find(&marker) {
        Some(pos) => Ok(encoded[pos + marker.len()..].trim()),
        None => Err(AgentError::parse(
            encoded,
            format!("missing '{}' leaf", leaf),
        )),
    }
}
