//! Classification of raw change records into typed dataplane events.

use crate::store::ChangeRecord;
use crate::xpath;
use cassini_common::{AgentError, AgentResult};

/// A modified optical-channel frequency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyChange {
    /// Component name of the optical channel, which is also the tagged port.
    pub interface: String,
    pub old_frequency: String,
    pub new_frequency: String,
}

/// A re-pointed channel assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignmentChange {
    pub old_source: String,
    pub old_destination: String,
    pub new_source: String,
    pub new_destination: String,
}

/// What a modified record means to the dataplane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeDelta {
    Frequency(FrequencyChange),
    Assignment(AssignmentChange),
    /// A leaf the agent does not act on.
    Unclassified { path: String },
}

/// Classifies a modified record by the exact shape of its changed path.
///
/// Both sides of the record must parse and must sit on the same leaf; a
/// record whose old path names a frequency but whose new path does not is a
/// store inconsistency and comes back as an error, never as a half-typed
/// event.
pub fn classify(record: &ChangeRecord) -> AgentResult<ChangeDelta> {
    let old = record
        .old
        .as_deref()
        .ok_or_else(|| AgentError::parse("<none>", "modified record has no old value"))?;
    let new = record
        .new
        .as_deref()
        .ok_or_else(|| AgentError::parse("<none>", "modified record has no new value"))?;

    let (old_path, old_value) = xpath::split_encoded(old)?;
    let (new_path, new_value) = xpath::split_encoded(new)?;

    if let Some(interface) = xpath::match_frequency_path(&new_path) {
        if xpath::match_frequency_path(&old_path).is_none() {
            return Err(AgentError::parse(
                old_path,
                "old value of a frequency change is not a frequency leaf",
            ));
        }
        return Ok(ChangeDelta::Frequency(FrequencyChange {
            interface,
            old_frequency: old_value,
            new_frequency: new_value,
        }));
    }

    if let Some(new_source) = xpath::match_assignment_path(&new_path) {
        let old_source = xpath::match_assignment_path(&old_path).ok_or_else(|| {
            AgentError::parse(
                old_path,
                "old value of an assignment change is not an assignment leaf",
            )
        })?;
        return Ok(ChangeDelta::Assignment(AssignmentChange {
            old_source,
            old_destination: old_value,
            new_source,
            new_destination: new_value,
        }));
    }

    Ok(ChangeDelta::Unclassified { path: new_path })
}
