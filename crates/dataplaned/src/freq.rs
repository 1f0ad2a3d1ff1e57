//! Mapping between optical frequencies and VLAN tags.

use cassini_common::{AgentError, AgentResult};

/// Derives the VLAN tag that encodes an optical frequency on the dataplane.
///
/// The tag is `floor(frequency * 0.0001 - 19000)` for a frequency in MHz.
/// The literal `"0"` marks an unset laser and maps straight to tag `"0"`
/// without going through the arithmetic.
pub fn vlan_for_frequency(frequency: &str) -> AgentResult<String> {
    if frequency == "0" {
        return Ok("0".to_string());
    }

    let freq: i64 = frequency
        .parse()
        .map_err(|_| AgentError::parse(frequency, "frequency is not an integer"))?;

    let tag = (freq as f64 * 0.0001 - 19000.0).floor() as i64;
    Ok(tag.to_string())
}
