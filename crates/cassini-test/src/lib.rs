//! Integration test infrastructure for the Cassini dataplane agent
//!
//! Provides:
//! - Topology document fixtures seeding the in-memory configuration store
//! - A state-tracking mock switch recording every controller call
//! - Ready-made topologies for the common reconciliation scenarios

pub mod fixtures;
pub mod mock_switch;

pub use fixtures::{topologies, TopologyFixture};
pub use mock_switch::{MockSwitch, PortState, SwitchOp};
