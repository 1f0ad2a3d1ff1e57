//! dataplaned - Cassini dataplane control agent
//!
//! Keeps a software switch in sync with the modeled optical topology:
//! - materializes bridges, patch ports, VLAN tags and peer bindings from the
//!   configuration store at startup
//! - watches the platform and terminal-device trees for edits
//! - reconciles frequency changes (re-tag) and assignment changes
//!   (clear-then-bind) as they arrive
//! - tears the bridges down again on shutdown

pub mod agent;
pub mod commands;
pub mod dispatcher;
pub mod events;
pub mod freq;
pub mod handlers;
pub mod memory_store;
pub mod ovs;
pub mod snapshot;
pub mod store;
pub mod switch;
pub mod topology;
pub mod xpath;

pub use events::{AssignmentChange, ChangeDelta, FrequencyChange};
pub use memory_store::MemoryStore;
pub use ovs::OvsCtl;
pub use store::{ChangeBatch, ChangeRecord, ConfigStore, EventKind};
pub use switch::SwitchController;
pub use topology::AssignmentType;
