//! Common infrastructure for the Cassini dataplane agent.
//!
//! This crate provides the pieces shared between the daemon and its test
//! harness:
//!
//! - [`shell`]: Safe shell command execution with proper quoting
//! - [`error`]: The agent error taxonomy
//!
//! # Example
//!
//! ```ignore
//! use cassini_common::{
//!     shell::{self, OVS_VSCTL_CMD, shellquote},
//!     AgentResult,
//! };
//!
//! async fn tag_port(port: &str, vlan: &str) -> AgentResult<()> {
//!     let cmd = format!("{} set port {} tag={}",
//!         OVS_VSCTL_CMD, shellquote(port), shellquote(vlan));
//!     shell::exec_or_throw(&cmd).await?;
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod shell;

// Re-export commonly used items at crate root
pub use error::{AgentError, AgentResult};
