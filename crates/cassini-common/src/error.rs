//! Error types for the dataplane agent.
//!
//! This module defines the error taxonomy shared by the agent and its
//! adapters. All errors implement `std::error::Error` via `thiserror`.

use std::io;
use thiserror::Error;

/// Result type alias for agent operations.
pub type AgentResult<T> = Result<T, AgentError>;

/// Errors that can occur while reconciling the configuration store
/// with the dataplane.
#[derive(Debug, Error)]
pub enum AgentError {
    /// Failed to execute a shell command (spawn error).
    #[error("Failed to execute shell command '{command}': {source}")]
    ShellExec {
        /// The command that failed to execute.
        command: String,
        /// The underlying IO error.
        #[source]
        source: io::Error,
    },

    /// Dataplane management command returned a non-zero exit code.
    #[error("Command failed: '{command}' (exit code {exit_code}): {output}")]
    CommandFailed {
        /// The command that failed.
        command: String,
        /// The exit code.
        exit_code: i32,
        /// Combined stdout/stderr output.
        output: String,
    },

    /// The configuration store is missing or unusable at startup.
    #[error("Configuration store unavailable: {message}")]
    StoreUnavailable {
        /// Error message.
        message: String,
    },

    /// A bulk store query failed in the query mechanism itself
    /// (distinct from an empty result).
    #[error("Store query failed for '{pattern}': {message}")]
    Query {
        /// The path pattern that was queried.
        pattern: String,
        /// Error message.
        message: String,
    },

    /// A referenced resource does not exist in the store or dataplane.
    #[error("{resource} '{name}' not found")]
    NotFound {
        /// The kind of resource (e.g. "channel", "bridge", "transceiver").
        resource: String,
        /// The identifier that failed to resolve.
        name: String,
    },

    /// A path-encoded value could not be parsed.
    #[error("Failed to parse '{input}': {message}")]
    Parse {
        /// The offending input.
        input: String,
        /// Error message.
        message: String,
    },
}

impl AgentError {
    /// Creates a store-unavailable error.
    pub fn store_unavailable(message: impl Into<String>) -> Self {
        Self::StoreUnavailable {
            message: message.into(),
        }
    }

    /// Creates a query error.
    pub fn query(pattern: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Query {
            pattern: pattern.into(),
            message: message.into(),
        }
    }

    /// Creates a not-found error.
    pub fn not_found(resource: impl Into<String>, name: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
            name: name.into(),
        }
    }

    /// Creates a parse error.
    pub fn parse(input: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Parse {
            input: input.into(),
            message: message.into(),
        }
    }
}
