//! Configuration store abstraction and change notifications.
//!
//! The agent never talks to a concrete datastore directly. Everything it
//! reads comes through [`ConfigStore`], and everything it learns about
//! running-config edits arrives as [`ChangeBatch`] messages on the channel
//! registered through [`ConfigStore::subscribe`].

use async_trait::async_trait;
use cassini_common::AgentResult;
use serde::{Deserialize, Serialize};
use std::fmt;
use tokio::sync::mpsc;

/// Kind of edit a change record describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventKind {
    Created,
    Modified,
    Deleted,
    Moved,
}

impl EventKind {
    pub fn is_modified(&self) -> bool {
        matches!(self, EventKind::Modified)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Created => "CREATED",
            EventKind::Modified => "MODIFIED",
            EventKind::Deleted => "DELETED",
            EventKind::Moved => "MOVED",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One edited node, with its encoded `<path> = <value>` form before and
/// after the edit. Created records carry no `old`, deleted records no `new`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeRecord {
    pub kind: EventKind,
    pub old: Option<String>,
    pub new: Option<String>,
}

impl ChangeRecord {
    pub fn new(kind: EventKind, old: Option<String>, new: Option<String>) -> Self {
        ChangeRecord { kind, old, new }
    }

    pub fn modified(old: impl Into<String>, new: impl Into<String>) -> Self {
        ChangeRecord::new(EventKind::Modified, Some(old.into()), Some(new.into()))
    }

    pub fn created(new: impl Into<String>) -> Self {
        ChangeRecord::new(EventKind::Created, None, Some(new.into()))
    }

    pub fn deleted(old: impl Into<String>) -> Self {
        ChangeRecord::new(EventKind::Deleted, Some(old.into()), None)
    }
}

/// All records delivered by one store notification.
///
/// `kind` is the kind of the batch as announced by the store; individual
/// records still carry their own since a single commit can mix edits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeBatch {
    pub module: String,
    pub kind: EventKind,
    pub records: Vec<ChangeRecord>,
}

impl ChangeBatch {
    pub fn new(module: impl Into<String>, kind: EventKind, records: Vec<ChangeRecord>) -> Self {
        ChangeBatch {
            module: module.into(),
            kind,
            records,
        }
    }
}

/// Read and watch access to the running configuration.
#[async_trait]
pub trait ConfigStore: Send + Sync {
    /// Fetches a single node, encoded as `<path> = <value>`. `None` when the
    /// node is absent.
    async fn get(&self, path: &str) -> AgentResult<Option<String>>;

    /// Fetches every node matching a pattern. Patterns use the literal
    /// `[node()]` predicate as a list wildcard, as in
    /// `/openconfig-platform:components/component[node()]/config/name`.
    async fn get_many(&self, pattern: &str) -> AgentResult<Vec<String>>;

    /// Registers `tx` to receive a [`ChangeBatch`] for every running-config
    /// edit under `module`.
    async fn subscribe(&self, module: &str, tx: mpsc::Sender<ChangeBatch>) -> AgentResult<()>;

    /// Whether the schemas the agent depends on are installed.
    async fn has_schema(&self) -> AgentResult<bool>;
}
