//! In-memory configuration store.
//!
//! Holds the running configuration as an ordered path→value map, loadable
//! from a topology document (a flat JSON object mapping absolute paths to
//! leaf values). Tests seed it programmatically and push change batches
//! through [`MemoryStore::publish`]; a session layer for a live modeled
//! datastore would implement [`ConfigStore`] the same way.

use crate::store::{ChangeBatch, ConfigStore};
use crate::xpath::{CHANNELS_ROOT, COMPONENTS_ROOT};
use async_trait::async_trait;
use cassini_common::{AgentError, AgentResult};
use regex::Regex;
use std::collections::BTreeMap;
use std::path::Path;
use tokio::sync::{mpsc, Mutex};
use tracing::{debug, info};

#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, String>>,
    subscribers: Mutex<Vec<(String, mpsc::Sender<ChangeBatch>)>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }

    /// Loads a topology document from disk.
    pub async fn from_topology_file(path: &Path) -> AgentResult<Self> {
        let text = tokio::fs::read_to_string(path).await.map_err(|e| {
            AgentError::store_unavailable(format!(
                "cannot read topology document {}: {}",
                path.display(),
                e
            ))
        })?;
        let store = Self::from_topology_json(&text)?;
        info!(
            "Loaded topology document {} ({} nodes)",
            path.display(),
            store.entries.lock().await.len()
        );
        Ok(store)
    }

    /// Parses a topology document: one JSON object, absolute paths as keys,
    /// scalar leaf values.
    pub fn from_topology_json(text: &str) -> AgentResult<Self> {
        let parsed: serde_json::Value = serde_json::from_str(text)
            .map_err(|e| AgentError::store_unavailable(format!("malformed topology document: {}", e)))?;
        let object = parsed.as_object().ok_or_else(|| {
            AgentError::store_unavailable("topology document is not a JSON object")
        })?;

        let mut entries = BTreeMap::new();
        for (path, value) in object {
            let rendered = match value {
                serde_json::Value::String(s) => s.clone(),
                serde_json::Value::Number(n) => n.to_string(),
                serde_json::Value::Bool(b) => b.to_string(),
                other => {
                    return Err(AgentError::store_unavailable(format!(
                        "topology value for {} is not a scalar: {}",
                        path, other
                    )))
                }
            };
            entries.insert(path.clone(), rendered);
        }

        Ok(Self::from_entries(entries))
    }

    /// Wraps an already-built path→value map.
    pub fn from_entries(entries: BTreeMap<String, String>) -> Self {
        MemoryStore {
            entries: Mutex::new(entries),
            subscribers: Mutex::new(Vec::new()),
        }
    }

    /// Seeds or replaces one node.
    pub async fn insert(&self, path: impl Into<String>, value: impl Into<String>) {
        self.entries.lock().await.insert(path.into(), value.into());
    }

    /// Drops one node, returning its previous value.
    pub async fn remove(&self, path: &str) -> Option<String> {
        self.entries.lock().await.remove(path)
    }

    /// Delivers a change batch to every subscriber of `module`. Senders
    /// whose receiver is gone are pruned.
    pub async fn publish(&self, module: &str, batch: ChangeBatch) {
        let targets: Vec<mpsc::Sender<ChangeBatch>> = {
            let mut subscribers = self.subscribers.lock().await;
            subscribers.retain(|(_, tx)| !tx.is_closed());
            subscribers
                .iter()
                .filter(|(m, _)| m == module)
                .map(|(_, tx)| tx.clone())
                .collect()
        };

        for tx in targets {
            if tx.send(batch.clone()).await.is_err() {
                debug!("Dropping change batch for {}: receiver is gone", module);
            }
        }
    }

    fn pattern_regex(pattern: &str) -> AgentResult<Regex> {
        let anchored = format!(
            "^{}$",
            regex::escape(pattern).replace(r"\[node\(\)\]", r"\[[^\]]+\]")
        );
        Regex::new(&anchored).map_err(|e| AgentError::query(pattern, e.to_string()))
    }
}

#[async_trait]
impl ConfigStore for MemoryStore {
    async fn get(&self, path: &str) -> AgentResult<Option<String>> {
        Ok(self
            .entries
            .lock()
            .await
            .get(path)
            .map(|value| format!("{} = {}", path, value)))
    }

    async fn get_many(&self, pattern: &str) -> AgentResult<Vec<String>> {
        let matcher = Self::pattern_regex(pattern)?;
        Ok(self
            .entries
            .lock()
            .await
            .iter()
            .filter(|(path, _)| matcher.is_match(path))
            .map(|(path, value)| format!("{} = {}", path, value))
            .collect())
    }

    async fn subscribe(&self, module: &str, tx: mpsc::Sender<ChangeBatch>) -> AgentResult<()> {
        self.subscribers.lock().await.push((module.to_string(), tx));
        debug!("Registered subscriber for module {}", module);
        Ok(())
    }

    async fn has_schema(&self) -> AgentResult<bool> {
        let entries = self.entries.lock().await;
        Ok(entries
            .keys()
            .any(|path| path.starts_with(COMPONENTS_ROOT) || path.starts_with(CHANNELS_ROOT)))
    }
}
