//! Change event dispatch.

use crate::events::{self, ChangeDelta};
use crate::handlers;
use crate::store::{ChangeBatch, ChangeRecord, ConfigStore, EventKind};
use crate::switch::SwitchController;
use cassini_common::AgentResult;
use tracing::{debug, error, info, instrument};

/// Routes one change batch to the reconciliation handlers.
///
/// Only modified records reconcile. Created, deleted and moved records are
/// logged and left alone; the engine relies on modified events to drive the
/// dataplane. Classification and handler failures are logged here and do
/// not stop the remaining records of the batch.
#[instrument(skip_all)]
pub async fn dispatch_batch<S, W>(store: &S, switch: &W, batch: &ChangeBatch)
where
    S: ConfigStore,
    W: SwitchController,
{
    info!("New {} event reached from module {}", batch.kind, batch.module);

    for record in &batch.records {
        match record.kind {
            EventKind::Created => {
                info!("CREATED: {}", record.new.as_deref().unwrap_or(""));
            }
            EventKind::Deleted => {
                info!("DELETED: {}", record.old.as_deref().unwrap_or(""));
            }
            EventKind::Moved => {
                info!(
                    "MOVED: ({}) to ({})",
                    record.old.as_deref().unwrap_or(""),
                    record.new.as_deref().unwrap_or("")
                );
            }
            EventKind::Modified => {
                if let Err(e) = dispatch_modified(store, switch, record).await {
                    error!("Cannot apply change on dataplane: {}", e);
                }
            }
        }
    }
}

async fn dispatch_modified<S, W>(store: &S, switch: &W, record: &ChangeRecord) -> AgentResult<()>
where
    S: ConfigStore,
    W: SwitchController,
{
    info!(
        "MODIFIED: old ({}) to new ({})",
        record.old.as_deref().unwrap_or(""),
        record.new.as_deref().unwrap_or("")
    );

    match events::classify(record)? {
        ChangeDelta::Frequency(change) => {
            info!("Applying new changes on dataplane");
            handlers::handle_frequency(switch, &change).await
        }
        ChangeDelta::Assignment(change) => {
            info!("Applying new changes on dataplane");
            handlers::handle_assignment(store, switch, &change).await
        }
        ChangeDelta::Unclassified { path } => {
            debug!("No dataplane action for {}", path);
            Ok(())
        }
    }
}
