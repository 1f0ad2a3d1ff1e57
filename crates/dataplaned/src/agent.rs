//! Agent lifecycle.
//!
//! Startup order is strict: probe the store's schemas, materialize the
//! snapshot, then enter the event loop. Teardown is tied to the loop
//! section: once the agent reaches it, the bridges are deleted on the way
//! out no matter how the loop ended. Failures before that point leave the
//! dataplane alone, because nothing of ours is on it yet when the probe
//! fails and a materialization failure means the store itself is unusable.

use crate::dispatcher;
use crate::snapshot;
use crate::store::{ChangeBatch, ConfigStore};
use crate::switch::SwitchController;
use crate::xpath;
use cassini_common::{AgentError, AgentResult};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{error, info, instrument, warn};

/// Capacity of the change notification channel
const EVENT_QUEUE_DEPTH: usize = 64;

/// How often the event loop re-checks the stop flag
const STOP_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Runs the agent to completion: schema probe, materialization, event loop,
/// teardown.
#[instrument(skip_all)]
pub async fn run<S, W>(store: &S, switch: &W, shutdown: Arc<AtomicBool>) -> AgentResult<()>
where
    S: ConfigStore,
    W: SwitchController,
{
    info!("Discovering configuration schemas");
    if !store.has_schema().await? {
        return Err(AgentError::store_unavailable(
            "watched schemas are not installed",
        ));
    }
    info!("Schemas were found");

    snapshot::materialize(store, switch).await?;

    let result = event_loop(store, switch, shutdown).await;

    if let Err(e) = snapshot::teardown(store, switch).await {
        error!("Teardown failed: {}", e);
    }

    result
}

/// Receives change batches until the stop flag is raised or the
/// subscription channel closes. Batches are dispatched to completion one at
/// a time.
async fn event_loop<S, W>(store: &S, switch: &W, shutdown: Arc<AtomicBool>) -> AgentResult<()>
where
    S: ConfigStore,
    W: SwitchController,
{
    let (tx, mut rx) = mpsc::channel::<ChangeBatch>(EVENT_QUEUE_DEPTH);

    info!("Registering events");
    store.subscribe(xpath::MODULE_PLATFORM, tx.clone()).await?;
    store.subscribe(xpath::MODULE_TERMINAL_DEVICE, tx).await?;

    info!("Waiting events");
    loop {
        if shutdown.load(Ordering::Relaxed) {
            warn!("Application exit requested, exiting");
            return Ok(());
        }

        tokio::select! {
            batch = rx.recv() => match batch {
                Some(batch) => dispatcher::dispatch_batch(store, switch, &batch).await,
                None => {
                    warn!("Change subscription closed, exiting");
                    return Ok(());
                }
            },
            _ = tokio::time::sleep(STOP_POLL_INTERVAL) => {}
        }
    }
}
