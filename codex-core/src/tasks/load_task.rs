//! ``src/tasks/load_task.rs``
//! ============================================================================
//! # Background Load Task
//!
//! Fetches the raw table from a [`RawSource`], parses it off the async
//! runtime, and reports exactly one [`TaskResult`] unless cancelled first.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::controller::event_loop::TaskResult;
use crate::data::parser::{self, ParsedTable};
use crate::error::AppError;
use crate::source::raw_source::RawSource;

static NEXT_TASK_ID: AtomicU64 = AtomicU64::new(1);

/// A running load. Dropping the handle does not stop the task; call
/// [`LoadHandle::cancel`].
#[derive(Debug)]
pub struct LoadHandle {
    pub task_id: u64,
    cancel: CancellationToken,
    join: JoinHandle<()>,
}

impl LoadHandle {
    pub fn cancel(&self) {
        debug!(task_id = self.task_id, "Cancelling load task");
        self.cancel.cancel();
    }

    /// Cancel and wait for the task to exit.
    pub async fn cancel_and_wait(self) {
        self.cancel();
        if let Err(e) = self.join.await {
            warn!(task_id = self.task_id, "Load task did not exit cleanly: {}", e);
        }
    }
}

/// Spawn a load. `parent` cancels every load at shutdown; each task also
/// gets its own child token so a reload can supersede it.
pub fn spawn_load_task(
    source: Arc<dyn RawSource>,
    task_tx: UnboundedSender<TaskResult>,
    parent: &CancellationToken,
) -> LoadHandle {
    let task_id = NEXT_TASK_ID.fetch_add(1, Ordering::Relaxed);
    let cancel = parent.child_token();
    let token = cancel.clone();

    let join = tokio::spawn(async move {
        let described = source.describe();
        info!(task_id, source = %described, "Load task started");
        let start = Instant::now();

        let outcome = tokio::select! {
            () = token.cancelled() => {
                info!(task_id, "Load task cancelled");
                return;
            }
            outcome = fetch_and_parse(task_id, source.as_ref()) => outcome,
        };

        let result = match outcome {
            Ok(table) => {
                info!(
                    task_id,
                    records = table.records.len(),
                    dropped = table.dropped_rows,
                    "Load task finished in {:?}",
                    start.elapsed()
                );
                TaskResult::Loaded {
                    task_id,
                    source: described,
                    table,
                    elapsed: start.elapsed(),
                }
            }
            Err(error) => {
                warn!(task_id, source = %described, "Load task failed: {}", error);
                TaskResult::LoadFailed {
                    task_id,
                    source: described,
                    error,
                }
            }
        };

        if task_tx.send(result).is_err() {
            debug!(task_id, "Result receiver gone; dropping load result");
        }
    });

    LoadHandle {
        task_id,
        cancel,
        join,
    }
}

/// One fetch, one parse. No retry.
pub async fn fetch_and_parse(task_id: u64, source: &dyn RawSource) -> Result<ParsedTable, AppError> {
    let raw = source.fetch_raw().await?;

    tokio::task::spawn_blocking(move || parser::parse(&raw))
        .await
        .map_err(|e| AppError::task_failed(task_id, e.to_string()))?
}
