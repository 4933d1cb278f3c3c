//! Module for the worker loops draining the job queue

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::queue::JobQueue;

/// Runs jobs from `queue` until `shutdown` fires.
///
/// A job returning an error or panicking is logged and the loop carries on with the next one.
/// Shutdown interrupts the wait for the next job; a job already running receives the same token and
/// decides itself how quickly to stop.
pub async fn run_worker(worker_id: usize, queue: Arc<JobQueue>, shutdown: CancellationToken) {
    debug!(worker_id, "worker started");

    while let Some(job) = queue.dequeue(&shutdown).await {
        let outcome = AssertUnwindSafe(job(shutdown.clone())).catch_unwind().await;
        match outcome {
            Ok(Ok(())) => debug!(worker_id, "job completed"),
            Ok(Err(e)) => {
                let message = format!("{e:#}");
                error!(worker_id, error = %message, "job failed");
            }
            Err(panic) => error!(worker_id, panic = panic_message(&*panic), "job panicked"),
        }
    }

    debug!(worker_id, "worker stopped");
}

/// Spawns `num_workers` worker loops sharing one queue on the current tokio runtime.
pub fn spawn_workers(
    num_workers: usize,
    queue: &Arc<JobQueue>,
    shutdown: &CancellationToken,
) -> Vec<JoinHandle<()>> {
    let handles: Vec<_> = (0..num_workers.max(1))
        .map(|worker_id| {
            tokio::spawn(run_worker(
                worker_id,
                Arc::clone(queue),
                shutdown.clone(),
            ))
        })
        .collect();

    info!(worker_count = handles.len(), "started workers");
    handles
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> &str {
    if let Some(msg) = payload.downcast_ref::<&'static str>() {
        msg
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg
    } else {
        "non-string panic payload"
    }
}
