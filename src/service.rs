//! Module wiring configuration, queue, workers and watcher into the long-running service

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::error::{Error, io_error};
use crate::output::{JsonReportWriter, ReportWriter};
use crate::queue::JobQueue;
use crate::watch::watch_input_dir;
use crate::worker::spawn_workers;

/// Runs the service until `shutdown` fires.
///
/// Both directories are created if missing. Files created in the input directory while the service
/// runs are processed by `config.workers` concurrent workers; jobs still queued at shutdown are
/// not started.
pub async fn run(config: &Config, shutdown: CancellationToken) -> Result<(), Error> {
    for dir in [&config.input_dir, &config.output_dir] {
        tokio::fs::create_dir_all(dir)
            .await
            .map_err(|e| io_error(dir, e))?;
    }

    let queue = Arc::new(JobQueue::new());
    let writer: Arc<dyn ReportWriter> = Arc::new(JsonReportWriter::new(&config.output_dir));

    // cancelled with `shutdown`, or on its own when the service fails to start
    let stop = shutdown.child_token();
    let workers = spawn_workers(usize::from(config.workers), &queue, &stop);
    let watcher = match watch_input_dir(&config.input_dir, Arc::clone(&queue), writer) {
        Ok(watcher) => watcher,
        Err(e) => {
            stop.cancel();
            return Err(e);
        }
    };

    stop.cancelled().await;
    info!("shutting down");

    // no new arrivals from here on
    drop(watcher);
    for handle in workers {
        if let Err(e) = handle.await {
            error!(error = %e, "worker terminated abnormally");
        }
    }

    if !queue.is_empty() {
        warn!(pending = queue.len(), "jobs left unprocessed at shutdown");
    }
    info!("service stopped");
    Ok(())
}
