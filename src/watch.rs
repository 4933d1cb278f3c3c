//! Module turning files appearing in the input directory into queued ingestion jobs

use std::path::{Path, PathBuf};
use std::sync::Arc;

use notify::event::{CreateKind, ModifyKind, RenameMode};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tracing::{debug, error, info};

use crate::error::Error;
use crate::ingest::{FileArrival, enqueue_file};
use crate::output::ReportWriter;
use crate::queue::JobQueue;

/// Starts watching `input_dir` (not recursively). Every file created in or renamed into it is put on
/// `queue`.
///
/// Watching stops when the returned watcher is dropped.
pub fn watch_input_dir(
    input_dir: &Path,
    queue: Arc<JobQueue>,
    writer: Arc<dyn ReportWriter>,
) -> Result<RecommendedWatcher, Error> {
    // runs on the watcher's own thread; enqueueing never blocks it
    let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| match res {
        Ok(event) => {
            for arrival in arrivals(&event) {
                info!(file = %arrival.name, "file arrived");
                enqueue_file(&queue, arrival, Arc::clone(&writer));
            }
        }
        Err(e) => error!(error = %e, "watch error"),
    })?;

    watcher.watch(input_dir, RecursiveMode::NonRecursive)?;
    info!(dir = %input_dir.display(), "watching input directory");
    Ok(watcher)
}

/// Extracts the files which appeared in the input directory from a watcher event: created files and
/// files renamed into the directory. Everything else is ignored.
pub(crate) fn arrivals(event: &Event) -> Vec<FileArrival> {
    let candidates: Vec<&PathBuf> = match &event.kind {
        EventKind::Create(CreateKind::File) => event.paths.iter().collect(),
        // `Both` always follows a `To` for the same destination, so only `To` starts a job
        EventKind::Modify(ModifyKind::Name(RenameMode::To)) => event.paths.iter().collect(),
        // some backends cannot tell files and directories apart, or report renames without direction
        EventKind::Create(CreateKind::Any) | EventKind::Modify(ModifyKind::Name(RenameMode::Any)) => {
            event.paths.iter().filter(|path| path.is_file()).collect()
        }
        _ => {
            debug!(kind = ?event.kind, "ignoring event");
            return Vec::new();
        }
    };

    candidates
        .into_iter()
        .filter_map(|path| {
            let name = path.file_name()?.to_string_lossy().into_owned();
            Some(FileArrival::new(name, path))
        })
        .collect()
}
