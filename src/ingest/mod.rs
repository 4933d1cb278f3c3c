//! Module for the job turning one arrived input file into one report

use std::path::PathBuf;
use std::sync::Arc;

use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, info, info_span, warn};

use crate::domain::Report;
use crate::engine::Aggregator;
use crate::error::{Error, io_error};
use crate::input::parse_line;
use crate::output::ReportWriter;
use crate::queue::JobQueue;


/// Notification that a new input file is ready to be processed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileArrival {
    /// File name, reused as the name of the report
    pub name: String,
    pub path: PathBuf,
}

impl FileArrival {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }
}

/// How an ingestion job ended, if it did not fail on I/O.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngestOutcome {
    /// The report was produced and handed over to the writer
    Written(Report),
    /// The report was produced but the writer failed to store it
    WriteFailed(Report),
    /// Shutdown was requested before the file was fully read; nothing was written
    Cancelled,
}

/// Reads the arrived file line by line into a fresh [`Aggregator`] and hands the resulting report
/// to `writer`, which runs on the blocking thread pool.
///
/// Rejected lines are logged and skipped. Failing to open or read the file aborts the job with an
/// error before anything is written.
pub async fn ingest_file(
    arrival: &FileArrival,
    writer: Arc<dyn ReportWriter>,
    cancel: &CancellationToken,
) -> Result<IngestOutcome, Error> {
    let aggregator = Aggregator::new();

    info!("start reading file");
    let file = File::open(&arrival.path)
        .await
        .map_err(|e| io_error(&arrival.path, e))?;
    let mut lines = BufReader::new(file).lines();

    let mut line_number = 0usize;
    loop {
        let next = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                warn!(line = line_number, "shutdown requested, discarding partial results");
                return Ok(IngestOutcome::Cancelled);
            }
            next = lines.next_line() => next.map_err(|e| io_error(&arrival.path, e))?,
        };
        let Some(line) = next else {
            break;
        };
        line_number += 1;

        match parse_line(&line) {
            Ok(record) => {
                let kind = record.kind();
                if !aggregator.try_add(record) {
                    warn!(line = line_number, %kind, "record was not aggregated");
                }
            }
            Err(e) => warn!(line = line_number, error = %e, "skipping line"),
        }
    }

    info!(lines = line_number, "start generating report");
    let report = aggregator.report();

    info!("start writing report");
    let written = {
        let file_name = arrival.name.clone();
        let report = report.clone();
        tokio::task::spawn_blocking(move || writer.write(&file_name, &report)).await
    };
    match written {
        Ok(Ok(())) => {
            info!("report written");
            Ok(IngestOutcome::Written(report))
        }
        Ok(Err(e)) => {
            warn!(error = %e, "failed to write report");
            Ok(IngestOutcome::WriteFailed(report))
        }
        Err(e) => {
            warn!(error = %e, "report writer did not finish");
            Ok(IngestOutcome::WriteFailed(report))
        }
    }
}

/// Puts the ingestion of `arrival` on the queue.
pub fn enqueue_file(queue: &JobQueue, arrival: FileArrival, writer: Arc<dyn ReportWriter>) {
    queue.enqueue(move |cancel| {
        let span = info_span!("ingest", file = %arrival.name);
        async move {
            ingest_file(&arrival, writer, &cancel).await?;
            anyhow::Ok(())
        }
        .instrument(span)
    });
}
