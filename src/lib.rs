mod config;
mod domain;
mod engine;
mod error;
mod ingest;
mod input;
mod output;
mod queue;
mod service;
mod telemetry;
mod watch;
mod worker;

pub use config::{Config, LogFormat};
pub use domain::{Client, Item, Model, Money, Record, RecordKind, Report, Sale, Salesperson};
pub use engine::Aggregator;
pub use error::{Error, ParseError};
pub use ingest::{FileArrival, IngestOutcome, enqueue_file, ingest_file};
pub use input::parse_line;
pub use output::{JsonReportWriter, ReportWriter};
pub use queue::{Job, JobQueue};
pub use service::run;
pub use telemetry::setup_logging;
pub use watch::watch_input_dir;
pub use worker::{run_worker, spawn_workers};

/// Analyzes the sales data provided by `reader` and returns the report summarizing it.
///
/// This is the synchronous counterpart of the ingestion job run by the service: every line is
/// parsed into a record and fed into a fresh [`Aggregator`] in input order.
///
/// # Error handling
///
/// Input files routinely contain lines which do not follow the grammar. Instead of aborting on the
/// first bad line, `analyze` reports each of them as [`Error::Line`] to the caller-supplied
/// `on_error` callback and continues with the remaining input. Only failing to read from `reader`
/// aborts the analysis.
///
/// # Example
///
/// ```no_run
/// use std::{fs::File, io::BufReader};
/// use sales_analyzer::{Error, analyze};
///
/// let reader = BufReader::new(File::open("sales.txt").unwrap());
/// let report = analyze(reader, |e: Error| eprintln!("skipped: {e}")).unwrap();
/// println!("{}", serde_json::to_string(&report).unwrap());
/// ```
pub fn analyze(reader: impl std::io::BufRead, on_error: impl FnMut(Error)) -> Result<Report, Error> {
    let aggregator = engine::aggregate_lines(reader, on_error)?;
    Ok(aggregator.report())
}

/// Same as [`analyze`], but parses and aggregates the lines on `num_workers` threads.
///
/// Counts and the most expensive sale are identical to the sequential result. A sale is credited to
/// its salesperson only if the salesperson was registered by the time the sale is aggregated, which
/// depends on thread timing when both appear close to each other in the input.
pub fn analyze_parallel(
    reader: impl std::io::BufRead,
    on_error: impl FnMut(Error) + Send,
    num_workers: usize,
) -> Result<Report, Error> {
    const CHANNEL_CAPACITY: usize = 256;

    let aggregator =
        engine::aggregate_lines_parallel(reader, on_error, num_workers, CHANNEL_CAPACITY)?;
    Ok(aggregator.report())
}
