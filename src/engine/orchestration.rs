//! Module focusing on the way the lines of one input are distributed between worker threads

use std::{
    io::BufRead,
    sync::mpsc::{SyncSender, sync_channel},
    thread::Scope,
};

use crate::{
    Error,
    engine::Aggregator,
    error::line_error,
    input::parse_line,
};

///
/// Parses every line provided by the reader and feeds the records into a fresh aggregator.
/// Uses the calling thread only, so records are aggregated in file order.
///
pub(crate) fn aggregate_lines(
    reader: impl BufRead,
    mut on_error: impl FnMut(Error),
) -> Result<Aggregator, Error> {
    let aggregator = Aggregator::new();

    for (idx, line) in reader.lines().enumerate() {
        let line = line.map_err(Error::Read)?;
        match parse_line(&line) {
            Ok(record) => {
                aggregator.try_add(record);
            }
            Err(e) => on_error(line_error(idx + 1, e)),
        }
    }

    Ok(aggregator)
}

///
/// Parses every line provided by the reader and feeds the records into one shared aggregator.
/// Lines are distributed round-robin between `num_workers` threads, each parsing and aggregating
/// independently.
///
/// Counts and the most expensive sale do not depend on the order of the lines. Whether a sale is
/// credited to its salesperson does: a sale parsed by one worker may overtake the registration of
/// its salesperson on another.
///
pub(crate) fn aggregate_lines_parallel(
    reader: impl BufRead,
    on_error: impl FnMut(Error) + Send,
    num_workers: usize,
    channel_capacity: usize,
) -> Result<Aggregator, Error> {
    let num_workers = num_workers.max(1);
    let aggregator = Aggregator::new();

    std::thread::scope(|s| {
        let error_tx = spawn_error_handler(s, on_error, channel_capacity);
        let worker_senders =
            spawn_worker_threads(s, &aggregator, error_tx.clone(), num_workers, channel_capacity);
        drop(error_tx);

        for (idx, line) in reader.lines().enumerate() {
            let line = match line {
                Ok(line) => line,
                // Dropping the senders on return lets the workers drain and exit
                Err(e) => return Err(Error::Read(e)),
            };

            // Send fails only if the worker panicked; the scope surfaces that panic.
            let _ = worker_senders[idx % num_workers].send((idx + 1, line));
        }

        // end of input: the workers drain their channels and exit, which closes the error channel
        drop(worker_senders);
        Ok(())
    })?;

    Ok(aggregator)
}

fn spawn_error_handler<'s, 'e>(
    s: &'s Scope<'s, 'e>,
    mut on_error: impl FnMut(Error) + Send + 's,
    channel_capacity: usize,
) -> SyncSender<Error> {
    let (error_tx, error_rx) = sync_channel::<Error>(channel_capacity);

    s.spawn(move || {
        for err in error_rx {
            on_error(err)
        }
    });

    error_tx
}

fn spawn_worker_threads<'s, 'e>(
    s: &'s Scope<'s, 'e>,
    aggregator: &'e Aggregator,
    error_tx: SyncSender<Error>,
    num_workers: usize,
    channel_capacity: usize,
) -> Vec<SyncSender<(usize, String)>> {
    let mut worker_senders = Vec::with_capacity(num_workers);

    for _ in 0..num_workers {
        let (line_tx, line_rx) = sync_channel::<(usize, String)>(channel_capacity);
        let etx = error_tx.clone();

        s.spawn(move || {
            for (number, line) in line_rx {
                match parse_line(&line) {
                    Ok(record) => {
                        aggregator.try_add(record);
                    }
                    Err(e) => {
                        let _ = etx.send(line_error(number, e));
                    }
                }
            }
        });

        worker_senders.push(line_tx);
    }

    worker_senders
}
