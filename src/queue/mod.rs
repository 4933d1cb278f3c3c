//! Module for the job queue decoupling file-arrival notifications from the workers processing them

use std::collections::VecDeque;
use std::fmt;

use futures::FutureExt;
use futures::future::BoxFuture;
use parking_lot::Mutex;
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;
use tracing::debug;


/// A deferred unit of work. It receives the shutdown token so long-running work can stop early.
pub type Job = Box<dyn FnOnce(CancellationToken) -> BoxFuture<'static, anyhow::Result<()>> + Send>;

/// Unbounded FIFO of [`Job`]s, safe for any number of producers and consumers.
///
/// Every enqueued job is handed to exactly one consumer. Consumers waiting in [`JobQueue::dequeue`]
/// are served in the order they started waiting.
pub struct JobQueue {
    jobs: Mutex<VecDeque<Job>>,
    // one permit per job in `jobs`
    available: Semaphore,
}

impl JobQueue {
    pub fn new() -> Self {
        Self {
            jobs: Mutex::new(VecDeque::new()),
            available: Semaphore::new(0),
        }
    }

    /// Appends a job. Never blocks, so it can be called from non-async contexts such as the
    /// callback thread of a file watcher.
    pub fn enqueue<F, Fut>(&self, job: F)
    where
        F: FnOnce(CancellationToken) -> Fut + Send + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        let job: Job = Box::new(move |token| job(token).boxed());
        self.jobs.lock().push_back(job);
        self.available.add_permits(1);
        debug!("job enqueued");
    }

    /// Waits until a job is available and takes it off the queue.
    ///
    /// Returns `None` once `cancel` fires. A cancelled wait does not consume a job.
    pub async fn dequeue(&self, cancel: &CancellationToken) -> Option<Job> {
        let permit = tokio::select! {
            biased;
            _ = cancel.cancelled() => return None,
            permit = self.available.acquire() => permit.ok()?,
        };
        // the job now belongs to this consumer: the permit is not given back
        permit.forget();

        let job = self.jobs.lock().pop_front();
        debug_assert!(job.is_some(), "a permit is only issued for a queued job");
        debug!("job dequeued");
        job
    }

    /// Number of jobs waiting for a consumer.
    pub fn len(&self) -> usize {
        self.jobs.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for JobQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for JobQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JobQueue")
            .field("pending", &self.len())
            .finish()
    }
}
