use crate::{
    error::PoolError,
    queue::JobQueue,
    worker::{handle::WorkerHandle, Worker},
    Job, PanicHandler,
};
use log::debug;
use parking_lot::Mutex;
use std::{num::NonZeroUsize, sync::Arc};

pub(crate) struct ThreadPoolInner {
    queue: Arc<JobQueue>,
    /// Fixed worker set, emptied exactly once by the first completing
    /// shutdown; an empty set marks the pool as finalized
    workers: Mutex<Vec<WorkerHandle>>,
    thread_count: NonZeroUsize,
}

impl ThreadPoolInner {
    pub(crate) fn new(thread_count: NonZeroUsize, panic_handler: Option<PanicHandler>) -> Self {
        let queue = Arc::new(JobQueue::new());

        let workers = (0..thread_count.get())
            .map(|idx| Worker::new(idx, Arc::clone(&queue), panic_handler.clone()).run())
            .collect();

        ThreadPoolInner {
            queue,
            workers: Mutex::new(workers),
            thread_count,
        }
    }

    /// Add a job to the queue tail and wake one idle worker
    pub(crate) fn spawn(&self, job: Job) -> Result<(), PoolError> {
        self.queue.push(job)
    }

    /// Advisory count of jobs submitted but not yet finished executing
    pub(crate) fn pending_jobs(&self) -> usize {
        self.queue.pending_jobs()
    }

    /// Block until every pending job has finished executing
    pub(crate) fn wait_all(&self) {
        self.queue.wait_all()
    }

    pub(crate) fn thread_count(&self) -> usize {
        self.thread_count.get()
    }

    /// Shut the pool down and join every worker thread.
    ///
    /// With `drain` set, the pending counter is drained before workers are
    /// told to stop, so every job submitted prior to the call executes.
    /// Without it, jobs still queued when the workers observe the stop are
    /// dropped unrun.
    pub(crate) fn shutdown(&self, drain: bool) -> Result<(), PoolError> {
        let mut workers = self.workers.lock();

        // Already finalized. A concurrent second call serializes on the
        // workers lock and takes this path without re-joining anything.
        if workers.is_empty() {
            return Ok(());
        }

        if drain {
            self.queue.wait_all();
        }

        self.queue.begin_shutdown();

        let mut join_failed = false;
        for handle in workers.drain(..) {
            if handle.join().is_err() {
                join_failed = true;
            }
        }

        let discarded = self.queue.discard_remaining();
        if discarded > 0 {
            debug!("discarded {discarded} queued jobs on shutdown");
        }

        if join_failed {
            return Err(PoolError::WorkerPanicked);
        }

        Ok(())
    }
}
