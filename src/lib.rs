mod builder;
mod error;
mod inner;
mod queue;
mod worker;

#[cfg(test)]
mod tests;

pub use builder::ThreadPoolBuilder;
pub use error::PoolError;

use inner::ThreadPoolInner;
use log::error;
use std::{any::Any, num::NonZeroUsize, sync::Arc};

/// Fixed-size thread pool executing jobs from a shared FIFO queue
pub struct ThreadPool(ThreadPoolInner);

impl ThreadPool {
    /// Thread pool builder
    pub fn builder() -> ThreadPoolBuilder {
        ThreadPoolBuilder::default()
    }

    /// Spawn a new job for the thread pool.
    ///
    /// The job is appended to the queue tail and picked up by the first
    /// idle worker; the queue is unbounded, so the caller is never blocked.
    /// Fails with [`PoolError::ShutDown`] once the pool has been shut down.
    pub fn spawn(&self, job: impl FnOnce() + Send + 'static) -> Result<(), PoolError> {
        self.0.spawn(Box::new(job))
    }

    /// Number of jobs submitted but not yet finished executing, queued and
    /// in-flight alike. A point-in-time snapshot, racy against concurrent
    /// [`spawn`](ThreadPool::spawn) and job completion, advisory only.
    pub fn pending_jobs(&self) -> usize {
        self.0.pending_jobs()
    }

    /// Wait for the thread pool to complete all jobs.
    ///
    /// Does not stop acceptance of new jobs: if other threads keep
    /// spawning, this returns at whichever moment the pending count
    /// touches zero.
    pub fn wait_all(&self) {
        self.0.wait_all()
    }

    /// Shut the pool down and join every worker thread.
    ///
    /// With `drain` set, every job submitted before the call is executed
    /// first. Without it, workers finish whatever they are currently
    /// running and jobs still queued are dropped unrun — "fire current,
    /// drop the rest", not a flush. Idempotent: repeated calls are safe
    /// and return without re-joining anything.
    pub fn shutdown(&self, drain: bool) -> Result<(), PoolError> {
        self.0.shutdown(drain)
    }

    /// The worker count the pool was built with
    pub fn thread_count(&self) -> usize {
        self.0.thread_count()
    }

    pub(crate) fn new(threads: NonZeroUsize, panic_handler: Option<PanicHandler>) -> Self {
        Self(ThreadPoolInner::new(threads, panic_handler))
    }
}

impl Drop for ThreadPool {
    // Draining shutdown, so every submitted job runs before the pool's
    // storage is released
    fn drop(&mut self) {
        if let Err(e) = self.0.shutdown(true) {
            error!("thread pool teardown failed: {e}");
        }
    }
}

/// Job for worker
pub type Job = Box<dyn FnOnce() + Send>;

/// Function that handles job panics
type PanicHandler = Arc<dyn Fn(Box<dyn Any + Send>) + Send + Sync>;
