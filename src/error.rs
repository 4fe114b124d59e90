use thiserror::Error;

/// Errors reported by the thread pool.
#[derive(Debug, Error)]
pub enum PoolError {
    /// The pool has been shut down and no longer accepts jobs
    #[error("thread pool is shut down")]
    ShutDown,
    /// A worker thread panicked outside of a job and could not be joined
    #[error("worker thread panicked")]
    WorkerPanicked,
}
