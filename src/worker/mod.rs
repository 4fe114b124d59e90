pub(crate) mod handle;

use crate::{queue::JobQueue, PanicHandler};
use handle::WorkerHandle;
use log::{debug, error};
use std::{
    panic::{self, AssertUnwindSafe},
    sync::Arc,
    thread,
};

/// A worker executing queued jobs on a dedicated thread
pub(crate) struct Worker {
    idx: usize,
    queue: Arc<JobQueue>,
    panic_handler: Option<PanicHandler>,
}

impl Worker {
    pub(crate) fn new(
        idx: usize,
        queue: Arc<JobQueue>,
        panic_handler: Option<PanicHandler>,
    ) -> Self {
        Self {
            idx,
            queue,
            panic_handler,
        }
    }

    /// Start the worker
    pub(crate) fn run(self) -> WorkerHandle {
        let idx = self.idx;

        let thread_handle = thread::Builder::new()
            .name(format!("pool-worker-{idx}"))
            .spawn(move || self.worker_loop())
            .expect("failed to spawn worker thread");

        WorkerHandle::new(idx, thread_handle)
    }

    /// Worker execution loop: fetch one job, run it, record its completion,
    /// until shutdown leaves nothing to fetch.
    ///
    /// A worker never abandons a job mid-execution; shutdown only stops it
    /// from starting another one.
    fn worker_loop(self) {
        debug!("worker {} started", self.idx);

        while let Some(job) = self.queue.next_job() {
            // Execute the job and handle a potential panic
            if let Err(err) = panic::catch_unwind(AssertUnwindSafe(job)) {
                match &self.panic_handler {
                    Some(ph) => ph(err),
                    None => error!("worker {}: job panicked", self.idx),
                }
            }

            // Completion is recorded even when the job panicked
            self.queue.complete_job();
        }

        debug!("worker {} stopped", self.idx);
    }
}
