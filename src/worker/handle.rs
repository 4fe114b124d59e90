use log::error;
use std::thread::{self, JoinHandle};

/// Handle for managing a worker
pub(crate) struct WorkerHandle {
    idx: usize,
    thread_handle: JoinHandle<()>,
}

impl WorkerHandle {
    pub(crate) fn new(idx: usize, thread_handle: JoinHandle<()>) -> Self {
        Self { idx, thread_handle }
    }

    /// Wait for the worker thread to terminate
    pub(crate) fn join(self) -> thread::Result<()> {
        let res = self.thread_handle.join();
        if res.is_err() {
            error!("worker {} terminated abnormally", self.idx);
        }

        res
    }
}
