use crate::{error::PoolError, Job};
use atomic_enum::atomic_enum;
use parking_lot::{Condvar, Mutex};
use std::{
    collections::VecDeque,
    mem,
    sync::atomic::{AtomicUsize, Ordering},
};

/// Pool lifecycle. Transitions are one-way and always happen while the
/// queue lock is held, so workers and submitters observe them race-free.
#[atomic_enum]
pub(crate) enum PoolState {
    /// Accepting and executing jobs
    Running,
    /// Workers finish their current job and exit
    ShuttingDown,
    /// Workers joined, queue torn down, submissions rejected
    Finished,
}

/// Shared FIFO job queue and the synchronization around it.
///
/// Two independent condition/lock pairs: `job_available` wakes workers on
/// "queue non-empty or shutting down", `drained` wakes [`wait_all`] callers
/// once the pending counter reaches zero. Keeping them separate means a
/// submission never wakes drain-waiters and a drain check never wakes
/// workers.
///
/// [`wait_all`]: JobQueue::wait_all
pub(crate) struct JobQueue {
    jobs: Mutex<VecDeque<Job>>,
    job_available: Condvar,
    state: AtomicPoolState,
    /// Jobs submitted but not yet finished executing, queued and in-flight
    pending: AtomicUsize,
    drain_lock: Mutex<()>,
    drained: Condvar,
}

impl JobQueue {
    pub(crate) fn new() -> Self {
        Self {
            jobs: Mutex::new(VecDeque::new()),
            job_available: Condvar::new(),
            state: AtomicPoolState::new(PoolState::Running),
            pending: AtomicUsize::new(0),
            drain_lock: Mutex::new(()),
            drained: Condvar::new(),
        }
    }

    /// Append a job to the queue tail and wake one idle worker. Never
    /// blocks the caller.
    pub(crate) fn push(&self, job: Job) -> Result<(), PoolError> {
        let mut jobs = self.jobs.lock();

        if matches!(self.state.load(Ordering::Acquire), PoolState::Finished) {
            return Err(PoolError::ShutDown);
        }

        self.pending.fetch_add(1, Ordering::Release);
        jobs.push_back(job);
        self.job_available.notify_one();

        Ok(())
    }

    /// Fetch the next job, blocking while the queue is empty and the pool
    /// is still running. Returns `None` once shutdown has been initiated;
    /// the caller then exits without touching the pending counter.
    pub(crate) fn next_job(&self) -> Option<Job> {
        let mut jobs = self.jobs.lock();

        loop {
            if !matches!(self.state.load(Ordering::Acquire), PoolState::Running) {
                return None;
            }

            if let Some(job) = jobs.pop_front() {
                return Some(job);
            }

            self.job_available.wait(&mut jobs);
        }
    }

    /// Record one finished job and wake drain-waiters if it was the last
    pub(crate) fn complete_job(&self) {
        if self.pending.fetch_sub(1, Ordering::AcqRel) == 1 {
            let _guard = self.drain_lock.lock();
            self.drained.notify_all();
        }
    }

    /// Block until the pending counter reaches zero
    pub(crate) fn wait_all(&self) {
        if self.pending.load(Ordering::Acquire) == 0 {
            return;
        }

        let mut guard = self.drain_lock.lock();
        while self.pending.load(Ordering::Acquire) != 0 {
            self.drained.wait(&mut guard);
        }
    }

    /// Stop workers from taking new jobs and wake every blocked one so none
    /// keeps waiting for a job that may never arrive.
    pub(crate) fn begin_shutdown(&self) {
        let _jobs = self.jobs.lock();
        self.state.store(PoolState::ShuttingDown, Ordering::Release);
        self.job_available.notify_all();
    }

    /// Finalize the queue: reject future submissions, drop any job that is
    /// still queued and balance the pending counter accordingly. Returns
    /// the number of discarded jobs. Called after every worker has been
    /// joined.
    pub(crate) fn discard_remaining(&self) -> usize {
        let leftovers = {
            let mut jobs = self.jobs.lock();
            self.state.store(PoolState::Finished, Ordering::Release);
            mem::take(&mut *jobs)
        };

        // Job closures are dropped outside the lock
        let discarded = leftovers.len();
        drop(leftovers);

        if discarded > 0 && self.pending.fetch_sub(discarded, Ordering::AcqRel) == discarded {
            let _guard = self.drain_lock.lock();
            self.drained.notify_all();
        }

        discarded
    }

    /// Point-in-time snapshot of the pending counter; racy against
    /// concurrent submission and completion, advisory only.
    pub(crate) fn pending_jobs(&self) -> usize {
        self.pending.load(Ordering::Relaxed)
    }
}
