use crate::{PoolError, ThreadPool};
use crossbeam::channel;
use parking_lot::Mutex;
use std::{
    collections::HashSet,
    num::NonZeroUsize,
    sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering},
        mpsc, Arc,
    },
    thread,
    time::Duration,
};

fn pool(threads: usize) -> ThreadPool {
    ThreadPool::builder()
        .threads(threads.try_into().unwrap())
        .build()
}

#[test]
fn executes_every_job_exactly_once() {
    let _ = env_logger::builder().is_test(true).try_init();

    let thread_count = num_cpus::get();
    let tp = pool(thread_count);

    let (tx, rx) = mpsc::channel();

    for _ in 0..thread_count {
        let tx = tx.clone();
        tp.spawn(move || {
            tx.send(1).unwrap();
        })
        .unwrap();
    }

    assert_eq!(rx.iter().take(thread_count).sum::<usize>(), thread_count);

    tp.wait_all();
    assert_eq!(tp.pending_jobs(), 0);
}

#[test]
fn thread_count_is_fixed_for_pool_lifetime() {
    let tp = pool(4);
    assert_eq!(tp.thread_count(), 4);

    tp.shutdown(true).unwrap();
    assert_eq!(tp.thread_count(), 4);
}

#[test]
fn single_worker_preserves_submission_order() {
    let tp = pool(1);
    let log = Arc::new(Mutex::new(Vec::new()));

    for i in 1..=3 {
        let log = Arc::clone(&log);
        tp.spawn(move || log.lock().push(i)).unwrap();
    }

    tp.wait_all();
    assert_eq!(*log.lock(), vec![1, 2, 3]);
}

#[test]
fn fan_out_runs_all_jobs_without_duplicates() {
    let tp = pool(4);
    let (tx, rx) = channel::unbounded();

    for i in 0..100 {
        let tx = tx.clone();
        tp.spawn(move || tx.send(i).unwrap()).unwrap();
    }
    drop(tx);

    tp.wait_all();

    let seen: HashSet<usize> = rx.iter().collect();
    assert_eq!(seen, (0..100).collect::<HashSet<usize>>());
}

#[test]
fn pending_jobs_counts_queued_and_executing() {
    let tp = pool(1);
    let (started_tx, started_rx) = mpsc::channel();
    let (release_tx, release_rx) = mpsc::channel::<()>();

    tp.spawn(move || {
        started_tx.send(()).unwrap();
        release_rx.recv().unwrap();
    })
    .unwrap();

    started_rx.recv().unwrap();

    for _ in 0..3 {
        tp.spawn(|| {}).unwrap();
    }

    // One job executing, three queued behind the single worker
    assert_eq!(tp.pending_jobs(), 4);

    release_tx.send(()).unwrap();
    tp.wait_all();
    assert_eq!(tp.pending_jobs(), 0);
}

#[test]
fn wait_all_returns_immediately_when_idle() {
    let tp = pool(2);
    tp.wait_all();
    assert_eq!(tp.pending_jobs(), 0);
}

#[test]
fn wait_all_observes_drain_from_another_thread() {
    let tp = Arc::new(pool(4));
    let counter = Arc::new(AtomicUsize::new(0));

    for _ in 0..32 {
        let counter = Arc::clone(&counter);
        tp.spawn(move || {
            thread::sleep(Duration::from_millis(1));
            counter.fetch_add(1, Ordering::Release);
        })
        .unwrap();
    }

    let waiter = {
        let tp = Arc::clone(&tp);
        thread::spawn(move || tp.wait_all())
    };

    waiter.join().unwrap();
    assert_eq!(counter.load(Ordering::Acquire), 32);
}

#[test]
fn shutdown_is_idempotent() {
    let tp = pool(2);

    let ran = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&ran);
    tp.spawn(move || flag.store(true, Ordering::Release)).unwrap();

    tp.shutdown(true).unwrap();
    tp.shutdown(true).unwrap();
    tp.shutdown(false).unwrap();

    assert!(ran.load(Ordering::Acquire));
}

#[test]
fn spawn_after_shutdown_is_rejected() {
    let tp = pool(2);
    tp.shutdown(true).unwrap();

    assert!(matches!(tp.spawn(|| {}), Err(PoolError::ShutDown)));
}

#[test]
fn fast_shutdown_drops_queued_jobs() {
    let tp = Arc::new(pool(1));
    let (started_tx, started_rx) = mpsc::channel();
    let (release_tx, release_rx) = mpsc::channel::<()>();

    tp.spawn(move || {
        started_tx.send(()).unwrap();
        release_rx.recv().unwrap();
    })
    .unwrap();

    // The single worker is now busy; anything spawned next stays queued
    started_rx.recv().unwrap();

    let dropped_ran = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&dropped_ran);
    tp.spawn(move || flag.store(true, Ordering::Release)).unwrap();

    let shutdown = {
        let tp = Arc::clone(&tp);
        thread::spawn(move || tp.shutdown(false).unwrap())
    };

    // Let the shutdown raise the stop state before the worker finishes its
    // current job
    thread::sleep(Duration::from_millis(200));
    release_tx.send(()).unwrap();
    shutdown.join().unwrap();

    assert!(!dropped_ran.load(Ordering::Acquire));
    assert_eq!(tp.pending_jobs(), 0);
}

#[test]
fn drop_drains_pending_jobs() {
    let counter = Arc::new(AtomicUsize::new(0));

    {
        let tp = pool(2);
        for _ in 0..50 {
            let counter = Arc::clone(&counter);
            tp.spawn(move || {
                counter.fetch_add(1, Ordering::Release);
            })
            .unwrap();
        }
    }

    assert_eq!(counter.load(Ordering::Acquire), 50);
}

#[test]
fn panicking_job_reports_and_keeps_the_pool_alive() {
    let _ = env_logger::builder().is_test(true).try_init();

    let caught = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&caught);

    let tp = ThreadPool::builder()
        .threads(NonZeroUsize::new(1).unwrap())
        .panic_handler(move |_| flag.store(true, Ordering::Release))
        .build();

    tp.spawn(|| panic!("boom")).unwrap();
    tp.wait_all();
    assert!(caught.load(Ordering::Acquire));

    // The worker survived and keeps executing
    let (tx, rx) = mpsc::channel();
    tp.spawn(move || tx.send(1).unwrap()).unwrap();
    assert_eq!(rx.recv().unwrap(), 1);

    tp.shutdown(true).unwrap();
}
