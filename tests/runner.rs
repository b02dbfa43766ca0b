use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use taskrun::{
    elapsed_since, Error, RayonThreadPool, Result, TaskRunner, ThreadPool, WorkItem,
};

const TIMEOUT: Duration = Duration::from_secs(60);

#[test]
fn demonstration_runs_concurrently_on_two_workers() -> Result<()> {
    let mut runner = TaskRunner::start(2)?;
    let result = runner.run(WorkItem::demonstration(), TIMEOUT)?;
    assert!(result.completed);
    // five serialized 100ms steps per task, both tasks side by side
    assert!(result.elapsed_ms() >= 500);
    assert!(result.elapsed_ms() < 900);
    Ok(())
}

#[test]
fn one_worker_serializes_the_tasks() -> Result<()> {
    let mut runner = TaskRunner::start(1)?;
    let items = WorkItem::demonstration()
        .into_iter()
        .map(|item| item.delay(Duration::from_millis(40)))
        .collect();
    let result = runner.run(items, TIMEOUT)?;
    assert!(result.completed);
    assert!(result.elapsed_ms() >= 400);
    Ok(())
}

#[test]
fn demonstration_on_rayon() -> Result<()> {
    let mut runner = TaskRunner::with_pool(RayonThreadPool::new(2)?);
    let result = runner.run(WorkItem::demonstration(), TIMEOUT)?;
    assert!(result.completed);
    assert!(result.elapsed_ms() >= 500);
    Ok(())
}

#[test]
fn await_all_times_out() -> Result<()> {
    let mut runner = TaskRunner::start(1)?;
    runner.execute(|| thread::sleep(Duration::from_millis(500)))?;
    runner.shutdown();
    let start = Instant::now();
    assert!(!runner.await_all(Duration::from_millis(50)));
    assert!(elapsed_since(start) < Duration::from_millis(400));
    assert_eq!(runner.pending(), 1);
    assert!(runner.await_all(TIMEOUT));
    assert_eq!(runner.pending(), 0);
    Ok(())
}

#[test]
fn more_jobs_than_workers_all_finish() -> Result<()> {
    let mut runner = TaskRunner::start(2)?;
    let counter = Arc::new(AtomicUsize::new(0));
    for _ in 0..10 {
        let counter = Arc::clone(&counter);
        runner.execute(move || {
            thread::sleep(Duration::from_millis(10));
            counter.fetch_add(1, Ordering::SeqCst);
        })?;
    }
    runner.shutdown();
    assert!(runner.await_all(TIMEOUT));
    assert_eq!(counter.load(Ordering::SeqCst), 10);
    Ok(())
}

#[test]
fn interrupted_wait_returns_and_keeps_the_flag() -> Result<()> {
    let mut runner = TaskRunner::start(2)?;
    runner.execute(|| thread::sleep(Duration::from_secs(2)))?;
    runner.shutdown();

    let interrupter = runner.interrupter();
    let handle = thread::spawn(move || {
        thread::sleep(Duration::from_millis(50));
        interrupter.interrupt();
    });

    let start = Instant::now();
    assert!(!runner.await_all(TIMEOUT));
    assert!(elapsed_since(start) < Duration::from_secs(1));
    assert!(runner.is_interrupted());
    handle.join().unwrap();
    Ok(())
}

fn panicking_job_counts_as_finished<P: ThreadPool>() -> Result<()> {
    let mut runner = TaskRunner::with_pool(P::new(2)?);
    runner.execute(|| {
        panic_control::disable_hook_in_current_thread();
        panic!("job failed");
    })?;
    runner.execute(|| thread::sleep(Duration::from_millis(20)))?;
    runner.shutdown();
    assert!(runner.await_all(Duration::from_secs(5)));
    Ok(())
}

#[test]
fn panicking_job_on_shared_queue() -> Result<()> {
    panicking_job_counts_as_finished::<taskrun::SharedQueueThreadPool>()
}

#[test]
fn panicking_job_on_rayon() -> Result<()> {
    panicking_job_counts_as_finished::<RayonThreadPool>()
}

#[test]
fn start_rejects_zero_workers() {
    assert!(matches!(
        TaskRunner::start(0),
        Err(Error::InvalidWorkerCount(0))
    ));
}
