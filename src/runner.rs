use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use log::{debug, error, info, warn};

use crate::{Error, Result, SharedQueueThreadPool, ThreadPool, WorkItem};

/// Safety bound on how long a run waits for its jobs.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Default)]
struct State {
    pending: usize,
    interrupted: bool,
}

/// Pending-job counter and interruption flag, shared with every job and
/// every `Interrupter`.
#[derive(Default)]
struct Tracker {
    state: Mutex<State>,
    changed: Condvar,
}

impl Tracker {
    fn lock(&self) -> MutexGuard<'_, State> {
        // counter updates never panic midway, so a poisoned state is still valid
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Marks one job finished when dropped, which also covers a panicking job.
struct Completion(Arc<Tracker>);

impl Drop for Completion {
    fn drop(&mut self) {
        let mut state = self.0.lock();
        state.pending -= 1;
        if state.pending == 0 {
            self.0.changed.notify_all();
        }
    }
}

/// Handle used from another thread to interrupt `TaskRunner::await_all`.
#[derive(Clone)]
pub struct Interrupter(Arc<Tracker>);

impl Interrupter {
    pub fn interrupt(&self) {
        self.0.lock().interrupted = true;
        self.0.changed.notify_all();
    }
}

/// Outcome of `TaskRunner::run`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunResult {
    /// Whether every job finished before the timeout.
    pub completed: bool,
    pub elapsed: Duration,
}

impl RunResult {
    pub fn elapsed_ms(&self) -> u128 {
        self.elapsed.as_millis()
    }
}

/// Wall-clock time since `start`.
pub fn elapsed_since(start: Instant) -> Duration {
    start.elapsed()
}

/// Runs jobs on a fixed-size pool and waits for them with a bound.
pub struct TaskRunner<P: ThreadPool = SharedQueueThreadPool> {
    pool: Option<P>,
    tracker: Arc<Tracker>,
}

impl TaskRunner<SharedQueueThreadPool> {
    /// Starts a shared queue pool with `workers` slots.
    pub fn start(workers: u32) -> Result<Self> {
        Ok(TaskRunner::with_pool(SharedQueueThreadPool::new(workers)?))
    }
}

impl<P: ThreadPool> TaskRunner<P> {
    pub fn with_pool(pool: P) -> Self {
        TaskRunner {
            pool: Some(pool),
            tracker: Arc::default(),
        }
    }

    /// Queues a work item. Its output goes to stdout.
    pub fn submit(&self, item: WorkItem) -> Result<()> {
        debug!("Submitting {}", item.label());
        self.execute(move || {
            if let Err(e) = item.run() {
                error!("{} failed to write output: {e}", item.label());
            }
        })
    }

    /// Queues an arbitrary job and counts it towards `await_all`.
    pub fn execute<F>(&self, job: F) -> Result<()>
    where
        F: FnOnce() + Send + 'static,
    {
        let pool = self.pool.as_ref().ok_or(Error::Rejected)?;
        self.tracker.lock().pending += 1;
        let completion = Completion(Arc::clone(&self.tracker));
        pool.spawn(move || {
            let _completion = completion;
            job();
        });
        Ok(())
    }

    /// Stops accepting work. Already queued jobs still run.
    pub fn shutdown(&mut self) {
        if self.pool.take().is_some() {
            debug!("Runner shut down, {} jobs pending", self.pending());
        }
    }

    pub fn is_shutdown(&self) -> bool {
        self.pool.is_none()
    }

    pub fn pending(&self) -> usize {
        self.tracker.lock().pending
    }

    pub fn interrupter(&self) -> Interrupter {
        Interrupter(Arc::clone(&self.tracker))
    }

    /// Whether the wait has been interrupted. The flag stays set once raised.
    pub fn is_interrupted(&self) -> bool {
        self.tracker.lock().interrupted
    }

    /// Blocks until every submitted job has finished or `timeout` elapses.
    ///
    /// Returns `true` only if all jobs finished. An interruption ends the wait
    /// early with `false` and leaves the interruption flag set for the caller.
    pub fn await_all(&self, timeout: Duration) -> bool {
        // None means the deadline is too far out to represent
        let deadline = Instant::now().checked_add(timeout);
        let mut state = self.tracker.lock();
        loop {
            if state.pending == 0 {
                return true;
            }
            if state.interrupted {
                warn!("Wait interrupted with {} jobs pending", state.pending);
                return false;
            }
            state = match deadline {
                Some(deadline) => {
                    let now = Instant::now();
                    if now >= deadline {
                        info!(
                            "Timed out after {:?} with {} jobs pending",
                            timeout, state.pending
                        );
                        return false;
                    }
                    self.tracker
                        .changed
                        .wait_timeout(state, deadline - now)
                        .unwrap_or_else(PoisonError::into_inner)
                        .0
                }
                None => self
                    .tracker
                    .changed
                    .wait(state)
                    .unwrap_or_else(PoisonError::into_inner),
            };
        }
    }

    /// Submits `items`, shuts the runner down and waits up to `timeout`,
    /// timing the whole run from before the first submission.
    pub fn run(&mut self, items: Vec<WorkItem>, timeout: Duration) -> Result<RunResult> {
        let start = Instant::now();
        for item in items {
            self.submit(item)?;
        }
        self.shutdown();
        let completed = self.await_all(timeout);
        Ok(RunResult {
            completed,
            elapsed: elapsed_since(start),
        })
    }
}
