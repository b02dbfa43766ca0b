use log::{debug, error};

use crate::{Error, Result, ThreadPool};

/// Wrapper of rayon::ThreadPool
pub struct RayonThreadPool {
    inner: rayon::ThreadPool,
}

impl ThreadPool for RayonThreadPool {
    fn new(threads: u32) -> Result<Self> {
        if threads == 0 {
            return Err(Error::InvalidWorkerCount(threads));
        }
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads as usize)
            .thread_name(|i| format!("rayon-worker-{i}"))
            // rayon aborts the process on a panicking job unless a handler is set
            .panic_handler(|_| error!("Job panicked on a rayon worker"))
            .build()?;
        debug!("Rayon pool started with {threads} workers");
        Ok(RayonThreadPool { inner: pool })
    }

    fn spawn<F>(&self, job: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.inner.spawn(job)
    }
}
