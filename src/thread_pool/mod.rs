pub mod rayon;
pub mod shared_queue;

pub use shared_queue::SharedQueueThreadPool;
pub use crate::thread_pool::rayon::RayonThreadPool;

use crate::Result;

/// A pool with a fixed number of worker threads.
pub trait ThreadPool {
    /// Creates a pool with exactly `threads` workers. Zero is rejected.
    fn new(threads: u32) -> Result<Self>
    where
        Self: Sized;

    /// Queues `job` for execution on a free worker. Never blocks.
    fn spawn<F>(&self, job: F)
    where
        F: FnOnce() + Send + 'static;
}
