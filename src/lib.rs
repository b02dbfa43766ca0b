pub mod config;
pub mod error;
pub mod runner;
pub mod thread_pool;
pub mod work;

pub use config::{PoolKind, RunConfig};
pub use error::{Error, Result};
pub use runner::{elapsed_since, Interrupter, RunResult, TaskRunner};
pub use thread_pool::RayonThreadPool;
pub use thread_pool::SharedQueueThreadPool;
pub use thread_pool::ThreadPool;
pub use work::WorkItem;
