use std::fmt;
use std::time::Duration;

use clap::ValueEnum;
use serde::Serialize;

use crate::runner::DEFAULT_TIMEOUT;
use crate::work::{DEFAULT_DELAY, DEFAULT_ITERATIONS};
use crate::WorkItem;

pub const DEFAULT_WORKERS: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum PoolKind {
    #[default]
    #[value(name = "shared_queue")]
    SharedQueue,
    Rayon,
}

impl fmt::Display for PoolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PoolKind::SharedQueue => write!(f, "shared_queue"),
            PoolKind::Rayon => write!(f, "rayon"),
        }
    }
}

/// Everything one run needs. The default is the fixed two-task demonstration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunConfig {
    pub workers: u32,
    pub iterations: u32,
    pub delay_ms: u64,
    pub timeout_secs: u64,
    pub thread_pool: PoolKind,
}

impl Default for RunConfig {
    fn default() -> Self {
        RunConfig {
            workers: DEFAULT_WORKERS,
            iterations: DEFAULT_ITERATIONS,
            delay_ms: DEFAULT_DELAY.as_millis() as u64,
            timeout_secs: DEFAULT_TIMEOUT.as_secs(),
            thread_pool: PoolKind::default(),
        }
    }
}

impl RunConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// "Task 1" and "Task 2" with this config's iteration count and delay.
    pub fn work_items(&self) -> Vec<WorkItem> {
        WorkItem::demonstration()
            .into_iter()
            .map(|item| {
                item.iterations(self.iterations)
                    .delay(Duration::from_millis(self.delay_ms))
            })
            .collect()
    }
}
