use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;

use log::{debug, error};

use crate::{Error, Result, ThreadPool};

type Job = Box<dyn FnOnce() + Send + 'static>;

/// Fixed number of worker threads fed from one shared channel.
///
/// Dropping the pool closes the channel. Workers finish whatever is still
/// queued and then exit; the drop itself does not wait for them.
pub struct SharedQueueThreadPool {
    worker_num: u32,
    producer: Sender<Job>,
}

impl SharedQueueThreadPool {
    pub fn worker_num(&self) -> u32 {
        self.worker_num
    }
}

impl ThreadPool for SharedQueueThreadPool {
    fn new(worker_num: u32) -> Result<SharedQueueThreadPool> {
        if worker_num == 0 {
            return Err(Error::InvalidWorkerCount(worker_num));
        }
        let (producer, consumer) = mpsc::channel::<Job>();
        let consumer = Arc::new(Mutex::new(consumer));
        for id in 0..worker_num {
            let n_consumer = Arc::clone(&consumer);
            thread::Builder::new()
                .name(format!("shared-queue-worker-{id}"))
                .spawn(move || worker_loop(id, n_consumer))?;
        }
        debug!("Shared queue pool started with {worker_num} workers");
        Ok(SharedQueueThreadPool {
            worker_num,
            producer,
        })
    }

    fn spawn<F>(&self, job: F)
    where
        F: FnOnce() + Send + 'static,
    {
        // only fails once every worker has died
        if self.producer.send(Box::new(job)).is_err() {
            error!("No worker left to accept the job");
        }
    }
}

fn worker_loop(id: u32, consumer: Arc<Mutex<Receiver<Job>>>) {
    loop {
        // The guard is released at the end of this statement, before the job runs.
        let message = consumer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .recv();
        match message {
            Ok(job) => {
                if panic::catch_unwind(AssertUnwindSafe(job)).is_err() {
                    error!("Job panicked on worker {id}");
                }
            }
            Err(_) => {
                debug!("Queue closed, worker {id} exiting");
                return;
            }
        }
    }
}
