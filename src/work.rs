use std::io::{self, Write};
use std::thread;
use std::time::Duration;

pub const DEFAULT_ITERATIONS: u32 = 5;
pub const DEFAULT_DELAY: Duration = Duration::from_millis(100);

/// A labelled job that prints one line per iteration and sleeps between them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkItem {
    label: String,
    iterations: u32,
    delay: Duration,
}

impl WorkItem {
    pub fn new(label: impl Into<String>) -> WorkItem {
        WorkItem {
            label: label.into(),
            iterations: DEFAULT_ITERATIONS,
            delay: DEFAULT_DELAY,
        }
    }

    pub fn iterations(mut self, iterations: u32) -> WorkItem {
        self.iterations = iterations;
        self
    }

    pub fn delay(mut self, delay: Duration) -> WorkItem {
        self.delay = delay;
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// The two fixed jobs of the demonstration run, "Task 1" and "Task 2".
    pub fn demonstration() -> Vec<WorkItem> {
        vec![WorkItem::new("Task 1"), WorkItem::new("Task 2")]
    }

    /// Runs the item against stdout.
    pub fn run(&self) -> io::Result<()> {
        self.run_to(&mut io::stdout())
    }

    /// Writes `"<label> - Iteration <n>"` for n in 1..=iterations, sleeping
    /// the calling thread for the configured delay after each line.
    pub fn run_to<W: Write>(&self, out: &mut W) -> io::Result<()> {
        for i in 1..=self.iterations {
            writeln!(out, "{} - Iteration {}", self.label, i)?;
            out.flush()?;
            thread::sleep(self.delay);
        }
        Ok(())
    }
}
