use clap::{arg, value_parser, Command};
use log::{debug, error, info, warn};
use std::process::exit;
use stderrlog::{self, LogLevelNum, Timestamp};
use taskrun::{
    Error, PoolKind, RayonThreadPool, Result, RunConfig, RunResult, SharedQueueThreadPool,
    TaskRunner, ThreadPool,
};

fn run<P: ThreadPool>(config: &RunConfig) -> Result<RunResult> {
    let mut runner = TaskRunner::with_pool(P::new(config.workers)?);
    runner.run(config.work_items(), config.timeout())
}

fn main() -> Result<()> {
    let matches = Command::new(env!("CARGO_PKG_NAME"))
        .version(env!("CARGO_PKG_VERSION"))
        .author(env!("CARGO_PKG_AUTHORS"))
        .about(env!("CARGO_PKG_DESCRIPTION"))
        .disable_help_subcommand(true)
        .args([
            arg!(-n --workers <N> "Number of worker threads in the pool. Default 2")
                .value_parser(value_parser!(u32)),
            arg!(-i --iterations <N> "Iterations each task runs. Default 5")
                .value_parser(value_parser!(u32)),
            arg!(-d --"delay-ms" <MS> "Milliseconds each iteration sleeps. Default 100")
                .value_parser(value_parser!(u64)),
            arg!(--"timeout-secs" <SECS> "Seconds to wait for all tasks before giving up. Default 60")
                .value_parser(value_parser!(u64)),
            arg!(-t --"thread-pool" <THREADPOOL_NAME> "Thread pool to run on.
                It must be one of shared_queue or rayon. Default shared_queue")
                .value_parser(value_parser!(PoolKind)),
            arg!(-v --verbose ... "Log more to stderr, repeat for more detail"),
        ])
        .get_matches();

    let verbosity = match matches.get_count("verbose") {
        0 => LogLevelNum::Warn,
        1 => LogLevelNum::Info,
        2 => LogLevelNum::Debug,
        _ => LogLevelNum::Trace,
    };
    if let Err(e) = stderrlog::new()
        .module(module_path!())
        .timestamp(Timestamp::Second)
        .verbosity(verbosity)
        .init()
    {
        eprintln!("Failed to set up logging: {e}");
    }

    let defaults = RunConfig::default();
    let config = RunConfig {
        workers: *matches.get_one::<u32>("workers").unwrap_or(&defaults.workers),
        iterations: *matches
            .get_one::<u32>("iterations")
            .unwrap_or(&defaults.iterations),
        delay_ms: *matches
            .get_one::<u64>("delay-ms")
            .unwrap_or(&defaults.delay_ms),
        timeout_secs: *matches
            .get_one::<u64>("timeout-secs")
            .unwrap_or(&defaults.timeout_secs),
        thread_pool: *matches
            .get_one::<PoolKind>("thread-pool")
            .unwrap_or(&defaults.thread_pool),
    };
    if let Ok(json) = serde_json::to_string(&config) {
        debug!("Config: {json}");
    }
    info!(
        "{} v{}, POOL: {}, WORKERS: {}",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        config.thread_pool,
        config.workers
    );

    let result = match config.thread_pool {
        PoolKind::SharedQueue => run::<SharedQueueThreadPool>(&config),
        PoolKind::Rayon => run::<RayonThreadPool>(&config),
    };
    let result = match result {
        Ok(result) => result,
        Err(e @ Error::InvalidWorkerCount(_)) => {
            error!("{e}");
            exit(1);
        }
        Err(e) => return Err(e),
    };

    if !result.completed {
        warn!(
            "Tasks still running after {} ms, giving up",
            result.elapsed_ms()
        );
    }
    println!("All tasks completed in: {} ms.", result.elapsed_ms());

    Ok(())
}
