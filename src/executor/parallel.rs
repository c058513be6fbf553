//! Parallel test execution
//!
//! Fans tests out across a fixed-size worker pool draining a shared queue.

use std::collections::{BTreeMap, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use futures::future::join_all;
use tokio::sync::mpsc;
use tracing::debug;

use crate::models::{ReportItem, TestCase};
use crate::output::FailureEcho;
use crate::utils::Timer;

use super::run_single_test;

/// Parallel test runner
///
/// Worker count is the detected core count times a scaling factor. The factor
/// oversubscribes on the assumption that acceptance tests are I/O-bound.
pub struct ParallelRunner {
    scaling_factor: usize,
}

impl ParallelRunner {
    pub fn new(scaling_factor: usize) -> Self {
        Self { scaling_factor }
    }

    /// Number of workers the pool will spawn
    pub fn worker_count(&self) -> usize {
        (cpu_count() * self.scaling_factor).max(1)
    }

    /// Run all tests across the worker pool.
    ///
    /// Each worker makes a non-blocking claim from the pending queue; an
    /// empty claim terminates the worker permanently, it never re-polls.
    /// The queue is fully populated before any worker is spawned, so the
    /// claim-until-empty policy cannot drop work here. Result order is not
    /// guaranteed.
    pub async fn run(
        &self,
        tests: Vec<TestCase>,
        reports_dir: &Path,
        env: &BTreeMap<String, String>,
        echo: Arc<dyn FailureEcho>,
        verbose: bool,
    ) -> Result<(Vec<ReportItem>, u64)> {
        let worker_count = self.worker_count();
        debug!(
            "Running {} acceptance test(s) in parallel with {} workers ({} cpus found)",
            tests.len(),
            worker_count,
            cpu_count()
        );

        let timer = Timer::start("parallel acceptance test run");

        let pending: Arc<Mutex<VecDeque<TestCase>>> =
            Arc::new(Mutex::new(tests.into_iter().collect()));
        let (results_tx, mut results_rx) = mpsc::unbounded_channel();

        let mut workers = Vec::with_capacity(worker_count);
        for _ in 0..worker_count {
            workers.push(tokio::spawn(worker_loop(
                pending.clone(),
                results_tx.clone(),
                reports_dir.to_path_buf(),
                env.clone(),
                echo.clone(),
                verbose,
            )));
        }
        drop(results_tx);

        for joined in join_all(workers).await {
            joined.context("Worker task panicked")??;
        }

        let total_time_ms = timer.stop().as_millis() as u64;

        let mut items = Vec::new();
        while let Ok(item) = results_rx.try_recv() {
            items.push(item);
        }

        Ok((items, total_time_ms))
    }
}

impl Default for ParallelRunner {
    fn default() -> Self {
        Self::new(4)
    }
}

/// Claim tests until the queue reports empty, then exit.
async fn worker_loop(
    pending: Arc<Mutex<VecDeque<TestCase>>>,
    results: mpsc::UnboundedSender<ReportItem>,
    reports_dir: PathBuf,
    env: BTreeMap<String, String>,
    echo: Arc<dyn FailureEcho>,
    verbose: bool,
) -> Result<()> {
    loop {
        // One claim per probe; the lock is never held across the test run.
        let claimed = pending.lock().expect("pending queue poisoned").pop_front();

        let Some(test) = claimed else {
            break;
        };

        let item = run_single_test(&test, &reports_dir, &env, echo.as_ref(), verbose).await?;
        let _ = results.send(item);
    }

    Ok(())
}

fn cpu_count() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}
