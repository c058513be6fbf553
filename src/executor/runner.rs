//! Test execution runner
//!
//! Orchestrates discovery, environment preparation and test execution.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::config::RunnerConfig;
use crate::discovery::discover_tests;
use crate::environment::build_environment;
use crate::models::{ReportItem, RunSummary, TestCase};
use crate::output::{ConsoleEcho, FailureEcho};
use crate::utils::Timer;

use super::{run_single_test, ParallelRunner};

/// Acceptance test runner
pub struct TestRunner {
    config: RunnerConfig,
    echo: Arc<dyn FailureEcho>,
}

impl TestRunner {
    /// Create a new test runner with console echo
    pub fn new(config: RunnerConfig) -> Self {
        Self {
            config,
            echo: Arc::new(ConsoleEcho),
        }
    }

    /// Replace the failure echo collaborator
    pub fn with_echo(mut self, echo: Arc<dyn FailureEcho>) -> Self {
        self.echo = echo;
        self
    }

    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    /// Discover the configured test set without running it
    pub fn discover(&self) -> Result<Vec<TestCase>> {
        discover_tests(&self.config.source_dir, &self.config.file_suffix)
    }

    /// Discover and execute all tests, producing a run summary.
    ///
    /// Every discovered test yields exactly one report item in both modes.
    pub async fn run_all(&self) -> Result<RunSummary> {
        let tests = self.discover()?;
        let reports_dir = self.prepare_reports_directory()?;
        let env = build_environment(&self.config);

        info!(
            "Executing {} acceptance test(s) from {}",
            tests.len(),
            self.config.source_dir
        );

        let (items, total_time_ms) = if self.config.parallel {
            let runner = ParallelRunner::new(self.config.cpu_scaling_factor);
            runner
                .run(
                    tests,
                    &reports_dir,
                    &env,
                    self.echo.clone(),
                    self.config.verbose,
                )
                .await?
        } else {
            self.run_sequentially(tests, &reports_dir, &env).await?
        };

        Ok(RunSummary::new(items, total_time_ms))
    }

    /// Run tests one at a time, in discovery order
    async fn run_sequentially(
        &self,
        tests: Vec<TestCase>,
        reports_dir: &Path,
        env: &BTreeMap<String, String>,
    ) -> Result<(Vec<ReportItem>, u64)> {
        debug!("Running acceptance tests sequentially");

        let timer = Timer::start("sequential acceptance test run");
        let mut items = Vec::with_capacity(tests.len());

        for test in &tests {
            let item = run_single_test(
                test,
                reports_dir,
                env,
                self.echo.as_ref(),
                self.config.verbose,
            )
            .await?;
            items.push(item);
        }

        let total_time_ms = timer.stop().as_millis() as u64;
        Ok((items, total_time_ms))
    }

    /// Resolve and create the reports directory. Failure here aborts the run.
    fn prepare_reports_directory(&self) -> Result<PathBuf> {
        let reports_dir = PathBuf::from(&self.config.reports_dir).join("acceptancetests");
        std::fs::create_dir_all(&reports_dir).with_context(|| {
            format!(
                "Failed to create reports directory {}",
                reports_dir.display()
            )
        })?;
        Ok(reports_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::recording::RecordingEcho;
    use std::collections::BTreeSet;
    use std::fs;
    use std::os::unix::fs::PermissionsExt;

    fn write_script(dir: &Path, name: &str, body: &str) {
        let path = dir.join(name);
        fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    }

    fn suite_config(source: &Path, reports: &Path) -> RunnerConfig {
        RunnerConfig {
            source_dir: source.to_string_lossy().into_owned(),
            file_suffix: "_tests.sh".to_string(),
            reports_dir: reports.to_string_lossy().into_owned(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_sequential_run_produces_item_per_test() {
        let source = tempfile::tempdir().unwrap();
        let reports = tempfile::tempdir().unwrap();
        write_script(source.path(), "a_tests.sh", "exit 0");
        write_script(source.path(), "b_tests.sh", "exit 1");
        write_script(source.path(), "c_tests.sh", "exit 0");

        let runner = TestRunner::new(suite_config(source.path(), reports.path()));
        let summary = runner.run_all().await.unwrap();

        assert_eq!(summary.total, 3);
        assert_eq!(summary.passed, 2);
        assert_eq!(summary.failed, 1);
    }

    #[tokio::test]
    async fn test_parallel_and_sequential_agree_on_test_set() {
        let source = tempfile::tempdir().unwrap();
        let reports = tempfile::tempdir().unwrap();
        for i in 0..5 {
            write_script(source.path(), &format!("t{i}_tests.sh"), "exit 0");
        }

        let sequential = TestRunner::new(suite_config(source.path(), reports.path()))
            .run_all()
            .await
            .unwrap();

        let mut parallel_config = suite_config(source.path(), reports.path());
        parallel_config.parallel = true;
        parallel_config.cpu_scaling_factor = 1;
        let parallel = TestRunner::new(parallel_config).run_all().await.unwrap();

        let seq_names: BTreeSet<_> = sequential.items.iter().map(|i| i.test.clone()).collect();
        let par_names: BTreeSet<_> = parallel.items.iter().map(|i| i.test.clone()).collect();
        assert_eq!(seq_names, par_names);
        assert_eq!(parallel.total, 5);
    }

    #[tokio::test]
    async fn test_empty_suite_is_not_an_error() {
        let source = tempfile::tempdir().unwrap();
        let reports = tempfile::tempdir().unwrap();

        let runner = TestRunner::new(suite_config(source.path(), reports.path()));
        let summary = runner.run_all().await.unwrap();

        assert_eq!(summary.total, 0);
        assert!(summary.all_passed());
    }

    #[tokio::test]
    async fn test_verbose_failure_echoes_before_run_ends() {
        let source = tempfile::tempdir().unwrap();
        let reports = tempfile::tempdir().unwrap();
        write_script(source.path(), "bad_tests.sh", "echo oops\nexit 1");

        let mut config = suite_config(source.path(), reports.path());
        config.verbose = true;

        let echo = Arc::new(RecordingEcho::default());
        let runner = TestRunner::new(config).with_echo(echo.clone());
        let summary = runner.run_all().await.unwrap();

        assert_eq!(summary.failed, 1);
        assert_eq!(echo.echoed.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_captures_land_in_reports_subdirectory() {
        let source = tempfile::tempdir().unwrap();
        let reports = tempfile::tempdir().unwrap();
        write_script(source.path(), "a_tests.sh", "echo out");

        let runner = TestRunner::new(suite_config(source.path(), reports.path()));
        runner.run_all().await.unwrap();

        let capture = reports.path().join("acceptancetests/a_tests");
        assert!(capture.exists());
        assert!(reports.path().join("acceptancetests/a_tests.err").exists());
    }
}
