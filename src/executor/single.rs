//! Single test execution
//!
//! Runs one test script as an isolated child process with captured output.

use std::collections::BTreeMap;
use std::fs::File;
use std::path::Path;
use std::process::Stdio;

use anyhow::{Context, Result};
use tokio::process::Command;
use tracing::{error, info};

use crate::models::{ReportItem, TestCase};
use crate::output::FailureEcho;
use crate::utils::Timer;

/// Run one test script and record its outcome.
///
/// The script is executed with no arguments and an explicit environment.
/// stdout goes to `<reports_dir>/<name>`, stderr to `<reports_dir>/<name>.err`.
/// A non-zero exit code is a failed [`ReportItem`], never an error; only an
/// inability to spawn the process (or open its capture files) is fatal.
///
/// There is no per-test timeout: a hung script blocks its caller. Known gap.
pub async fn run_single_test(
    test: &TestCase,
    reports_dir: &Path,
    env: &BTreeMap<String, String>,
    echo: &dyn FailureEcho,
    verbose: bool,
) -> Result<ReportItem> {
    info!("Running acceptance test {}", test.name);

    let report_file = reports_dir.join(&test.name);
    let error_file = reports_dir.join(format!("{}.err", test.name));

    let stdout = File::create(&report_file)
        .with_context(|| format!("Failed to create report file {}", report_file.display()))?;
    let stderr = File::create(&error_file)
        .with_context(|| format!("Failed to create error file {}", error_file.display()))?;

    let timer = Timer::start(format!("test {}", test.name));

    let status = Command::new(test.path())
        .env_clear()
        .envs(env)
        .stdin(Stdio::null())
        .stdout(Stdio::from(stdout))
        .stderr(Stdio::from(stderr))
        .spawn()
        .with_context(|| format!("Failed to spawn test process {}", test.path().display()))?
        .wait()
        .await
        .with_context(|| format!("Failed to wait for test process {}", test.name))?;

    let time_ms = timer.stop().as_millis() as u64;

    if status.success() {
        Ok(ReportItem::pass(&test.name, test.path(), time_ms))
    } else {
        error!("Acceptance test failed: {}", test.path().display());

        if verbose {
            echo.echo_file(&report_file);
            echo.echo_file(&error_file);
        }

        Ok(ReportItem::fail(&test.name, test.path(), time_ms))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::recording::RecordingEcho;
    use std::fs;
    use std::os::unix::fs::PermissionsExt;

    fn write_script(dir: &Path, name: &str, body: &str) -> TestCase {
        let path = dir.join(name);
        fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        TestCase::from_path(path)
    }

    #[tokio::test]
    async fn test_zero_exit_is_success() {
        let dir = tempfile::tempdir().unwrap();
        let reports = tempfile::tempdir().unwrap();
        let test = write_script(dir.path(), "ok_tests.sh", "echo hello\nexit 0");

        let echo = RecordingEcho::default();
        let item = run_single_test(&test, reports.path(), &BTreeMap::new(), &echo, false)
            .await
            .unwrap();

        assert!(item.success);
        assert_eq!(item.test, "ok_tests");
        let captured = fs::read_to_string(reports.path().join("ok_tests")).unwrap();
        assert_eq!(captured.trim(), "hello");
    }

    #[tokio::test]
    async fn test_nonzero_exit_is_failure_not_error() {
        let dir = tempfile::tempdir().unwrap();
        let reports = tempfile::tempdir().unwrap();
        let test = write_script(dir.path(), "bad_tests.sh", "echo boom >&2\nexit 1");

        let echo = RecordingEcho::default();
        let item = run_single_test(&test, reports.path(), &BTreeMap::new(), &echo, false)
            .await
            .unwrap();

        assert!(!item.success);
        let captured = fs::read_to_string(reports.path().join("bad_tests.err")).unwrap();
        assert_eq!(captured.trim(), "boom");
        // Not verbose, so nothing was echoed.
        assert!(echo.echoed.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_verbose_echoes_captured_output_on_failure() {
        let dir = tempfile::tempdir().unwrap();
        let reports = tempfile::tempdir().unwrap();
        let test = write_script(dir.path(), "bad_tests.sh", "exit 3");

        let echo = RecordingEcho::default();
        let item = run_single_test(&test, reports.path(), &BTreeMap::new(), &echo, true)
            .await
            .unwrap();

        assert!(!item.success);
        let echoed = echo.echoed.lock().unwrap();
        assert_eq!(echoed.len(), 2);
        assert_eq!(echoed[0], reports.path().join("bad_tests"));
        assert_eq!(echoed[1], reports.path().join("bad_tests.err"));
    }

    #[tokio::test]
    async fn test_verbose_passing_test_echoes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let reports = tempfile::tempdir().unwrap();
        let test = write_script(dir.path(), "ok_tests.sh", "exit 0");

        let echo = RecordingEcho::default();
        run_single_test(&test, reports.path(), &BTreeMap::new(), &echo, true)
            .await
            .unwrap();

        assert!(echo.echoed.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_environment_is_explicit() {
        let dir = tempfile::tempdir().unwrap();
        let reports = tempfile::tempdir().unwrap();
        let test = write_script(dir.path(), "env_tests.sh", "echo \"$STAGE\"");

        let mut env = BTreeMap::new();
        env.insert("STAGE".to_string(), "ci".to_string());
        env.insert(
            "PATH".to_string(),
            std::env::var("PATH").unwrap_or_default(),
        );

        let echo = RecordingEcho::default();
        run_single_test(&test, reports.path(), &env, &echo, false)
            .await
            .unwrap();

        let captured = fs::read_to_string(reports.path().join("env_tests")).unwrap();
        assert_eq!(captured.trim(), "ci");
    }

    #[tokio::test]
    async fn test_unspawnable_process_is_fatal() {
        let reports = tempfile::tempdir().unwrap();
        let test = TestCase::from_path("/nonexistent/ghost_tests.sh");

        let echo = RecordingEcho::default();
        let result = run_single_test(&test, reports.path(), &BTreeMap::new(), &echo, false).await;
        assert!(result.is_err());
    }
}
