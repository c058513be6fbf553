//! Report persistence and the final pass/fail assertion
//!
//! Writes the consolidated run report to disk, then asserts that every test
//! passed. The write always happens first so a failing run still leaves a
//! readable report behind.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::models::RunSummary;

/// Report file name inside the reports directory
const REPORT_FILE: &str = "acceptance_tests.json";

/// Run-level failure signaled to the caller
#[derive(Debug, Error)]
pub enum RunError {
    #[error("{failed} of {total} acceptance test(s) failed")]
    TestsFailed { failed: usize, total: usize },
}

/// Durable run report as written to disk
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StoredReport {
    /// Timestamp of the report write
    pub written_at: DateTime<Utc>,

    #[serde(flatten)]
    pub summary: RunSummary,
}

/// Writes the run report and performs the final pass/fail assertion
pub struct ReportsProcessor {
    reports_dir: PathBuf,
}

impl ReportsProcessor {
    pub fn new(reports_dir: impl Into<PathBuf>) -> Self {
        Self {
            reports_dir: reports_dir.into(),
        }
    }

    /// Path the report is written to
    pub fn report_path(&self) -> PathBuf {
        self.reports_dir.join(REPORT_FILE)
    }

    /// Persist the report, then fail the run if any test failed.
    pub fn write_report_and_ensure_all_tests_passed(&self, summary: &RunSummary) -> Result<()> {
        self.write_report(summary)?;
        self.ensure_all_tests_passed(summary)?;
        Ok(())
    }

    /// Write the consolidated report as pretty JSON
    pub fn write_report(&self, summary: &RunSummary) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.reports_dir).with_context(|| {
            format!(
                "Failed to create reports directory {}",
                self.reports_dir.display()
            )
        })?;

        let path = self.report_path();
        let report = StoredReport {
            written_at: Utc::now(),
            summary: summary.clone(),
        };

        let file = File::create(&path)
            .with_context(|| format!("Failed to create report file {}", path.display()))?;
        serde_json::to_writer_pretty(BufWriter::new(file), &report)
            .with_context(|| format!("Failed to write report {}", path.display()))?;

        info!("Wrote acceptance test report to {}", path.display());
        Ok(path)
    }

    /// Signal overall failure when any report item recorded success = false
    pub fn ensure_all_tests_passed(&self, summary: &RunSummary) -> Result<(), RunError> {
        if summary.all_passed() {
            Ok(())
        } else {
            Err(RunError::TestsFailed {
                failed: summary.failed,
                total: summary.total,
            })
        }
    }

    /// Load a previously written report
    pub fn load_report(path: impl AsRef<Path>) -> Result<StoredReport> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read report {}", path.as_ref().display()))?;
        serde_json::from_str(&content).context("Failed to parse report")
    }
}
