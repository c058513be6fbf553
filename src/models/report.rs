//! Test outcome records
//!
//! Defines the per-test report item and the run-level summary.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Outcome of a single test execution
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ReportItem {
    /// Test name (file stem)
    pub test: String,

    /// Path to the test script
    pub test_file: PathBuf,

    /// Wall-clock duration in milliseconds
    pub time_ms: u64,

    /// True when the process exited with code zero
    pub success: bool,
}

impl ReportItem {
    pub fn pass(test: impl Into<String>, test_file: impl Into<PathBuf>, time_ms: u64) -> Self {
        Self {
            test: test.into(),
            test_file: test_file.into(),
            time_ms,
            success: true,
        }
    }

    pub fn fail(test: impl Into<String>, test_file: impl Into<PathBuf>, time_ms: u64) -> Self {
        Self {
            test: test.into(),
            test_file: test_file.into(),
            time_ms,
            success: false,
        }
    }

    pub fn symbol(&self) -> &'static str {
        if self.success {
            "✓"
        } else {
            "✗"
        }
    }
}

impl fmt::Display for ReportItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} [{}ms]", self.symbol(), self.test, self.time_ms)
    }
}

/// Summary of one runner invocation
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,

    /// Wall-clock time of the whole run, not the sum of per-test times
    pub total_time_ms: u64,

    pub items: Vec<ReportItem>,
}

impl RunSummary {
    pub fn new(items: Vec<ReportItem>, total_time_ms: u64) -> Self {
        let total = items.len();
        let passed = items.iter().filter(|i| i.success).count();
        let failed = total - passed;

        Self {
            total,
            passed,
            failed,
            total_time_ms,
            items,
        }
    }

    pub fn pass_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            (self.passed as f64 / self.total as f64) * 100.0
        }
    }

    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━")?;
        for item in &self.items {
            writeln!(f, "  {item}")?;
        }
        writeln!(f, "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━")?;
        writeln!(
            f,
            "Total: {} | Pass: {} | Fail: {}",
            self.total, self.passed, self.failed
        )?;
        writeln!(
            f,
            "Pass Rate: {:.1}% | Duration: {}ms",
            self.pass_rate(),
            self.total_time_ms
        )
    }
}
