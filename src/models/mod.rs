//! Data models for acceptance test execution
//!
//! This module contains all data structures used throughout the application.

mod report;
mod test_case;

pub use report::{ReportItem, RunSummary};
pub use test_case::TestCase;
