//! Test execution engine
//!
//! Provides sequential and parallel test execution capabilities.

mod parallel;
mod runner;
mod single;

pub use parallel::ParallelRunner;
pub use runner::TestRunner;
pub use single::run_single_test;
