//! Acceptance test discovery and execution.
//!
//! Discovers acceptance test scripts by filename suffix, executes each as an
//! isolated child process (sequentially or across a fixed-size worker pool),
//! captures per-test stdout/stderr to files, and writes a consolidated JSON
//! report before signaling overall pass/fail.

pub mod cli;
pub mod config;
pub mod discovery;
pub mod environment;
pub mod executor;
pub mod models;
pub mod output;
pub mod results;
pub mod utils;
