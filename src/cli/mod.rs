//! CLI argument parsing
//!
//! Defines command-line interface using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Acceptance test discovery and execution tool
#[derive(Parser, Debug)]
#[command(name = "accrun")]
#[command(version)]
#[command(about = "Discover and run acceptance test scripts")]
#[command(long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Echo failing tests' captured output and enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Discover and execute acceptance tests
    Run(RunArgs),

    /// List discovered tests without running them
    List(ListArgs),

    /// Manage configuration
    Config(ConfigArgs),
}

/// Arguments for the run command
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Root directory scanned for test scripts
    #[arg(short, long)]
    pub source_dir: Option<String>,

    /// Filename suffix identifying a test script
    #[arg(long)]
    pub suffix: Option<String>,

    /// Directory holding the code under test
    #[arg(long)]
    pub dist_dir: Option<String>,

    /// Directory receiving captured output and the run report
    #[arg(short, long)]
    pub reports_dir: Option<String>,

    /// Run tests across a worker pool
    #[arg(short, long)]
    pub parallel: bool,

    /// Worker-count multiplier applied to the detected core count
    #[arg(long)]
    pub scaling_factor: Option<usize>,

    /// Inherit the host process environment
    #[arg(long)]
    pub inherit_env: bool,

    /// Extra KEY=VALUE environment entry for test processes (repeatable)
    #[arg(short, long = "env", value_name = "KEY=VALUE")]
    pub env: Vec<String>,

    /// Path to a YAML or JSON configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

/// Arguments for the list command
#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Root directory scanned for test scripts
    #[arg(short, long)]
    pub source_dir: Option<String>,

    /// Filename suffix identifying a test script
    #[arg(long)]
    pub suffix: Option<String>,

    /// Path to a YAML or JSON configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Print the effective configuration
    Show {
        /// Path to a YAML or JSON configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Write a default configuration file
    Init {
        /// Output path
        #[arg(default_value = "accrun.yaml")]
        path: PathBuf,
    },
}
