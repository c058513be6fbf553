//! accrun - acceptance test runner
//!
//! Discovers acceptance test scripts by filename suffix, executes each as an
//! isolated child process (sequentially or across a worker pool), captures
//! per-test stdout/stderr to files, writes a consolidated JSON report, and
//! exits non-zero if any test failed.
//!
//! ## Usage
//!
//! ```bash
//! # Run the suite sequentially
//! accrun run --source-dir src/acceptancetests/python
//!
//! # Fan out across a worker pool
//! accrun run --parallel --scaling-factor 4
//!
//! # Extra environment for the test processes
//! accrun run --inherit-env --env STAGE=ci
//!
//! # See what would run
//! accrun list
//! ```

use anyhow::{anyhow, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use accrun::cli::{Args, Command, ConfigAction, ListArgs, RunArgs};
use accrun::config::{EnvConfig, RunnerConfig};
use accrun::discovery;
use accrun::executor::TestRunner;
use accrun::results::{ReportsProcessor, RunError};
use accrun::utils::{init_logger, LogLevel};

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let level = if args.verbose {
        LogLevel::Debug
    } else {
        LogLevel::Info
    };
    init_logger(level);

    let outcome = match args.command {
        Command::Run(run_args) => run_tests(run_args, args.verbose).await,
        Command::List(list_args) => list_tests(list_args),
        Command::Config(config_args) => match config_args.action {
            ConfigAction::Show { config } => show_config(config),
            ConfigAction::Init { path } => init_config(path),
        },
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // A plain test failure is the expected unhappy path; everything
            // else is an operational error worth the full context chain.
            if e.downcast_ref::<RunError>().is_some() {
                tracing::error!("{e}");
            } else {
                tracing::error!("{e:#}");
            }
            ExitCode::FAILURE
        }
    }
}

async fn run_tests(args: RunArgs, verbose: bool) -> Result<()> {
    let mut config = load_base_config(args.config.as_deref())?;
    config.apply_env(&EnvConfig::load());

    if let Some(source_dir) = args.source_dir {
        config.source_dir = source_dir;
    }
    if let Some(suffix) = args.suffix {
        config.file_suffix = suffix;
    }
    if let Some(dist_dir) = args.dist_dir {
        config.dist_dir = dist_dir;
    }
    if let Some(reports_dir) = args.reports_dir {
        config.reports_dir = reports_dir;
    }
    if let Some(factor) = args.scaling_factor {
        config.cpu_scaling_factor = factor;
    }
    if args.parallel {
        config.parallel = true;
    }
    if args.inherit_env {
        config.inherit_environment = true;
    }
    if verbose {
        config.verbose = true;
    }
    for entry in &args.env {
        let (key, value) = entry
            .split_once('=')
            .ok_or_else(|| anyhow!("Invalid --env entry '{entry}', expected KEY=VALUE"))?;
        config
            .additional_environment
            .insert(key.to_string(), value.to_string());
    }

    let reports_dir = config.reports_dir.clone();
    let runner = TestRunner::new(config);
    let summary = runner.run_all().await?;

    println!("{summary}");

    let processor = ReportsProcessor::new(reports_dir);
    processor.write_report_and_ensure_all_tests_passed(&summary)?;

    Ok(())
}

fn list_tests(args: ListArgs) -> Result<()> {
    let mut config = load_base_config(args.config.as_deref())?;
    config.apply_env(&EnvConfig::load());

    if let Some(source_dir) = args.source_dir {
        config.source_dir = source_dir;
    }
    if let Some(suffix) = args.suffix {
        config.file_suffix = suffix;
    }

    let tests = discovery::discover_tests(&config.source_dir, &config.file_suffix)?;
    if tests.is_empty() {
        println!(
            "No tests matching *{} under {}",
            config.file_suffix, config.source_dir
        );
        return Ok(());
    }

    for test in &tests {
        println!("{}  ({})", test.name, test.path().display());
    }
    println!("{} test(s)", tests.len());

    Ok(())
}

fn show_config(path: Option<PathBuf>) -> Result<()> {
    let config = load_base_config(path.as_deref())?;
    println!("{}", serde_yaml::to_string(&config)?);
    Ok(())
}

fn init_config(path: PathBuf) -> Result<()> {
    RunnerConfig::default().save(&path)?;
    println!("Wrote default configuration to {}", path.display());
    Ok(())
}

/// Load config from an explicit file, the ACCRUN_CONFIG file, or defaults
fn load_base_config(path: Option<&Path>) -> Result<RunnerConfig> {
    if let Some(path) = path {
        return RunnerConfig::load(path);
    }
    if let Some(path) = EnvConfig::load().config_file {
        return RunnerConfig::load(path);
    }
    Ok(RunnerConfig::default())
}
