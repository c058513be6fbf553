//! Configuration module
//!
//! Handles loading and managing runner configuration.

mod env;

pub use env::{EnvBuilder, EnvConfig, EnvGuard};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Runner configuration
///
/// Every option has a documented default; a config file, `ACCRUN_*`
/// environment variables, and CLI flags overlay the defaults in that order.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    /// Root directory scanned for test scripts
    pub source_dir: String,

    /// Filename suffix identifying a test script
    pub file_suffix: String,

    /// Directory holding the code under test, prepended to the search path
    pub dist_dir: String,

    /// Directory receiving captured output and the run report
    pub reports_dir: String,

    /// Extra environment entries merged into each test's process environment.
    /// These always win over synthesized and inherited values.
    pub additional_environment: BTreeMap<String, String>,

    /// Inherit the host process environment (never overwrites existing keys)
    pub inherit_environment: bool,

    /// Run tests across a worker pool instead of one at a time
    pub parallel: bool,

    /// Worker-count multiplier applied to the detected core count.
    /// Oversubscribes on the assumption that tests are I/O-bound.
    pub cpu_scaling_factor: usize,

    /// Echo a failing test's captured output to the console
    pub verbose: bool,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            source_dir: "src/acceptancetests/python".to_string(),
            file_suffix: "_tests.py".to_string(),
            dist_dir: "target/dist".to_string(),
            reports_dir: "target/reports".to_string(),
            additional_environment: BTreeMap::new(),
            inherit_environment: false,
            parallel: false,
            cpu_scaling_factor: 4,
            verbose: false,
        }
    }
}

impl RunnerConfig {
    /// Load configuration from file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content =
            std::fs::read_to_string(path.as_ref()).context("Failed to read config file")?;

        let config: Self = if path
            .as_ref()
            .extension()
            .map(|e| e == "yaml" || e == "yml")
            .unwrap_or(false)
        {
            serde_yaml::from_str(&content).context("Failed to parse YAML config")?
        } else {
            serde_json::from_str(&content).context("Failed to parse JSON config")?
        };

        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = if path
            .as_ref()
            .extension()
            .map(|e| e == "yaml" || e == "yml")
            .unwrap_or(false)
        {
            serde_yaml::to_string(self).context("Failed to serialize config")?
        } else {
            serde_json::to_string_pretty(self).context("Failed to serialize config")?
        };

        std::fs::write(path, content).context("Failed to write config file")?;
        Ok(())
    }

    /// Overlay values from `ACCRUN_*` environment variables
    pub fn apply_env(&mut self, env: &EnvConfig) {
        if let Some(source_dir) = &env.source_dir {
            self.source_dir = source_dir.clone();
        }
        if let Some(suffix) = &env.file_suffix {
            self.file_suffix = suffix.clone();
        }
        if let Some(reports_dir) = &env.reports_dir {
            self.reports_dir = reports_dir.clone();
        }
        if let Some(parallel) = env.parallel {
            self.parallel = parallel;
        }
        if let Some(factor) = env.cpu_scaling_factor {
            self.cpu_scaling_factor = factor;
        }
        if let Some(inherit) = env.inherit_environment {
            self.inherit_environment = inherit;
        }
        if let Some(verbose) = env.verbose {
            self.verbose = verbose;
        }
    }
}
