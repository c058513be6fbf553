//! Environment variable configuration
//!
//! Provides environment variable overrides for configuration.

use std::env;

/// Environment variable prefix
const ENV_PREFIX: &str = "ACCRUN";

/// Environment configuration from environment variables
#[derive(Clone, Debug, Default)]
pub struct EnvConfig {
    /// Test source root from ACCRUN_SOURCE_DIR
    pub source_dir: Option<String>,
    /// Test filename suffix from ACCRUN_SUFFIX
    pub file_suffix: Option<String>,
    /// Reports directory from ACCRUN_REPORTS_DIR
    pub reports_dir: Option<String>,
    /// Parallel mode from ACCRUN_PARALLEL
    pub parallel: Option<bool>,
    /// Worker multiplier from ACCRUN_SCALING_FACTOR
    pub cpu_scaling_factor: Option<usize>,
    /// Host environment inheritance from ACCRUN_INHERIT_ENV
    pub inherit_environment: Option<bool>,
    /// Verbose from ACCRUN_VERBOSE
    pub verbose: Option<bool>,
    /// Config file from ACCRUN_CONFIG
    pub config_file: Option<String>,
}

impl EnvConfig {
    /// Load configuration from environment variables
    pub fn load() -> Self {
        Self {
            source_dir: get_env("SOURCE_DIR"),
            file_suffix: get_env("SUFFIX"),
            reports_dir: get_env("REPORTS_DIR"),
            parallel: get_env_bool("PARALLEL"),
            cpu_scaling_factor: get_env_parse("SCALING_FACTOR"),
            inherit_environment: get_env_bool("INHERIT_ENV"),
            verbose: get_env_bool("VERBOSE"),
            config_file: get_env("CONFIG"),
        }
    }

    /// Check if any environment variables are set
    pub fn has_any(&self) -> bool {
        self.source_dir.is_some()
            || self.file_suffix.is_some()
            || self.reports_dir.is_some()
            || self.parallel.is_some()
            || self.cpu_scaling_factor.is_some()
            || self.inherit_environment.is_some()
            || self.verbose.is_some()
            || self.config_file.is_some()
    }
}

/// Get environment variable with prefix
fn get_env(name: &str) -> Option<String> {
    env::var(format!("{ENV_PREFIX}_{name}")).ok()
}

/// Get environment variable and parse to type
fn get_env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    get_env(name).and_then(|v| v.parse().ok())
}

/// Get environment variable as boolean
fn get_env_bool(name: &str) -> Option<bool> {
    get_env(name).map(|v| {
        matches!(
            v.to_lowercase().as_str(),
            "1" | "true" | "yes" | "on" | "enabled"
        )
    })
}

/// Builder for setting environment variables (useful for testing)
pub struct EnvBuilder {
    vars: Vec<(String, String)>,
}

impl EnvBuilder {
    /// Create a new environment builder
    pub fn new() -> Self {
        Self { vars: Vec::new() }
    }

    /// Set test source root
    pub fn source_dir(mut self, dir: impl Into<String>) -> Self {
        self.vars
            .push((format!("{ENV_PREFIX}_SOURCE_DIR"), dir.into()));
        self
    }

    /// Set test filename suffix
    pub fn suffix(mut self, suffix: impl Into<String>) -> Self {
        self.vars
            .push((format!("{ENV_PREFIX}_SUFFIX"), suffix.into()));
        self
    }

    /// Set parallel mode
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.vars
            .push((format!("{ENV_PREFIX}_PARALLEL"), parallel.to_string()));
        self
    }

    /// Set worker multiplier
    pub fn scaling_factor(mut self, factor: usize) -> Self {
        self.vars
            .push((format!("{ENV_PREFIX}_SCALING_FACTOR"), factor.to_string()));
        self
    }

    /// Set verbose
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.vars
            .push((format!("{ENV_PREFIX}_VERBOSE"), verbose.to_string()));
        self
    }

    /// Apply environment variables
    pub fn apply(self) {
        for (key, value) in self.vars {
            env::set_var(key, value);
        }
    }

    /// Apply and return guard that restores on drop
    pub fn apply_scoped(self) -> EnvGuard {
        let previous: Vec<_> = self
            .vars
            .iter()
            .map(|(k, _)| (k.clone(), env::var(k).ok()))
            .collect();

        self.apply();

        EnvGuard { previous }
    }
}

impl Default for EnvBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Guard that restores environment variables on drop
pub struct EnvGuard {
    previous: Vec<(String, Option<String>)>,
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for (key, value) in &self.previous {
            match value {
                Some(v) => env::set_var(key, v),
                None => env::remove_var(key),
            }
        }
    }
}
