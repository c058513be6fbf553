//! Execution environment builder
//!
//! Builds the environment mapping handed to each test process by layering a
//! synthesized search path, optionally the host environment, and explicit
//! overrides. Overrides always win; inheritance never overwrites.

use std::collections::BTreeMap;
use std::env;

use crate::config::RunnerConfig;

/// Name of the synthesized search-path variable
const SEARCH_PATH_VAR: &str = "PYTHONPATH";

/// Build the process environment for test execution.
///
/// Layering order is the contract: base search path first, then inherited
/// host variables (skipping keys already set), then additional entries
/// unconditionally on top.
pub fn build_environment(config: &RunnerConfig) -> BTreeMap<String, String> {
    let search_path = env::join_paths([&config.dist_dir, &config.source_dir])
        .map(|p| p.to_string_lossy().into_owned())
        .unwrap_or_else(|_| format!("{}:{}", config.dist_dir, config.source_dir));

    let mut environment = BTreeMap::new();
    environment.insert(SEARCH_PATH_VAR.to_string(), search_path);

    inherit_host_environment(&mut environment, config);
    apply_additional_keys(&mut environment, config);

    environment
}

fn inherit_host_environment(environment: &mut BTreeMap<String, String>, config: &RunnerConfig) {
    if !config.inherit_environment {
        return;
    }

    for (key, value) in env::vars() {
        environment.entry(key).or_insert(value);
    }
}

fn apply_additional_keys(environment: &mut BTreeMap<String, String>, config: &RunnerConfig) {
    for (key, value) in &config.additional_environment {
        environment.insert(key.clone(), value.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_search_path() {
        let config = RunnerConfig {
            dist_dir: "/work/dist".to_string(),
            source_dir: "/work/suite".to_string(),
            ..Default::default()
        };

        let env_map = build_environment(&config);
        assert_eq!(env_map.len(), 1);

        let search_path = env_map.get(SEARCH_PATH_VAR).unwrap();
        assert!(search_path.contains("/work/dist"));
        assert!(search_path.contains("/work/suite"));
    }

    #[test]
    fn test_overrides_always_win() {
        let mut config = RunnerConfig {
            inherit_environment: true,
            ..Default::default()
        };
        config
            .additional_environment
            .insert(SEARCH_PATH_VAR.to_string(), "/override".to_string());
        config
            .additional_environment
            .insert("STAGE".to_string(), "ci".to_string());

        let env_map = build_environment(&config);
        assert_eq!(env_map.get(SEARCH_PATH_VAR).unwrap(), "/override");
        assert_eq!(env_map.get("STAGE").unwrap(), "ci");
    }

    #[test]
    fn test_inheritance_never_overwrites() {
        // PATH is present in any sane host environment.
        let config = RunnerConfig {
            inherit_environment: true,
            ..Default::default()
        };

        let env_map = build_environment(&config);
        assert!(env_map.contains_key("PATH"));
        // The synthesized search path survives inheritance.
        let search_path = env_map.get(SEARCH_PATH_VAR).unwrap();
        assert!(search_path.contains("target/dist"));
    }

    #[test]
    fn test_no_inheritance_by_default() {
        let config = RunnerConfig::default();
        let env_map = build_environment(&config);
        assert!(!env_map.contains_key("PATH"));
    }
}
