//! Test discovery
//!
//! Walks the acceptance test source tree and collects every file whose name
//! ends with the configured suffix.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;
use walkdir::WalkDir;

use crate::models::TestCase;

/// Discover test scripts under `root` whose file name ends with `suffix`.
///
/// The scan is recursive. A missing root or a tree with no matches yields an
/// empty vec, not an error. No ordering is guaranteed.
pub fn discover_tests(root: impl AsRef<Path>, suffix: &str) -> Result<Vec<TestCase>> {
    let root = root.as_ref();

    if !root.exists() {
        debug!("Test source directory {} does not exist", root.display());
        return Ok(Vec::new());
    }

    // Absolute identities keep report items stable regardless of the
    // invocation working directory.
    let root = root
        .canonicalize()
        .with_context(|| format!("Failed to resolve test source root {}", root.display()))?;

    let mut tests = Vec::new();

    for entry in WalkDir::new(&root).into_iter().filter_map(|e| e.ok()) {
        if !entry.file_type().is_file() {
            continue;
        }
        if entry.file_name().to_string_lossy().ends_with(suffix) {
            tests.push(TestCase::from_path(entry.into_path()));
        }
    }

    debug!(
        "Discovered {} test(s) under {} with suffix {}",
        tests.len(),
        root.display(),
        suffix
    );

    Ok(tests)
}
