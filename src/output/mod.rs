//! Console output collaborators
//!
//! The executor reports failing-test output through an injected trait so it
//! stays testable without capturing the real console.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

/// Sink for a failing test's captured output files
pub trait FailureEcho: Send + Sync {
    /// Print the contents of a capture file to the operator console
    fn echo_file(&self, path: &Path);
}

/// Production echo that prints capture files to stdout
#[derive(Clone, Copy, Debug, Default)]
pub struct ConsoleEcho;

impl FailureEcho for ConsoleEcho {
    fn echo_file(&self, path: &Path) {
        match fs::read_to_string(path) {
            Ok(content) => {
                let mut stdout = io::stdout().lock();
                let _ = writeln!(stdout, "{content}");
            }
            Err(e) => {
                tracing::error!("Cannot echo {}: {}", path.display(), e);
            }
        }
    }
}

/// Echo that records requested paths, for tests
#[cfg(test)]
pub mod recording {
    use super::FailureEcho;
    use std::path::{Path, PathBuf};
    use std::sync::Mutex;

    #[derive(Debug, Default)]
    pub struct RecordingEcho {
        pub echoed: Mutex<Vec<PathBuf>>,
    }

    impl FailureEcho for RecordingEcho {
        fn echo_file(&self, path: &Path) {
            self.echoed.lock().unwrap().push(path.to_path_buf());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_console_echo_tolerates_missing_file() {
        // Must not panic when the capture file is gone.
        ConsoleEcho.echo_file(Path::new("/nonexistent/capture.out"));
    }
}
