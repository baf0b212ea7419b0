//! Process execution and filesystem access.
//!
//! The orchestrator never touches `std::process` or `std::fs` directly; it
//! goes through [`CommandRunner`] and [`FileSystem`] so runs can be replayed
//! against scripted fakes in tests.
//!
//! The runner contract is thin: run one shell command line to completion and
//! return everything it printed on stdout. Exit codes are not inspected;
//! callers decide success from the text via [`crate::classify`]. stderr is
//! not captured and goes straight to the terminal, where xcodebuild prints
//! its `xcodebuild: error:` lines.

use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::types::PackError;

/// Default shell used to interpret command lines.
pub const DEFAULT_SHELL: &str = "/bin/zsh";

/// Runs a full command line and returns its captured stdout.
pub trait CommandRunner {
    /// Blocks until the command exits and all of its stdout has been read.
    fn run(&self, command_line: &str) -> Result<String, PackError>;
}

/// Filesystem probe used by the orchestrator.
pub trait FileSystem {
    fn exists(&self, path: &Path) -> bool;

    /// Removes a directory tree, or a single file.
    fn remove_all(&self, path: &Path) -> io::Result<()>;
}

/// Runs command lines through `<shell> -c`.
///
/// stdout is captured and returned; stderr is inherited from the calling
/// process.
#[derive(Debug, Clone)]
pub struct ShellRunner {
    shell: PathBuf,
}

impl Default for ShellRunner {
    fn default() -> Self {
        Self::new(DEFAULT_SHELL)
    }
}

impl ShellRunner {
    pub fn new(shell: impl Into<PathBuf>) -> Self {
        Self {
            shell: shell.into(),
        }
    }

    pub fn shell(&self) -> &Path {
        &self.shell
    }
}

impl CommandRunner for ShellRunner {
    fn run(&self, command_line: &str) -> Result<String, PackError> {
        let output = Command::new(&self.shell)
            .arg("-c")
            .arg(command_line)
            .stderr(Stdio::inherit())
            .output()
            .map_err(|e| {
                io::Error::new(
                    e.kind(),
                    format!("failed to start {}: {}", self.shell.display(), e),
                )
            })?;
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// [`FileSystem`] backed by `std::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFileSystem;

impl FileSystem for LocalFileSystem {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn remove_all(&self, path: &Path) -> io::Result<()> {
        if path.is_dir() {
            std::fs::remove_dir_all(path)
        } else {
            std::fs::remove_file(path)
        }
    }
}
