//! Scripted host for builder tests.
//!
//! [`FakeHost`] implements both [`CommandRunner`] and [`FileSystem`]. Responses
//! are matched by substring against the command line, first match wins. A
//! response with several texts hands them out in order and then repeats the
//! last one. Unmatched commands print nothing.

use std::cell::RefCell;
use std::collections::{BTreeSet, VecDeque};
use std::io;
use std::path::{Path, PathBuf};

use crate::runner::{CommandRunner, FileSystem};
use crate::types::PackError;

enum Reply {
    Text(VecDeque<String>),
    SpawnError,
}

#[derive(Default)]
pub(crate) struct FakeHost {
    replies: RefCell<Vec<(String, Reply)>>,
    existing: RefCell<BTreeSet<PathBuf>>,
    events: RefCell<Vec<String>>,
    calls: RefCell<Vec<String>>,
    removed: RefCell<Vec<PathBuf>>,
    mkdir_is_noop: bool,
    removal_fails: bool,
}

impl FakeHost {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn respond(self, needle: &str, text: &str) -> Self {
        self.respond_seq(needle, &[text])
    }

    pub(crate) fn respond_seq(self, needle: &str, texts: &[&str]) -> Self {
        let queue = texts.iter().map(|t| t.to_string()).collect();
        self.replies
            .borrow_mut()
            .push((needle.to_string(), Reply::Text(queue)));
        self
    }

    /// Commands containing `needle` fail as if the shell could not start.
    pub(crate) fn fail_on(self, needle: &str) -> Self {
        self.replies
            .borrow_mut()
            .push((needle.to_string(), Reply::SpawnError));
        self
    }

    pub(crate) fn with_existing(self, path: impl Into<PathBuf>) -> Self {
        self.existing.borrow_mut().insert(path.into());
        self
    }

    /// `mkdir -p` runs but the directory never appears.
    pub(crate) fn mkdir_is_noop(mut self) -> Self {
        self.mkdir_is_noop = true;
        self
    }

    pub(crate) fn fail_removal(mut self) -> Self {
        self.removal_fails = true;
        self
    }

    /// Every command line run, in order.
    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    /// Command lines and removals (`rm <path>`), interleaved in order.
    pub(crate) fn events(&self) -> Vec<String> {
        self.events.borrow().clone()
    }

    pub(crate) fn removed(&self) -> Vec<PathBuf> {
        self.removed.borrow().clone()
    }
}

impl CommandRunner for FakeHost {
    fn run(&self, command_line: &str) -> Result<String, PackError> {
        self.calls.borrow_mut().push(command_line.to_string());
        self.events.borrow_mut().push(command_line.to_string());

        if let Some(dir) = command_line.strip_prefix("mkdir -p ")
            && !self.mkdir_is_noop
        {
            self.existing
                .borrow_mut()
                .insert(PathBuf::from(dir.trim_matches('"')));
        }

        let mut replies = self.replies.borrow_mut();
        let Some((_, reply)) = replies
            .iter_mut()
            .find(|(needle, _)| command_line.contains(needle.as_str()))
        else {
            return Ok(String::new());
        };
        match reply {
            Reply::SpawnError => Err(PackError::Io(io::Error::new(
                io::ErrorKind::NotFound,
                "failed to start /bin/zsh",
            ))),
            Reply::Text(queue) if queue.len() > 1 => Ok(queue.pop_front().unwrap_or_default()),
            Reply::Text(queue) => Ok(queue.front().cloned().unwrap_or_default()),
        }
    }
}

impl FileSystem for FakeHost {
    fn exists(&self, path: &Path) -> bool {
        self.existing.borrow().contains(path)
    }

    fn remove_all(&self, path: &Path) -> io::Result<()> {
        if self.removal_fails {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "Operation not permitted",
            ));
        }
        self.events
            .borrow_mut()
            .push(format!("rm {}", path.display()));
        self.removed.borrow_mut().push(path.to_path_buf());
        self.existing.borrow_mut().remove(path);
        Ok(())
    }
}
