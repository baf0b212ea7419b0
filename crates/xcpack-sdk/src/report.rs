//! Leveled progress reporting.
//!
//! The SDK only emits messages; rendering (colors, streams) belongs to the
//! caller. The CLI implements [`Reporter`] with colored console output.

#[cfg(test)]
use std::cell::RefCell;

/// Severity of a reported message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Failure,
}

/// Sink for leveled messages.
pub trait Reporter {
    fn report(&self, level: MessageLevel, message: &str);

    fn info(&self, message: &str) {
        self.report(MessageLevel::Info, message);
    }

    fn success(&self, message: &str) {
        self.report(MessageLevel::Success, message);
    }

    fn warning(&self, message: &str) {
        self.report(MessageLevel::Warning, message);
    }

    fn failure(&self, message: &str) {
        self.report(MessageLevel::Failure, message);
    }
}

/// Discards every message.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullReporter;

impl Reporter for NullReporter {
    fn report(&self, _level: MessageLevel, _message: &str) {}
}

/// Keeps messages in memory, in the order they were reported.
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct RecordingReporter {
    messages: RefCell<Vec<(MessageLevel, String)>>,
}

#[cfg(test)]
impl RecordingReporter {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn messages(&self) -> Vec<(MessageLevel, String)> {
        self.messages.borrow().clone()
    }

    /// Messages reported at `level`.
    pub(crate) fn at(&self, level: MessageLevel) -> Vec<String> {
        self.messages
            .borrow()
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m.clone())
            .collect()
    }
}

#[cfg(test)]
impl Reporter for RecordingReporter {
    fn report(&self, level: MessageLevel, message: &str) {
        self.messages.borrow_mut().push((level, message.to_string()));
    }
}
