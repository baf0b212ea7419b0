//! Colored terminal output for packaging progress.

use colored::Colorize;
use xcpack_sdk::{MessageLevel, Reporter};

/// Prints info, success and warning messages to stdout and failures to
/// stderr, one color per level.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleReporter;

impl ConsoleReporter {
    pub fn new() -> Self {
        Self
    }
}

/// Renders `message` in the color assigned to `level`.
pub fn paint(level: MessageLevel, message: &str) -> String {
    match level {
        MessageLevel::Info => message.bright_yellow().to_string(),
        MessageLevel::Success => message.green().to_string(),
        MessageLevel::Warning => message.yellow().to_string(),
        MessageLevel::Failure => message.red().to_string(),
    }
}

impl Reporter for ConsoleReporter {
    fn report(&self, level: MessageLevel, message: &str) {
        let line = paint(level, message.trim_end());
        match level {
            MessageLevel::Failure => eprintln!("{}", line),
            _ => println!("{}", line),
        }
    }
}
