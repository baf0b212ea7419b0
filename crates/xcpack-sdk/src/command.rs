//! xcodebuild command-line construction.
//!
//! Commands are handed to a shell as a single string (see
//! [`crate::runner::CommandRunner`]), so every parameter is rendered with the
//! quoting rule xcodebuild users expect:
//!
//! | Kind | Rendering |
//! |------|-----------|
//! | [`ParameterKind::Option`] | `-key value` |
//! | [`ParameterKind::Setting`] | `key=value` |
//!
//! Values containing a space are wrapped in double quotes. Keys or values
//! containing a double quote or a control character are rejected, since they
//! cannot be represented without shell escaping.

use crate::types::{BuildScheme, PackError, ProjectReference};

/// Executable every serialized command starts with.
pub const XCODEBUILD: &str = "xcodebuild";

/// How a parameter is spelled on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterKind {
    /// A dash-prefixed flag followed by its value.
    Option,
    /// A build-setting override (`KEY=VALUE`).
    Setting,
}

/// One key/value pair of an xcodebuild invocation.
///
/// Two parameters are equal when their keys are equal, regardless of value
/// or kind.
#[derive(Debug, Clone)]
pub struct CommandParameter {
    pub key: String,
    pub value: String,
    pub kind: ParameterKind,
}

impl PartialEq for CommandParameter {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for CommandParameter {}

impl CommandParameter {
    pub fn option(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            kind: ParameterKind::Option,
        }
    }

    pub fn setting(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            kind: ParameterKind::Setting,
        }
    }

    /// Renders this parameter, failing if it cannot be expressed safely.
    pub fn render(&self) -> Result<String, PackError> {
        self.validate()?;
        let value = if self.value.contains(' ') {
            format!("\"{}\"", self.value)
        } else {
            self.value.clone()
        };
        Ok(match self.kind {
            ParameterKind::Option => format!("-{} {}", self.key, value),
            ParameterKind::Setting => format!("{}={}", self.key, value),
        })
    }

    fn validate(&self) -> Result<(), PackError> {
        let reject = |reason: &str| PackError::InvalidParameter {
            key: self.key.clone(),
            reason: reason.to_string(),
        };
        if self.key.is_empty() {
            return Err(reject("key must not be empty"));
        }
        if self.key.chars().any(|c| c.is_whitespace() || c == '"' || c == '=') {
            return Err(reject("key must not contain whitespace, quotes or '='"));
        }
        if self.value.contains('"') {
            return Err(reject("value must not contain a double quote"));
        }
        if self.value.chars().any(char::is_control) {
            return Err(reject("value must not contain control characters"));
        }
        Ok(())
    }
}

/// Serializes `xcodebuild <subcommand> <parameters...>`.
///
/// Parameters are rendered in the order given and repeated keys are kept
/// (xcodebuild expects one `-framework` per slice, for example).
///
/// # Example
///
/// ```
/// use xcpack_sdk::command::{serialize, CommandParameter};
///
/// let cmd = serialize(
///     "archive",
///     &[
///         CommandParameter::option("destination", "generic/platform=iOS Simulator"),
///         CommandParameter::setting("SKIP_INSTALL", "NO"),
///     ],
/// )?;
/// assert_eq!(
///     cmd,
///     "xcodebuild archive -destination \"generic/platform=iOS Simulator\" SKIP_INSTALL=NO"
/// );
/// # Ok::<(), xcpack_sdk::PackError>(())
/// ```
pub fn serialize(subcommand: &str, parameters: &[CommandParameter]) -> Result<String, PackError> {
    if subcommand.trim().is_empty() {
        return Err(PackError::Config("xcodebuild subcommand must not be empty".into()));
    }
    let mut cmd = format!("{} {}", XCODEBUILD, subcommand);
    for parameter in parameters {
        cmd.push(' ');
        cmd.push_str(&parameter.render()?);
    }
    Ok(cmd)
}

/// Builder for a single xcodebuild invocation.
///
/// Parameters are appended in call order; [`build`](Self::build) validates
/// and returns the immutable command line.
///
/// ```
/// use xcpack_sdk::command::XcodebuildCommand;
/// use xcpack_sdk::{BuildScheme, ProjectReference};
///
/// let project = ProjectReference::new("Foo.xcodeproj")?;
/// let scheme = BuildScheme::new("Foo")?;
/// let cmd = XcodebuildCommand::new("clean")
///     .project(&project)
///     .scheme(&scheme)
///     .build()?;
/// assert_eq!(cmd, "xcodebuild clean -project Foo.xcodeproj -scheme Foo");
/// # Ok::<(), xcpack_sdk::PackError>(())
/// ```
#[derive(Debug, Clone)]
pub struct XcodebuildCommand {
    subcommand: String,
    parameters: Vec<CommandParameter>,
}

impl XcodebuildCommand {
    pub fn new(subcommand: impl Into<String>) -> Self {
        Self {
            subcommand: subcommand.into(),
            parameters: Vec::new(),
        }
    }

    /// Adds `-project <path>` or `-workspace <path>`.
    pub fn project(self, project: &ProjectReference) -> Self {
        self.option(project.kind().selector(), project.path())
    }

    /// Adds `-scheme <name>`.
    pub fn scheme(self, scheme: &BuildScheme) -> Self {
        self.option("scheme", scheme.as_str())
    }

    pub fn option(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.push(CommandParameter::option(key, value));
        self
    }

    pub fn setting(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.push(CommandParameter::setting(key, value));
        self
    }

    pub fn parameters(&self) -> &[CommandParameter] {
        &self.parameters
    }

    pub fn build(&self) -> Result<String, PackError> {
        serialize(&self.subcommand, &self.parameters)
    }
}
