//! Core types for xcpack-sdk.
//!
//! This module defines the fundamental types used throughout the SDK:
//!
//! - [`PackError`] - Error taxonomy for every orchestration step
//! - [`ProjectReference`] / [`ProjectKind`] - The `.xcodeproj` or `.xcworkspace` being packaged
//! - [`BuildScheme`] - Validated, non-empty scheme name
//! - [`Platform`] - The fixed device/simulator pair archived on every run
//! - [`Configuration`] - Debug or Release
//! - [`ArtifactType`] - The Mach-O product kind reported by `MACH_O_TYPE`
//! - [`RunState`] / [`RunOutcome`] - Orchestrator progress and terminal results

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Error types for xcpack-sdk operations.
///
/// The run-step variants (`DirectoryCreation`, `Clean`, `Archive`, `Merge`,
/// `Removal`) are terminal for a packaging run and carry the raw text
/// captured from the failing step so callers can print it verbatim.
///
/// # Example
///
/// ```ignore
/// use xcpack_sdk::{PackError, Platform};
///
/// match builder.build(&runner, &fs, &reporter) {
///     Ok(outcome) => println!("{:?}", outcome),
///     Err(PackError::Archive { platform, output }) => {
///         eprintln!("archive for {} failed:\n{}", platform, output);
///     }
///     Err(e) => eprintln!("{}", e),
/// }
/// ```
#[derive(Debug, thiserror::Error)]
pub enum PackError {
    /// The output directory is still missing after `mkdir -p`.
    #[error("failed to create output directory {path:?}\n{output}")]
    DirectoryCreation {
        /// Directory that could not be created.
        path: PathBuf,
        /// Text printed by the `mkdir` invocation, if any.
        output: String,
    },

    /// `xcodebuild clean` did not report `** CLEAN SUCCEEDED **`.
    #[error("xcodebuild clean failed:\n{0}")]
    Clean(String),

    /// `xcodebuild archive` did not report `** ARCHIVE SUCCEEDED **`.
    #[error("xcodebuild archive failed for {platform}:\n{output}")]
    Archive {
        /// Platform whose archive step failed.
        platform: Platform,
        /// Raw archive output.
        output: String,
    },

    /// `xcodebuild -create-xcframework` printed output without `successfully`.
    #[error("xcodebuild -create-xcframework failed:\n{0}")]
    Merge(String),

    /// A stale `.xcframework` could not be removed before merging.
    #[error("failed to remove existing {path:?}: {detail}")]
    Removal {
        /// Path that could not be removed.
        path: PathBuf,
        /// Underlying filesystem error text.
        detail: String,
    },

    /// The project path does not end in `.xcodeproj` or `.xcworkspace`.
    #[error(
        "unrecognized project path: {0:?}\n\n\
         Pass the path to an Xcode project (.xcodeproj) or workspace (.xcworkspace)."
    )]
    UnrecognizedProject(String),

    /// A command parameter could not be rendered into a shell command line.
    #[error("invalid command parameter '{key}': {reason}")]
    InvalidParameter {
        /// Parameter key.
        key: String,
        /// Why the parameter was rejected.
        reason: String,
    },

    /// Invalid or missing configuration, such as an empty scheme.
    #[error("configuration error: {0}. Check xcpack.toml or CLI arguments")]
    Config(String),

    /// The shell used to run commands could not be started.
    #[error("I/O error: {0}. Check that the shell is installed and on PATH")]
    Io(#[from] std::io::Error),
}

impl PackError {
    /// Returns `true` for failures raised while a packaging step ran,
    /// including a shell that could not be started, as opposed to
    /// configuration or validation errors detected before anything ran.
    pub fn is_run_failure(&self) -> bool {
        matches!(
            self,
            PackError::DirectoryCreation { .. }
                | PackError::Clean(_)
                | PackError::Archive { .. }
                | PackError::Merge(_)
                | PackError::Removal { .. }
                | PackError::Io(_)
        )
    }
}

/// Kind of Xcode container, derived from the path suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectKind {
    /// A `.xcodeproj` bundle.
    XcodeProject,
    /// A `.xcworkspace` bundle.
    Workspace,
}

impl ProjectKind {
    /// Returns the `xcodebuild` option key that selects this kind.
    ///
    /// ```
    /// use xcpack_sdk::ProjectKind;
    ///
    /// assert_eq!(ProjectKind::XcodeProject.selector(), "project");
    /// assert_eq!(ProjectKind::Workspace.selector(), "workspace");
    /// ```
    pub fn selector(&self) -> &'static str {
        match self {
            ProjectKind::XcodeProject => "project",
            ProjectKind::Workspace => "workspace",
        }
    }
}

/// Path to the project or workspace being packaged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectReference {
    path: String,
    kind: ProjectKind,
}

impl ProjectReference {
    /// Creates a reference, deriving the kind from the path suffix.
    ///
    /// Trailing slashes are ignored so shell-completed bundle paths
    /// (`App.xcodeproj/`) are accepted.
    pub fn new(path: impl Into<String>) -> Result<Self, PackError> {
        let path = path.into();
        let trimmed = path.trim_end_matches('/');
        let kind = if trimmed.ends_with(".xcodeproj") {
            ProjectKind::XcodeProject
        } else if trimmed.ends_with(".xcworkspace") {
            ProjectKind::Workspace
        } else {
            return Err(PackError::UnrecognizedProject(path));
        };
        Ok(Self {
            path: trimmed.to_string(),
            kind,
        })
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn kind(&self) -> ProjectKind {
        self.kind
    }
}

impl fmt::Display for ProjectReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)
    }
}

/// Name of the Xcode scheme to archive. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildScheme(String);

impl BuildScheme {
    pub fn new(name: impl Into<String>) -> Result<Self, PackError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(PackError::Config("scheme name must not be empty".into()));
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BuildScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Target platform for one archive step.
///
/// Every run archives exactly [`Platform::ALL`], in that order.
///
/// # Example
///
/// ```
/// use xcpack_sdk::Platform;
///
/// assert_eq!(Platform::Device.display_name(), "iphoneos");
/// assert_eq!(Platform::Simulator.destination(), "generic/platform=iOS Simulator");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// Physical iOS devices.
    Device,
    /// iOS Simulator.
    Simulator,
}

impl Platform {
    /// Archive order used by the orchestrator.
    pub const ALL: [Platform; 2] = [Platform::Device, Platform::Simulator];

    /// SDK name used in archive file names.
    pub fn display_name(&self) -> &'static str {
        match self {
            Platform::Device => "iphoneos",
            Platform::Simulator => "iphonesimulator",
        }
    }

    /// Generic `-destination` expression passed to xcodebuild.
    pub fn destination(&self) -> &'static str {
        match self {
            Platform::Device => "generic/platform=iOS",
            Platform::Simulator => "generic/platform=iOS Simulator",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Build configuration passed as `-configuration`.
///
/// ```
/// use xcpack_sdk::Configuration;
///
/// assert_eq!(Configuration::Release.as_str(), "Release");
/// assert_eq!(Configuration::default(), Configuration::Release);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Configuration {
    Debug,
    #[default]
    Release,
}

impl Configuration {
    /// Returns the configuration name exactly as Xcode spells it.
    pub fn as_str(&self) -> &'static str {
        match self {
            Configuration::Debug => "Debug",
            Configuration::Release => "Release",
        }
    }
}

/// Mach-O product kind reported by the `MACH_O_TYPE` build setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactType {
    Executable,
    Bundle,
    Object,
    DynamicLibrary,
    StaticLibrary,
    /// Setting absent, unrecognized, or the settings dump could not be run.
    Unknown,
}

impl ArtifactType {
    /// Maps a `MACH_O_TYPE` token to an artifact type.
    ///
    /// ```
    /// use xcpack_sdk::ArtifactType;
    ///
    /// assert_eq!(ArtifactType::from_mach_o_type("mh_dylib"), ArtifactType::DynamicLibrary);
    /// assert_eq!(ArtifactType::from_mach_o_type(" staticlib "), ArtifactType::StaticLibrary);
    /// assert_eq!(ArtifactType::from_mach_o_type("mh_preload"), ArtifactType::Unknown);
    /// ```
    pub fn from_mach_o_type(token: &str) -> Self {
        match token.trim() {
            "mh_dylib" => ArtifactType::DynamicLibrary,
            "staticlib" => ArtifactType::StaticLibrary,
            "mh_execute" => ArtifactType::Executable,
            "mh_bundle" => ArtifactType::Bundle,
            "mh_object" => ArtifactType::Object,
            _ => ArtifactType::Unknown,
        }
    }

    /// Only libraries can be archived into an xcframework.
    pub fn is_library(&self) -> bool {
        matches!(self, ArtifactType::DynamicLibrary | ArtifactType::StaticLibrary)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ArtifactType::Executable => "mh_execute",
            ArtifactType::Bundle => "mh_bundle",
            ArtifactType::Object => "mh_object",
            ArtifactType::DynamicLibrary => "mh_dylib",
            ArtifactType::StaticLibrary => "staticlib",
            ArtifactType::Unknown => "unknown",
        }
    }
}

/// Everything needed to archive one platform slice.
///
/// Created once per platform per run and read-only afterwards.
#[derive(Debug, Clone)]
pub struct ArchiveJob {
    pub project: ProjectReference,
    pub scheme: BuildScheme,
    pub platform: Platform,
    pub configuration: Configuration,
    pub archive_path: PathBuf,
}

impl ArchiveJob {
    /// Creates a job whose archive lands at
    /// `{destination_dir}/{scheme}-{platform}.xcarchive`.
    pub fn new(
        project: ProjectReference,
        scheme: BuildScheme,
        platform: Platform,
        configuration: Configuration,
        destination_dir: &Path,
    ) -> Self {
        let archive_path = archive_path_for(destination_dir, &scheme, platform);
        Self {
            project,
            scheme,
            platform,
            configuration,
            archive_path,
        }
    }

    /// Framework inside the archive, per xcodebuild's archive layout.
    pub fn framework_path(&self) -> PathBuf {
        self.archive_path
            .join("Products/Library/Frameworks")
            .join(format!("{}.framework", self.scheme))
    }
}

pub(crate) fn archive_path_for(dir: &Path, scheme: &BuildScheme, platform: Platform) -> PathBuf {
    dir.join(format!("{}-{}.xcarchive", scheme, platform.display_name()))
}

/// Orchestrator progress. `Merged`, `Skipped` and `Failed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    Init,
    DirReady,
    Cleaned,
    TypeChecked,
    Archived,
    Merged,
    Skipped,
    Failed,
}

impl RunState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, RunState::Merged | RunState::Skipped | RunState::Failed)
    }
}

/// Successful end of a packaging run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Both platforms were archived and merged.
    Merged {
        xcframework: PathBuf,
        frameworks: Vec<PathBuf>,
        artifact_type: ArtifactType,
    },
    /// The scheme does not build a library; nothing was archived.
    Skipped { artifact_type: ArtifactType },
}

impl RunOutcome {
    pub fn state(&self) -> RunState {
        match self {
            RunOutcome::Merged { .. } => RunState::Merged,
            RunOutcome::Skipped { .. } => RunState::Skipped,
        }
    }

    pub fn artifact_type(&self) -> ArtifactType {
        match self {
            RunOutcome::Merged { artifact_type, .. } | RunOutcome::Skipped { artifact_type } => {
                *artifact_type
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_kind_from_suffix() {
        let project = ProjectReference::new("/src/App/App.xcodeproj").unwrap();
        assert_eq!(project.kind(), ProjectKind::XcodeProject);

        let workspace = ProjectReference::new("App.xcworkspace/").unwrap();
        assert_eq!(workspace.kind(), ProjectKind::Workspace);
        assert_eq!(workspace.path(), "App.xcworkspace");
    }

    #[test]
    fn test_unrecognized_project_is_error() {
        let err = ProjectReference::new("/src/App/Package.swift").unwrap_err();
        assert!(matches!(err, PackError::UnrecognizedProject(_)));
        assert!(!err.is_run_failure());
        assert!(ProjectReference::new("").is_err());
    }

    #[test]
    fn test_empty_scheme_rejected() {
        assert!(matches!(BuildScheme::new(""), Err(PackError::Config(_))));
        assert!(matches!(BuildScheme::new("   "), Err(PackError::Config(_))));
        assert_eq!(BuildScheme::new("Foo").unwrap().as_str(), "Foo");
    }

    #[test]
    fn test_platform_order() {
        assert_eq!(Platform::ALL, [Platform::Device, Platform::Simulator]);
        assert_eq!(Platform::Simulator.display_name(), "iphonesimulator");
        assert_eq!(Platform::Device.destination(), "generic/platform=iOS");
    }

    #[test]
    fn test_artifact_type_mapping() {
        assert_eq!(ArtifactType::from_mach_o_type("mh_execute"), ArtifactType::Executable);
        assert_eq!(ArtifactType::from_mach_o_type("mh_bundle"), ArtifactType::Bundle);
        assert_eq!(ArtifactType::from_mach_o_type("mh_object"), ArtifactType::Object);
        assert_eq!(ArtifactType::from_mach_o_type("MH_DYLIB"), ArtifactType::Unknown);
        assert!(ArtifactType::StaticLibrary.is_library());
        assert!(ArtifactType::DynamicLibrary.is_library());
        assert!(!ArtifactType::Executable.is_library());
        assert!(!ArtifactType::Unknown.is_library());
    }

    #[test]
    fn test_archive_job_paths() {
        let job = ArchiveJob::new(
            ProjectReference::new("Foo.xcodeproj").unwrap(),
            BuildScheme::new("Foo").unwrap(),
            Platform::Device,
            Configuration::Release,
            Path::new("/tmp/out"),
        );
        assert_eq!(job.archive_path, PathBuf::from("/tmp/out/Foo-iphoneos.xcarchive"));
        assert_eq!(
            job.framework_path(),
            PathBuf::from("/tmp/out/Foo-iphoneos.xcarchive/Products/Library/Frameworks/Foo.framework")
        );
    }

    #[test]
    fn test_archive_error_carries_output() {
        let err = PackError::Archive {
            platform: Platform::Simulator,
            output: "error: no such module".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("iphonesimulator"));
        assert!(msg.contains("error: no such module"));
        assert!(err.is_run_failure());
    }

    #[test]
    fn test_run_failure_split() {
        let spawn = PackError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "failed to start /bin/zsh",
        ));
        assert!(spawn.is_run_failure());
        assert!(PackError::Merge(String::new()).is_run_failure());
        assert!(!PackError::Config("scheme name must not be empty".into()).is_run_failure());
        assert!(
            !PackError::InvalidParameter {
                key: "scheme".into(),
                reason: "value must not contain a double quote".into(),
            }
            .is_run_failure()
        );
    }

    #[test]
    fn test_terminal_states() {
        assert!(RunState::Merged.is_terminal());
        assert!(RunState::Skipped.is_terminal());
        assert!(RunState::Failed.is_terminal());
        assert!(!RunState::Archived.is_terminal());
    }
}
