//! xcframework packaging pipeline
//!
//! This module drives a complete packaging run for one scheme: prepare the
//! output directory, clean, check that the scheme builds a library, archive
//! the device and simulator slices, and merge them into an xcframework.

use std::cell::Cell;
use std::path::{Path, PathBuf};

use super::{archiver, inspector, merger};
use crate::classify::clean_succeeded;
use crate::command::XcodebuildCommand;
use crate::report::Reporter;
use crate::runner::{CommandRunner, FileSystem};
use crate::types::{
    ArchiveJob, BuildScheme, Configuration, PackError, Platform, ProjectReference, RunOutcome,
    RunState,
};

/// Packages one scheme into `{output_dir}/{scheme}.xcframework`.
///
/// Runs are strictly sequential and stop at the first failing step. Two runs
/// must not target the same output directory at the same time; archives and
/// the final bundle would overwrite each other.
pub struct XcframeworkBuilder {
    project: ProjectReference,
    scheme: BuildScheme,
    output_dir: PathBuf,
    configuration: Configuration,
    verbose: bool,
    state: Cell<RunState>,
}

impl XcframeworkBuilder {
    /// Creates a new builder
    ///
    /// # Arguments
    ///
    /// * `project` - The `.xcodeproj` or `.xcworkspace` to package
    /// * `scheme` - Scheme that builds the library
    /// * `output_dir` - Directory receiving the archives and the xcframework
    pub fn new(
        project: ProjectReference,
        scheme: BuildScheme,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            project,
            scheme,
            output_dir: output_dir.into(),
            configuration: Configuration::default(),
            verbose: false,
            state: Cell::new(RunState::Init),
        }
    }

    /// Sets the build configuration (default: Release)
    pub fn configuration(mut self, configuration: Configuration) -> Self {
        self.configuration = configuration;
        self
    }

    /// Enables verbose output
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// State reached by the most recent [`build`](Self::build).
    pub fn last_state(&self) -> RunState {
        self.state.get()
    }

    /// Runs the full pipeline
    ///
    /// This performs the following steps:
    /// 1. Create the output directory if it is missing
    /// 2. `xcodebuild clean`
    /// 3. Read `MACH_O_TYPE` from the build settings
    /// 4. Archive for device, then simulator (library targets only)
    /// 5. Merge both frameworks with `xcodebuild -create-xcframework`
    ///
    /// # Returns
    ///
    /// * `Ok(RunOutcome::Merged)` with the xcframework path
    /// * `Ok(RunOutcome::Skipped)` if the scheme does not build a library
    /// * `Err(PackError)` carrying the failing step's output
    pub fn build(
        &self,
        runner: &dyn CommandRunner,
        fs: &dyn FileSystem,
        reporter: &dyn Reporter,
    ) -> Result<RunOutcome, PackError> {
        self.state.set(RunState::Init);
        let result = self.run_steps(runner, fs, reporter);
        if result.is_err() {
            self.state.set(RunState::Failed);
        }
        result
    }

    fn run_steps(
        &self,
        runner: &dyn CommandRunner,
        fs: &dyn FileSystem,
        reporter: &dyn Reporter,
    ) -> Result<RunOutcome, PackError> {
        self.ensure_output_dir(runner, fs, reporter)?;
        self.state.set(RunState::DirReady);

        self.clean(runner, reporter)?;
        self.state.set(RunState::Cleaned);

        if self.verbose
            && let Ok(cmd) = inspector::settings_command(&self.project)
        {
            reporter.info(&cmd);
        }
        let artifact_type = inspector::detect_artifact_type(&self.project, runner, reporter);
        self.state.set(RunState::TypeChecked);
        if self.verbose {
            reporter.info(&format!("MACH_O_TYPE: {}", artifact_type.as_str()));
        }

        if !artifact_type.is_library() {
            reporter.warning(&format!(
                "Scheme {} does not build a library (MACH_O_TYPE: {}); nothing to package",
                self.scheme,
                artifact_type.as_str()
            ));
            self.state.set(RunState::Skipped);
            return Ok(RunOutcome::Skipped { artifact_type });
        }

        let mut frameworks = Vec::with_capacity(Platform::ALL.len());
        for job in self.archive_jobs() {
            frameworks.push(archiver::archive(&job, runner, reporter)?);
        }
        self.state.set(RunState::Archived);

        let xcframework = merger::merge(
            &frameworks,
            &self.output_dir,
            &self.scheme,
            runner,
            fs,
            reporter,
        )?;
        self.state.set(RunState::Merged);

        Ok(RunOutcome::Merged {
            xcframework,
            frameworks,
            artifact_type,
        })
    }

    /// Command lines a library run would issue, in order. Nothing is executed.
    pub fn plan(&self) -> Result<Vec<String>, PackError> {
        let mut commands = vec![
            mkdir_command(&self.output_dir)?,
            self.clean_command()?,
            inspector::settings_command(&self.project)?,
        ];
        let mut frameworks = Vec::new();
        for job in self.archive_jobs() {
            commands.push(archiver::archive_command(&job)?);
            frameworks.push(job.framework_path());
        }
        let destination = merger::xcframework_path(&self.output_dir, &self.scheme);
        commands.push(merger::merge_command(&frameworks, &destination)?);
        Ok(commands)
    }

    fn archive_jobs(&self) -> impl Iterator<Item = ArchiveJob> + '_ {
        Platform::ALL.into_iter().map(|platform| {
            ArchiveJob::new(
                self.project.clone(),
                self.scheme.clone(),
                platform,
                self.configuration,
                &self.output_dir,
            )
        })
    }

    fn ensure_output_dir(
        &self,
        runner: &dyn CommandRunner,
        fs: &dyn FileSystem,
        reporter: &dyn Reporter,
    ) -> Result<(), PackError> {
        if fs.exists(&self.output_dir) {
            return Ok(());
        }

        let cmd = mkdir_command(&self.output_dir)?;
        let output = runner
            .run(&cmd)
            .map_err(|e| PackError::DirectoryCreation {
                path: self.output_dir.clone(),
                output: e.to_string(),
            })?;
        if !output.is_empty() {
            reporter.info(&output);
        }

        if !fs.exists(&self.output_dir) {
            return Err(PackError::DirectoryCreation {
                path: self.output_dir.clone(),
                output,
            });
        }
        Ok(())
    }

    fn clean_command(&self) -> Result<String, PackError> {
        XcodebuildCommand::new("clean")
            .project(&self.project)
            .scheme(&self.scheme)
            .build()
    }

    fn clean(&self, runner: &dyn CommandRunner, reporter: &dyn Reporter) -> Result<(), PackError> {
        let cmd = self.clean_command()?;
        if self.verbose {
            reporter.info(&cmd);
        }
        let output = runner.run(&cmd)?;
        if !clean_succeeded(&output) {
            return Err(PackError::Clean(output));
        }
        Ok(())
    }
}

/// `mkdir -p <dir>`, quoting the path if it contains a space.
fn mkdir_command(dir: &Path) -> Result<String, PackError> {
    let path = dir.to_string_lossy();
    if path.contains('"') || path.chars().any(char::is_control) {
        return Err(PackError::InvalidParameter {
            key: "output".into(),
            reason: format!("output directory cannot be passed to the shell: {:?}", dir),
        });
    }
    if path.contains(' ') {
        Ok(format!("mkdir -p \"{}\"", path))
    } else {
        Ok(format!("mkdir -p {}", path))
    }
}
