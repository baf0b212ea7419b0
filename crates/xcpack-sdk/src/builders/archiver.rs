//! Per-platform `xcodebuild archive`.

use std::path::PathBuf;

use crate::classify::archive_succeeded;
use crate::command::XcodebuildCommand;
use crate::report::Reporter;
use crate::runner::CommandRunner;
use crate::types::{ArchiveJob, PackError};

/// Builds the archive invocation for `job`.
///
/// Parameter order is fixed: project selector, scheme, configuration,
/// destination, archive path, then the two distribution overrides.
pub fn archive_command(job: &ArchiveJob) -> Result<String, PackError> {
    XcodebuildCommand::new("archive")
        .project(&job.project)
        .scheme(&job.scheme)
        .option("configuration", job.configuration.as_str())
        .option("destination", job.platform.destination())
        .option("archivePath", job.archive_path.to_string_lossy())
        .setting("SKIP_INSTALL", "NO")
        .setting("BUILD_LIBRARY_FOR_DISTRIBUTION", "YES")
        .build()
}

/// Archives one platform and returns the framework inside the archive.
///
/// Fails with [`PackError::Archive`] carrying the raw output when it lacks
/// `** ARCHIVE SUCCEEDED **`.
pub fn archive(
    job: &ArchiveJob,
    runner: &dyn CommandRunner,
    reporter: &dyn Reporter,
) -> Result<PathBuf, PackError> {
    let cmd = archive_command(job)?;
    reporter.info(&cmd);
    let output = runner.run(&cmd)?;
    if !archive_succeeded(&output) {
        return Err(PackError::Archive {
            platform: job.platform,
            output,
        });
    }
    Ok(job.framework_path())
}
