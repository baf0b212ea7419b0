//! Artifact type detection from `xcodebuild -showBuildSettings`.

use regex_lite::Regex;

use crate::command::XcodebuildCommand;
use crate::report::Reporter;
use crate::runner::CommandRunner;
use crate::types::{ArtifactType, PackError, ProjectReference};

const MACH_O_TYPE_PATTERN: &str = r"(?i:MACH_O_TYPE) = ([0-9A-Za-z_-]+)";

/// Builds the settings dump invocation. No scheme is passed.
pub fn settings_command(project: &ProjectReference) -> Result<String, PackError> {
    XcodebuildCommand::new("-showBuildSettings")
        .project(project)
        .build()
}

/// Extracts the first `MACH_O_TYPE` token from a settings dump.
pub fn find_mach_o_type(settings: &str) -> Result<Option<String>, regex_lite::Error> {
    let re = Regex::new(MACH_O_TYPE_PATTERN)?;
    Ok(re
        .captures(settings)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string()))
}

/// Maps a settings dump to an [`ArtifactType`]; a missing setting is `Unknown`.
pub fn parse_mach_o_type(settings: &str) -> ArtifactType {
    match find_mach_o_type(settings) {
        Ok(Some(token)) => ArtifactType::from_mach_o_type(&token),
        _ => ArtifactType::Unknown,
    }
}

/// Runs the settings dump and classifies the product.
///
/// Never fails: command construction, execution or pattern errors are
/// reported as warnings and yield [`ArtifactType::Unknown`].
pub fn detect_artifact_type(
    project: &ProjectReference,
    runner: &dyn CommandRunner,
    reporter: &dyn Reporter,
) -> ArtifactType {
    let output = match settings_command(project).and_then(|cmd| runner.run(&cmd)) {
        Ok(output) => output,
        Err(e) => {
            reporter.warning(&format!("Could not read build settings: {}", e));
            return ArtifactType::Unknown;
        }
    };

    match find_mach_o_type(&output) {
        Ok(Some(token)) => ArtifactType::from_mach_o_type(&token),
        Ok(None) => ArtifactType::Unknown,
        Err(e) => {
            reporter.warning(&format!("Could not match MACH_O_TYPE: {}", e));
            ArtifactType::Unknown
        }
    }
}
