//! `xcodebuild -create-xcframework` over the archived frameworks.

use std::path::{Path, PathBuf};

use crate::classify::merge_succeeded;
use crate::command::XcodebuildCommand;
use crate::report::Reporter;
use crate::runner::{CommandRunner, FileSystem};
use crate::types::{BuildScheme, PackError};

/// `{output_dir}/{scheme}.xcframework`
pub fn xcframework_path(output_dir: &Path, scheme: &BuildScheme) -> PathBuf {
    output_dir.join(format!("{}.xcframework", scheme))
}

/// One `-framework` per input, in order, then `-output`.
pub fn merge_command(framework_paths: &[PathBuf], output: &Path) -> Result<String, PackError> {
    framework_paths
        .iter()
        .fold(XcodebuildCommand::new("-create-xcframework"), |cmd, path| {
            cmd.option("framework", path.to_string_lossy())
        })
        .option("output", output.to_string_lossy())
        .build()
}

/// Merges per-platform frameworks into `{output_dir}/{scheme}.xcframework`.
///
/// Anything already at the destination, bundle or stray file, is removed
/// first because xcodebuild will not overwrite it. If that removal fails the
/// merge command is not run.
pub fn merge(
    framework_paths: &[PathBuf],
    output_dir: &Path,
    scheme: &BuildScheme,
    runner: &dyn CommandRunner,
    fs: &dyn FileSystem,
    reporter: &dyn Reporter,
) -> Result<PathBuf, PackError> {
    if framework_paths.is_empty() {
        return Err(PackError::Merge("no frameworks to merge".into()));
    }

    let destination = xcframework_path(output_dir, scheme);
    if fs.exists(&destination) {
        fs.remove_all(&destination)
            .map_err(|e| PackError::Removal {
                path: destination.clone(),
                detail: e.to_string(),
            })?;
    }

    let cmd = merge_command(framework_paths, &destination)?;
    reporter.info(&cmd);
    let output = runner.run(&cmd)?;
    if !merge_succeeded(&output) {
        return Err(PackError::Merge(output));
    }

    if output.is_empty() {
        reporter.success(&format!("Created {}", destination.display()));
    } else {
        reporter.success(output.trim_end());
    }
    Ok(destination)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builders::testing::FakeHost;
    use crate::report::{MessageLevel, RecordingReporter};
    use crate::runner::LocalFileSystem;
    use tempfile::TempDir;

    fn frameworks() -> Vec<PathBuf> {
        vec![
            PathBuf::from("/out/Foo-iphoneos.xcarchive/Products/Library/Frameworks/Foo.framework"),
            PathBuf::from(
                "/out/Foo-iphonesimulator.xcarchive/Products/Library/Frameworks/Foo.framework",
            ),
        ]
    }

    fn scheme() -> BuildScheme {
        BuildScheme::new("Foo").unwrap()
    }

    #[test]
    fn test_merge_command_layout() {
        let cmd = merge_command(&frameworks(), Path::new("/out/Foo.xcframework")).unwrap();
        assert_eq!(
            cmd,
            "xcodebuild -create-xcframework \
             -framework /out/Foo-iphoneos.xcarchive/Products/Library/Frameworks/Foo.framework \
             -framework /out/Foo-iphonesimulator.xcarchive/Products/Library/Frameworks/Foo.framework \
             -output /out/Foo.xcframework"
        );
    }

    #[test]
    fn test_merge_success() {
        let host = FakeHost::new().respond(
            "-create-xcframework",
            "xcframework successfully written out to: /out/Foo.xcframework\n",
        );
        let reporter = RecordingReporter::new();

        let out = merge(&frameworks(), Path::new("/out"), &scheme(), &host, &host, &reporter).unwrap();
        assert_eq!(out, PathBuf::from("/out/Foo.xcframework"));
        assert!(host.removed().is_empty());
        assert_eq!(reporter.at(MessageLevel::Success).len(), 1);
    }

    #[test]
    fn test_quiet_merge_is_success() {
        let host = FakeHost::new();
        let reporter = RecordingReporter::new();
        assert!(merge(&frameworks(), Path::new("/out"), &scheme(), &host, &host, &reporter).is_ok());
    }

    #[test]
    fn test_merge_failure_carries_output() {
        let host = FakeHost::new().respond("-create-xcframework", "error: the path does not point to a valid framework");
        let reporter = RecordingReporter::new();

        let err = merge(&frameworks(), Path::new("/out"), &scheme(), &host, &host, &reporter).unwrap_err();
        assert!(matches!(err, PackError::Merge(ref text) if text.contains("valid framework")));
    }

    #[test]
    fn test_existing_bundle_removed_before_merge() {
        let host = FakeHost::new()
            .with_existing("/out/Foo.xcframework")
            .respond("-create-xcframework", "successfully");
        let reporter = RecordingReporter::new();

        merge(&frameworks(), Path::new("/out"), &scheme(), &host, &host, &reporter).unwrap();
        assert_eq!(host.removed(), vec![PathBuf::from("/out/Foo.xcframework")]);
        assert_eq!(host.events(), vec!["rm /out/Foo.xcframework".to_string(), host.calls()[0].clone()]);
    }

    #[test]
    fn test_stray_file_at_destination_removed() {
        let temp_dir = TempDir::new().unwrap();
        let destination = xcframework_path(temp_dir.path(), &scheme());
        std::fs::write(&destination, b"left over from a failed copy").unwrap();
        let host = FakeHost::new().respond("-create-xcframework", "successfully");
        let reporter = RecordingReporter::new();

        let out = merge(&frameworks(), temp_dir.path(), &scheme(), &host, &LocalFileSystem, &reporter)
            .unwrap();
        assert_eq!(out, destination);
        assert!(!destination.exists());
        assert_eq!(host.calls().len(), 1);
    }

    #[test]
    fn test_removal_failure_skips_merge() {
        let host = FakeHost::new()
            .with_existing("/out/Foo.xcframework")
            .fail_removal();
        let reporter = RecordingReporter::new();

        let err = merge(&frameworks(), Path::new("/out"), &scheme(), &host, &host, &reporter).unwrap_err();
        assert!(matches!(err, PackError::Removal { .. }));
        assert!(host.calls().is_empty());
    }

    #[test]
    fn test_empty_input_rejected() {
        let host = FakeHost::new();
        let reporter = RecordingReporter::new();
        let err = merge(&[], Path::new("/out"), &scheme(), &host, &host, &reporter).unwrap_err();
        assert!(matches!(err, PackError::Merge(_)));
        assert!(host.calls().is_empty());
    }
}
