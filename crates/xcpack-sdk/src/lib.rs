//! xcframework packaging engine
//!
//! `xcpack-sdk` turns an Xcode library scheme into a multi-platform
//! `.xcframework` by driving `xcodebuild` through a shell: clean, inspect the
//! product type, archive for device and simulator, then merge the two
//! frameworks.
//!
//! # Quick Start
//!
//! ```no_run
//! use xcpack_sdk::builders::XcframeworkBuilder;
//! use xcpack_sdk::runner::{LocalFileSystem, ShellRunner};
//! use xcpack_sdk::report::NullReporter;
//! use xcpack_sdk::{BuildScheme, Configuration, ProjectReference, RunOutcome};
//!
//! let builder = XcframeworkBuilder::new(
//!     ProjectReference::new("MyKit/MyKit.xcodeproj")?,
//!     BuildScheme::new("MyKit")?,
//!     "build/xcframeworks",
//! )
//! .configuration(Configuration::Release);
//!
//! match builder.build(&ShellRunner::default(), &LocalFileSystem, &NullReporter)? {
//!     RunOutcome::Merged { xcframework, .. } => println!("Created {:?}", xcframework),
//!     RunOutcome::Skipped { artifact_type } => println!("Not a library: {:?}", artifact_type),
//! }
//! # Ok::<(), xcpack_sdk::PackError>(())
//! ```
//!
//! # Architecture
//!
//! - **Command**: Serializes xcodebuild invocations with consistent quoting
//! - **Classify**: Decides step success from fixed markers in the output text
//! - **Runner**: Shell execution and filesystem probes behind traits
//! - **Builders**: Settings inspection, per-platform archiving, merging and
//!   the orchestrating [`builders::XcframeworkBuilder`]
//! - **Report**: Leveled progress messages

pub mod builders;
pub mod classify;
pub mod command;
pub mod report;
pub mod runner;
pub mod types;

pub use builders::XcframeworkBuilder;
pub use classify::classify;
pub use command::{CommandParameter, ParameterKind, XcodebuildCommand, serialize};
pub use report::{MessageLevel, NullReporter, Reporter};
pub use runner::{CommandRunner, FileSystem, LocalFileSystem, ShellRunner};
pub use types::{
    ArchiveJob, ArtifactType, BuildScheme, Configuration, PackError, Platform, ProjectKind,
    ProjectReference, RunOutcome, RunState,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
