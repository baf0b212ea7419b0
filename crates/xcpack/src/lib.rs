//! # xcpack
//!
//! Command-line tool that packages an Xcode library scheme into a
//! `.xcframework` containing a device slice and a simulator slice.
//!
//! ## Usage
//!
//! ```bash
//! # Package MyKit into ~/Desktop/auto_xcfrw_MyKit
//! xcpack MyKit.xcodeproj MyKit
//!
//! # Debug build of a workspace scheme into an explicit directory
//! xcpack -c debug App.xcworkspace MyKit build/xcframeworks
//!
//! # Show the xcodebuild invocations without running them
//! xcpack --dry-run MyKit.xcodeproj MyKit
//! ```
//!
//! A run cleans the scheme, checks `MACH_O_TYPE`, archives for
//! `generic/platform=iOS` and `generic/platform=iOS Simulator`, then merges
//! both frameworks with `xcodebuild -create-xcframework`. Schemes that do not
//! build a library are reported and skipped.
//!
//! ## CLI Flags
//!
//! - **`--configuration` / `-c`** - `debug` or `release` (default: config file, else release)
//! - **`--config`** - Explicit `xcpack.toml` instead of discovery
//! - **`--summary`** - Write a JSON run summary
//! - **`--dry-run`** - Print the planned commands without running them
//! - **`--verbose` / `-v`** - Report every command line
//!
//! ## Modules
//!
//! - [`config`] - Configuration file support for `xcpack.toml`
//! - [`console`] - Colored console reporter
//! - [`summary`] - JSON run summary

use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};
use std::path::{Path, PathBuf};
use xcpack_sdk::{
    BuildScheme, Configuration, LocalFileSystem, ProjectReference, Reporter, RunOutcome,
    ShellRunner, XcframeworkBuilder,
};

use config::ConfigResolver;
use console::ConsoleReporter;
use summary::RunSummary;

pub mod config;
pub mod console;
pub mod summary;

/// Package an Xcode library scheme into a device + simulator xcframework.
#[derive(Parser, Debug)]
#[command(name = "xcpack", author, version, about = "Package an Xcode library scheme into an xcframework", long_about = None)]
pub struct Cli {
    /// Path to the .xcodeproj or .xcworkspace
    project: String,

    /// Scheme that builds the library
    scheme: String,

    /// Output directory (default: ~/Desktop/auto_xcfrw_<SCHEME>)
    output: Option<PathBuf>,

    /// Build configuration
    #[arg(long, short = 'c', value_enum)]
    configuration: Option<ConfigurationArg>,

    /// Path to an xcpack.toml (default: discovered from the current directory)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write a JSON run summary to this path
    #[arg(long)]
    summary: Option<PathBuf>,

    /// Print what would be done without actually doing it
    #[arg(long)]
    dry_run: bool,

    /// Print verbose output including all commands
    #[arg(long, short = 'v')]
    verbose: bool,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum ConfigurationArg {
    Debug,
    Release,
}

impl From<ConfigurationArg> for Configuration {
    fn from(arg: ConfigurationArg) -> Self {
        match arg {
            ConfigurationArg::Debug => Configuration::Debug,
            ConfigurationArg::Release => Configuration::Release,
        }
    }
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    execute(cli)
}

/// Runs one packaging request. `Ok` covers both a merged bundle and a
/// skipped non-library scheme.
pub fn execute(cli: Cli) -> Result<()> {
    let resolver = match &cli.config {
        Some(path) => ConfigResolver::from_path(path)?,
        None => ConfigResolver::new()?,
    };
    if let Some(config_path) = &resolver.config_path {
        println!("Using config file: {:?}", config_path);
    }

    let project = ProjectReference::new(cli.project.as_str())?;
    let scheme = BuildScheme::new(cli.scheme.as_str())?;
    let configuration = resolver.resolve(
        cli.configuration.map(Into::into),
        |c| c.build.configuration,
        Configuration::Release,
    );
    let desktop = dirs::desktop_dir();
    let output_dir = resolve_output_dir(
        cli.output,
        resolver.output_dir(),
        desktop.as_deref(),
        &cli.project,
        &scheme,
    );

    println!("Packaging xcframework...");
    println!("  Project: {}", project);
    println!("  Scheme: {}", scheme);
    println!("  Configuration: {}", configuration.as_str());
    println!("  Output: {:?}", output_dir);
    if cli.dry_run {
        println!("  Mode: dry-run (no changes will be made)");
    }
    if cli.verbose {
        println!("  Verbose: enabled");
    }

    let builder = XcframeworkBuilder::new(project.clone(), scheme.clone(), output_dir.clone())
        .configuration(configuration)
        .verbose(cli.verbose);

    if cli.dry_run {
        println!("\nPlanned commands:");
        for command in builder.plan()? {
            println!("  {}", command);
        }
        return Ok(());
    }

    let runner = ShellRunner::new(resolver.shell());
    let reporter = ConsoleReporter::new();
    let result = builder.build(&runner, &LocalFileSystem, &reporter);

    if let Some(path) = &cli.summary {
        let summary = RunSummary::new(project.path(), scheme.as_str(), configuration, &output_dir)
            .record(&result);
        summary::write_summary(&summary, path)
            .with_context(|| format!("writing run summary to {:?}", path))?;
    }

    match result {
        Ok(RunOutcome::Merged { xcframework, .. }) => {
            println!("\n[checkmark] xcframework ready: {:?}", xcframework);
            Ok(())
        }
        Ok(RunOutcome::Skipped { .. }) => Ok(()),
        Err(err) if err.is_run_failure() => {
            reporter.failure(&err.to_string());
            bail!("failed to package scheme {}", scheme);
        }
        Err(err) => Err(err.into()),
    }
}

/// Picks the output directory: CLI argument, then config file, then the
/// default location.
pub fn resolve_output_dir(
    cli_output: Option<PathBuf>,
    config_output: Option<&Path>,
    desktop: Option<&Path>,
    project: &str,
    scheme: &BuildScheme,
) -> PathBuf {
    cli_output
        .or_else(|| config_output.map(Path::to_path_buf))
        .unwrap_or_else(|| default_output_dir(desktop, project, scheme))
}

/// `<desktop>/auto_xcfrw_<scheme>`, or `<project>auto_xcfrw_<scheme>` when
/// there is no desktop directory.
pub fn default_output_dir(desktop: Option<&Path>, project: &str, scheme: &BuildScheme) -> PathBuf {
    let name = format!("auto_xcfrw_{}", scheme);
    match desktop {
        Some(dir) => dir.join(name),
        None => PathBuf::from(format!("{}{}", project, name)),
    }
}
