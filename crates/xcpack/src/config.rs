//! Configuration file support for xcpack.
//!
//! This module provides support for `xcpack.toml` configuration files that
//! persist per-repository packaging defaults.
//!
//! ## Configuration File Location
//!
//! Unless `--config` is given, the file is searched for in:
//! 1. Current working directory (`./xcpack.toml`)
//! 2. Parent directories (up to the repository root or filesystem root)
//!
//! ## Example Configuration
//!
//! ```toml
//! [build]
//! configuration = "release"
//! output_dir = "build/xcframeworks"
//!
//! [runner]
//! shell = "/bin/zsh"
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use xcpack_sdk::Configuration;
use xcpack_sdk::runner::DEFAULT_SHELL;

/// The default configuration file name.
pub const CONFIG_FILE_NAME: &str = "xcpack.toml";

/// Root configuration structure for `xcpack.toml`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct XcpackConfig {
    /// Packaging defaults.
    pub build: BuildConfig,

    /// How commands are executed.
    pub runner: RunnerConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// `debug` or `release`. Overridden by `--configuration`.
    pub configuration: Option<Configuration>,

    /// Where archives and the xcframework are written.
    ///
    /// Overridden by the `OUTPUT` argument. Defaults to
    /// `~/Desktop/auto_xcfrw_<scheme>`.
    pub output_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    /// Shell used as `<shell> -c <command>`.
    pub shell: PathBuf,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            shell: PathBuf::from(DEFAULT_SHELL),
        }
    }
}

impl XcpackConfig {
    /// Loads configuration from the specified file path.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    ///
    /// * `Ok(XcpackConfig)` - Successfully loaded configuration
    /// * `Err` - If the file cannot be read or parsed
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        let config: XcpackConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;

        Ok(config)
    }

    /// Finds `xcpack.toml` in the current directory or one of its parents.
    ///
    /// # Returns
    ///
    /// * `Ok(Some((config, path)))` - Loaded configuration and where it was found
    /// * `Ok(None)` - No configuration file below the repository root
    /// * `Err` - If a config file was found but couldn't be parsed
    pub fn discover() -> Result<Option<(Self, PathBuf)>> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;
        Self::discover_from(&cwd)
    }

    /// Like [`discover`](Self::discover), starting from `start_dir`.
    ///
    /// The walk stops at the first directory containing `.git`.
    ///
    /// # Arguments
    ///
    /// * `start_dir` - Directory to start searching from
    pub fn discover_from(start_dir: &Path) -> Result<Option<(Self, PathBuf)>> {
        let mut current = start_dir.to_path_buf();

        loop {
            let config_path = current.join(CONFIG_FILE_NAME);

            if config_path.is_file() {
                let config = Self::load_from_file(&config_path)?;
                return Ok(Some((config, config_path)));
            }

            // Stop at repository root or filesystem root
            if current.join(".git").exists() || !current.pop() {
                break;
            }
        }

        Ok(None)
    }
}

/// Merges CLI values, the discovered config file and built-in defaults.
#[derive(Debug, Default)]
pub struct ConfigResolver {
    pub config: Option<XcpackConfig>,

    pub config_path: Option<PathBuf>,
}

impl ConfigResolver {
    /// Discovers `xcpack.toml` from the current directory upward.
    pub fn new() -> Result<Self> {
        match XcpackConfig::discover()? {
            Some((config, path)) => Ok(Self {
                config: Some(config),
                config_path: Some(path),
            }),
            None => Ok(Self::default()),
        }
    }

    /// Loads an explicit config file, as passed with `--config`.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    ///
    /// * `Err` - If the file is missing, unreadable or malformed
    pub fn from_path(path: &Path) -> Result<Self> {
        let config = XcpackConfig::load_from_file(path)?;
        Ok(Self {
            config: Some(config),
            config_path: Some(path.to_path_buf()),
        })
    }

    /// `[build] output_dir`, if a config file set it.
    pub fn output_dir(&self) -> Option<&Path> {
        self.config
            .as_ref()
            .and_then(|c| c.build.output_dir.as_deref())
    }

    /// `[runner] shell`, falling back to `/bin/zsh`.
    pub fn shell(&self) -> PathBuf {
        self.config
            .as_ref()
            .map(|c| c.runner.shell.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SHELL))
    }

    /// Picks a value with CLI > config file > default precedence.
    ///
    /// # Arguments
    ///
    /// * `cli_value` - Value given on the command line, if any
    /// * `config_getter` - Reads the value from the loaded config
    /// * `default` - Used when neither source provides a value
    pub fn resolve<T, F>(&self, cli_value: Option<T>, config_getter: F, default: T) -> T
    where
        F: FnOnce(&XcpackConfig) -> Option<T>,
    {
        cli_value
            .or_else(|| self.config.as_ref().and_then(config_getter))
            .unwrap_or(default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = XcpackConfig::default();
        assert!(config.build.configuration.is_none());
        assert!(config.build.output_dir.is_none());
        assert_eq!(config.runner.shell, PathBuf::from("/bin/zsh"));
    }

    #[test]
    fn test_load_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(
            &config_path,
            r#"
[build]
configuration = "debug"
output_dir = "build/xcframeworks"

[runner]
shell = "/bin/bash"
"#,
        )
        .unwrap();

        let config = XcpackConfig::load_from_file(&config_path).unwrap();
        assert_eq!(config.build.configuration, Some(Configuration::Debug));
        assert_eq!(
            config.build.output_dir,
            Some(PathBuf::from("build/xcframeworks"))
        );
        assert_eq!(config.runner.shell, PathBuf::from("/bin/bash"));
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: XcpackConfig = toml::from_str("[build]\nconfiguration = \"release\"\n").unwrap();
        assert_eq!(config.build.configuration, Some(Configuration::Release));
        assert_eq!(config.runner.shell, PathBuf::from(DEFAULT_SHELL));
    }

    #[test]
    fn test_invalid_configuration_value() {
        let result: Result<XcpackConfig, _> = toml::from_str("[build]\nconfiguration = \"profile\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_discover_from_nested_dir() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::create_dir(temp_dir.path().join(".git")).unwrap();
        std::fs::write(
            temp_dir.path().join(CONFIG_FILE_NAME),
            "[build]\noutput_dir = \"out\"\n",
        )
        .unwrap();
        let nested = temp_dir.path().join("MyKit/Sources");
        std::fs::create_dir_all(&nested).unwrap();

        let (config, path) = XcpackConfig::discover_from(&nested).unwrap().unwrap();
        assert_eq!(path, temp_dir.path().join(CONFIG_FILE_NAME));
        assert_eq!(config.build.output_dir, Some(PathBuf::from("out")));
    }

    #[test]
    fn test_discover_stops_at_repo_root() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::create_dir(temp_dir.path().join(".git")).unwrap();
        assert!(XcpackConfig::discover_from(temp_dir.path()).unwrap().is_none());
    }

    #[test]
    fn test_from_path_reads_runner_shell() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("custom.toml");
        std::fs::write(&config_path, "[runner]\nshell = \"/bin/bash\"\n").unwrap();

        let resolver = ConfigResolver::from_path(&config_path).unwrap();
        assert_eq!(resolver.config_path, Some(config_path));
        assert_eq!(resolver.shell(), PathBuf::from("/bin/bash"));
        assert!(resolver.output_dir().is_none());
    }

    #[test]
    fn test_resolver_precedence() {
        let mut config = XcpackConfig::default();
        config.build.configuration = Some(Configuration::Debug);
        let resolver = ConfigResolver {
            config: Some(config),
            config_path: None,
        };

        let from_cli = resolver.resolve(
            Some(Configuration::Release),
            |c| c.build.configuration,
            Configuration::Release,
        );
        assert_eq!(from_cli, Configuration::Release);

        let from_file = resolver.resolve(None, |c| c.build.configuration, Configuration::Release);
        assert_eq!(from_file, Configuration::Debug);

        let empty = ConfigResolver::default();
        assert_eq!(
            empty.resolve(None, |c| c.build.configuration, Configuration::Release),
            Configuration::Release
        );
        assert_eq!(empty.shell(), PathBuf::from(DEFAULT_SHELL));
        assert!(empty.output_dir().is_none());
    }

    #[test]
    fn test_from_path_missing_file() {
        assert!(ConfigResolver::from_path(Path::new("/nonexistent/xcpack.toml")).is_err());
    }
}
