//! JSON record of a packaging run, written with `--summary`.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use xcpack_sdk::{ArtifactType, Configuration, PackError, RunOutcome, RunState};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub generated_at: String,
    pub project: String,
    pub scheme: String,
    pub configuration: Configuration,
    pub output_dir: PathBuf,
    pub state: RunState,
    pub artifact_type: Option<ArtifactType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xcframework: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub frameworks: Vec<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RunSummary {
    pub fn new(
        project: &str,
        scheme: &str,
        configuration: Configuration,
        output_dir: &Path,
    ) -> Self {
        Self {
            generated_at: timestamp(),
            project: project.to_string(),
            scheme: scheme.to_string(),
            configuration,
            output_dir: output_dir.to_path_buf(),
            state: RunState::Init,
            artifact_type: None,
            xcframework: None,
            frameworks: Vec::new(),
            error: None,
        }
    }

    /// Records the result of a finished run.
    pub fn record(mut self, result: &Result<RunOutcome, PackError>) -> Self {
        match result {
            Ok(outcome) => {
                self.state = outcome.state();
                self.artifact_type = Some(outcome.artifact_type());
                if let RunOutcome::Merged {
                    xcframework,
                    frameworks,
                    ..
                } = outcome
                {
                    self.xcframework = Some(xcframework.clone());
                    self.frameworks = frameworks.clone();
                }
            }
            Err(err) => {
                self.state = RunState::Failed;
                self.error = Some(err.to_string());
            }
        }
        self
    }
}

fn timestamp() -> String {
    let now = OffsetDateTime::now_utc();
    now.format(&Rfc3339)
        .unwrap_or_else(|_| now.unix_timestamp().to_string())
}

pub fn write_summary(summary: &RunSummary, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(summary)?;
    ensure_parent_dir(path)?;
    fs::write(path, json.as_bytes()).with_context(|| format!("writing file {:?}", path))?;
    println!("Wrote run summary to {:?}", path);
    Ok(())
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).with_context(|| format!("creating directory {:?}", parent))?;
    }
    Ok(())
}
