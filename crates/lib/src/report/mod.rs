//! The structured build result.
//!
//! `build-result.json` in the output directory is the only stable contract
//! with the external runner; log output is advisory. Exactly one result is
//! written per invocation.
//!
//! # Format
//!
//! ```json
//! {
//!   "success": true,
//!   "target": "StandaloneWindows64",
//!   "outputPath": "/builds/win/Game.exe",
//!   "totalSize": 104857600,
//!   "duration": 312.4,
//!   "warnings": 3,
//!   "errors": 0,
//!   "scenes": ["Assets/Scenes/Main.unity"],
//!   "hostVersion": "2022.3.10f1",
//!   "timestamp": "2024-05-01T12:00:00Z"
//! }
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::consts::RESULT_FILENAME;

#[derive(Debug, Error)]
pub enum ReportError {
  #[error("failed to create result directory {path}: {source}")]
  CreateDir {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("failed to write build result {path}: {source}")]
  Write {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("failed to serialize build result: {0}")]
  Serialize(#[source] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildResult {
  pub success: bool,
  /// Canonical target name, or the raw identifier if it never resolved.
  pub target: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub output_path: Option<PathBuf>,
  pub total_size: u64,
  /// Wall-clock seconds from entry to result write.
  pub duration: f64,
  pub warnings: u32,
  pub errors: u32,
  pub scenes: Vec<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub error: Option<String>,
  pub host_version: String,
  pub timestamp: String,
}

impl BuildResult {
  /// A failed result with no output.
  pub fn failure(target: impl Into<String>, error: impl Into<String>, host_version: impl Into<String>) -> Self {
    Self {
      success: false,
      target: target.into(),
      output_path: None,
      total_size: 0,
      duration: 0.0,
      warnings: 0,
      errors: 0,
      scenes: Vec::new(),
      error: Some(error.into()),
      host_version: host_version.into(),
      timestamp: now_iso8601(),
    }
  }

  /// A successful result for an artifact at `output_path`.
  pub fn success(
    target: impl Into<String>,
    output_path: PathBuf,
    total_size: u64,
    host_version: impl Into<String>,
  ) -> Self {
    Self {
      success: true,
      target: target.into(),
      output_path: Some(output_path),
      total_size,
      duration: 0.0,
      warnings: 0,
      errors: 0,
      scenes: Vec::new(),
      error: None,
      host_version: host_version.into(),
      timestamp: now_iso8601(),
    }
  }

  /// Process exit code the runner should observe.
  pub fn exit_code(&self) -> i32 {
    if self.success { 0 } else { 1 }
  }
}

pub fn now_iso8601() -> String {
  Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

pub fn result_path(directory: &Path) -> PathBuf {
  directory.join(RESULT_FILENAME)
}

/// Write `result` to `<directory>/build-result.json`, replacing any previous file.
pub fn write(result: &BuildResult, directory: &Path) -> Result<PathBuf, ReportError> {
  fs::create_dir_all(directory).map_err(|source| ReportError::CreateDir {
    path: directory.to_path_buf(),
    source,
  })?;

  let path = result_path(directory);
  let temp_path = directory.join(format!("{}.tmp", RESULT_FILENAME));
  let write_err = |source| ReportError::Write {
    path: path.clone(),
    source,
  };

  let content = serde_json::to_string_pretty(result).map_err(ReportError::Serialize)?;
  fs::write(&temp_path, content).map_err(write_err)?;
  fs::rename(&temp_path, &path).map_err(write_err)?;

  info!(path = %path.display(), success = result.success, "build result written");
  Ok(path)
}

/// Read a previously written result.
pub fn read(directory: &Path) -> io::Result<BuildResult> {
  let content = fs::read_to_string(result_path(directory))?;
  serde_json::from_str(&content).map_err(io::Error::other)
}
