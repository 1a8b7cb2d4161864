//! Version stamp written into the asset tree.
//!
//! The built artifact reads this record at runtime to report which build,
//! commit and branch it came from.

use std::fs;
use std::io;
use std::path::PathBuf;

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::config::BuildConfiguration;
use crate::consts::{STAMP_DIR, STAMP_FILENAME, STAMPER_VERSION};
use crate::host::{Host, HostError};

#[derive(Debug, Error)]
pub enum StampError {
  #[error("failed to create stamp directory {path}: {source}")]
  CreateDir {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("failed to write version stamp {path}: {source}")]
  Write {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("failed to serialize version stamp: {0}")]
  Serialize(#[source] serde_json::Error),

  #[error("failed to import version stamp: {0}")]
  Refresh(#[from] HostError),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionStamp {
  pub build_id: String,
  pub commit_hash: String,
  pub branch: String,
  pub build_target: String,
  /// ISO-8601, UTC.
  pub timestamp: String,
  pub stamper_version: String,
}

impl VersionStamp {
  pub fn new(config: &BuildConfiguration, target_label: &str) -> Self {
    Self {
      build_id: config.build_id.clone(),
      commit_hash: config.commit_hash.clone(),
      branch: config.branch.clone(),
      build_target: target_label.to_string(),
      timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
      stamper_version: STAMPER_VERSION.to_string(),
    }
  }
}

/// Write the version stamp into the project and import it.
///
/// Overwrites any previous stamp. Returns the path written.
pub fn stamp<H: Host + ?Sized>(
  host: &mut H,
  config: &BuildConfiguration,
  target_label: &str,
) -> Result<PathBuf, StampError> {
  let dir = host.project_root().join(STAMP_DIR);
  fs::create_dir_all(&dir).map_err(|source| StampError::CreateDir {
    path: dir.clone(),
    source,
  })?;

  let record = VersionStamp::new(config, target_label);
  let content = serde_json::to_string_pretty(&record).map_err(StampError::Serialize)?;

  let path = dir.join(STAMP_FILENAME);
  fs::write(&path, content).map_err(|source| StampError::Write {
    path: path.clone(),
    source,
  })?;

  host.refresh_assets()?;

  info!(
    path = %path.display(),
    build_id = %record.build_id,
    commit = %record.commit_hash,
    "version stamp written"
  );
  Ok(path)
}
