use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::consts::CACHE_DIRS;
use crate::util::fs::dir_size;

#[derive(Debug, Error)]
pub enum CleanError {
  #[error("project root {0} is not a directory")]
  NotADirectory(PathBuf),
}

#[derive(Debug, Default, Serialize)]
pub struct CleanStats {
  pub removed: usize,
  pub skipped: usize,
  pub failed: usize,
  pub bytes_freed: u64,
}

#[derive(Debug, Serialize)]
pub struct CleanResult {
  pub stats: CleanStats,
  pub removed_paths: Vec<PathBuf>,
  pub failed_paths: Vec<PathBuf>,
}

/// Delete the host's build caches under `project_root`.
///
/// A missing cache directory is skipped. A directory that cannot be removed
/// is logged and the sweep moves on to the next one. Running it twice is
/// harmless.
pub fn clean_caches(project_root: &Path, dry_run: bool) -> Result<CleanResult, CleanError> {
  if !project_root.is_dir() {
    return Err(CleanError::NotADirectory(project_root.to_path_buf()));
  }

  let mut stats = CleanStats::default();
  let mut removed_paths = Vec::new();
  let mut failed_paths = Vec::new();

  for relative in CACHE_DIRS {
    let path = project_root.join(relative);
    if !path.exists() {
      debug!(path = %path.display(), "cache directory not present, skipping");
      stats.skipped += 1;
      continue;
    }

    let size = dir_size(&path);

    if dry_run {
      stats.removed += 1;
      stats.bytes_freed += size;
      removed_paths.push(path);
      continue;
    }

    match fs::remove_dir_all(&path) {
      Ok(()) => {
        debug!(path = %path.display(), bytes = size, "removed cache directory");
        stats.removed += 1;
        stats.bytes_freed += size;
        removed_paths.push(path);
      }
      Err(e) => {
        warn!(path = %path.display(), error = %e, "failed to delete cache directory");
        stats.failed += 1;
        failed_paths.push(path);
      }
    }
  }

  info!(
    removed = stats.removed,
    skipped = stats.skipped,
    failed = stats.failed,
    bytes_freed = stats.bytes_freed,
    dry_run,
    "cache cleanup complete"
  );

  Ok(CleanResult {
    stats,
    removed_paths,
    failed_paths,
  })
}
