//! Types for build orchestration.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::defines::DefineError;
use crate::host::{BuildOutcome, HostError};
use crate::report::BuildResult;
use crate::stamp::StampError;

/// Everything that can end a build invocation as a failure.
///
/// Each variant becomes the `error` field of the result file; none of them
/// escape [`run`](super::run).
#[derive(Debug, Error)]
pub enum BuildError {
  /// A required variable was missing.
  #[error("{0}")]
  Configuration(String),

  #[error("unknown build target: {0}")]
  UnknownTarget(String),

  #[error("no enabled scenes in build settings")]
  NoBuildUnits,

  #[error("failed to create output directory {path}: {source}")]
  OutputDir {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  /// The executor ran and reported anything other than success.
  #[error("build {outcome}: {message}")]
  Executor { outcome: BuildOutcome, message: String },

  #[error("host error: {0}")]
  Host(#[from] HostError),

  #[error("define injection failed: {0}")]
  Define(#[from] DefineError),

  #[error("version stamp failed: {0}")]
  Stamp(#[from] StampError),
}

/// What a build invocation produced.
#[derive(Debug, Clone)]
pub struct BuildReport {
  pub result: BuildResult,
  /// Where the result file was written; `None` if there was no output
  /// directory to write it to, or writing failed.
  pub result_path: Option<PathBuf>,
  /// Whether the signing step ran and succeeded. `None` if it did not run.
  pub signed: Option<bool>,
  /// Whether notarization ran and succeeded. `None` if it did not run.
  pub notarized: Option<bool>,
}

impl BuildReport {
  /// `0` only when the build succeeded and its result file is on disk, so the
  /// runner never sees a success code without a result to read.
  pub fn exit_code(&self) -> i32 {
    match self.result_path {
      Some(_) => self.result.exit_code(),
      None => 1,
    }
  }
}
