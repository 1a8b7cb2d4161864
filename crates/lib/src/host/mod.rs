//! Capabilities the build core needs from the host application.
//!
//! The orchestration never touches the host directly; it goes through
//! [`Host`] for project state and through [`BuildExecutor`] for the opaque
//! platform build. [`ProjectHost`] and [`CommandExecutor`] are the bindings
//! used by the command-line shim.

mod executor;
mod project;
mod types;

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::target::{BuildTarget, TargetGroup};

pub use executor::CommandExecutor;
pub use project::{ProjectHost, SceneEntry};
pub use types::{BuildOutcome, BuildRequest, BuildStep, BuildSummary, MessageKind, StepMessage};

/// Errors raised by host or executor bindings.
#[derive(Debug, Error)]
pub enum HostError {
  #[error("failed to read {path}: {source}")]
  Read {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("failed to write {path}: {source}")]
  Write {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("failed to parse {path}: {source}")]
  Parse {
    path: PathBuf,
    #[source]
    source: serde_json::Error,
  },

  #[error("failed to switch active build target to {target}: {message}")]
  Switch { target: BuildTarget, message: String },

  #[error("build executor could not be started: {0}")]
  ExecutorLaunch(#[source] io::Error),

  #[error("build executor produced an unreadable summary: {0}")]
  ExecutorOutput(String),
}

/// Project state owned by the host application.
pub trait Host {
  /// Host application version string, e.g. `2022.3.10f1`.
  fn version(&self) -> String;

  fn project_root(&self) -> &Path;

  fn active_target(&self) -> Result<BuildTarget, HostError>;

  /// Blocking; may reimport the whole project.
  fn switch_active_target(&mut self, group: TargetGroup, target: BuildTarget) -> Result<(), HostError>;

  /// Persistent `;`-separated scripting define string for a target group.
  fn scripting_defines(&self, group: TargetGroup) -> Result<String, HostError>;

  fn set_scripting_defines(&mut self, group: TargetGroup, defines: &str) -> Result<(), HostError>;

  /// Paths of the scenes enabled in the project's build settings, in build order.
  fn enabled_scenes(&self) -> Result<Vec<String>, HostError>;

  /// Import any files written into the asset tree since the last refresh.
  fn refresh_assets(&mut self) -> Result<(), HostError>;
}

/// The opaque platform build.
pub trait BuildExecutor {
  /// Run a build to completion. Blocks until the executor returns.
  fn build(&mut self, request: &BuildRequest) -> Result<BuildSummary, HostError>;
}
