use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::target::{BuildTarget, TargetGroup};

/// Everything handed to the build executor for one build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildRequest {
  pub scenes: Vec<String>,
  pub output_path: PathBuf,
  pub target: BuildTarget,
  pub group: TargetGroup,
  /// Build the dedicated-server subtarget.
  pub server: bool,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub profile: Option<String>,
}

/// Overall result code reported by the executor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BuildOutcome {
  Succeeded,
  Failed,
  Cancelled,
  #[default]
  #[serde(other)]
  Unknown,
}

impl fmt::Display for BuildOutcome {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let name = match self {
      Self::Succeeded => "succeeded",
      Self::Failed => "failed",
      Self::Cancelled => "cancelled",
      Self::Unknown => "unknown",
    };
    f.write_str(name)
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageKind {
  Error,
  Assert,
  Warning,
  Log,
  Exception,
}

impl MessageKind {
  pub fn is_error(self) -> bool {
    matches!(self, Self::Error | Self::Exception)
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepMessage {
  #[serde(rename = "type")]
  pub kind: MessageKind,
  pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildStep {
  pub name: String,
  #[serde(default)]
  pub messages: Vec<StepMessage>,
}

/// Summary returned by the executor after a build.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildSummary {
  #[serde(default)]
  pub result: BuildOutcome,
  /// Size the executor attributes to the build; may cover only the primary artifact.
  #[serde(default)]
  pub total_size: u64,
  #[serde(default)]
  pub total_warnings: u32,
  #[serde(default)]
  pub total_errors: u32,
  #[serde(default)]
  pub steps: Vec<BuildStep>,
}

impl BuildSummary {
  pub fn succeeded(&self) -> bool {
    self.result == BuildOutcome::Succeeded
  }

  /// Error-level diagnostics across all steps, in step order.
  pub fn error_messages(&self) -> Vec<&str> {
    self
      .steps
      .iter()
      .flat_map(|step| step.messages.iter())
      .filter(|m| m.kind.is_error())
      .map(|m| m.content.as_str())
      .collect()
  }
}
