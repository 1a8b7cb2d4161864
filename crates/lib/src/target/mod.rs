//! Build target resolution.
//!
//! Maps the runner's target identifier to a [`PlatformDescriptor`] and switches
//! the host's active target when it differs.

mod table;

use std::fmt;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::host::{Host, HostError};

pub use table::{HostVersion, TargetEntry, TargetTable};

static BUILTIN: LazyLock<TargetTable> = LazyLock::new(TargetTable::builtin);

/// Canonical build targets understood by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BuildTarget {
  StandaloneWindows64,
  StandaloneWindows,
  StandaloneOSX,
  StandaloneLinux64,
  Android,
  #[serde(rename = "iOS")]
  IOS,
  #[serde(rename = "tvOS")]
  TvOS,
  WebGL,
  VisionOS,
  NoTarget,
}

impl BuildTarget {
  pub const ALL: [BuildTarget; 10] = [
    Self::StandaloneWindows64,
    Self::StandaloneWindows,
    Self::StandaloneOSX,
    Self::StandaloneLinux64,
    Self::Android,
    Self::IOS,
    Self::TvOS,
    Self::WebGL,
    Self::VisionOS,
    Self::NoTarget,
  ];

  /// Look up a target by its exact canonical name.
  pub fn from_name(name: &str) -> Option<Self> {
    Self::ALL.into_iter().find(|t| t.as_str() == name)
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      Self::StandaloneWindows64 => "StandaloneWindows64",
      Self::StandaloneWindows => "StandaloneWindows",
      Self::StandaloneOSX => "StandaloneOSX",
      Self::StandaloneLinux64 => "StandaloneLinux64",
      Self::Android => "Android",
      Self::IOS => "iOS",
      Self::TvOS => "tvOS",
      Self::WebGL => "WebGL",
      Self::VisionOS => "VisionOS",
      Self::NoTarget => "NoTarget",
    }
  }
}

impl fmt::Display for BuildTarget {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

/// Target family; scripting defines are stored per group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetGroup {
  Standalone,
  Android,
  #[serde(rename = "iOS")]
  IOS,
  #[serde(rename = "tvOS")]
  TvOS,
  WebGL,
  VisionOS,
  Unknown,
}

impl TargetGroup {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Standalone => "Standalone",
      Self::Android => "Android",
      Self::IOS => "iOS",
      Self::TvOS => "tvOS",
      Self::WebGL => "WebGL",
      Self::VisionOS => "VisionOS",
      Self::Unknown => "Unknown",
    }
  }
}

impl fmt::Display for TargetGroup {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

/// Optional capabilities of a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct TargetFeatures {
  /// Can build the dedicated-server subtarget.
  pub server_subtarget: bool,
  /// Artifacts are eligible for code signing and notarization.
  pub codesign: bool,
}

/// Everything the build needs to know about a resolved target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct PlatformDescriptor {
  pub target: BuildTarget,
  pub group: TargetGroup,
  /// Artifact file or directory name used when the caller gives none.
  pub default_output: &'static str,
  pub features: TargetFeatures,
}

/// Resolve an identifier against every built-in target.
pub fn resolve(identifier: &str) -> Option<PlatformDescriptor> {
  BUILTIN.resolve(identifier).copied()
}

/// Family of a target; targets missing from the table map to [`TargetGroup::Unknown`].
pub fn target_group_of(target: BuildTarget) -> TargetGroup {
  BUILTIN
    .descriptor_for(target)
    .map(|d| d.group)
    .unwrap_or(TargetGroup::Unknown)
}

pub fn default_output_name(descriptor: &PlatformDescriptor) -> &'static str {
  descriptor.default_output
}

/// Make `descriptor` the host's active target unless it already is.
///
/// Returns whether a switch happened. Switching may reimport the whole
/// project and block for a long time.
pub fn switch_if_needed<H: Host + ?Sized>(host: &mut H, descriptor: &PlatformDescriptor) -> Result<bool, HostError> {
  let active = host.active_target()?;
  if active == descriptor.target {
    debug!(target = %descriptor.target, "active build target already selected");
    return Ok(false);
  }

  info!(from = %active, to = %descriptor.target, "switching active build target");
  host.switch_active_target(descriptor.group, descriptor.target)?;
  Ok(true)
}
