//! The built-in target capability table.
//!
//! Every supported target is declared exactly once here, together with its
//! aliases, family, default artifact name, feature flags and the minimum host
//! version that supports it. Resolution and family lookups read from this
//! table only.

use std::cmp::Ordering;
use std::fmt;

use serde::Serialize;

use super::{BuildTarget, PlatformDescriptor, TargetFeatures, TargetGroup};

/// Host application version, compared on `major.minor`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct HostVersion {
  pub major: u32,
  pub minor: u32,
}

impl HostVersion {
  pub const fn new(major: u32, minor: u32) -> Self {
    Self { major, minor }
  }

  /// Parse the leading `major.minor` of a version string such as `2022.3.10f1`.
  pub fn parse(value: &str) -> Option<Self> {
    let mut parts = value.trim().split('.');
    let major = parts.next()?.parse().ok()?;
    let minor: String = parts.next()?.chars().take_while(|c| c.is_ascii_digit()).collect();
    Some(Self::new(major, minor.parse().ok()?))
  }
}

impl PartialOrd for HostVersion {
  fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
    Some(self.cmp(other))
  }
}

impl Ord for HostVersion {
  fn cmp(&self, other: &Self) -> Ordering {
    (self.major, self.minor).cmp(&(other.major, other.minor))
  }
}

impl fmt::Display for HostVersion {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}.{}", self.major, self.minor)
  }
}

/// A single row of the capability table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TargetEntry {
  #[serde(flatten)]
  pub descriptor: PlatformDescriptor,
  /// Alternative spellings accepted by the resolver, lower-case.
  pub aliases: &'static [&'static str],
  /// Oldest host version that can build this target.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub min_host: Option<HostVersion>,
}

impl TargetEntry {
  fn matches(&self, identifier: &str) -> bool {
    self.descriptor.target.as_str().eq_ignore_ascii_case(identifier)
      || self.aliases.iter().any(|alias| alias.eq_ignore_ascii_case(identifier))
  }

  fn supported_by(&self, host: Option<HostVersion>) -> bool {
    match (self.min_host, host) {
      (Some(min), Some(host)) => host >= min,
      _ => true,
    }
  }
}

const STANDALONE: TargetFeatures = TargetFeatures {
  server_subtarget: true,
  codesign: false,
};

const PLAIN: TargetFeatures = TargetFeatures {
  server_subtarget: false,
  codesign: false,
};

fn entry(
  target: BuildTarget,
  group: TargetGroup,
  default_output: &'static str,
  features: TargetFeatures,
  aliases: &'static [&'static str],
) -> TargetEntry {
  TargetEntry {
    descriptor: PlatformDescriptor {
      target,
      group,
      default_output,
      features,
    },
    aliases,
    min_host: None,
  }
}

fn builtin_entries() -> Vec<TargetEntry> {
  vec![
    entry(
      BuildTarget::StandaloneWindows64,
      TargetGroup::Standalone,
      "Game.exe",
      STANDALONE,
      &["windows", "win64", "windows64"],
    ),
    entry(
      BuildTarget::StandaloneWindows,
      TargetGroup::Standalone,
      "Game.exe",
      STANDALONE,
      &["win32", "windows32", "win"],
    ),
    entry(
      BuildTarget::StandaloneOSX,
      TargetGroup::Standalone,
      "Game.app",
      TargetFeatures {
        server_subtarget: true,
        codesign: true,
      },
      &["macos", "osx", "mac"],
    ),
    entry(
      BuildTarget::StandaloneLinux64,
      TargetGroup::Standalone,
      "Game.x86_64",
      STANDALONE,
      &["linux", "linux64"],
    ),
    entry(BuildTarget::Android, TargetGroup::Android, "Game.apk", PLAIN, &["android", "apk"]),
    entry(BuildTarget::IOS, TargetGroup::IOS, "iOS", PLAIN, &["ios", "iphone"]),
    entry(BuildTarget::TvOS, TargetGroup::TvOS, "tvOS", PLAIN, &["tvos", "appletv"]),
    entry(BuildTarget::WebGL, TargetGroup::WebGL, "WebGL", PLAIN, &["webgl", "web"]),
    TargetEntry {
      min_host: Some(HostVersion::new(2022, 3)),
      ..entry(
        BuildTarget::VisionOS,
        TargetGroup::VisionOS,
        "VisionOS",
        PLAIN,
        &["visionos", "xros"],
      )
    },
  ]
}

/// The set of targets available to a particular host.
#[derive(Debug, Clone)]
pub struct TargetTable {
  entries: Vec<TargetEntry>,
}

impl TargetTable {
  /// Every target known to this build of the shim, regardless of host version.
  pub fn builtin() -> Self {
    Self {
      entries: builtin_entries(),
    }
  }

  /// Targets supported by the given host version.
  ///
  /// An unparsable version keeps every entry.
  pub fn for_host(version: &str) -> Self {
    let host = HostVersion::parse(version);
    Self {
      entries: builtin_entries().into_iter().filter(|e| e.supported_by(host)).collect(),
    }
  }

  pub fn entries(&self) -> &[TargetEntry] {
    &self.entries
  }

  /// Case-insensitive lookup by canonical name or alias.
  pub fn resolve(&self, identifier: &str) -> Option<&PlatformDescriptor> {
    let identifier = identifier.trim();
    self
      .entries
      .iter()
      .find(|e| e.matches(identifier))
      .map(|e| &e.descriptor)
  }

  pub fn descriptor_for(&self, target: BuildTarget) -> Option<&PlatformDescriptor> {
    self
      .entries
      .iter()
      .map(|e| &e.descriptor)
      .find(|d| d.target == target)
  }
}
