//! Build configuration sourced from the process environment.
//!
//! The external runner configures a build exclusively through environment
//! variables. Loading never fails: a configuration with missing required
//! variables is returned flagged invalid, and callers must check
//! [`BuildConfiguration::is_valid`] before doing any work.

use std::path::PathBuf;

use tracing::debug;

/// Environment variable names recognized by the loader.
pub mod vars {
  pub const BUILD_TARGET: &str = "BUILD_TARGET";
  pub const OUTPUT_DIR: &str = "OUTPUT_DIR";
  pub const SERVER_BUILD: &str = "SERVER_BUILD";
  pub const DEFINES: &str = "DEFINES";
  pub const BUILD_ID: &str = "BUILD_ID";
  pub const COMMIT_HASH: &str = "COMMIT_HASH";
  pub const BRANCH: &str = "BRANCH";
  pub const BUILD_PROFILE: &str = "BUILD_PROFILE";
  pub const CODESIGN_IDENTITY: &str = "CODESIGN_IDENTITY";
  pub const NOTARIZE_PROFILE: &str = "NOTARIZE_PROFILE";
}

/// An ordered, duplicate-free set of scripting define symbols.
///
/// Entries are whitespace-trimmed and empty entries are dropped. The first
/// occurrence of a symbol determines its position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DefineSet {
  symbols: Vec<String>,
}

impl DefineSet {
  pub fn new() -> Self {
    Self::default()
  }

  /// Parse a `;`-separated symbol list (the host's serialized form).
  pub fn parse(value: &str) -> Self {
    let mut set = Self::new();
    for symbol in value.split(';') {
      set.insert(symbol);
    }
    set
  }

  /// Insert a symbol, returning `false` if it was empty or already present.
  pub fn insert(&mut self, symbol: &str) -> bool {
    let symbol = symbol.trim();
    if symbol.is_empty() || self.contains(symbol) {
      return false;
    }
    self.symbols.push(symbol.to_string());
    true
  }

  pub fn contains(&self, symbol: &str) -> bool {
    self.symbols.iter().any(|s| s == symbol.trim())
  }

  pub fn is_empty(&self) -> bool {
    self.symbols.is_empty()
  }

  pub fn len(&self) -> usize {
    self.symbols.len()
  }

  pub fn iter(&self) -> impl Iterator<Item = &str> {
    self.symbols.iter().map(String::as_str)
  }

  /// Union with another set; existing symbols keep their order, new ones are appended.
  pub fn union(&self, other: &DefineSet) -> DefineSet {
    let mut merged = self.clone();
    for symbol in other.iter() {
      merged.insert(symbol);
    }
    merged
  }

  /// Serialize back to the host's `;`-separated form.
  pub fn to_host_string(&self) -> String {
    self.symbols.join(";")
  }
}

/// Typed, immutable configuration for a single build invocation.
///
/// Only obtainable through [`BuildConfiguration::load`] or
/// [`BuildConfiguration::from_lookup`], so required variables are always checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildConfiguration {
  /// Target identifier as typed by the runner (resolved later).
  pub target: String,
  /// Directory receiving the artifact and the result file.
  pub output_dir: PathBuf,
  /// Build the dedicated-server subtarget where supported.
  pub server_build: bool,
  /// Extra scripting defines injected for the duration of the build.
  pub defines: DefineSet,
  pub build_id: String,
  pub commit_hash: String,
  pub branch: String,
  /// Named build profile forwarded to the executor.
  pub build_profile: String,
  pub codesign_identity: String,
  pub notarize_profile: String,
  error: Option<String>,
}

impl BuildConfiguration {
  /// Load the configuration from the process environment.
  pub fn load() -> Self {
    Self::from_lookup(|name| std::env::var(name).ok())
  }

  /// Load the configuration from an arbitrary variable lookup.
  pub fn from_lookup<F>(lookup: F) -> Self
  where
    F: Fn(&str) -> Option<String>,
  {
    let read = |name: &str| lookup(name).map(|v| v.trim().to_string()).unwrap_or_default();

    let target = read(vars::BUILD_TARGET);
    let output_dir = read(vars::OUTPUT_DIR);

    let missing: Vec<&str> = [(vars::BUILD_TARGET, &target), (vars::OUTPUT_DIR, &output_dir)]
      .into_iter()
      .filter(|(_, value)| value.is_empty())
      .map(|(name, _)| name)
      .collect();

    let error = if missing.is_empty() {
      None
    } else {
      Some(format!("missing required environment variable: {}", missing.join(", ")))
    };

    let config = Self {
      target,
      output_dir: PathBuf::from(output_dir),
      server_build: parse_flag(&read(vars::SERVER_BUILD)),
      defines: DefineSet::parse(&read(vars::DEFINES)),
      build_id: read(vars::BUILD_ID),
      commit_hash: read(vars::COMMIT_HASH),
      branch: read(vars::BRANCH),
      build_profile: read(vars::BUILD_PROFILE),
      codesign_identity: read(vars::CODESIGN_IDENTITY),
      notarize_profile: read(vars::NOTARIZE_PROFILE),
      error,
    };

    debug!(
      target = %config.target,
      output_dir = %config.output_dir.display(),
      server = config.server_build,
      defines = config.defines.len(),
      valid = config.is_valid(),
      "loaded build configuration"
    );

    config
  }

  pub fn is_valid(&self) -> bool {
    self.error.is_none()
  }

  /// Human-readable validation error, if the configuration is invalid.
  pub fn error(&self) -> Option<&str> {
    self.error.as_deref()
  }

  /// Output directory, if one was configured.
  pub fn output_dir(&self) -> Option<&std::path::Path> {
    if self.output_dir.as_os_str().is_empty() {
      None
    } else {
      Some(&self.output_dir)
    }
  }

  /// Whether a version stamp should be written for this build.
  pub fn wants_stamp(&self) -> bool {
    !self.build_id.is_empty() || !self.commit_hash.is_empty()
  }
}

/// Booleans are the literal string "true", nothing else.
fn parse_flag(value: &str) -> bool {
  value == "true"
}
