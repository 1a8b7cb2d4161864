//! File-backed host bound to a project directory.
//!
//! # Layout
//!
//! ```text
//! <root>/
//! ├── ProjectSettings/
//! │   ├── ProjectVersion.txt          # m_EditorVersion: 2022.3.10f1
//! │   ├── EditorBuildSettings.json    # { "scenes": [{ "path", "enabled" }] }
//! │   └── ScriptingDefines.json       # { "<group>": "A;B" }
//! └── Library/
//!     └── EditorUserBuildSettings.json  # { "activeBuildTarget": "<target>" }
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{Host, HostError};
use crate::consts::STAMP_DIR;
use crate::target::{BuildTarget, TargetGroup};

const VERSION_FILE: &str = "ProjectSettings/ProjectVersion.txt";
const BUILD_SETTINGS_FILE: &str = "ProjectSettings/EditorBuildSettings.json";
const DEFINES_FILE: &str = "ProjectSettings/ScriptingDefines.json";
const USER_SETTINGS_FILE: &str = "Library/EditorUserBuildSettings.json";

const VERSION_KEY: &str = "m_EditorVersion:";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneEntry {
  pub path: String,
  #[serde(default = "default_true")]
  pub enabled: bool,
}

fn default_true() -> bool {
  true
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct BuildSettings {
  #[serde(default)]
  scenes: Vec<SceneEntry>,
}

/// Kept as a raw name: the host may have any platform active, including
/// ones this shim cannot build.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserBuildSettings {
  #[serde(default)]
  active_build_target: String,
}

impl Default for UserBuildSettings {
  fn default() -> Self {
    Self {
      active_build_target: BuildTarget::NoTarget.as_str().to_string(),
    }
  }
}

/// A host whose state lives in JSON files inside the project directory.
#[derive(Debug, Clone)]
pub struct ProjectHost {
  root: PathBuf,
}

impl ProjectHost {
  pub fn open(root: impl AsRef<Path>) -> Self {
    let root = root.as_ref();
    let root = dunce::canonicalize(root).unwrap_or_else(|_| root.to_path_buf());
    Self { root }
  }

  fn path(&self, relative: &str) -> PathBuf {
    self.root.join(relative)
  }

  /// Read a JSON settings file, falling back to `T::default()` if it doesn't exist.
  fn read_json<T: DeserializeOwned + Default>(&self, relative: &str) -> Result<T, HostError> {
    let path = self.path(relative);
    let content = match fs::read_to_string(&path) {
      Ok(content) => content,
      Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(T::default()),
      Err(source) => return Err(HostError::Read { path, source }),
    };
    serde_json::from_str(&content).map_err(|source| HostError::Parse { path, source })
  }

  /// Write a JSON settings file atomically (temp file, then rename).
  fn write_json<T: Serialize>(&self, relative: &str, value: &T) -> Result<(), HostError> {
    let path = self.path(relative);
    let write_err = |source| HostError::Write {
      path: path.clone(),
      source,
    };

    if let Some(parent) = path.parent() {
      fs::create_dir_all(parent).map_err(write_err)?;
    }

    let content = serde_json::to_string_pretty(value).map_err(|e| write_err(io::Error::other(e)))?;
    let temp_path = path.with_extension("json.tmp");
    fs::write(&temp_path, content).map_err(write_err)?;
    fs::rename(&temp_path, &path).map_err(write_err)?;
    Ok(())
  }

  /// Scenes listed in the build settings, enabled or not.
  pub fn scenes(&self) -> Result<Vec<SceneEntry>, HostError> {
    Ok(self.read_json::<BuildSettings>(BUILD_SETTINGS_FILE)?.scenes)
  }
}

impl Host for ProjectHost {
  fn version(&self) -> String {
    let content = fs::read_to_string(self.path(VERSION_FILE)).unwrap_or_default();
    content
      .lines()
      .find_map(|line| line.trim().strip_prefix(VERSION_KEY))
      .map(|v| v.trim().to_string())
      .filter(|v| !v.is_empty())
      .unwrap_or_else(|| "unknown".to_string())
  }

  fn project_root(&self) -> &Path {
    &self.root
  }

  fn active_target(&self) -> Result<BuildTarget, HostError> {
    let name = self.read_json::<UserBuildSettings>(USER_SETTINGS_FILE)?.active_build_target;
    match BuildTarget::from_name(&name) {
      Some(target) => Ok(target),
      None => {
        debug!(active = %name, "active build target not recognized, treating as none");
        Ok(BuildTarget::NoTarget)
      }
    }
  }

  fn switch_active_target(&mut self, group: TargetGroup, target: BuildTarget) -> Result<(), HostError> {
    info!(group = %group, target = %target, "writing active build target");
    self.write_json(
      USER_SETTINGS_FILE,
      &UserBuildSettings {
        active_build_target: target.as_str().to_string(),
      },
    )
  }

  fn scripting_defines(&self, group: TargetGroup) -> Result<String, HostError> {
    let defines: BTreeMap<String, String> = self.read_json(DEFINES_FILE)?;
    Ok(defines.get(group.as_str()).cloned().unwrap_or_default())
  }

  fn set_scripting_defines(&mut self, group: TargetGroup, value: &str) -> Result<(), HostError> {
    let mut defines: BTreeMap<String, String> = self.read_json(DEFINES_FILE)?;
    defines.insert(group.as_str().to_string(), value.to_string());
    self.write_json(DEFINES_FILE, &defines)
  }

  fn enabled_scenes(&self) -> Result<Vec<String>, HostError> {
    Ok(
      self
        .scenes()?
        .into_iter()
        .filter(|s| s.enabled && !s.path.trim().is_empty())
        .map(|s| s.path)
        .collect(),
    )
  }

  fn refresh_assets(&mut self) -> Result<(), HostError> {
    let assets = self.path(STAMP_DIR);
    if !assets.is_dir() {
      return Err(HostError::Read {
        path: assets,
        source: io::Error::new(io::ErrorKind::NotFound, "asset directory missing"),
      });
    }
    debug!(path = %assets.display(), "asset tree refreshed");
    Ok(())
  }
}
