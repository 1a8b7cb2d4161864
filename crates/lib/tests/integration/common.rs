//! Shared helpers for library integration tests.

use std::path::{Path, PathBuf};

use hostbuild_lib::BuildConfiguration;
use hostbuild_lib::host::{BuildExecutor, BuildOutcome, BuildRequest, BuildSummary, HostError};
use tempfile::TempDir;

pub const HOST_VERSION: &str = "2022.3.10f1";

/// Isolated project directory with an output directory next to it.
pub struct TestEnv {
  pub temp: TempDir,
}

impl TestEnv {
  /// A project with two enabled scenes, one disabled scene and existing defines.
  pub fn project() -> Self {
    let env = Self::empty();
    env.write_file(
      "project/ProjectSettings/ProjectVersion.txt",
      &format!("m_EditorVersion: {HOST_VERSION}\nm_EditorVersionWithRevision: {HOST_VERSION} (abc123)\n"),
    );
    env.write_file(
      "project/ProjectSettings/EditorBuildSettings.json",
      r#"{
  "scenes": [
    { "path": "Assets/Scenes/Boot.unity", "enabled": true },
    { "path": "Assets/Scenes/Sandbox.unity", "enabled": false },
    { "path": "Assets/Scenes/Main.unity", "enabled": true }
  ]
}"#,
    );
    env.write_file(
      "project/ProjectSettings/ScriptingDefines.json",
      r#"{ "Standalone": "ODIN_INSPECTOR;DOTWEEN", "Android": "MOBILE" }"#,
    );
    std::fs::create_dir_all(env.project_root().join("Assets")).unwrap();
    env
  }

  pub fn empty() -> Self {
    Self {
      temp: TempDir::new().unwrap(),
    }
  }

  pub fn write_file(&self, relative_path: &str, content: &str) {
    let path = self.temp.path().join(relative_path);
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, content).unwrap();
  }

  pub fn read_file(&self, relative_path: &str) -> String {
    std::fs::read_to_string(self.temp.path().join(relative_path)).unwrap()
  }

  pub fn project_root(&self) -> PathBuf {
    let p = self.temp.path().join("project");
    std::fs::create_dir_all(&p).unwrap();
    dunce::canonicalize(&p).unwrap_or(p)
  }

  pub fn output_dir(&self) -> PathBuf {
    self.temp.path().join("out")
  }

  /// Configuration as the runner would set it, plus `vars`.
  pub fn config(&self, vars: &[(&str, &str)]) -> BuildConfiguration {
    let output = self.output_dir().to_string_lossy().into_owned();
    let mut pairs: Vec<(String, String)> = vec![("OUTPUT_DIR".to_string(), output)];
    pairs.extend(vars.iter().map(|(k, v)| (k.to_string(), v.to_string())));
    BuildConfiguration::from_lookup(|name| pairs.iter().find(|(k, _)| k == name).map(|(_, v)| v.clone()))
  }
}

/// Executor that writes a fixed-size artifact and records what it saw.
pub struct ScriptedExecutor {
  pub outcome: BuildOutcome,
  pub artifact_bytes: usize,
  pub requests: Vec<BuildRequest>,
  /// Project defines file content at the moment the build ran.
  pub defines_during_build: Option<String>,
  project_root: PathBuf,
}

impl ScriptedExecutor {
  pub fn new(project_root: &Path, outcome: BuildOutcome, artifact_bytes: usize) -> Self {
    Self {
      outcome,
      artifact_bytes,
      requests: Vec::new(),
      defines_during_build: None,
      project_root: project_root.to_path_buf(),
    }
  }
}

impl BuildExecutor for ScriptedExecutor {
  fn build(&mut self, request: &BuildRequest) -> Result<BuildSummary, HostError> {
    self.requests.push(request.clone());
    self.defines_during_build =
      std::fs::read_to_string(self.project_root.join("ProjectSettings/ScriptingDefines.json")).ok();

    if self.outcome == BuildOutcome::Succeeded {
      let dir = &request.output_path;
      std::fs::create_dir_all(dir.join("Game_Data")).unwrap();
      std::fs::write(dir.join("Game_Data/level0"), vec![1u8; self.artifact_bytes]).unwrap();
    }

    Ok(BuildSummary {
      result: self.outcome,
      total_size: 7,
      total_warnings: 2,
      total_errors: u32::from(self.outcome != BuildOutcome::Succeeded),
      steps: Vec::new(),
    })
  }
}
