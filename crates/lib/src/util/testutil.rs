//! Test utilities for hostbuild-lib.
//!
//! In-memory stand-ins for the host and for external processes, plus
//! cross-platform shell helpers.

use std::cell::RefCell;
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

use crate::host::{
  BuildExecutor, BuildOutcome, BuildRequest, BuildStep, BuildSummary, Host, HostError, MessageKind, StepMessage,
};
use crate::process::{ProcessOutput, ProcessRunner};
use crate::target::{BuildTarget, TargetGroup};

/// Returns the shell command and args to execute a shell script.
#[cfg(unix)]
pub fn shell_cmd(script: &str) -> (&'static str, Vec<String>) {
  ("/bin/sh", vec!["-c".to_string(), script.to_string()])
}

#[cfg(windows)]
pub fn shell_cmd(script: &str) -> (&'static str, Vec<String>) {
  ("cmd.exe", vec!["/C".to_string(), script.to_string()])
}

/// In-memory host that counts mutations.
#[derive(Debug)]
pub struct FakeHost {
  pub root: PathBuf,
  pub version: String,
  pub active: BuildTarget,
  pub switch_count: usize,
  pub defines: HashMap<TargetGroup, String>,
  pub define_writes: usize,
  pub scenes: Vec<String>,
  pub refresh_count: usize,
  /// Make `set_scripting_defines` fail.
  pub reject_defines: bool,
}

impl FakeHost {
  pub fn new() -> Self {
    Self::at(std::env::temp_dir())
  }

  pub fn at(root: impl Into<PathBuf>) -> Self {
    Self {
      root: root.into(),
      version: "2022.3.10f1".to_string(),
      active: BuildTarget::NoTarget,
      switch_count: 0,
      defines: HashMap::new(),
      define_writes: 0,
      scenes: Vec::new(),
      refresh_count: 0,
      reject_defines: false,
    }
  }

  pub fn with_defines(mut self, group: TargetGroup, value: &str) -> Self {
    self.defines.insert(group, value.to_string());
    self
  }
}

impl Host for FakeHost {
  fn version(&self) -> String {
    self.version.clone()
  }

  fn project_root(&self) -> &Path {
    &self.root
  }

  fn active_target(&self) -> Result<BuildTarget, HostError> {
    Ok(self.active)
  }

  fn switch_active_target(&mut self, _group: TargetGroup, target: BuildTarget) -> Result<(), HostError> {
    self.switch_count += 1;
    self.active = target;
    Ok(())
  }

  fn scripting_defines(&self, group: TargetGroup) -> Result<String, HostError> {
    Ok(self.defines.get(&group).cloned().unwrap_or_default())
  }

  fn set_scripting_defines(&mut self, group: TargetGroup, defines: &str) -> Result<(), HostError> {
    if self.reject_defines {
      return Err(HostError::Write {
        path: self.root.join("defines"),
        source: io::Error::new(io::ErrorKind::PermissionDenied, "read-only settings"),
      });
    }
    self.define_writes += 1;
    self.defines.insert(group, defines.to_string());
    Ok(())
  }

  fn enabled_scenes(&self) -> Result<Vec<String>, HostError> {
    Ok(self.scenes.clone())
  }

  fn refresh_assets(&mut self) -> Result<(), HostError> {
    self.refresh_count += 1;
    Ok(())
  }
}

/// Process runner with canned responses that records every invocation.
///
/// Responses are keyed by `"program"` or `"program first-arg"`; the more
/// specific key wins. Unknown programs fail to start.
#[derive(Debug, Default)]
pub struct FakeRunner {
  responses: HashMap<String, ProcessOutput>,
  pub calls: RefCell<Vec<(String, Vec<String>)>>,
}

impl FakeRunner {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn respond(mut self, key: &str, code: i32, stdout: &str, stderr: &str) -> Self {
    self.responses.insert(
      key.to_string(),
      ProcessOutput {
        stdout: stdout.to_string(),
        stderr: stderr.to_string(),
        code: Some(code),
      },
    );
    self
  }

  /// Programs invoked so far, with their first argument.
  pub fn invoked(&self) -> Vec<String> {
    self
      .calls
      .borrow()
      .iter()
      .map(|(program, args)| match args.first() {
        Some(first) => format!("{} {}", program, first),
        None => program.clone(),
      })
      .collect()
  }
}

impl ProcessRunner for FakeRunner {
  fn run(&self, program: &str, args: &[String]) -> io::Result<ProcessOutput> {
    self.calls.borrow_mut().push((program.to_string(), args.to_vec()));

    let specific = args.first().map(|first| format!("{} {}", program, first));
    specific
      .and_then(|key| self.responses.get(&key))
      .or_else(|| self.responses.get(program))
      .cloned()
      .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, format!("{} not found", program)))
  }
}

/// Build executor returning a canned summary that records every request.
#[derive(Debug, Default)]
pub struct FakeExecutor {
  pub summary: BuildSummary,
  /// Bytes written to the requested output path on each build.
  pub artifact_bytes: usize,
  /// Make `build` fail as if the executor could not be launched.
  pub fail_to_start: bool,
  pub requests: Vec<BuildRequest>,
}

impl FakeExecutor {
  pub fn succeeding(total_size: u64) -> Self {
    Self {
      summary: BuildSummary {
        result: BuildOutcome::Succeeded,
        total_size,
        ..Default::default()
      },
      ..Default::default()
    }
  }

  /// One warning and one error in a compile step.
  pub fn failing(error: &str) -> Self {
    Self {
      summary: BuildSummary {
        result: BuildOutcome::Failed,
        total_warnings: 1,
        total_errors: 1,
        steps: vec![BuildStep {
          name: "Compile".to_string(),
          messages: vec![
            StepMessage {
              kind: MessageKind::Warning,
              content: "obsolete API".to_string(),
            },
            StepMessage {
              kind: MessageKind::Error,
              content: error.to_string(),
            },
          ],
        }],
        ..Default::default()
      },
      ..Default::default()
    }
  }

  pub fn with_artifact(mut self, bytes: usize) -> Self {
    self.artifact_bytes = bytes;
    self
  }
}

impl BuildExecutor for FakeExecutor {
  fn build(&mut self, request: &BuildRequest) -> Result<BuildSummary, HostError> {
    self.requests.push(request.clone());

    if self.fail_to_start {
      return Err(HostError::ExecutorLaunch(io::Error::new(
        io::ErrorKind::NotFound,
        "executor not found",
      )));
    }

    if self.artifact_bytes > 0 {
      let path = &request.output_path;
      if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| HostError::Write {
          path: parent.to_path_buf(),
          source,
        })?;
      }
      std::fs::write(path, vec![0u8; self.artifact_bytes]).map_err(|source| HostError::Write {
        path: path.clone(),
        source,
      })?;
    }

    Ok(self.summary.clone())
  }
}
