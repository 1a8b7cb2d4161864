//! Build executor backed by an external program.
//!
//! The program receives the request as command-line arguments and prints a
//! JSON [`BuildSummary`] on stdout.

use tracing::{debug, warn};

use super::{BuildExecutor, BuildOutcome, BuildRequest, BuildStep, BuildSummary, HostError, MessageKind, StepMessage};
use crate::process::{ProcessOutput, ProcessRunner};

pub struct CommandExecutor<R: ProcessRunner> {
  program: String,
  runner: R,
}

impl<R: ProcessRunner> CommandExecutor<R> {
  pub fn new(program: impl Into<String>, runner: R) -> Self {
    Self {
      program: program.into(),
      runner,
    }
  }

  /// Arguments passed to the executor program for a request.
  pub fn arguments(request: &BuildRequest) -> Vec<String> {
    let mut args = vec![
      "--target".to_string(),
      request.target.as_str().to_string(),
      "--group".to_string(),
      request.group.as_str().to_string(),
      "--output".to_string(),
      request.output_path.display().to_string(),
      "--scenes".to_string(),
      request.scenes.join(";"),
    ];
    if request.server {
      args.push("--server".to_string());
    }
    if let Some(profile) = &request.profile {
      args.push("--profile".to_string());
      args.push(profile.clone());
    }
    args
  }
}

impl<R: ProcessRunner> BuildExecutor for CommandExecutor<R> {
  fn build(&mut self, request: &BuildRequest) -> Result<BuildSummary, HostError> {
    let args = Self::arguments(request);
    debug!(program = %self.program, ?args, "invoking build executor");

    let output = self.runner.run(&self.program, &args).map_err(HostError::ExecutorLaunch)?;
    parse_summary(&output)
  }
}

/// Interpret the executor's output.
///
/// A readable summary wins even when the exit code is non-zero. Without one,
/// a failed process becomes a `Failed` summary carrying its stderr.
fn parse_summary(output: &ProcessOutput) -> Result<BuildSummary, HostError> {
  match serde_json::from_str::<BuildSummary>(output.stdout.trim()) {
    Ok(summary) => Ok(summary),
    Err(e) if output.success() => Err(HostError::ExecutorOutput(e.to_string())),
    Err(_) => {
      warn!(code = ?output.code, "build executor exited without a summary");
      let content = match output.stderr.trim() {
        "" => format!("build executor exited with code {:?}", output.code),
        stderr => stderr.to_string(),
      };
      Ok(BuildSummary {
        result: BuildOutcome::Failed,
        total_errors: 1,
        steps: vec![BuildStep {
          name: "executor".to_string(),
          messages: vec![StepMessage {
            kind: MessageKind::Error,
            content,
          }],
        }],
        ..BuildSummary::default()
      })
    }
  }
}
