//! Synchronous external process invocation.
//!
//! Signing, archiving, notarization and the command-backed build executor all
//! go through [`ProcessRunner`], so the build core can be exercised with a
//! fake runner.

use std::io;
use std::process::{Command, Stdio};

use tracing::debug;

/// Captured result of a finished process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
  pub stdout: String,
  pub stderr: String,
  /// Exit code, `None` if the process was terminated by a signal.
  pub code: Option<i32>,
}

impl ProcessOutput {
  pub fn success(&self) -> bool {
    self.code == Some(0)
  }
}

pub trait ProcessRunner {
  /// Run `program` to completion with both output streams fully drained.
  ///
  /// Returns `Err` only if the process could not be started; a non-zero exit
  /// is reported through [`ProcessOutput::code`].
  fn run(&self, program: &str, args: &[String]) -> io::Result<ProcessOutput>;
}

impl<R: ProcessRunner + ?Sized> ProcessRunner for &R {
  fn run(&self, program: &str, args: &[String]) -> io::Result<ProcessOutput> {
    (**self).run(program, args)
  }
}

/// Runs real processes on the local machine.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl ProcessRunner for SystemRunner {
  fn run(&self, program: &str, args: &[String]) -> io::Result<ProcessOutput> {
    debug!(program = %program, ?args, "spawning process");

    let output = Command::new(program)
      .args(args)
      .stdin(Stdio::null())
      .output()?;

    let result = ProcessOutput {
      stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
      stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
      code: output.status.code(),
    };

    debug!(program = %program, code = ?result.code, "process exited");
    Ok(result)
  }
}
