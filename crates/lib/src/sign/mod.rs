//! Code signing and notarization of built artifacts.
//!
//! Every step is best-effort: failures are logged and reported as `false`,
//! never escalated into a failed build.

use std::path::{Path, PathBuf};

use tracing::{error, info, warn};

use crate::process::{ProcessOutput, ProcessRunner};

pub const CODESIGN: &str = "codesign";
pub const DITTO: &str = "ditto";
pub const XCRUN: &str = "xcrun";

/// Sign `artifact` with the hardened runtime under `identity`.
pub fn sign<R: ProcessRunner + ?Sized>(runner: &R, artifact: &Path, identity: &str) -> bool {
  info!(artifact = %artifact.display(), identity = %identity, "signing artifact");

  let args = vec![
    "--deep".to_string(),
    "--force".to_string(),
    "--options".to_string(),
    "runtime".to_string(),
    "--timestamp".to_string(),
    "--sign".to_string(),
    identity.to_string(),
    path_arg(artifact),
  ];

  let ok = run_step(runner, "sign", CODESIGN, &args);
  if ok {
    info!(artifact = %artifact.display(), "artifact signed");
  }
  ok
}

/// Archive, submit and staple `artifact` using the stored keychain `profile`.
///
/// Submission waits for the notary service to finish. A stapling failure is
/// only a warning: the ticket can still be fetched online.
pub fn notarize<R: ProcessRunner + ?Sized>(runner: &R, artifact: &Path, profile: &str) -> bool {
  let archive = archive_path(artifact);
  info!(artifact = %artifact.display(), archive = %archive.display(), "notarizing artifact");

  let archive_args = vec![
    "-c".to_string(),
    "-k".to_string(),
    "--keepParent".to_string(),
    path_arg(artifact),
    path_arg(&archive),
  ];
  if !run_step(runner, "archive", DITTO, &archive_args) {
    return false;
  }

  let submit_args = vec![
    "notarytool".to_string(),
    "submit".to_string(),
    path_arg(&archive),
    "--keychain-profile".to_string(),
    profile.to_string(),
    "--wait".to_string(),
  ];
  if !run_step(runner, "notarize", XCRUN, &submit_args) {
    return false;
  }

  let staple_args = vec!["stapler".to_string(), "staple".to_string(), path_arg(artifact)];
  match runner.run(XCRUN, &staple_args) {
    Ok(output) if output.success() => info!(artifact = %artifact.display(), "notarization ticket stapled"),
    Ok(output) => warn!(code = ?output.code, stderr = %output.stderr.trim(), "stapling failed"),
    Err(e) => warn!(error = %e, "failed to start stapler"),
  }

  info!(artifact = %artifact.display(), "artifact notarized");
  true
}

/// `<dir>/<stem>.zip` next to the artifact.
fn archive_path(artifact: &Path) -> PathBuf {
  artifact.with_extension("zip")
}

fn path_arg(path: &Path) -> String {
  path.to_string_lossy().into_owned()
}

fn run_step<R: ProcessRunner + ?Sized>(runner: &R, step: &str, program: &str, args: &[String]) -> bool {
  match runner.run(program, args) {
    Ok(ProcessOutput { code: Some(0), .. }) => true,
    Ok(output) => {
      error!(
        step = %step,
        program = %program,
        code = ?output.code,
        stderr = %output.stderr.trim(),
        "post-processing step failed"
      );
      false
    }
    Err(e) => {
      error!(step = %step, program = %program, error = %e, "failed to start post-processing tool");
      false
    }
  }
}
