//! Build orchestration.
//!
//! [`run`] drives one build invocation as a strictly sequential pipeline:
//!
//! 1. Validate the configuration
//! 2. Resolve the target against the capability table for the host version
//! 3. Stamp the version, switch the active target, inject defines
//! 4. Collect enabled scenes
//! 5. Invoke the build executor
//! 6. Persist the result file, then sign and notarize on success
//! 7. Restore defines
//!
//! Steps 3 through 7 run inside a [`DefineScope`], so defines are restored
//! on every exit path. Failures never escape: they end up in the result file
//! and in the exit code.

pub mod types;

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::{debug, error, info, warn};

use crate::config::BuildConfiguration;
use crate::defines::DefineScope;
use crate::host::{BuildExecutor, BuildRequest, BuildSummary, Host, MessageKind};
use crate::process::ProcessRunner;
use crate::report::{self, BuildResult};
use crate::sign;
use crate::stamp::stamp;
use crate::target::{PlatformDescriptor, TargetTable, default_output_name, switch_if_needed};
use crate::util::fs::dir_size;

pub use types::{BuildError, BuildReport};

/// State gathered while building, kept for the failure result.
#[derive(Debug, Default)]
struct Progress {
  scenes: Vec<String>,
  summary: Option<BuildSummary>,
}

/// Run one build invocation to completion.
///
/// Never panics on build failures and never returns an error: the outcome is
/// the [`BuildReport`], whose result has also been written to
/// `<output_dir>/build-result.json` whenever the output directory is known.
/// A result that could not be written turns the exit code into a failure.
pub fn run<H, E, R>(config: &BuildConfiguration, host: &mut H, executor: &mut E, runner: &R) -> BuildReport
where
  H: Host + ?Sized,
  E: BuildExecutor + ?Sized,
  R: ProcessRunner + ?Sized,
{
  let started = Instant::now();
  let host_version = host.version();
  info!(target = %config.target, host_version = %host_version, "starting build");

  if let Some(message) = config.error() {
    return fail_early(config, &host_version, started, BuildError::Configuration(message.to_string()));
  }

  let table = TargetTable::for_host(&host_version);
  let Some(descriptor) = table.resolve(&config.target).copied() else {
    return fail_early(
      config,
      &host_version,
      started,
      BuildError::UnknownTarget(config.target.clone()),
    );
  };
  debug!(target = %descriptor.target, group = %descriptor.group, "resolved build target");

  let output_path = config.output_dir.join(default_output_name(&descriptor));
  let mut scope = DefineScope::new(host);
  let mut progress = Progress::default();

  let outcome = build_in_scope(config, &descriptor, &output_path, &mut scope, executor, &mut progress);

  let mut result = match outcome {
    Ok(summary) => {
      let total_size = artifact_size(&output_path, summary.total_size);
      let mut result = BuildResult::success(descriptor.target.as_str(), output_path.clone(), total_size, &host_version);
      result.warnings = summary.total_warnings;
      result.errors = summary.total_errors;
      result.scenes = progress.scenes;
      result
    }
    Err(e) => {
      error!(target = %descriptor.target, error = %e, "build failed");
      let mut result = BuildResult::failure(descriptor.target.as_str(), e.to_string(), &host_version);
      if let Some(summary) = &progress.summary {
        result.warnings = summary.total_warnings;
        result.errors = summary.total_errors;
      }
      result.scenes = progress.scenes;
      result
    }
  };

  result.duration = started.elapsed().as_secs_f64();
  let result_path = persist(&result, &config.output_dir);

  let (signed, notarized) = if result.success {
    post_process(config, &descriptor, &output_path, runner)
  } else {
    (None, None)
  };

  if let Err(e) = scope.restore() {
    error!(error = %e, "failed to restore scripting defines");
  }

  info!(
    target = %result.target,
    success = result.success,
    duration_secs = result.duration,
    total_size = result.total_size,
    "build finished"
  );

  BuildReport {
    result,
    result_path,
    signed,
    notarized,
  }
}

/// Steps 3 through 5. Every host mutation goes through `scope`.
fn build_in_scope<H, E>(
  config: &BuildConfiguration,
  descriptor: &PlatformDescriptor,
  output_path: &Path,
  scope: &mut DefineScope<'_, H>,
  executor: &mut E,
  progress: &mut Progress,
) -> Result<BuildSummary, BuildError>
where
  H: Host + ?Sized,
  E: BuildExecutor + ?Sized,
{
  if config.wants_stamp() {
    stamp(&mut **scope, config, descriptor.target.as_str())?;
  }

  switch_if_needed(&mut **scope, descriptor)?;
  scope.inject(descriptor.group, &config.defines)?;

  fs::create_dir_all(&config.output_dir).map_err(|source| BuildError::OutputDir {
    path: config.output_dir.clone(),
    source,
  })?;

  let scenes = scope.enabled_scenes()?;
  if scenes.is_empty() {
    return Err(BuildError::NoBuildUnits);
  }
  progress.scenes = scenes.clone();

  if config.server_build && !descriptor.features.server_subtarget {
    warn!(target = %descriptor.target, "server subtarget not supported, building the regular player");
  }

  let request = BuildRequest {
    scenes,
    output_path: output_path.to_path_buf(),
    target: descriptor.target,
    group: descriptor.group,
    server: config.server_build && descriptor.features.server_subtarget,
    profile: (!config.build_profile.is_empty()).then(|| config.build_profile.clone()),
  };

  info!(
    target = %request.target,
    output = %request.output_path.display(),
    scenes = request.scenes.len(),
    server = request.server,
    "invoking build executor"
  );
  let summary = executor.build(&request)?;
  log_step_messages(&summary);
  progress.summary = Some(summary.clone());

  if !summary.succeeded() {
    return Err(BuildError::Executor {
      outcome: summary.result,
      message: failure_message(&summary),
    });
  }

  Ok(summary)
}

/// Failure before any host mutation: write the result if there is somewhere to put it.
fn fail_early(config: &BuildConfiguration, host_version: &str, started: Instant, err: BuildError) -> BuildReport {
  error!(error = %err, "build aborted");

  let mut result = BuildResult::failure(config.target.as_str(), err.to_string(), host_version);
  result.duration = started.elapsed().as_secs_f64();

  let result_path = match config.output_dir() {
    Some(dir) => persist(&result, dir),
    None => {
      warn!("no output directory configured, build result not written");
      None
    }
  };

  BuildReport {
    result,
    result_path,
    signed: None,
    notarized: None,
  }
}

fn persist(result: &BuildResult, dir: &Path) -> Option<PathBuf> {
  match report::write(result, dir) {
    Ok(path) => Some(path),
    Err(e) => {
      error!(error = %e, "failed to write build result");
      None
    }
  }
}

/// On-disk size of the artifact, falling back to the executor's figure when the walk finds nothing.
fn artifact_size(output_path: &Path, reported: u64) -> u64 {
  let on_disk = dir_size(output_path);
  if on_disk == 0 && reported > 0 {
    debug!(reported, "artifact not found on disk, using executor-reported size");
    return reported;
  }
  on_disk
}

fn post_process<R: ProcessRunner + ?Sized>(
  config: &BuildConfiguration,
  descriptor: &PlatformDescriptor,
  artifact: &Path,
  runner: &R,
) -> (Option<bool>, Option<bool>) {
  if !descriptor.features.codesign || config.codesign_identity.is_empty() {
    return (None, None);
  }

  let signed = sign::sign(runner, artifact, &config.codesign_identity);
  if !signed {
    warn!(artifact = %artifact.display(), "signing failed, skipping notarization");
    return (Some(false), None);
  }

  if config.notarize_profile.is_empty() {
    return (Some(true), None);
  }

  let notarized = sign::notarize(runner, artifact, &config.notarize_profile);
  if !notarized {
    warn!(artifact = %artifact.display(), "notarization failed");
  }
  (Some(true), Some(notarized))
}

fn log_step_messages(summary: &BuildSummary) {
  for step in &summary.steps {
    for message in &step.messages {
      match message.kind {
        MessageKind::Error | MessageKind::Exception => {
          error!(step = %step.name, "{}", message.content)
        }
        MessageKind::Warning => debug!(step = %step.name, "{}", message.content),
        MessageKind::Assert | MessageKind::Log => {}
      }
    }
  }
}

fn failure_message(summary: &BuildSummary) -> String {
  let errors = summary.error_messages();
  if errors.is_empty() {
    format!("{} errors, {} warnings", summary.total_errors, summary.total_warnings)
  } else {
    errors.join("; ")
  }
}
