use std::path::Path;

use anyhow::{Context, Result, bail};

use hostbuild_lib::host::{CommandExecutor, ProjectHost};
use hostbuild_lib::process::SystemRunner;
use hostbuild_lib::{BuildConfiguration, BuildReport, run};

use crate::output::{
  OutputFormat, format_bytes, format_seconds, print_error, print_json, print_stat, print_success, print_warning,
};

/// Run one build and return the process exit code.
pub fn cmd_build(project: &Path, executor: Option<String>, output: OutputFormat) -> Result<i32> {
  let program = executor
    .filter(|p| !p.trim().is_empty())
    .context("No build executor configured (set BUILD_EXECUTOR or pass --executor)")?;

  if !project.is_dir() {
    bail!("Project directory not found: {}", project.display());
  }

  let config = BuildConfiguration::load();
  let mut host = ProjectHost::open(project);
  let mut executor = CommandExecutor::new(program, SystemRunner);

  let report = run(&config, &mut host, &mut executor, &SystemRunner);

  if output.is_json() {
    print_json(&report.result)?;
  } else {
    print_report(&report);
  }

  Ok(report.exit_code())
}

fn print_report(report: &BuildReport) {
  let result = &report.result;

  println!();
  if result.success {
    print_success("Build succeeded!");
  } else {
    print_error(&format!(
      "Build failed: {}",
      result.error.as_deref().unwrap_or("unknown error")
    ));
  }

  print_stat("Target", &result.target);
  if let Some(path) = &result.output_path {
    print_stat("Output", &path.display().to_string());
    print_stat("Size", &format_bytes(result.total_size));
  }
  print_stat("Scenes", &result.scenes.len().to_string());
  print_stat("Warnings", &result.warnings.to_string());
  print_stat("Errors", &result.errors.to_string());
  print_stat("Duration", &format_seconds(result.duration));

  match report.signed {
    Some(true) => print_stat("Signed", "yes"),
    Some(false) => print_warning("Code signing failed, artifact is unsigned"),
    None => {}
  }
  if report.notarized == Some(false) {
    print_warning("Notarization failed");
  }

  match &report.result_path {
    Some(path) => print_stat("Result", &path.display().to_string()),
    None => print_warning("Build result was not written"),
  }
}
