use std::path::Path;

use anyhow::Result;
use serde::Serialize;

use hostbuild_lib::host::{Host, ProjectHost};
use hostbuild_lib::target::{TargetEntry, TargetTable};

use crate::output::{OutputFormat, print_info, print_json};

#[derive(Serialize)]
struct TargetListing<'a> {
  host_version: String,
  targets: &'a [TargetEntry],
}

pub fn cmd_targets(project: &Path, output: OutputFormat) -> Result<()> {
  let host = ProjectHost::open(project);
  let host_version = host.version();
  let table = TargetTable::for_host(&host_version);

  if output.is_json() {
    return print_json(&TargetListing {
      host_version,
      targets: table.entries(),
    });
  }

  print_info(&format!("Build targets for host version {}", host_version));
  println!();
  for entry in table.entries() {
    let d = &entry.descriptor;
    let mut features = Vec::new();
    if d.features.server_subtarget {
      features.push("server");
    }
    if d.features.codesign {
      features.push("codesign");
    }

    println!(
      "  {:<20} {:<11} {:<14} {:<24} {}",
      d.target.as_str(),
      d.group.as_str(),
      d.default_output,
      entry.aliases.join(", "),
      features.join(", ")
    );
  }

  Ok(())
}
