use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};

use hostbuild_lib::clean::clean_caches;

use crate::output::{
  OutputFormat, format_bytes, format_duration, print_info, print_json, print_stat, print_success, print_warning,
};

pub fn cmd_clean(project: &Path, dry_run: bool, output: OutputFormat) -> Result<()> {
  let start = Instant::now();

  let result = clean_caches(project, dry_run).context("Failed to clean build caches")?;

  if output.is_json() {
    print_json(&result)?;
  } else {
    println!();
    if dry_run {
      print_info("Dry run - no changes made");
    } else {
      print_success("Cache cleanup complete!");
    }
    print_stat("Removed", &result.stats.removed.to_string());
    print_stat("Skipped", &result.stats.skipped.to_string());
    print_stat("Space freed", &format_bytes(result.stats.bytes_freed));
    print_stat("Duration", &format_duration(start.elapsed()));

    for path in &result.failed_paths {
      print_warning(&format!("Could not remove {}", path.display()));
    }
  }

  Ok(())
}
