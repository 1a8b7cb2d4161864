use predicates::prelude::*;

use super::common::TestEnv;

#[test]
fn clean_reports_freed_space() {
  let env = TestEnv::project();
  env.write_file("project/Library/Bee/obj/a.o", &"x".repeat(2048));
  env.write_file("project/Library/BuildCache/b.bin", "y");

  env
    .hostbuild_cmd()
    .arg("clean")
    .assert()
    .success()
    .stdout(predicate::str::contains("Cache cleanup complete"))
    .stdout(predicate::str::contains("2.0 KB"));

  assert!(!env.project_root().join("Library/Bee").exists());
  assert!(!env.project_root().join("Library/BuildCache").exists());
}

#[test]
fn clean_dry_run_keeps_caches() {
  let env = TestEnv::project();
  env.write_file("project/Library/Bee/obj/a.o", "x");

  env
    .hostbuild_cmd()
    .args(["clean", "--dry-run"])
    .assert()
    .success()
    .stdout(predicate::str::contains("Dry run"));

  assert!(env.project_root().join("Library/Bee/obj/a.o").exists());
}

#[test]
fn clean_json_output_is_valid() {
  let env = TestEnv::project();
  env.write_file("project/Library/BuildCache/b.bin", "y");

  let output = env.hostbuild_cmd().args(["clean", "-o", "json"]).output().unwrap();

  assert!(output.status.success());
  let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
  assert_eq!(json["stats"]["removed"], 1);
  assert_eq!(json["stats"]["skipped"], 1);
  assert_eq!(json["stats"]["bytes_freed"], 1);
}

#[test]
fn clean_with_explicit_project_flag() {
  let env = TestEnv::project();
  env.write_file("project/Library/Bee/x", "x");

  env
    .hostbuild_cmd()
    .current_dir(env.temp.path())
    .arg("--project")
    .arg(env.project_root())
    .arg("clean")
    .assert()
    .success();

  assert!(!env.project_root().join("Library/Bee").exists());
}
