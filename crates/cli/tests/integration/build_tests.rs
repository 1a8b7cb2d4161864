use predicates::prelude::*;

use super::common::TestEnv;

#[cfg(unix)]
const SUCCEEDING_EXECUTOR: &str = r#"
out=""
while [ $# -gt 0 ]; do
  if [ "$1" = "--output" ]; then out="$2"; fi
  shift
done
mkdir -p "$out"
printf '0123456789' > "$out/Game"
echo '{"result":"Succeeded","totalSize":10,"totalWarnings":1,"totalErrors":0,"steps":[]}'
"#;

#[test]
fn missing_target_writes_failure_result() {
  let env = TestEnv::project();

  env
    .hostbuild_cmd()
    .args(["build", "--executor", "unused-executor"])
    .assert()
    .code(1)
    .stderr(predicate::str::contains("BUILD_TARGET"));

  let result = env.build_result();
  assert_eq!(result["success"], false);
  assert!(
    result["error"]
      .as_str()
      .unwrap()
      .contains("missing required environment variable: BUILD_TARGET")
  );
  assert!(result.get("outputPath").is_none());
}

#[test]
fn unknown_target_writes_failure_result() {
  let env = TestEnv::project();

  env
    .hostbuild_cmd()
    .env("BUILD_TARGET", "dreamcast")
    .args(["build", "--executor", "unused-executor"])
    .assert()
    .code(1);

  let result = env.build_result();
  assert_eq!(result["success"], false);
  assert_eq!(result["target"], "dreamcast");
  assert_eq!(result["error"], "unknown build target: dreamcast");
}

#[cfg(unix)]
#[test]
fn successful_build_exits_zero() {
  let env = TestEnv::project();
  let script = env.executor_script(SUCCEEDING_EXECUTOR);

  env
    .hostbuild_cmd()
    .env("BUILD_TARGET", "Linux")
    .env("DEFINES", "CI")
    .env("BUILD_EXECUTOR", &script)
    .arg("build")
    .assert()
    .success()
    .stdout(predicate::str::contains("Build succeeded"))
    .stdout(predicate::str::contains("StandaloneLinux64"));

  let result = env.build_result();
  assert_eq!(result["success"], true);
  assert_eq!(result["target"], "StandaloneLinux64");
  assert_eq!(result["totalSize"], 10);
  assert_eq!(result["warnings"], 1);
  assert_eq!(result["hostVersion"], "2022.3.10f1");
  assert_eq!(result["scenes"][0], "Assets/Scenes/Main.unity");
  assert!(result.get("error").is_none());

  let defines = std::fs::read_to_string(env.project_root().join("ProjectSettings/ScriptingDefines.json")).unwrap();
  let defines: serde_json::Value = serde_json::from_str(&defines).unwrap();
  assert_eq!(defines["Standalone"], "DOTWEEN");
}

#[cfg(unix)]
#[test]
fn failing_executor_exits_one() {
  let env = TestEnv::project();
  let script = env.executor_script(
    r#"echo '{"result":"Failed","totalErrors":1,"steps":[{"name":"Compile","messages":[{"type":"Error","content":"Assets/Player.cs(12,5): error CS1002"}]}]}'"#,
  );

  env
    .hostbuild_cmd()
    .env("BUILD_TARGET", "windows")
    .args(["build", "--executor"])
    .arg(&script)
    .assert()
    .code(1)
    .stderr(predicate::str::contains("Build failed"));

  let result = env.build_result();
  assert_eq!(result["success"], false);
  assert_eq!(result["errors"], 1);
  assert!(result["error"].as_str().unwrap().contains("CS1002"));
}

#[cfg(unix)]
#[test]
fn json_output_matches_result_file() {
  let env = TestEnv::project();
  let script = env.executor_script(SUCCEEDING_EXECUTOR);

  let output = env
    .hostbuild_cmd()
    .env("BUILD_TARGET", "android")
    .args(["build", "-o", "json", "--executor"])
    .arg(&script)
    .output()
    .unwrap();

  assert!(output.status.success());
  let printed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
  assert_eq!(printed, env.build_result());
}
