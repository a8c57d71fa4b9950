//! Data directory resolution through the environment.

use predicates::prelude::*;

use super::common::TestEnv;

#[test]
fn data_dir_env_is_used() {
  let env = TestEnv::new();

  env
    .tally_cmd()
    .args(["inventory", "add", "A1", "Widget", "1", "1"])
    .assert()
    .success();

  assert!(env.data_path().join("inventory.json").exists());
}

#[test]
fn data_dir_flag_beats_env() {
  let env = TestEnv::new();
  let other = env.temp.path().join("other");

  env
    .tally_cmd()
    .arg("--data-dir")
    .arg(&other)
    .args(["inventory", "add", "A1", "Widget", "1", "1"])
    .assert()
    .success();

  assert!(other.join("inventory.json").exists());
  assert!(!env.data_path().join("inventory.json").exists());
}

#[test]
fn platform_dir_used_without_override() {
  let env = TestEnv::new();

  env
    .tally_cmd()
    .env_remove("TALLY_DATA_DIR")
    .args(["info"])
    .assert()
    .success()
    .stdout(predicate::str::contains("tally"));
}

#[test]
fn verbose_flag_enables_debug_logs() {
  let env = TestEnv::new();

  env
    .tally_cmd()
    .args(["-v", "inventory", "list"])
    .assert()
    .success()
    .stderr(predicate::str::contains("persisted store"));
}
