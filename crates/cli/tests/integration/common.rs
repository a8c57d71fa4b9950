//! Shared test helpers for CLI integration tests.

use std::path::PathBuf;

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use tempfile::TempDir;

/// Isolated test environment.
///
/// Each test gets its own temporary data directory, handed to the binary
/// through `TALLY_DATA_DIR`.
pub struct TestEnv {
  pub temp: TempDir,
}

impl TestEnv {
  pub fn new() -> Self {
    Self {
      temp: TempDir::new().unwrap(),
    }
  }

  /// Data directory for the store files.
  pub fn data_path(&self) -> PathBuf {
    let p = self.temp.path().join("data");
    std::fs::create_dir_all(&p).unwrap();
    dunce::canonicalize(&p).unwrap_or(p)
  }

  /// Write a store file into the data directory.
  pub fn write_store(&self, name: &str, content: &str) {
    std::fs::write(self.data_path().join(name), content).unwrap();
  }

  /// Read a store file from the data directory.
  pub fn read_store(&self, name: &str) -> String {
    std::fs::read_to_string(self.data_path().join(name)).unwrap_or_else(|e| panic!("Failed to read {}: {}", name, e))
  }

  /// Parse a store file as JSON.
  pub fn store_json(&self, name: &str) -> serde_json::Value {
    serde_json::from_str(&self.read_store(name)).unwrap()
  }

  /// Get a pre-configured Command for the tally binary.
  ///
  /// Sets `TALLY_DATA_DIR` to the isolated data path and points the platform
  /// data directories at the temp dir so nothing leaks into the real home.
  pub fn tally_cmd(&self) -> Command {
    let mut cmd: Command = cargo_bin_cmd!("tally");
    cmd.env("TALLY_DATA_DIR", self.data_path());
    cmd.env("XDG_DATA_HOME", self.temp.path());
    cmd.env("APPDATA", self.temp.path()); // For Windows
    cmd.env_remove("RUST_LOG");
    cmd
  }
}
