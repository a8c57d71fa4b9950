//! Data directory resolution.
//!
//! Precedence: an explicit path from the caller, then `TALLY_DATA_DIR`, then
//! the platform data directory (`$XDG_DATA_HOME/tally`, `~/.local/share/tally`,
//! or `%APPDATA%\tally` on Windows).

use std::path::{Path, PathBuf};

use crate::consts::{APP_NAME, DATA_DIR_ENV};

/// Returns the user's home directory
#[cfg(windows)]
pub fn home_dir() -> PathBuf {
  std::env::var("USERPROFILE")
    .map(PathBuf::from)
    .unwrap_or_else(|_| PathBuf::from("."))
}

/// Returns the user's home directory
#[cfg(not(windows))]
pub fn home_dir() -> PathBuf {
  std::env::var("HOME")
    .map(PathBuf::from)
    .unwrap_or_else(|_| PathBuf::from("."))
}

/// Returns the platform directory for data files for the application
#[cfg(windows)]
pub fn platform_data_dir() -> PathBuf {
  std::env::var("APPDATA")
    .map(PathBuf::from)
    .unwrap_or_else(|_| home_dir().join("AppData").join("Roaming"))
    .join(APP_NAME)
}

/// Returns the platform directory for data files for the application
#[cfg(not(windows))]
pub fn platform_data_dir() -> PathBuf {
  let data_home = std::env::var("XDG_DATA_HOME")
    .map(PathBuf::from)
    .unwrap_or_else(|_| home_dir().join(".local").join("share"));
  data_home.join(APP_NAME)
}

/// Returns the directory holding the store files.
///
/// `TALLY_DATA_DIR` wins over the platform directory when set and non-empty.
pub fn data_dir() -> PathBuf {
  match std::env::var(DATA_DIR_ENV) {
    Ok(dir) if !dir.is_empty() => PathBuf::from(dir),
    _ => platform_data_dir(),
  }
}

/// Resolves the data directory, preferring an explicit override.
pub fn resolve_data_dir(explicit: Option<&Path>) -> PathBuf {
  explicit.map(Path::to_path_buf).unwrap_or_else(data_dir)
}

#[cfg(test)]
mod tests {
  use super::*;
  use serial_test::serial;

  #[test]
  #[serial]
  fn explicit_dir_wins() {
    temp_env::with_var(DATA_DIR_ENV, Some("/from/env"), || {
      let dir = resolve_data_dir(Some(Path::new("/explicit")));
      assert_eq!(dir, PathBuf::from("/explicit"));
    });
  }

  #[test]
  #[serial]
  fn env_override_takes_precedence() {
    temp_env::with_vars(
      [(DATA_DIR_ENV, Some("/from/env")), ("XDG_DATA_HOME", Some("/xdg"))],
      || {
        assert_eq!(data_dir(), PathBuf::from("/from/env"));
      },
    );
  }

  #[test]
  #[serial]
  fn empty_env_override_is_ignored() {
    temp_env::with_vars(
      [(DATA_DIR_ENV, Some("")), ("XDG_DATA_HOME", Some("/xdg"))],
      || {
        #[cfg(not(windows))]
        assert_eq!(data_dir(), PathBuf::from("/xdg").join(APP_NAME));
        #[cfg(windows)]
        assert_eq!(data_dir(), platform_data_dir());
      },
    );
  }

  #[test]
  #[serial]
  #[cfg(not(windows))]
  fn xdg_fallback_to_home_directory() {
    temp_env::with_vars(
      [
        (DATA_DIR_ENV, None::<&str>),
        ("XDG_DATA_HOME", None::<&str>),
        ("HOME", Some("/home/user")),
      ],
      || {
        assert_eq!(data_dir(), PathBuf::from("/home/user/.local/share").join(APP_NAME));
      },
    );
  }
}
