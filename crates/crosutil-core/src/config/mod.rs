use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
  fs,
  path::{Path, PathBuf},
};

use crate::system::command::RunOptions;

/// Defaults read from a JSON config file. Every field is optional.
#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
  pub board: Option<String>,
  pub run: RunConfig,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct RunConfig {
  pub enter_chroot: bool,
  pub error_ok: bool,
  pub exit_code: bool,
  pub shell: bool,
  pub print_cmd: bool,
  pub cwd: Option<PathBuf>,
}

impl Default for RunConfig {
  fn default() -> Self {
    Self {
      enter_chroot: false,
      error_ok: false,
      exit_code: false,
      shell: false,
      print_cmd: true,
      cwd: None,
    }
  }
}

impl RunConfig {
  pub fn to_options(&self) -> RunOptions {
    RunOptions {
      enter_chroot: self.enter_chroot,
      error_ok: self.error_ok,
      exit_code: self.exit_code,
      shell: self.shell,
      print_cmd: self.print_cmd,
      cwd: self.cwd.clone(),
      ..Default::default()
    }
  }
}

impl Config {
  pub fn from_file(path: &Path) -> Result<Self> {
    let content =
      fs::read_to_string(path).with_context(|| format!("Failed to read config file: {path:?}"))?;

    let config: Config = serde_json::from_str(&content)
      .with_context(|| format!("Failed to parse config file: {path:?}"))?;

    log::debug!("Successfully loaded config from {path:?}");
    Ok(config)
  }

  /// Reads `path` when given, otherwise returns the built-in defaults.
  pub fn load(path: Option<&Path>) -> Result<Self> {
    match path {
      Some(path) => Self::from_file(path),
      None => Ok(Self::default()),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::io::Write;
  use tempfile::NamedTempFile;

  fn write_config(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
  }

  #[test]
  fn test_full_config() {
    let file = write_config(
      r#"{
        "board": "x86-generic",
        "run": {
          "enter_chroot": true,
          "error_ok": true,
          "exit_code": true,
          "shell": true,
          "print_cmd": false,
          "cwd": "/home/dev/trunk/src/scripts"
        }
      }"#,
    );

    let config = Config::from_file(file.path()).unwrap();

    assert_eq!(config.board.as_deref(), Some("x86-generic"));
    let options = config.run.to_options();
    assert!(options.enter_chroot);
    assert!(options.error_ok);
    assert!(options.exit_code);
    assert!(options.shell);
    assert!(!options.print_cmd);
    assert_eq!(
      options.cwd,
      Some(PathBuf::from("/home/dev/trunk/src/scripts"))
    );
    assert_eq!(options.input, None);
  }

  #[test]
  fn test_missing_fields_use_defaults() {
    let file = write_config(r#"{ "run": { "exit_code": true } }"#);

    let config = Config::from_file(file.path()).unwrap();

    assert_eq!(config.board, None);
    assert!(config.run.exit_code);
    assert!(config.run.print_cmd);
    assert!(!config.run.enter_chroot);
  }

  #[test]
  fn test_load_without_path() {
    assert_eq!(Config::load(None).unwrap(), Config::default());
  }

  #[test]
  fn test_invalid_json_reports_path() {
    let file = write_config("{ not json");

    let err = Config::from_file(file.path()).unwrap_err();

    assert!(err.to_string().starts_with("Failed to parse config file"));
  }

  #[test]
  fn test_missing_file() {
    let err = Config::from_file(Path::new("/me/no/existe.json")).unwrap_err();

    assert!(err.to_string().starts_with("Failed to read config file"));
  }
}
