use std::{io, path::PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CrosError {
  #[error("no src/scripts segment in {}", .0.display())]
  SrcRootNotFound(PathBuf),

  #[error("no board given on the command line or in the config")]
  MissingBoard,

  #[error("CHROMEOS_VERSION_STRING not found in {0}")]
  VersionNotFound(String),

  #[error(transparent)]
  Io(#[from] io::Error),
}

/// Logs `message` and exits with `code`.
pub fn crash(message: impl AsRef<str>, code: i32) -> ! {
  log::error!("{}", message.as_ref());
  std::process::exit(code);
}
