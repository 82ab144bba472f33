use std::path::{Component, Path, PathBuf};

use crate::utils::error::CrosError;

/// Trailing segments that identify the scripts checkout.
pub const SRC_ROOT_MARKER: [&str; 2] = ["src", "scripts"];

/// Prefix of `path` ending at the first `src/scripts` segment pair.
pub fn src_root_from(path: &Path) -> Result<PathBuf, CrosError> {
  let components: Vec<Component> = path.components().collect();
  components
    .windows(SRC_ROOT_MARKER.len())
    .position(|window| {
      window
        .iter()
        .zip(SRC_ROOT_MARKER)
        .all(|(component, marker)| component.as_os_str() == marker)
    })
    .map(|start| {
      components[..start + SRC_ROOT_MARKER.len()]
        .iter()
        .collect()
    })
    .ok_or_else(|| CrosError::SrcRootNotFound(path.to_path_buf()))
}

/// Source root derived from the current working directory.
pub fn get_src_root() -> Result<PathBuf, CrosError> {
  let cwd = std::env::current_dir()?;
  src_root_from(&cwd)
}

/// `<src_root>/../build/images/<board>/<version>-a1`.
///
/// The build attempt suffix is always `a1`.
pub fn output_image_dir_from(src_root: &Path, board: &str, version: &str) -> PathBuf {
  src_root
    .parent()
    .unwrap_or(src_root)
    .join("build")
    .join("images")
    .join(board)
    .join(format!("{version}-a1"))
}

pub fn get_output_image_dir(board: &str, version: &str) -> Result<PathBuf, CrosError> {
  let src_root = get_src_root()?;
  Ok(output_image_dir_from(&src_root, board, version))
}
