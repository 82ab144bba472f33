use std::{
  fs, io,
  path::{Path, PathBuf},
};

/// Returns every file below `root`, in no particular order.
///
/// Directories contribute only the files they contain. A missing `root`
/// fails with [`io::ErrorKind::NotFound`].
pub fn list_files(root: impl AsRef<Path>) -> io::Result<Vec<PathBuf>> {
  let root = root.as_ref();
  let mut files = Vec::new();
  collect_files(root, &mut files)?;
  log::debug!("Found {} files under {}", files.len(), root.display());
  Ok(files)
}

fn collect_files(dir: &Path, files: &mut Vec<PathBuf>) -> io::Result<()> {
  for entry in fs::read_dir(dir)? {
    let entry = entry?;
    if entry.file_type()?.is_dir() {
      collect_files(&entry.path(), files)?;
    } else {
      files.push(entry.path());
    }
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::collections::HashSet;
  use tempfile::TempDir;

  fn create_tree(root: &Path, entries: &[&str]) {
    for entry in entries {
      let path = root.join(entry);
      if entry.ends_with('/') {
        fs::create_dir_all(&path).unwrap();
      } else {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::File::create(&path).unwrap();
      }
    }
  }

  fn relative(root: &Path, files: Vec<PathBuf>) -> HashSet<String> {
    files
      .into_iter()
      .map(|file| {
        file
          .strip_prefix(root)
          .unwrap()
          .to_string_lossy()
          .into_owned()
      })
      .collect()
  }

  #[test]
  fn test_traverse() {
    let root = TempDir::new().unwrap();
    let tree = ["one/two/test.txt", "one/blah.py", "three/extra.conf"];
    create_tree(root.path(), &tree);

    let files = list_files(root.path()).unwrap();

    assert_eq!(files.len(), tree.len());
    assert_eq!(
      relative(root.path(), files),
      tree.iter().map(|entry| entry.to_string()).collect::<HashSet<_>>()
    );
  }

  #[test]
  fn test_nested_and_top_level_files() {
    let root = TempDir::new().unwrap();
    create_tree(root.path(), &["a/b/f1", "a/f2"]);

    let files = list_files(root.path().join("a")).unwrap();

    assert_eq!(
      relative(&root.path().join("a"), files),
      HashSet::from(["b/f1".to_string(), "f2".to_string()])
    );
  }

  #[test]
  fn test_empty_directories() {
    let root = TempDir::new().unwrap();
    create_tree(root.path(), &["one/", "two/", "one/a/"]);

    assert!(list_files(root.path()).unwrap().is_empty());
  }

  #[test]
  fn test_no_such_dir() {
    let err = list_files("/me/no/existe").unwrap_err();

    assert_eq!(err.kind(), io::ErrorKind::NotFound);
  }
}
