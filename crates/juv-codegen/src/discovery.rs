//! Resolves command-line paths into the list of files to parse.

use crate::error::CodegenError;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.starts_with('.'))
}

fn is_rust_source(path: &Path) -> bool {
    path.extension().map(|e| e == "rs").unwrap_or(false)
}

/// Expand files and directories into a sorted, deduplicated list of `.rs` files.
///
/// Files are taken as given. Directories are walked recursively, skipping
/// dot-files. The same file named twice (or reached through two arguments)
/// is only returned once.
pub fn find_files<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<PathBuf>, CodegenError> {
    if paths.is_empty() {
        return Err(CodegenError::NoInputPaths);
    }

    let mut files = BTreeSet::new();
    for path in paths {
        let path = path.as_ref();
        let metadata = fs::metadata(path).map_err(|source| CodegenError::Stat {
            path: path.to_path_buf(),
            source,
        })?;

        if !metadata.is_dir() {
            files.insert(path.to_path_buf());
            continue;
        }

        for entry in WalkDir::new(path).into_iter().filter_map(|e| e.ok()) {
            let entry_path = entry.path();
            if entry.file_type().is_dir() || is_hidden(entry_path) {
                continue;
            }
            if is_rust_source(entry_path) {
                files.insert(entry_path.to_path_buf());
            }
        }
    }

    tracing::debug!(files = files.len(), "discovered input files");
    Ok(files.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_paths() {
        let paths: [&str; 0] = [];
        assert!(matches!(find_files(&paths), Err(CodegenError::NoInputPaths)));
    }

    #[test]
    fn test_missing_path() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.rs");

        match find_files(&[&missing]) {
            Err(CodegenError::Stat { path, .. }) => assert_eq!(path, missing),
            other => panic!("expected stat error, got {other:?}"),
        }
    }

    #[test]
    fn test_walks_directories() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir(root.join("nested")).unwrap();
        fs::write(root.join("b.rs"), "").unwrap();
        fs::write(root.join("a.rs"), "").unwrap();
        fs::write(root.join("nested/c.rs"), "").unwrap();
        fs::write(root.join(".hidden.rs"), "").unwrap();
        fs::write(root.join("notes.txt"), "").unwrap();

        let files = find_files(&[root]).unwrap();
        assert_eq!(
            files,
            vec![root.join("a.rs"), root.join("b.rs"), root.join("nested/c.rs")]
        );
    }

    #[test]
    fn test_deduplicates() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("model.rs");
        fs::write(&file, "").unwrap();

        let files = find_files(&[file.clone(), file.clone(), dir.path().to_path_buf()]).unwrap();
        assert_eq!(files, vec![file]);
    }

    #[test]
    fn test_explicit_file_kept_regardless_of_extension() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("model.rs.in");
        fs::write(&file, "").unwrap();

        assert_eq!(find_files(&[&file]).unwrap(), vec![file]);
    }
}
