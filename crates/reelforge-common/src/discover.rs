//! Input discovery: explicit file lists or a recursive directory walk.

use crate::paths::{has_extension, is_video_file};
use crate::{Error, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Where the inputs of a batch come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSelection {
    /// Explicit files, converted in the order given.
    Files(Vec<PathBuf>),
    /// Every matching file below `root`.
    ///
    /// An empty `extensions` list selects all known video extensions.
    Recursive {
        root: PathBuf,
        extensions: Vec<String>,
    },
}

/// Resolve an [`InputSelection`] into the ordered list of source files.
///
/// Explicit files must exist. A recursive walk returns its matches sorted so
/// that submission order is stable between runs; unreadable entries are
/// logged and skipped.
pub fn discover_inputs(selection: &InputSelection) -> Result<Vec<PathBuf>> {
    match selection {
        InputSelection::Files(files) => {
            if files.is_empty() {
                return Err(Error::invalid_input("no input files given"));
            }
            for file in files {
                if !file.is_file() {
                    return Err(Error::not_found(file));
                }
            }
            Ok(files.clone())
        }
        InputSelection::Recursive { root, extensions } => walk_videos(root, extensions),
    }
}

fn walk_videos(root: &Path, extensions: &[String]) -> Result<Vec<PathBuf>> {
    if !root.exists() {
        return Err(Error::not_found(root));
    }
    if !root.is_dir() {
        return Err(Error::invalid_input(format!(
            "{} is not a directory",
            root.display()
        )));
    }

    let mut found = Vec::new();
    for entry in WalkDir::new(root).follow_links(true) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!(root = %root.display(), error = %e, "Skipping unreadable entry");
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let wanted = if extensions.is_empty() {
            is_video_file(path)
        } else {
            has_extension(path, extensions)
        };
        if wanted {
            found.push(path.to_path_buf());
        }
    }

    found.sort();
    debug!(root = %root.display(), count = found.len(), "Discovered inputs");
    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_explicit_files_keep_order() {
        let dir = tempdir().unwrap();
        let b = dir.path().join("b.mkv");
        let a = dir.path().join("a.mkv");
        fs::write(&b, b"").unwrap();
        fs::write(&a, b"").unwrap();

        let inputs = discover_inputs(&InputSelection::Files(vec![b.clone(), a.clone()])).unwrap();
        assert_eq!(inputs, vec![b, a]);
    }

    #[test]
    fn test_explicit_missing_file() {
        let err = discover_inputs(&InputSelection::Files(vec![PathBuf::from(
            "/nonexistent/movie.mkv",
        )]))
        .unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[test]
    fn test_explicit_empty_list() {
        let err = discover_inputs(&InputSelection::Files(Vec::new())).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn test_recursive_walk_filters_and_sorts() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("season1");
        fs::create_dir(&nested).unwrap();
        fs::write(nested.join("e02.mkv"), b"").unwrap();
        fs::write(nested.join("e01.MKV"), b"").unwrap();
        fs::write(dir.path().join("clip.avi"), b"").unwrap();
        fs::write(dir.path().join("notes.txt"), b"").unwrap();

        let all = discover_inputs(&InputSelection::Recursive {
            root: dir.path().to_path_buf(),
            extensions: Vec::new(),
        })
        .unwrap();
        assert_eq!(
            all,
            vec![
                dir.path().join("clip.avi"),
                nested.join("e01.MKV"),
                nested.join("e02.mkv"),
            ]
        );

        let only_mkv = discover_inputs(&InputSelection::Recursive {
            root: dir.path().to_path_buf(),
            extensions: vec!["mkv".to_string()],
        })
        .unwrap();
        assert_eq!(only_mkv.len(), 2);
    }

    #[test]
    fn test_recursive_root_must_be_directory() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("movie.mkv");
        fs::write(&file, b"").unwrap();

        let err = discover_inputs(&InputSelection::Recursive {
            root: file,
            extensions: Vec::new(),
        })
        .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }
}
