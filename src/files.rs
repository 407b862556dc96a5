//! Java source discovery.
//!
//! Walks a directory for `*.java` files, skipping hidden directories, and
//! returns them sorted by workspace-relative path so runs are deterministic.

use std::io;
use std::path::{Path, PathBuf};

use globset::{Glob, GlobMatcher};
use thiserror::Error;
use walkdir::{DirEntry, WalkDir};

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum FileError {
    /// The root path does not exist.
    #[error("path not found: {path}")]
    NotFound { path: String },

    /// The `--glob` pattern does not compile.
    #[error("invalid glob pattern '{pattern}': {message}")]
    InvalidGlob { pattern: String, message: String },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Directory traversal error.
    #[error("walk error: {0}")]
    Walk(#[from] walkdir::Error),
}

/// Result type for file operations.
pub type FileResult<T> = Result<T, FileError>;

// ============================================================================
// File Collection
// ============================================================================

/// A Java source file found under the root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Path used to read and write the file.
    pub path: PathBuf,
    /// Path relative to the root, with `/` separators. Used for reporting
    /// and glob matching.
    pub relative: String,
}

/// Which files to pick up under the root.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    /// Only files whose relative path matches this glob.
    pub glob: Option<String>,
    /// At most this many files, taken in sorted order.
    pub limit: Option<usize>,
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0 && entry.file_name().to_string_lossy().starts_with('.')
}

fn is_java(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "java")
}

fn compile_glob(pattern: &str) -> FileResult<GlobMatcher> {
    Glob::new(pattern)
        .map(|glob| glob.compile_matcher())
        .map_err(|e| FileError::InvalidGlob {
            pattern: pattern.to_string(),
            message: e.to_string(),
        })
}

/// Collects the Java files under `root`.
///
/// `root` may also name a single file, which is then the only candidate.
pub fn collect_java_files(root: &Path, selection: &Selection) -> FileResult<Vec<SourceFile>> {
    if !root.exists() {
        return Err(FileError::NotFound {
            path: root.display().to_string(),
        });
    }
    let matcher = selection.glob.as_deref().map(compile_glob).transpose()?;

    let mut files = Vec::new();
    if root.is_file() {
        let relative = root
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        files.push(SourceFile {
            path: root.to_path_buf(),
            relative,
        });
    } else {
        for entry in WalkDir::new(root)
            .follow_links(false)
            .into_iter()
            .filter_entry(|e| !is_hidden(e))
        {
            let entry = entry?;
            if !entry.file_type().is_file() || !is_java(entry.path()) {
                continue;
            }
            let Ok(relative) = entry.path().strip_prefix(root) else {
                continue;
            };
            let relative = relative
                .to_string_lossy()
                .replace(std::path::MAIN_SEPARATOR, "/");
            files.push(SourceFile {
                path: entry.path().to_path_buf(),
                relative,
            });
        }
    }

    files.sort_by(|a, b| a.relative.cmp(&b.relative));
    if let Some(matcher) = &matcher {
        files.retain(|file| matcher.is_match(&file.relative));
    }
    if let Some(limit) = selection.limit {
        files.truncate(limit);
    }
    tracing::debug!(count = files.len(), root = %root.display(), "collected java files");
    Ok(files)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn workspace(paths: &[&str]) -> TempDir {
        let dir = TempDir::new().unwrap();
        for path in paths {
            let full = dir.path().join(path);
            fs::create_dir_all(full.parent().unwrap()).unwrap();
            fs::write(full, "class A {}\n").unwrap();
        }
        dir
    }

    fn relative_paths(files: &[SourceFile]) -> Vec<&str> {
        files.iter().map(|f| f.relative.as_str()).collect()
    }

    #[test]
    fn finds_java_files_in_sorted_order() {
        let dir = workspace(&["src/z/Last.java", "src/a/First.java", "Main.java", "notes.txt"]);
        let files = collect_java_files(dir.path(), &Selection::default()).unwrap();
        assert_eq!(
            relative_paths(&files),
            vec!["Main.java", "src/a/First.java", "src/z/Last.java"]
        );
    }

    #[test]
    fn skips_hidden_directories() {
        let dir = workspace(&[".git/Objects.java", "src/A.java"]);
        let files = collect_java_files(dir.path(), &Selection::default()).unwrap();
        assert_eq!(relative_paths(&files), vec!["src/A.java"]);
    }

    #[test]
    fn glob_and_limit() {
        let dir = workspace(&["src/A.java", "src/B.java", "test/C.java"]);
        let selection = Selection {
            glob: Some("src/**".to_string()),
            limit: Some(1),
        };
        let files = collect_java_files(dir.path(), &selection).unwrap();
        assert_eq!(relative_paths(&files), vec!["src/A.java"]);
    }

    #[test]
    fn single_file_root() {
        let dir = workspace(&["src/A.java"]);
        let path = dir.path().join("src/A.java");
        let files = collect_java_files(&path, &Selection::default()).unwrap();
        assert_eq!(relative_paths(&files), vec!["A.java"]);
        assert_eq!(files[0].path, path);
    }

    #[test]
    fn errors() {
        let dir = workspace(&[]);
        let missing = dir.path().join("missing");
        assert!(matches!(
            collect_java_files(&missing, &Selection::default()),
            Err(FileError::NotFound { .. })
        ));
        let selection = Selection {
            glob: Some("src/[".to_string()),
            limit: None,
        };
        assert!(matches!(
            collect_java_files(dir.path(), &selection),
            Err(FileError::InvalidGlob { .. })
        ));
    }
}
