//! Audio file discovery
//!
//! Recursive, sequential walk of the input folder. A file is a candidate when
//! its extension (case-insensitive) is in the configured set. Results are
//! sorted so progress numbering is stable between runs.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::{DirEntry, WalkDir};

/// Scanner errors; all of them abort the run
#[derive(Debug, Error)]
pub enum ScanError {
    /// Specified path does not exist
    #[error("Path not found: {}", .0.display())]
    PathNotFound(PathBuf),

    /// Path exists but is not a directory
    #[error("Not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    /// No extensions to look for
    #[error("No file extensions configured")]
    NoExtensions,
}

/// Finds audio files by extension
#[derive(Debug, Clone)]
pub struct FileScanner {
    extensions: HashSet<String>,
    ignore_patterns: Vec<String>,
}

impl FileScanner {
    /// Scanner matching `extensions` (with or without leading dot, any case)
    ///
    /// System and VCS entries (.DS_Store, Thumbs.db, .git, .svn) are skipped.
    pub fn new(extensions: &[String]) -> Self {
        Self {
            extensions: moodtag_common::config::normalize_extensions(extensions)
                .into_iter()
                .collect(),
            ignore_patterns: vec![
                ".DS_Store".to_string(),
                "Thumbs.db".to_string(),
                ".git".to_string(),
                ".svn".to_string(),
            ],
        }
    }

    /// Scan `root_path` recursively; unreadable entries are logged and skipped
    pub fn scan(&self, root_path: &Path) -> Result<Vec<PathBuf>, ScanError> {
        if self.extensions.is_empty() {
            return Err(ScanError::NoExtensions);
        }
        if !root_path.exists() {
            return Err(ScanError::PathNotFound(root_path.to_path_buf()));
        }
        if !root_path.is_dir() {
            return Err(ScanError::NotADirectory(root_path.to_path_buf()));
        }

        let mut files = Vec::new();
        let mut symlink_visited = HashSet::new();

        let walker = WalkDir::new(root_path)
            .follow_links(true)
            .into_iter()
            .filter_entry(|e| self.should_process_entry(e, &mut symlink_visited));

        for entry in walker {
            match entry {
                Ok(entry) => {
                    if entry.file_type().is_file() && self.has_wanted_extension(entry.path()) {
                        files.push(entry.into_path());
                    }
                }
                Err(e) => {
                    tracing::warn!("Error accessing entry: {}", e);
                }
            }
        }

        files.sort();

        tracing::debug!(
            root = %root_path.display(),
            files = files.len(),
            "Scan complete"
        );

        Ok(files)
    }

    fn should_process_entry(&self, entry: &DirEntry, symlink_visited: &mut HashSet<PathBuf>) -> bool {
        let file_name = entry.file_name().to_string_lossy();

        if entry.depth() > 0
            && self
                .ignore_patterns
                .iter()
                .any(|pattern| file_name == pattern.as_str())
        {
            return false;
        }

        // Followed symlinks to directories already seen would loop
        if entry.path_is_symlink() && entry.file_type().is_dir() {
            if let Ok(canonical) = entry.path().canonicalize() {
                if !symlink_visited.insert(canonical) {
                    tracing::warn!("Symlink loop detected: {}", entry.path().display());
                    return false;
                }
            }
        }

        true
    }

    fn has_wanted_extension(&self, path: &Path) -> bool {
        path.extension()
            .map(|ext| self.extensions.contains(&ext.to_string_lossy().to_lowercase()))
            .unwrap_or(false)
    }
}
