//! In-memory collaborators for pipeline tests

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use moodtag::analysis::{AnalysisError, AudioFeatures, FeatureExtractor};
use moodtag::tags::{format_bpm, StoredTags, TagError, TagFormat, TagReader, TagWriter};

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Returns canned features by file name; unknown names fail to decode
#[derive(Default)]
pub struct StubExtractor {
    features: HashMap<String, AudioFeatures>,
    pub calls: RefCell<Vec<PathBuf>>,
}

impl StubExtractor {
    pub fn with(mut self, name: &str, bpm: f64, energy: f64) -> Self {
        self.features
            .insert(name.to_string(), AudioFeatures { bpm, energy });
        self
    }
}

impl FeatureExtractor for StubExtractor {
    fn extract(&self, path: &Path) -> Result<AudioFeatures, AnalysisError> {
        self.calls.borrow_mut().push(path.to_path_buf());
        self.features
            .get(&file_name(path))
            .copied()
            .ok_or_else(|| AnalysisError::Decode(format!("cannot decode {}", path.display())))
    }
}

/// Tag store keyed by path, honouring the same format rules as real files
#[derive(Default)]
pub struct MemoryTags {
    pub stored: RefCell<HashMap<PathBuf, StoredTags>>,
    pub writes: RefCell<usize>,
    failing_writes: HashSet<String>,
    lost_writes: HashSet<String>,
}

impl MemoryTags {
    /// Writes to `name` return an error
    pub fn failing(mut self, name: &str) -> Self {
        self.failing_writes.insert(name.to_string());
        self
    }

    /// Writes to `name` report success but nothing is kept
    pub fn losing(mut self, name: &str) -> Self {
        self.lost_writes.insert(name.to_string());
        self
    }

    pub fn get(&self, path: &Path) -> Option<StoredTags> {
        self.stored.borrow().get(path).cloned()
    }
}

impl TagWriter for MemoryTags {
    fn write(&self, path: &Path, bpm: f64, mood: &str) -> Result<(), TagError> {
        if TagFormat::from_path(path).is_none() {
            return Err(TagError::Unsupported(path.to_path_buf()));
        }
        let name = file_name(path);
        if self.failing_writes.contains(&name) {
            return Err(TagError::Write {
                path: path.to_path_buf(),
                message: "read-only file".to_string(),
            });
        }

        *self.writes.borrow_mut() += 1;
        if !self.lost_writes.contains(&name) {
            self.stored.borrow_mut().insert(
                path.to_path_buf(),
                StoredTags {
                    bpm: Some(format_bpm(bpm)),
                    mood: Some(mood.to_string()),
                },
            );
        }
        Ok(())
    }
}

impl TagReader for MemoryTags {
    fn read(&self, path: &Path) -> Result<StoredTags, TagError> {
        Ok(self.get(path).unwrap_or_default())
    }
}
