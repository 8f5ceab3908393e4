//! Tag storage
//!
//! Writes the estimated BPM and the mood label into the file's own metadata
//! and reads them back for verification.
//!
//! | container | tag layer | BPM field | mood field |
//! |---|---|---|---|
//! | MP3 | ID3v2.3 | `TBPM` | `TCON` |
//! | FLAC | Vorbis comments | `BPM` | `GENRE` |
//!
//! Any other extension is rejected with [`TagError::Unsupported`] before the
//! file is touched.

mod id3_tags;
mod vorbis;

use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Tag read/write errors
#[derive(Debug, Error)]
pub enum TagError {
    /// No tag layer is defined for this file type
    #[error("Unsupported format: {}", .0.display())]
    Unsupported(PathBuf),

    /// Existing tags could not be read
    #[error("Failed to read tags from {}: {message}", .path.display())]
    Read { path: PathBuf, message: String },

    /// Tags could not be saved
    #[error("Failed to write tags to {}: {message}", .path.display())]
    Write { path: PathBuf, message: String },
}

/// Tag layer chosen from the file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TagFormat {
    Id3,
    VorbisComments,
}

impl TagFormat {
    /// Case-insensitive extension lookup
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "mp3" => Some(Self::Id3),
            "flac" => Some(Self::VorbisComments),
            _ => None,
        }
    }
}

/// Tag values as found in a file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StoredTags {
    pub bpm: Option<String>,
    pub mood: Option<String>,
}

impl StoredTags {
    /// Both values present and non-empty
    pub fn is_complete(&self) -> bool {
        let present = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.trim().is_empty());
        present(&self.bpm) && present(&self.mood)
    }
}

/// Persists `(bpm, mood)` into a file
pub trait TagWriter {
    fn write(&self, path: &Path, bpm: f64, mood: &str) -> Result<(), TagError>;
}

/// Reads back what [`TagWriter`] stored
pub trait TagReader {
    fn read(&self, path: &Path) -> Result<StoredTags, TagError>;
}

impl<T: TagWriter + ?Sized> TagWriter for &T {
    fn write(&self, path: &Path, bpm: f64, mood: &str) -> Result<(), TagError> {
        (**self).write(path, bpm, mood)
    }
}

impl<T: TagReader + ?Sized> TagReader for &T {
    fn read(&self, path: &Path) -> Result<StoredTags, TagError> {
        (**self).read(path)
    }
}

/// Text stored in the BPM field: one decimal place
pub fn format_bpm(bpm: f64) -> String {
    format!("{:.1}", bpm)
}

/// Reads and writes tags in place, dispatching on [`TagFormat`]
#[derive(Debug, Clone, Copy, Default)]
pub struct FileTags;

impl FileTags {
    pub fn new() -> Self {
        Self
    }

    fn format_of(path: &Path) -> Result<TagFormat, TagError> {
        TagFormat::from_path(path).ok_or_else(|| TagError::Unsupported(path.to_path_buf()))
    }
}

impl TagWriter for FileTags {
    fn write(&self, path: &Path, bpm: f64, mood: &str) -> Result<(), TagError> {
        let format = Self::format_of(path)?;
        let bpm_text = format_bpm(bpm);

        tracing::debug!(
            path = %path.display(),
            ?format,
            bpm = %bpm_text,
            mood,
            "Writing tags"
        );

        match format {
            TagFormat::Id3 => id3_tags::write(path, &bpm_text, mood),
            TagFormat::VorbisComments => vorbis::write(path, &bpm_text, mood),
        }
    }
}

impl TagReader for FileTags {
    fn read(&self, path: &Path) -> Result<StoredTags, TagError> {
        match Self::format_of(path)? {
            TagFormat::Id3 => id3_tags::read(path),
            TagFormat::VorbisComments => vorbis::read(path),
        }
    }
}
