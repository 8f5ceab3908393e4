//! Per-file tagging errors
//!
//! None of these abort a batch: the pipeline turns each one into a failed
//! [`crate::report::FileReport`] and moves on to the next file.

use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

use crate::analysis::AnalysisError;
use crate::tags::TagError;

/// Why a single file was not tagged
#[derive(Debug, Error)]
pub enum TaggingError {
    /// Features could not be extracted; the file is skipped
    #[error("Analysis failed: {0}")]
    Analysis(#[from] AnalysisError),

    /// No tag layer for this container
    #[error("Unsupported format: {}", .0.display())]
    UnsupportedFormat(PathBuf),

    /// Tag layer rejected the write
    #[error("Tag write failed: {0}")]
    Write(TagError),

    /// Tags were written but could not be confirmed on read-back
    #[error("Verification failed: {0}")]
    Verification(String),
}

impl From<TagError> for TaggingError {
    fn from(err: TagError) -> Self {
        match err {
            TagError::Unsupported(path) => TaggingError::UnsupportedFormat(path),
            other => TaggingError::Write(other),
        }
    }
}

/// Error category as reported in progress lines and JSON
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    Analysis,
    UnsupportedFormat,
    Write,
    Verification,
}

impl TaggingError {
    pub fn kind(&self) -> FailureKind {
        match self {
            TaggingError::Analysis(_) => FailureKind::Analysis,
            TaggingError::UnsupportedFormat(_) => FailureKind::UnsupportedFormat,
            TaggingError::Write(_) => FailureKind::Write,
            TaggingError::Verification(_) => FailureKind::Verification,
        }
    }

    /// The file's tags were written even though the file counts as failed
    pub fn is_soft(&self) -> bool {
        self.kind().is_soft()
    }
}

impl FailureKind {
    pub fn is_soft(self) -> bool {
        matches!(self, FailureKind::Verification)
    }
}
