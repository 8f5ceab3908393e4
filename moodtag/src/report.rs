//! Per-file outcomes and batch totals

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::{FailureKind, TaggingError};
use crate::mood::MatchTier;
use crate::pipeline::TaggedTrack;

/// Result of processing one file
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FileOutcome {
    Tagged {
        bpm: f64,
        energy: f64,
        mood: String,
        tier: MatchTier,
        /// False in dry-run mode
        written: bool,
        verified: bool,
    },
    Failed {
        kind: FailureKind,
        message: String,
    },
}

impl FileOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, FileOutcome::Tagged { .. })
    }
}

impl From<Result<TaggedTrack, TaggingError>> for FileOutcome {
    fn from(result: Result<TaggedTrack, TaggingError>) -> Self {
        match result {
            Ok(track) => FileOutcome::Tagged {
                bpm: track.features.bpm,
                energy: track.features.energy,
                mood: track.mood,
                tier: track.tier,
                written: track.written,
                verified: track.verified,
            },
            Err(err) => FileOutcome::Failed {
                kind: err.kind(),
                message: err.to_string(),
            },
        }
    }
}

impl fmt::Display for FileOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileOutcome::Tagged {
                bpm,
                energy,
                mood,
                written,
                ..
            } => {
                write!(f, "{} ({:.1} BPM, energy {:.3})", mood, bpm, energy)?;
                if !written {
                    write!(f, " [dry run]")?;
                }
                Ok(())
            }
            FileOutcome::Failed { message, .. } => write!(f, "FAILED: {}", message),
        }
    }
}

/// One processed file, numbered from 1 in scan order
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    pub index: usize,
    pub path: PathBuf,
    #[serde(flatten)]
    pub outcome: FileOutcome,
}

impl FileReport {
    /// `[i/n] <filename>: <outcome>`
    pub fn progress_line(&self, total: usize) -> String {
        format!(
            "[{}/{}] {}: {}",
            self.index,
            total,
            display_name(&self.path),
            self.outcome
        )
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Counters and per-file details for one run
#[derive(Debug, Clone, Serialize)]
pub struct BatchSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// Failed files whose tags were nonetheless written
    pub soft_failures: usize,
    pub dry_run: bool,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub files: Vec<FileReport>,
}

impl BatchSummary {
    pub fn start(total: usize, dry_run: bool) -> Self {
        Self {
            total,
            succeeded: 0,
            failed: 0,
            soft_failures: 0,
            dry_run,
            started_at: Utc::now(),
            finished_at: None,
            files: Vec::with_capacity(total),
        }
    }

    pub fn record(&mut self, report: FileReport) {
        match &report.outcome {
            FileOutcome::Tagged { .. } => self.succeeded += 1,
            FileOutcome::Failed { kind, .. } => {
                self.failed += 1;
                if kind.is_soft() {
                    self.soft_failures += 1;
                }
            }
        }
        self.files.push(report);
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    /// Files handled so far
    pub fn processed(&self) -> usize {
        self.succeeded + self.failed
    }

    /// `Done: <succeeded>/<total> files tagged`, plus failures when present
    pub fn summary_line(&self) -> String {
        let verb = if self.dry_run { "analyzed (dry run)" } else { "tagged" };
        let mut line = format!("Done: {}/{} files {}", self.succeeded, self.total, verb);
        if self.failed > 0 {
            line.push_str(&format!(", {} failed", self.failed));
            if self.soft_failures > 0 {
                line.push_str(&format!(" ({} written but unverified)", self.soft_failures));
            }
        }
        line
    }
}
