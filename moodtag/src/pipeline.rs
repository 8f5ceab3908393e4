//! Batch tagging
//!
//! For each file: extract features, classify, write `{bpm, mood}`, and
//! optionally read the tags back. Per-file errors are reported and counted;
//! they never stop the batch.

use std::path::{Path, PathBuf};

use crate::analysis::{AudioFeatures, FeatureExtractor};
use crate::error::TaggingError;
use crate::mood::{MatchTier, MoodCatalog};
use crate::report::{BatchSummary, FileOutcome, FileReport};
use crate::tags::{TagReader, TagWriter};

/// Per-run switches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineOptions {
    /// Read tags back after writing
    pub verify: bool,
    /// Analyze and classify without writing
    pub dry_run: bool,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            verify: true,
            dry_run: false,
        }
    }
}

/// A file that made it through the pipeline
#[derive(Debug, Clone, PartialEq)]
pub struct TaggedTrack {
    pub path: PathBuf,
    pub features: AudioFeatures,
    pub mood: String,
    pub tier: MatchTier,
    pub written: bool,
    pub verified: bool,
}

/// Sequential tagger over a fixed catalog
pub struct TaggingPipeline<'a, E, T> {
    catalog: &'a MoodCatalog,
    extractor: E,
    tags: T,
    options: PipelineOptions,
}

impl<'a, E, T> TaggingPipeline<'a, E, T>
where
    E: FeatureExtractor,
    T: TagWriter + TagReader,
{
    pub fn new(catalog: &'a MoodCatalog, extractor: E, tags: T, options: PipelineOptions) -> Self {
        Self {
            catalog,
            extractor,
            tags,
            options,
        }
    }

    pub fn options(&self) -> PipelineOptions {
        self.options
    }

    /// Analyze, classify, write and verify one file
    pub fn process_file(&self, path: &Path) -> Result<TaggedTrack, TaggingError> {
        let features = self.extractor.extract(path)?;
        let classification = self.catalog.classify(features.bpm, features.energy);

        let mut track = TaggedTrack {
            path: path.to_path_buf(),
            features,
            mood: classification.mood.to_string(),
            tier: classification.tier,
            written: false,
            verified: false,
        };

        if self.options.dry_run {
            return Ok(track);
        }

        self.tags.write(path, features.bpm, classification.mood)?;
        track.written = true;

        if self.options.verify {
            self.verify(path)?;
            track.verified = true;
        }

        Ok(track)
    }

    fn verify(&self, path: &Path) -> Result<(), TaggingError> {
        let stored = self
            .tags
            .read(path)
            .map_err(|e| TaggingError::Verification(e.to_string()))?;

        if stored.is_complete() {
            return Ok(());
        }

        let missing: Vec<&str> = [("bpm", &stored.bpm), ("mood", &stored.mood)]
            .into_iter()
            .filter(|(_, value)| value.as_deref().map_or(true, |v| v.trim().is_empty()))
            .map(|(field, _)| field)
            .collect();

        Err(TaggingError::Verification(format!(
            "{} missing after write",
            missing.join(" and ")
        )))
    }

    /// Process `files` in order, calling `on_file` as each one finishes
    pub fn run<F>(&self, files: &[PathBuf], mut on_file: F) -> BatchSummary
    where
        F: FnMut(&FileReport),
    {
        let mut summary = BatchSummary::start(files.len(), self.options.dry_run);

        tracing::info!(
            files = files.len(),
            verify = self.options.verify,
            dry_run = self.options.dry_run,
            categories = self.catalog.len(),
            "Starting tagging run"
        );

        for (i, path) in files.iter().enumerate() {
            let result = self.process_file(path);

            match &result {
                Ok(track) => tracing::info!(
                    path = %path.display(),
                    bpm = track.features.bpm,
                    energy = track.features.energy,
                    mood = %track.mood,
                    tier = %track.tier,
                    "Tagged file"
                ),
                Err(err) if err.is_soft() => tracing::warn!(
                    path = %path.display(),
                    error = %err,
                    "Tags written but not confirmed"
                ),
                Err(err) => tracing::warn!(
                    path = %path.display(),
                    error = %err,
                    "Skipping file"
                ),
            }

            let report = FileReport {
                index: i + 1,
                path: path.clone(),
                outcome: FileOutcome::from(result),
            };
            on_file(&report);
            summary.record(report);
        }

        summary.finish();

        tracing::info!(
            total = summary.total,
            succeeded = summary.succeeded,
            failed = summary.failed,
            soft_failures = summary.soft_failures,
            "Tagging run complete"
        );

        summary
    }
}
