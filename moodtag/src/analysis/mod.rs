//! Audio feature extraction
//!
//! Produces the `(bpm, energy)` pair consumed by the mood decision engine.
//! Decoding is done in-process with symphonia; an external ffmpeg-compatible
//! decoder can be supplied as a fallback for files symphonia rejects.

pub mod decoder;
pub mod external;
pub mod features;

use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub use decoder::{decode_audio_file, DecodedAudio};
pub use external::ExternalDecoder;
pub use features::analyze_samples;

/// Feature extraction errors
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// File could not be opened or read
    #[error("I/O error reading {0}: {1}")]
    Io(PathBuf, #[source] std::io::Error),

    /// Container or codec could not be decoded
    #[error("Decode error: {0}")]
    Decode(String),

    /// External decoder failed to run or exited unsuccessfully
    #[error("External decoder failed: {0}")]
    ExternalDecoder(String),

    /// Decoding produced no samples
    #[error("No audio samples decoded")]
    EmptyAudio,

    /// Sample rate missing or zero
    #[error("Invalid sample rate: {0}")]
    InvalidSampleRate(u32),
}

/// Tempo and energy of one track
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AudioFeatures {
    /// Estimated tempo in BPM, rounded to one decimal
    pub bpm: f64,
    /// Mean frame RMS of the mono signal, rounded to three decimals
    pub energy: f64,
}

/// Source of audio features for a file
pub trait FeatureExtractor {
    fn extract(&self, path: &Path) -> Result<AudioFeatures, AnalysisError>;
}

impl<E: FeatureExtractor + ?Sized> FeatureExtractor for &E {
    fn extract(&self, path: &Path) -> Result<AudioFeatures, AnalysisError> {
        (**self).extract(path)
    }
}

/// Decodes the file and derives features from the waveform
#[derive(Debug, Clone, Default)]
pub struct SignalFeatureExtractor {
    fallback: Option<ExternalDecoder>,
}

impl SignalFeatureExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `decoder` when symphonia cannot decode a file
    pub fn with_fallback(decoder: ExternalDecoder) -> Self {
        Self {
            fallback: Some(decoder),
        }
    }

    fn decode(&self, path: &Path) -> Result<DecodedAudio, AnalysisError> {
        match decode_audio_file(path) {
            Ok(decoded) => Ok(decoded),
            Err(err) => match &self.fallback {
                Some(external) => {
                    tracing::warn!(
                        path = %path.display(),
                        error = %err,
                        decoder = %external.program().display(),
                        "In-process decode failed, trying external decoder"
                    );
                    external.decode(path)
                }
                None => Err(err),
            },
        }
    }
}

impl FeatureExtractor for SignalFeatureExtractor {
    fn extract(&self, path: &Path) -> Result<AudioFeatures, AnalysisError> {
        let decoded = self.decode(path)?;
        let features = analyze_samples(&decoded.samples, decoded.sample_rate)?;

        tracing::debug!(
            path = %path.display(),
            bpm = features.bpm,
            energy = features.energy,
            duration_seconds = format!("{:.2}", decoded.duration_seconds),
            "Extracted audio features"
        );

        Ok(features)
    }
}
