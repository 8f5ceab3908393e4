//! External decoder fallback
//!
//! Runs an ffmpeg-compatible binary to convert a file to raw mono
//! little-endian f32 PCM on stdout. The binary location is passed in
//! explicitly; the process environment is never modified.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use super::{AnalysisError, DecodedAudio};

/// Sample rate requested from the external decoder
pub const EXTERNAL_SAMPLE_RATE: u32 = 44100;

/// ffmpeg-compatible command-line decoder
#[derive(Debug, Clone)]
pub struct ExternalDecoder {
    program: PathBuf,
}

impl ExternalDecoder {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Decode `path` to mono f32 samples at [`EXTERNAL_SAMPLE_RATE`]
    pub fn decode(&self, path: &Path) -> Result<DecodedAudio, AnalysisError> {
        let rate = EXTERNAL_SAMPLE_RATE.to_string();
        let output = Command::new(&self.program)
            .args(["-v", "quiet", "-i"])
            .arg(path)
            .args(["-f", "f32le", "-ac", "1", "-ar", rate.as_str(), "-"])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| {
                AnalysisError::ExternalDecoder(format!(
                    "Failed to run {}: {}",
                    self.program.display(),
                    e
                ))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(AnalysisError::ExternalDecoder(format!(
                "{} exited with {} for {}: {}",
                self.program.display(),
                output.status,
                path.display(),
                stderr.trim()
            )));
        }

        let samples = samples_from_f32le(&output.stdout);

        tracing::debug!(
            path = %path.display(),
            decoder = %self.program.display(),
            total_samples = samples.len(),
            "External decoding complete"
        );

        Ok(DecodedAudio::from_mono(samples, EXTERNAL_SAMPLE_RATE))
    }
}

/// Interpret raw bytes as little-endian f32 samples; a trailing partial sample is dropped
pub fn samples_from_f32le(bytes: &[u8]) -> Vec<f32> {
    bytes
        .chunks_exact(4)
        .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_samples_from_f32le() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&1.0f32.to_le_bytes());
        bytes.extend_from_slice(&(-0.5f32).to_le_bytes());
        bytes.extend_from_slice(&[0x00, 0x01]); // partial

        assert_eq!(samples_from_f32le(&bytes), vec![1.0, -0.5]);
    }

    #[test]
    fn test_missing_program() {
        let decoder = ExternalDecoder::new("/nonexistent/bin/ffmpeg");
        let result = decoder.decode(Path::new("song.mp3"));
        match result {
            Err(AnalysisError::ExternalDecoder(msg)) => assert!(msg.contains("Failed to run")),
            other => panic!("Expected ExternalDecoder error, got {:?}", other),
        }
    }
}
