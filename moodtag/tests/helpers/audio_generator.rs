//! WAV fixture generator
//!
//! Writes a steady background tone with a short louder burst on every beat,
//! which gives the tempo estimator a clean periodic onset.

use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct ClickTrack {
    pub bpm: f64,
    pub duration_seconds: f64,
    pub sample_rate: u32,
    pub channels: u16,
    /// Amplitude of the 220 Hz background tone
    pub tone_amplitude: f32,
    /// Amplitude of the 1 kHz beat bursts
    pub click_amplitude: f32,
}

impl Default for ClickTrack {
    fn default() -> Self {
        Self {
            bpm: 120.0,
            duration_seconds: 12.0,
            sample_rate: 44100,
            channels: 2,
            tone_amplitude: 0.2,
            click_amplitude: 0.6,
        }
    }
}

impl ClickTrack {
    /// Mono sample at index `i`
    pub fn sample(&self, i: usize) -> f32 {
        let rate = self.sample_rate as f32;
        let t = i as f32 / rate;
        let beat_samples = (60.0 / self.bpm * self.sample_rate as f64) as usize;
        let click_samples = self.sample_rate as usize / 100;

        let tone = self.tone_amplitude * (2.0 * std::f32::consts::PI * 220.0 * t).sin();
        let click = if beat_samples > 0 && i % beat_samples < click_samples {
            self.click_amplitude * (2.0 * std::f32::consts::PI * 1000.0 * t).sin()
        } else {
            0.0
        };
        (tone + click).clamp(-1.0, 1.0)
    }
}

/// Write a 16-bit PCM WAV file described by `track`
pub fn generate_click_wav(path: &Path, track: &ClickTrack) -> anyhow::Result<PathBuf> {
    let spec = hound::WavSpec {
        channels: track.channels,
        sample_rate: track.sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut writer = hound::WavWriter::create(path, spec)?;
    let total_samples = (track.duration_seconds * track.sample_rate as f64) as usize;

    for i in 0..total_samples {
        let sample = (track.sample(i) * i16::MAX as f32) as i16;
        for _ in 0..track.channels {
            writer.write_sample(sample)?;
        }
    }

    writer.finalize()?;
    Ok(path.to_path_buf())
}
