//! Signal features: RMS energy and tempo
//!
//! Both work on overlapping frames of the mono signal (2048 samples, hop 512).
//!
//! - Energy is the mean of per-frame RMS.
//! - Tempo comes from the autocorrelation of an onset envelope (the positive
//!   first difference of frame energy, lightly smoothed). Each lag in the
//!   30-240 BPM window is weighted by a log-normal prior centred on 120 BPM
//!   (one octave deviation), which suppresses half-tempo picks. The winning
//!   lag is refined by parabolic interpolation.

use super::{AnalysisError, AudioFeatures};

/// Analysis frame length in samples
pub const FRAME_SIZE: usize = 2048;

/// Distance between frame starts in samples
pub const HOP_SIZE: usize = 512;

/// Slowest tempo searched
pub const MIN_BPM: f64 = 30.0;

/// Fastest tempo searched
pub const MAX_BPM: f64 = 240.0;

/// Centre of the tempo prior
pub const PRIOR_BPM: f64 = 120.0;

/// Triangular kernel applied to the onset envelope
const SMOOTHING_KERNEL: [f64; 5] = [1.0, 2.0, 3.0, 2.0, 1.0];

/// Derive `(bpm, energy)` from mono samples
pub fn analyze_samples(samples: &[f32], sample_rate: u32) -> Result<AudioFeatures, AnalysisError> {
    if samples.is_empty() {
        return Err(AnalysisError::EmptyAudio);
    }
    if sample_rate == 0 {
        return Err(AnalysisError::InvalidSampleRate(sample_rate));
    }

    let bpm = round_to(estimate_tempo(samples, sample_rate), 1);
    let energy = round_to(rms_energy(samples), 3);

    Ok(AudioFeatures { bpm, energy })
}

/// Mean per-frame RMS amplitude
pub fn rms_energy(samples: &[f32]) -> f64 {
    let frames = frames(samples);
    if frames.is_empty() {
        return 0.0;
    }

    let total: f64 = frames
        .iter()
        .map(|frame| (frame_power(frame) / frame.len() as f64).sqrt())
        .sum();
    total / frames.len() as f64
}

/// Estimate tempo in BPM; `0.0` when the signal has no periodic onsets
pub fn estimate_tempo(samples: &[f32], sample_rate: u32) -> f64 {
    let onsets = smooth(&onset_envelope(samples));
    let frames_per_second = sample_rate as f64 / HOP_SIZE as f64;

    let min_lag = ((frames_per_second * 60.0 / MAX_BPM).ceil() as usize).max(1);
    let max_lag = (frames_per_second * 60.0 / MIN_BPM).floor() as usize;
    let max_lag = max_lag.min(onsets.len().saturating_sub(1));

    if min_lag > max_lag {
        return 0.0;
    }

    let score = |lag: usize| {
        autocorrelation(&onsets, lag) * tempo_prior(60.0 * frames_per_second / lag as f64)
    };

    let mut best_lag = 0usize;
    let mut best_score = 0.0f64;
    for lag in min_lag..=max_lag {
        let value = score(lag);
        if value > best_score {
            best_score = value;
            best_lag = lag;
        }
    }

    if best_lag == 0 {
        return 0.0;
    }

    let offset = if best_lag >= 2 && best_lag + 1 < onsets.len() {
        parabolic_offset(score(best_lag - 1), best_score, score(best_lag + 1))
    } else {
        0.0
    };

    60.0 * frames_per_second / (best_lag as f64 + offset)
}

/// Round half away from zero to `decimals` places
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Overlapping analysis frames; a signal shorter than one frame is a single frame
fn frames(samples: &[f32]) -> Vec<&[f32]> {
    if samples.is_empty() {
        return Vec::new();
    }
    if samples.len() <= FRAME_SIZE {
        return vec![samples];
    }

    let count = (samples.len() - FRAME_SIZE) / HOP_SIZE + 1;
    (0..count)
        .map(|i| &samples[i * HOP_SIZE..i * HOP_SIZE + FRAME_SIZE])
        .collect()
}

fn frame_power(frame: &[f32]) -> f64 {
    frame.iter().map(|&s| (s as f64).powi(2)).sum()
}

/// Positive first difference of frame energy
fn onset_envelope(samples: &[f32]) -> Vec<f64> {
    let energies: Vec<f64> = frames(samples).iter().map(|f| frame_power(f)).collect();
    energies
        .windows(2)
        .map(|w| (w[1] - w[0]).max(0.0))
        .collect()
}

fn autocorrelation(envelope: &[f64], lag: usize) -> f64 {
    envelope
        .iter()
        .zip(envelope.iter().skip(lag))
        .map(|(a, b)| a * b)
        .sum()
}

/// Log-normal weight, 1.0 at [`PRIOR_BPM`], one octave standard deviation
fn tempo_prior(bpm: f64) -> f64 {
    let octaves = (bpm / PRIOR_BPM).log2();
    (-0.5 * octaves * octaves).exp()
}

fn smooth(envelope: &[f64]) -> Vec<f64> {
    let half = SMOOTHING_KERNEL.len() / 2;
    (0..envelope.len())
        .map(|i| {
            SMOOTHING_KERNEL
                .iter()
                .enumerate()
                .filter_map(|(k, weight)| {
                    let j = (i + k).checked_sub(half)?;
                    envelope.get(j).map(|v| v * weight)
                })
                .sum()
        })
        .collect()
}

/// Vertex offset of the parabola through three equally spaced points, in [-0.5, 0.5]
fn parabolic_offset(before: f64, peak: f64, after: f64) -> f64 {
    let curvature = before - 2.0 * peak + after;
    if curvature >= 0.0 {
        return 0.0;
    }

    (0.5 * (before - after) / curvature).clamp(-0.5, 0.5)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generate_sine_wave(frequency: f32, duration_secs: f32, sample_rate: u32) -> Vec<f32> {
        let num_samples = (duration_secs * sample_rate as f32) as usize;
        (0..num_samples)
            .map(|i| {
                let t = i as f32 / sample_rate as f32;
                (2.0 * std::f32::consts::PI * frequency * t).sin() * 0.5
            })
            .collect()
    }

    /// Short 1 kHz bursts every beat, silence in between
    fn generate_click_track(bpm: f64, duration_secs: f64, sample_rate: u32) -> Vec<f32> {
        let num_samples = (duration_secs * sample_rate as f64) as usize;
        let beat_samples = (60.0 / bpm * sample_rate as f64) as usize;
        let click_samples = sample_rate as usize / 100;

        (0..num_samples)
            .map(|i| {
                if i % beat_samples < click_samples {
                    let t = i as f32 / sample_rate as f32;
                    (2.0 * std::f32::consts::PI * 1000.0 * t).sin() * 0.8
                } else {
                    0.0
                }
            })
            .collect()
    }

    #[test]
    fn test_empty_samples() {
        assert!(matches!(analyze_samples(&[], 44100), Err(AnalysisError::EmptyAudio)));
    }

    #[test]
    fn test_zero_sample_rate() {
        assert!(matches!(
            analyze_samples(&[0.1, 0.2], 0),
            Err(AnalysisError::InvalidSampleRate(0))
        ));
    }

    #[test]
    fn test_rms_energy_of_sine() {
        // RMS of a sine with amplitude 0.5 is 0.5 / sqrt(2)
        let sine = generate_sine_wave(440.0, 2.0, 44100);
        let energy = rms_energy(&sine);
        assert!((energy - 0.3536).abs() < 0.01, "energy = {}", energy);
    }

    #[test]
    fn test_rms_energy_scales_with_amplitude() {
        let loud = generate_sine_wave(440.0, 1.0, 44100);
        let quiet: Vec<f32> = loud.iter().map(|&s| s * 0.5).collect();
        assert!(rms_energy(&loud) > rms_energy(&quiet) * 1.9);
    }

    #[test]
    fn test_short_signal_is_one_frame() {
        let samples = vec![0.5f32; 100];
        assert!((rms_energy(&samples) - 0.5).abs() < 1e-9);
        assert_eq!(estimate_tempo(&samples, 44100), 0.0);
    }

    #[test]
    fn test_silence() {
        let silence = vec![0.0f32; 44100 * 3];
        let features = analyze_samples(&silence, 44100).unwrap();
        assert_eq!(features.energy, 0.0);
        assert_eq!(features.bpm, 0.0);
    }

    #[test]
    fn test_click_track_tempo() {
        for bpm in [90.0, 120.0, 150.0] {
            let clicks = generate_click_track(bpm, 12.0, 44100);
            let estimated = estimate_tempo(&clicks, 44100);
            assert!(
                (estimated - bpm).abs() < 4.0,
                "expected ~{} BPM, estimated {}",
                bpm,
                estimated
            );
        }
    }

    #[test]
    fn test_tempo_prior_peaks_at_centre() {
        assert!((tempo_prior(PRIOR_BPM) - 1.0).abs() < 1e-12);
        assert!(tempo_prior(60.0) < tempo_prior(90.0));
        assert!((tempo_prior(60.0) - tempo_prior(240.0)).abs() < 1e-12);
    }

    #[test]
    fn test_parabolic_offset() {
        assert_eq!(parabolic_offset(1.0, 2.0, 1.0), 0.0);
        assert!(parabolic_offset(1.5, 2.0, 1.0) < 0.0);
        assert!(parabolic_offset(1.0, 2.0, 1.5) > 0.0);
        // Flat or convex: no correction
        assert_eq!(parabolic_offset(2.0, 1.0, 2.0), 0.0);
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(120.26, 1), 120.3);
        assert_eq!(round_to(0.12345, 3), 0.123);
        assert_eq!(round_to(0.0, 3), 0.0);
    }

    #[test]
    fn test_features_are_rounded() {
        let sine = generate_sine_wave(440.0, 2.0, 44100);
        let features = analyze_samples(&sine, 44100).unwrap();
        assert_eq!(features.energy, round_to(features.energy, 3));
        assert_eq!(features.bpm, round_to(features.bpm, 1));
    }
}
