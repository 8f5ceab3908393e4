//! Audio decoding
//!
//! Decode audio files to mono f32 PCM at the native sample rate.
//! Uses symphonia for format-agnostic decoding (MP3, FLAC, AAC, WAV, OGG, ...).

use std::path::Path;
use symphonia::core::audio::{AudioBuffer, AudioBufferRef, Signal};
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::conv::FromSample;
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use symphonia::core::sample::Sample;

use super::AnalysisError;

/// Decoded audio result
#[derive(Debug)]
pub struct DecodedAudio {
    /// Mono audio samples (f32, range [-1.0, 1.0])
    pub samples: Vec<f32>,
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Original channel count
    pub channels: usize,
    /// Duration in seconds
    pub duration_seconds: f64,
}

impl DecodedAudio {
    /// Wrap already-mono samples
    pub fn from_mono(samples: Vec<f32>, sample_rate: u32) -> Self {
        let duration_seconds = if sample_rate > 0 {
            samples.len() as f64 / sample_rate as f64
        } else {
            0.0
        };
        Self {
            samples,
            sample_rate,
            channels: 1,
            duration_seconds,
        }
    }
}

/// Decode audio file to mono f32 PCM samples
///
/// Multi-channel audio is averaged down to mono. Packets that fail to decode
/// are skipped; any other error aborts the file.
pub fn decode_audio_file(file_path: &Path) -> Result<DecodedAudio, AnalysisError> {
    tracing::debug!(path = %file_path.display(), "Decoding audio file");

    let file = std::fs::File::open(file_path)
        .map_err(|e| AnalysisError::Io(file_path.to_path_buf(), e))?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    // Format hint from file extension
    let mut hint = Hint::new();
    if let Some(extension) = file_path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(extension);
    }

    let probed = symphonia::default::get_probe()
        .format(&hint, mss, &FormatOptions::default(), &MetadataOptions::default())
        .map_err(|e| {
            AnalysisError::Decode(format!(
                "Failed to probe audio file {}: {}",
                file_path.display(),
                e
            ))
        })?;

    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| AnalysisError::Decode("No audio track found in file".to_string()))?;

    let track_id = track.id;
    let sample_rate = track
        .codec_params
        .sample_rate
        .ok_or(AnalysisError::InvalidSampleRate(0))?;
    let channel_count = track
        .codec_params
        .channels
        .map(|c| c.count())
        .unwrap_or(1);

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|e| {
            AnalysisError::Decode(format!(
                "Failed to create decoder for {}: {}",
                file_path.display(),
                e
            ))
        })?;

    let mut samples: Vec<f32> = Vec::new();
    let mut skipped_packets = 0usize;

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                break;
            }
            Err(SymphoniaError::ResetRequired) => break,
            Err(e) => {
                return Err(AnalysisError::Decode(format!("Error reading packet: {}", e)));
            }
        };

        if packet.track_id() != track_id {
            continue;
        }

        match decoder.decode(&packet) {
            Ok(decoded) => mix_to_mono(&decoded, &mut samples),
            Err(SymphoniaError::DecodeError(msg)) => {
                skipped_packets += 1;
                tracing::trace!(path = %file_path.display(), "Skipping corrupt packet: {}", msg);
            }
            Err(e) => {
                return Err(AnalysisError::Decode(format!(
                    "Failed to decode packet in {}: {}",
                    file_path.display(),
                    e
                )));
            }
        }
    }

    if skipped_packets > 0 {
        tracing::debug!(
            path = %file_path.display(),
            skipped_packets,
            "Some packets could not be decoded"
        );
    }

    let mut decoded = DecodedAudio::from_mono(samples, sample_rate);
    decoded.channels = channel_count;

    tracing::debug!(
        path = %file_path.display(),
        sample_rate,
        channels = channel_count,
        total_samples = decoded.samples.len(),
        duration_seconds = format!("{:.2}", decoded.duration_seconds),
        "Audio decoding complete"
    );

    Ok(decoded)
}

/// Append a decoded buffer to `out`, averaging channels
fn mix_to_mono(decoded: &AudioBufferRef, out: &mut Vec<f32>) {
    match decoded {
        AudioBufferRef::U8(buf) => average_channels(&**buf, out),
        AudioBufferRef::U16(buf) => average_channels(&**buf, out),
        AudioBufferRef::U24(buf) => average_channels(&**buf, out),
        AudioBufferRef::U32(buf) => average_channels(&**buf, out),
        AudioBufferRef::S8(buf) => average_channels(&**buf, out),
        AudioBufferRef::S16(buf) => average_channels(&**buf, out),
        AudioBufferRef::S24(buf) => average_channels(&**buf, out),
        AudioBufferRef::S32(buf) => average_channels(&**buf, out),
        AudioBufferRef::F32(buf) => average_channels(&**buf, out),
        AudioBufferRef::F64(buf) => average_channels(&**buf, out),
    }
}

fn average_channels<S>(buf: &AudioBuffer<S>, out: &mut Vec<f32>)
where
    S: Sample,
    f32: FromSample<S>,
{
    let num_channels = buf.spec().channels.count();
    if num_channels == 0 {
        return;
    }

    out.reserve(buf.frames());
    for frame_idx in 0..buf.frames() {
        let sum: f32 = (0..num_channels)
            .map(|ch| f32::from_sample(buf.chan(ch)[frame_idx]))
            .sum();
        out.push(sum / num_channels as f32);
    }
}
