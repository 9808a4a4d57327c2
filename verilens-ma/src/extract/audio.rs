//! Audio track loading via symphonia
//!
//! Decodes the first audio track of a media file to mono PCM and resamples
//! it to the pipeline's target rate with rubato. The same loader serves
//! audio files and video containers: symphonia demuxes mp4/mkv/avi, and a
//! container without an audio track surfaces as
//! [`ExtractionError::NoAudioTrack`] so the video pipeline can fall back.

use crate::types::{AudioClip, AudioSource, ExtractionError};
use rubato::{
    Resampler, SincFixedIn, SincInterpolationParameters, SincInterpolationType, WindowFunction,
};
use std::path::Path;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use tracing::debug;

/// Symphonia-backed audio loader
#[derive(Debug, Default)]
pub struct SymphoniaAudioSource;

impl SymphoniaAudioSource {
    /// Create a new loader
    pub fn new() -> Self {
        Self
    }

    /// Blocking decode + resample; runs under `spawn_blocking`
    fn load_blocking(path: &Path, target_sample_rate: u32) -> Result<AudioClip, ExtractionError> {
        debug!("Loading audio track: {}", path.display());

        let file = std::fs::File::open(path)?;
        let mss = MediaSourceStream::new(Box::new(file), Default::default());

        let mut hint = Hint::new();
        if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
            hint.with_extension(ext);
        }

        let probed = symphonia::default::get_probe()
            .format(
                &hint,
                mss,
                &FormatOptions::default(),
                &MetadataOptions::default(),
            )
            .map_err(|e| ExtractionError::Decode(format!("Failed to probe format: {}", e)))?;

        let mut format = probed.format;

        let track = format
            .tracks()
            .iter()
            .find(|t| t.codec_params.codec != CODEC_TYPE_NULL && t.codec_params.sample_rate.is_some())
            .ok_or_else(|| ExtractionError::NoAudioTrack(path.display().to_string()))?;

        let track_id = track.id;
        let codec_params = track.codec_params.clone();
        let native_sample_rate = codec_params
            .sample_rate
            .ok_or_else(|| ExtractionError::Decode("Sample rate missing from codec params".into()))?;

        debug!(
            "Native sample rate: {} Hz, target: {} Hz",
            native_sample_rate, target_sample_rate
        );

        let mut decoder = symphonia::default::get_codecs()
            .make(&codec_params, &DecoderOptions::default())
            .map_err(|e| ExtractionError::Decode(format!("Failed to create decoder: {}", e)))?;

        // Decode all packets of the audio track, mixing down to mono
        let mut samples: Vec<f32> = Vec::new();
        loop {
            let packet = match format.next_packet() {
                Ok(packet) => packet,
                Err(symphonia::core::errors::Error::IoError(e))
                    if e.kind() == std::io::ErrorKind::UnexpectedEof =>
                {
                    break;
                }
                Err(e) => {
                    return Err(ExtractionError::Decode(format!(
                        "Failed to read packet: {}",
                        e
                    )))
                }
            };

            if packet.track_id() != track_id {
                continue;
            }

            let decoded = decoder
                .decode(&packet)
                .map_err(|e| ExtractionError::Decode(format!("Failed to decode packet: {}", e)))?;

            let spec = *decoded.spec();
            let channels = spec.channels.count().max(1);
            let mut buf = SampleBuffer::<f32>::new(decoded.capacity() as u64, spec);
            buf.copy_interleaved_ref(decoded);

            for frame in buf.samples().chunks_exact(channels) {
                samples.push(frame.iter().sum::<f32>() / channels as f32);
            }
        }

        if samples.is_empty() {
            return Err(ExtractionError::Decode(format!(
                "Audio track decoded to zero samples: {}",
                path.display()
            )));
        }

        debug!("Decoded {} mono samples", samples.len());

        let samples = if native_sample_rate != target_sample_rate {
            resample_mono(samples, native_sample_rate, target_sample_rate)?
        } else {
            samples
        };

        Ok(AudioClip {
            samples,
            sample_rate: target_sample_rate,
        })
    }
}

#[async_trait::async_trait]
impl AudioSource for SymphoniaAudioSource {
    async fn load_audio(
        &self,
        path: &Path,
        target_sample_rate: u32,
    ) -> Result<AudioClip, ExtractionError> {
        let path = path.to_path_buf();
        tokio::task::spawn_blocking(move || Self::load_blocking(&path, target_sample_rate))
            .await
            .map_err(|e| ExtractionError::Decode(format!("Decode task panicked: {}", e)))?
    }
}

/// Resample mono PCM with rubato sinc interpolation
///
/// Single-pass: the chunk size equals the input length, so arbitrary clip
/// lengths need no chunking loop.
fn resample_mono(
    samples: Vec<f32>,
    source_rate: u32,
    target_rate: u32,
) -> Result<Vec<f32>, ExtractionError> {
    if samples.is_empty() {
        return Ok(samples);
    }

    debug!(
        "Resampling {} samples: {} Hz -> {} Hz",
        samples.len(),
        source_rate,
        target_rate
    );

    let params = SincInterpolationParameters {
        sinc_len: 256,
        f_cutoff: 0.95,
        interpolation: SincInterpolationType::Linear,
        oversampling_factor: 256,
        window: WindowFunction::BlackmanHarris2,
    };

    let ratio = target_rate as f64 / source_rate as f64;
    let num_frames = samples.len();

    let mut resampler = SincFixedIn::<f32>::new(ratio, 4.0, params, num_frames, 1)
        .map_err(|e| ExtractionError::Resample(format!("Failed to create resampler: {}", e)))?;

    let output = resampler
        .process(&[samples], None)
        .map_err(|e| ExtractionError::Resample(format!("Resampling failed: {}", e)))?;

    Ok(output.into_iter().next().unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resample_empty_input() {
        let out = resample_mono(Vec::new(), 44100, 16000).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn resample_halves_sample_count_at_2x_downrate() {
        // 32 kHz -> 16 kHz on one second of silence
        let out = resample_mono(vec![0.0; 32_000], 32_000, 16_000).unwrap();
        let expected = 16_000usize;
        let tolerance = expected / 100;
        assert!(
            out.len().abs_diff(expected) <= tolerance,
            "expected ~{} samples, got {}",
            expected,
            out.len()
        );
        assert!(out.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn resample_preserves_amplitude_scale() {
        // Constant DC signal should stay near its level after resampling
        let out = resample_mono(vec![0.5; 48_000], 48_000, 16_000).unwrap();
        let mid = &out[out.len() / 4..3 * out.len() / 4];
        for &s in mid {
            assert!((s - 0.5).abs() < 0.05, "sample drifted: {}", s);
        }
    }
}
