//! Core types and trait definitions for the media analysis pipeline
//!
//! Every extraction and inference collaborator sits behind a trait here so
//! the pipeline can be exercised with substitutes in tests. Adapters own
//! range validation: a model score handed to fusion is already in [0, 1].

use std::path::Path;
use thiserror::Error;

/// A single decoded video frame (grayscale, row-major)
#[derive(Debug, Clone)]
pub struct Frame {
    /// Frame width in pixels
    pub width: u32,
    /// Frame height in pixels
    pub height: u32,
    /// Luma values, one byte per pixel, `width * height` long
    pub pixels: Vec<u8>,
}

impl Frame {
    /// Number of pixels expected for the frame geometry
    pub fn len(&self) -> usize {
        (self.width * self.height) as usize
    }

    /// True when the pixel buffer is empty
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }
}

/// Decoded mono audio at a known sample rate
#[derive(Debug, Clone)]
pub struct AudioClip {
    /// Mono PCM samples, normalized to [-1.0, 1.0]
    pub samples: Vec<f32>,
    /// Sample rate in Hz
    pub sample_rate: u32,
}

impl AudioClip {
    /// Clip duration in seconds
    pub fn duration_seconds(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate as f64
    }
}

/// Mel spectrogram: `frames x mel_bands` log-magnitude matrix
#[derive(Debug, Clone)]
pub struct MelSpectrogram {
    /// One row per STFT frame, `n_mels` columns each
    pub rows: Vec<Vec<f32>>,
    /// Number of mel bands per row
    pub n_mels: usize,
}

/// Frame extraction collaborator
///
/// Produces a bounded, ordered frame sequence from a video file. The
/// sampling policy (rate and cap) comes from configuration, never from the
/// implementation.
#[async_trait::async_trait]
pub trait FrameSource: Send + Sync {
    /// Extract up to `max_frames` frames at `fps` frames per second
    async fn extract_frames(
        &self,
        path: &Path,
        fps: f64,
        max_frames: usize,
    ) -> Result<Vec<Frame>, ExtractionError>;
}

/// Audio loading collaborator
///
/// Decodes the (first) audio track of a media file to mono PCM at the
/// target sample rate. Works for audio files and for video containers;
/// a container without an audio track yields [`ExtractionError::NoAudioTrack`].
#[async_trait::async_trait]
pub trait AudioSource: Send + Sync {
    /// Load and resample the file's audio track
    async fn load_audio(
        &self,
        path: &Path,
        target_sample_rate: u32,
    ) -> Result<AudioClip, ExtractionError>;
}

/// Frame-level fake-probability model
pub trait VideoModel: Send + Sync {
    /// Model name for logging and provenance
    fn name(&self) -> &'static str;

    /// Score frames; returns a fake probability in [0, 1]
    fn predict(&self, frames: &[Frame]) -> Result<f64, InferenceError>;
}

/// Spectrogram-level fake-probability model
pub trait AudioModel: Send + Sync {
    /// Model name for logging and provenance
    fn name(&self) -> &'static str;

    /// Score a mel spectrogram; returns a fake probability in [0, 1]
    fn predict(&self, mel: &MelSpectrogram) -> Result<f64, InferenceError>;
}

/// Extraction error
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// I/O error (file read/write)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Container holds no audio track
    #[error("No audio track found in {0}")]
    NoAudioTrack(String),

    /// Demux or codec failure
    #[error("Decode error: {0}")]
    Decode(String),

    /// Sample rate conversion failed
    #[error("Resample error: {0}")]
    Resample(String),

    /// External tool (ffmpeg) failed or is unavailable
    #[error("Extraction tool error: {0}")]
    Tool(String),

    /// Step exceeded the configured timeout
    #[error("Extraction timed out after {0}s")]
    Timeout(u64),
}

/// Model inference error
#[derive(Debug, Error)]
pub enum InferenceError {
    /// Input unusable for this model (e.g. empty frame set)
    #[error("Invalid model input: {0}")]
    InvalidInput(String),

    /// Internal model failure
    #[error("Inference error: {0}")]
    Internal(String),
}

/// Artifact generation error; always swallowed by the pipeline
#[derive(Debug, Error)]
pub enum ArtifactError {
    /// I/O error writing the artifact file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Image encoding failed
    #[error("Encode error: {0}")]
    Encode(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_len_matches_geometry() {
        let frame = Frame {
            width: 4,
            height: 3,
            pixels: vec![0u8; 12],
        };
        assert_eq!(frame.len(), 12);
        assert!(!frame.is_empty());
    }

    #[test]
    fn clip_duration() {
        let clip = AudioClip {
            samples: vec![0.0; 32000],
            sample_rate: 16000,
        };
        assert!((clip.duration_seconds() - 2.0).abs() < f64::EPSILON);
    }
}
