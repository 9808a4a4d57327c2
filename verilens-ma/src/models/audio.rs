//! Spectrogram-level fake-probability models

use crate::types::{AudioModel, InferenceError, MelSpectrogram};
use tracing::debug;

const W_FLATNESS: f64 = 0.5;
const W_UNIFORMITY: f64 = 0.5;

/// Floor keeping log-domain flatness well defined on silent bands
const EPS: f64 = 1e-6;

/// Deterministic spectral heuristic over mel spectrograms
///
/// Two signals, equally weighted:
/// - mean spectral flatness across bands (vocoder output tends to be
///   spectrally flatter than natural recordings)
/// - temporal energy uniformity (synthesized speech lacks natural
///   frame-to-frame energy variation)
#[derive(Debug, Default)]
pub struct SpectralAudioModel;

impl SpectralAudioModel {
    /// Create the heuristic audio model
    pub fn new() -> Self {
        Self
    }
}

impl AudioModel for SpectralAudioModel {
    fn name(&self) -> &'static str {
        "spectral-audio"
    }

    fn predict(&self, mel: &MelSpectrogram) -> Result<f64, InferenceError> {
        if mel.rows.is_empty() || mel.n_mels == 0 {
            return Err(InferenceError::InvalidInput(
                "Empty mel spectrogram".into(),
            ));
        }

        let mut flatness_sum = 0.0f64;
        let mut frame_energies = Vec::with_capacity(mel.rows.len());

        for row in &mel.rows {
            let n = row.len() as f64;
            let arith = row.iter().map(|&v| v as f64 + EPS).sum::<f64>() / n;
            let geo = (row.iter().map(|&v| (v as f64 + EPS).ln()).sum::<f64>() / n).exp();
            flatness_sum += geo / arith;
            frame_energies.push(arith);
        }

        let n_frames = mel.rows.len() as f64;
        let flatness = (flatness_sum / n_frames).clamp(0.0, 1.0);

        let mean_energy = frame_energies.iter().sum::<f64>() / n_frames;
        let uniformity = if mean_energy <= EPS {
            // Silence carries no usable signal either way
            0.5
        } else {
            let variance = frame_energies
                .iter()
                .map(|e| (e - mean_energy).powi(2))
                .sum::<f64>()
                / n_frames;
            let cv = variance.sqrt() / mean_energy;
            (1.0 - cv).clamp(0.0, 1.0)
        };

        let score = (W_FLATNESS * flatness + W_UNIFORMITY * uniformity).clamp(0.0, 1.0);

        debug!(
            flatness = flatness,
            uniformity = uniformity,
            score = score,
            "Audio model signals"
        );

        Ok(score)
    }
}

/// Constant-score audio model for demos and tests
#[derive(Debug)]
pub struct FixedAudioModel {
    score: f64,
}

impl FixedAudioModel {
    /// Create a fixed model; the score is clamped into [0, 1]
    pub fn new(score: f64) -> Self {
        Self {
            score: score.clamp(0.0, 1.0),
        }
    }
}

impl AudioModel for FixedAudioModel {
    fn name(&self) -> &'static str {
        "fixed-audio"
    }

    fn predict(&self, mel: &MelSpectrogram) -> Result<f64, InferenceError> {
        if mel.rows.is_empty() {
            return Err(InferenceError::InvalidInput(
                "Empty mel spectrogram".into(),
            ));
        }
        Ok(self.score)
    }
}
