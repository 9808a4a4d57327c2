//! Frame-level fake-probability models

use crate::dsp;
use crate::types::{Frame, InferenceError, VideoModel};
use tracing::debug;

// Weighted signal fusion within the frame model. Weights reflect how
// discriminative each signal is for upsampled/synthesized frames.
const W_HF_ENERGY: f64 = 0.40;
const W_CHECKERBOARD: f64 = 0.35;
const W_FLICKER: f64 = 0.25;

/// Gain mapping mean Laplacian energy into [0, 1]
const HF_GAIN: f64 = 12.0;
/// Gain mapping inter-frame energy deviation into [0, 1]
const FLICKER_GAIN: f64 = 30.0;
/// Block grid used for spatial energy statistics
const ENERGY_GRID: usize = 8;

/// Deterministic spectral heuristic over grayscale frames
///
/// Three signals, fused with fixed weights:
/// - mean high-frequency energy (over-sharpened synthesis)
/// - checkerboard periodicity of block energies (transposed-conv artifacts)
/// - inter-frame energy flicker (temporal incoherence)
#[derive(Debug, Default)]
pub struct SpectralVideoModel;

impl SpectralVideoModel {
    /// Create the heuristic frame model
    pub fn new() -> Self {
        Self
    }
}

impl VideoModel for SpectralVideoModel {
    fn name(&self) -> &'static str {
        "spectral-video"
    }

    fn predict(&self, frames: &[Frame]) -> Result<f64, InferenceError> {
        if frames.is_empty() {
            return Err(InferenceError::InvalidInput("No frames to score".into()));
        }

        let mut frame_means = Vec::with_capacity(frames.len());
        let mut checkerboard_sum = 0.0f64;

        for frame in frames {
            let map = dsp::hf_energy_map(frame);
            let mean = map.iter().map(|&v| v as f64).sum::<f64>() / map.len().max(1) as f64;
            frame_means.push(mean);

            let blocks = dsp::block_energies(
                &map,
                frame.width as usize,
                frame.height as usize,
                ENERGY_GRID,
            );
            checkerboard_sum += checkerboard_score(&blocks, ENERGY_GRID);
        }

        let n = frames.len() as f64;
        let hf_mean = frame_means.iter().sum::<f64>() / n;
        let hf_signal = (hf_mean * HF_GAIN).clamp(0.0, 1.0);

        let checkerboard_signal = (checkerboard_sum / n).clamp(0.0, 1.0);

        let flicker = {
            let variance =
                frame_means.iter().map(|m| (m - hf_mean).powi(2)).sum::<f64>() / n;
            (variance.sqrt() * FLICKER_GAIN).clamp(0.0, 1.0)
        };

        let score = (W_HF_ENERGY * hf_signal
            + W_CHECKERBOARD * checkerboard_signal
            + W_FLICKER * flicker)
            .clamp(0.0, 1.0);

        debug!(
            hf = hf_signal,
            checkerboard = checkerboard_signal,
            flicker = flicker,
            score = score,
            "Frame model signals"
        );

        Ok(score)
    }
}

/// Alternation strength of block energies at lag 1 versus lag 2
///
/// Checkerboard upsampling artifacts alternate between adjacent blocks, so
/// the lag-1 difference dominates the lag-2 difference.
fn checkerboard_score(blocks: &[f32], grid: usize) -> f64 {
    if grid < 3 || blocks.len() < grid * grid {
        return 0.0;
    }

    let mut lag1 = 0.0f64;
    let mut lag2 = 0.0f64;
    for row in 0..grid {
        for col in 0..grid - 2 {
            let a = blocks[row * grid + col] as f64;
            let b = blocks[row * grid + col + 1] as f64;
            let c = blocks[row * grid + col + 2] as f64;
            lag1 += (a - b).abs();
            lag2 += (a - c).abs();
        }
    }

    if lag1 <= f64::EPSILON {
        return 0.0;
    }
    // Ratio > 1 means adjacent blocks alternate harder than blocks two
    // apart; map to (0, 1) and zero out the non-alternating regime.
    let ratio = lag1 / (lag2 + 1e-9);
    ((ratio - 1.0) / ratio).max(0.0)
}

/// Constant-score frame model for demos and tests
#[derive(Debug)]
pub struct FixedVideoModel {
    score: f64,
}

impl FixedVideoModel {
    /// Create a fixed model; the score is clamped into [0, 1]
    pub fn new(score: f64) -> Self {
        Self {
            score: score.clamp(0.0, 1.0),
        }
    }
}

impl VideoModel for FixedVideoModel {
    fn name(&self) -> &'static str {
        "fixed-video"
    }

    fn predict(&self, frames: &[Frame]) -> Result<f64, InferenceError> {
        if frames.is_empty() {
            return Err(InferenceError::InvalidInput("No frames to score".into()));
        }
        Ok(self.score)
    }
}
