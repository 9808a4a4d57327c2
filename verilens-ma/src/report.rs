//! Analysis report assembly
//!
//! The response contract keeps every key present regardless of which
//! branch executed; absent values serialize as JSON `null`, never as a
//! missing key. The trust score is derived here so the
//! `trust_score == (1 - fused_fake_prob) * 100` invariant holds by
//! construction.

use crate::classifier::MediaKind;
use crate::fusion;
use serde::Serialize;

/// Per-request analysis response
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    /// Declared modality of the analyzed file
    #[serde(rename = "type")]
    pub media_type: MediaKind,
    /// Frame-model fake probability, if the video pipeline ran
    pub video_fake_prob: Option<f64>,
    /// Audio-model fake probability, if audio analysis produced one
    pub audio_fake_prob: Option<f64>,
    /// Fused fake probability
    pub fused_fake_prob: f64,
    /// User-facing trust score, `(1 - fused) * 100`
    pub trust_score: f64,
    /// Heatmap artifact paths, if any were rendered
    pub heatmaps: Option<Vec<String>>,
    /// Spectrogram artifact path, if rendered
    pub melspec_image: Option<String>,
}

impl AnalysisReport {
    /// Assemble a report from modality scores and artifact references
    pub fn assemble(
        media_type: MediaKind,
        video_fake_prob: Option<f64>,
        audio_fake_prob: Option<f64>,
        alpha: f64,
        heatmaps: Option<Vec<String>>,
        melspec_image: Option<String>,
    ) -> Self {
        let fused_fake_prob = fusion::fuse(video_fake_prob, audio_fake_prob, alpha);
        Self {
            media_type,
            video_fake_prob,
            audio_fake_prob,
            fused_fake_prob,
            trust_score: fusion::trust_score(fused_fake_prob),
            heatmaps,
            melspec_image,
        }
    }
}
