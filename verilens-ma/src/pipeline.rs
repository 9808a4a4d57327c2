//! Analysis pipeline orchestrator
//!
//! Coordinates classification output through extraction, inference, fusion,
//! and report assembly for one request. Failure handling follows one rule:
//! the audio-from-video sub-pipeline is the only step allowed to fail
//! without failing the request; its failure degrades the audio fields to
//! `None` and is logged. Primary extraction and inference failures
//! propagate immediately, with no retries and no substituted scores.

use crate::artifacts::ArtifactWriter;
use crate::classifier::MediaKind;
use crate::config::{AnalysisSettings, NoSignalPolicy};
use crate::dsp::{self, MelConfig};
use crate::error::ApiError;
use crate::extract::{FfmpegFrameSource, SymphoniaAudioSource};
use crate::models;
use crate::report::AnalysisReport;
use crate::types::{
    AudioModel, AudioSource, ExtractionError, Frame, FrameSource, InferenceError, MelSpectrogram,
    VideoModel,
};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// Pipeline failure reaching the caller
#[derive(Debug, Error)]
pub enum AnalyzeError {
    /// Primary extraction step failed
    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    /// Model inference failed
    #[error(transparent)]
    Inference(#[from] InferenceError),

    /// No modality produced a score and policy forbids neutral output
    #[error("Media contains no analyzable content")]
    NoAnalyzableContent,
}

impl From<AnalyzeError> for ApiError {
    fn from(e: AnalyzeError) -> Self {
        match e {
            AnalyzeError::Extraction(e) => ApiError::Extraction(e),
            AnalyzeError::Inference(e) => ApiError::Inference(e),
            AnalyzeError::NoAnalyzableContent => ApiError::NoSignal,
        }
    }
}

/// Per-request analysis orchestrator
///
/// Holds only immutable configuration and shared collaborators; nothing
/// here is mutated across requests.
pub struct Analyzer {
    settings: AnalysisSettings,
    frames: Arc<dyn FrameSource>,
    audio: Arc<dyn AudioSource>,
    video_model: Arc<dyn VideoModel>,
    audio_model: Arc<dyn AudioModel>,
}

impl Analyzer {
    /// Create an analyzer with explicit collaborators (tests substitute here)
    pub fn new(
        settings: AnalysisSettings,
        frames: Arc<dyn FrameSource>,
        audio: Arc<dyn AudioSource>,
        video_model: Arc<dyn VideoModel>,
        audio_model: Arc<dyn AudioModel>,
    ) -> Self {
        Self {
            settings,
            frames,
            audio,
            video_model,
            audio_model,
        }
    }

    /// Create an analyzer with the production collaborators
    pub fn from_settings(settings: &AnalysisSettings) -> Self {
        let (video_model, audio_model) = models::build_models(&settings.model);
        Self::new(
            settings.clone(),
            Arc::new(FfmpegFrameSource::new()),
            Arc::new(SymphoniaAudioSource::new()),
            video_model,
            audio_model,
        )
    }

    /// Analyze a stored media file of known modality
    pub async fn analyze(
        &self,
        path: &Path,
        kind: MediaKind,
        artifacts: &ArtifactWriter,
    ) -> Result<AnalysisReport, AnalyzeError> {
        let report = match kind {
            MediaKind::Video => self.analyze_video(path, artifacts).await?,
            MediaKind::Audio => self.analyze_audio(path, artifacts).await?,
            MediaKind::Unsupported => return Err(AnalyzeError::NoAnalyzableContent),
        };

        if report.video_fake_prob.is_none()
            && report.audio_fake_prob.is_none()
            && self.settings.no_signal_policy == NoSignalPolicy::Reject
        {
            return Err(AnalyzeError::NoAnalyzableContent);
        }

        Ok(report)
    }

    /// Video pipeline: frame branch plus independent audio-from-video branch
    ///
    /// The two branches have no data dependency and run concurrently; both
    /// are joined before fusion.
    async fn analyze_video(
        &self,
        path: &Path,
        artifacts: &ArtifactWriter,
    ) -> Result<AnalysisReport, AnalyzeError> {
        info!("Analyzing video: {}", path.display());

        let (video_res, audio_res) = tokio::join!(
            self.video_branch(path, artifacts),
            self.audio_branch(path, artifacts)
        );

        // Frame extraction and frame inference failures are fatal
        let (video_score, heatmaps) = video_res?;

        // The embedded-audio branch is the one fallbackable step
        let (audio_score, melspec_image) = match audio_res {
            Ok((score, melspec)) => (Some(score), melspec),
            Err(e) => {
                warn!(error = %e, "Audio-from-video analysis failed, continuing video-only");
                (None, None)
            }
        };

        info!(
            video_fake_prob = video_score,
            audio_fake_prob = ?audio_score,
            "Video analysis complete"
        );

        Ok(AnalysisReport::assemble(
            MediaKind::Video,
            Some(video_score),
            audio_score,
            self.settings.alpha,
            heatmaps,
            melspec_image,
        ))
    }

    /// Audio pipeline for audio-only files; no fallback exists here
    async fn analyze_audio(
        &self,
        path: &Path,
        artifacts: &ArtifactWriter,
    ) -> Result<AnalysisReport, AnalyzeError> {
        info!("Analyzing audio: {}", path.display());

        let (audio_score, melspec_image) = self.audio_branch(path, artifacts).await?;

        info!(audio_fake_prob = audio_score, "Audio analysis complete");

        Ok(AnalysisReport::assemble(
            MediaKind::Audio,
            None,
            Some(audio_score),
            self.settings.alpha,
            None,
            melspec_image,
        ))
    }

    /// Frame extraction, frame inference, and heatmap artifacts
    async fn video_branch(
        &self,
        path: &Path,
        artifacts: &ArtifactWriter,
    ) -> Result<(f64, Option<Vec<String>>), AnalyzeError> {
        let secs = self.settings.step_timeout_secs;

        let frames = timeout(
            self.settings.step_timeout(),
            self.frames
                .extract_frames(path, self.settings.frame_rate, self.settings.max_frames),
        )
        .await
        .map_err(|_| ExtractionError::Timeout(secs))??;

        debug!("Extracted {} frames", frames.len());

        // CPU-bound inference runs off the async runtime. A timed-out
        // blocking task keeps running detached; the request is released
        // regardless.
        let model = Arc::clone(&self.video_model);
        let handle = tokio::task::spawn_blocking(move || {
            let score = model.predict(&frames)?;
            Ok::<(Vec<Frame>, f64), InferenceError>((frames, score))
        });
        let (frames, video_score) = timeout(self.settings.step_timeout(), handle)
            .await
            .map_err(|_| {
                InferenceError::Internal(format!("Frame inference timed out after {}s", secs))
            })?
            .map_err(|e| InferenceError::Internal(format!("Inference task panicked: {}", e)))??;

        // Heatmaps are best-effort; failures degrade the artifact list only
        let mut heatmaps = Vec::new();
        for (i, frame) in frames.iter().take(self.settings.max_heatmaps).enumerate() {
            let map = dsp::hf_energy_map(frame);
            match artifacts.save_heatmap(&map, frame.width, frame.height, i) {
                Ok(url) => heatmaps.push(url),
                Err(e) => warn!(error = %e, index = i, "Heatmap artifact failed"),
            }
        }
        let heatmaps = if heatmaps.is_empty() {
            None
        } else {
            Some(heatmaps)
        };

        Ok((video_score, heatmaps))
    }

    /// Audio loading, spectrogram inference, and the spectrogram artifact
    ///
    /// Shared by the audio pipeline (where errors are fatal) and the video
    /// pipeline (where the caller absorbs them).
    async fn audio_branch(
        &self,
        path: &Path,
        artifacts: &ArtifactWriter,
    ) -> Result<(f64, Option<String>), AnalyzeError> {
        let secs = self.settings.step_timeout_secs;

        let clip = timeout(
            self.settings.step_timeout(),
            self.audio
                .load_audio(path, self.settings.target_sample_rate),
        )
        .await
        .map_err(|_| ExtractionError::Timeout(secs))??;

        debug!(
            "Loaded {:.2}s of audio at {} Hz",
            clip.duration_seconds(),
            clip.sample_rate
        );

        let model = Arc::clone(&self.audio_model);
        let mel_config = MelConfig::default();
        let handle = tokio::task::spawn_blocking(move || {
            let mel = dsp::mel_spectrogram(&clip.samples, clip.sample_rate, &mel_config);
            let score = model.predict(&mel)?;
            Ok::<(MelSpectrogram, f64), InferenceError>((mel, score))
        });
        let (mel, audio_score) = timeout(self.settings.step_timeout(), handle)
            .await
            .map_err(|_| {
                InferenceError::Internal(format!("Audio inference timed out after {}s", secs))
            })?
            .map_err(|e| InferenceError::Internal(format!("Inference task panicked: {}", e)))??;

        let melspec_image = match artifacts.save_melspec(&mel) {
            Ok(url) => Some(url),
            Err(e) => {
                warn!(error = %e, "Spectrogram artifact failed");
                None
            }
        };

        Ok((audio_score, melspec_image))
    }
}
