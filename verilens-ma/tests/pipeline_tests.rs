//! Integration tests for the analysis pipeline
//!
//! Exercises the orchestrator with substitute extraction collaborators and
//! fixed-score models, so every branch runs without ffmpeg or media files.

use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;

use verilens_ma::artifacts::ArtifactWriter;
use verilens_ma::classifier::MediaKind;
use verilens_ma::config::AnalysisSettings;
use verilens_ma::models::{FixedAudioModel, FixedVideoModel};
use verilens_ma::pipeline::{AnalyzeError, Analyzer};
use verilens_ma::types::{AudioClip, AudioSource, ExtractionError, Frame, FrameSource};

/// Frame source yielding a fixed number of uniform gray frames
struct StubFrames {
    count: usize,
}

#[async_trait]
impl FrameSource for StubFrames {
    async fn extract_frames(
        &self,
        _path: &Path,
        _fps: f64,
        max_frames: usize,
    ) -> Result<Vec<Frame>, ExtractionError> {
        Ok((0..self.count.min(max_frames))
            .map(|_| Frame {
                width: 8,
                height: 8,
                pixels: vec![128u8; 64],
            })
            .collect())
    }
}

/// Frame source that always fails, as if ffmpeg were missing
struct FailingFrames;

#[async_trait]
impl FrameSource for FailingFrames {
    async fn extract_frames(
        &self,
        _path: &Path,
        _fps: f64,
        _max_frames: usize,
    ) -> Result<Vec<Frame>, ExtractionError> {
        Err(ExtractionError::Tool("ffmpeg not found".into()))
    }
}

/// Audio source yielding one second of quiet tone-free samples
struct StubAudio;

#[async_trait]
impl AudioSource for StubAudio {
    async fn load_audio(
        &self,
        _path: &Path,
        target_sample_rate: u32,
    ) -> Result<AudioClip, ExtractionError> {
        Ok(AudioClip {
            samples: vec![0.25f32; target_sample_rate as usize],
            sample_rate: target_sample_rate,
        })
    }
}

/// Audio source reporting a container with no audio track
struct NoTrackAudio;

#[async_trait]
impl AudioSource for NoTrackAudio {
    async fn load_audio(
        &self,
        _path: &Path,
        _target_sample_rate: u32,
    ) -> Result<AudioClip, ExtractionError> {
        Err(ExtractionError::NoAudioTrack("upload.mp4".into()))
    }
}

fn analyzer(
    frames: Arc<dyn FrameSource>,
    audio: Arc<dyn AudioSource>,
    video_score: f64,
    audio_score: f64,
) -> Analyzer {
    Analyzer::new(
        AnalysisSettings::default(),
        frames,
        audio,
        Arc::new(FixedVideoModel::new(video_score)),
        Arc::new(FixedAudioModel::new(audio_score)),
    )
}

fn writer(dir: &Path) -> ArtifactWriter {
    ArtifactWriter::new(dir.to_path_buf(), "/artifacts/test")
}

#[tokio::test]
async fn video_with_audio_fuses_both_modalities() {
    let tmp = tempfile::tempdir().unwrap();
    let analyzer = analyzer(Arc::new(StubFrames { count: 10 }), Arc::new(StubAudio), 0.9, 0.3);

    let report = analyzer
        .analyze(Path::new("clip.mp4"), MediaKind::Video, &writer(tmp.path()))
        .await
        .unwrap();

    assert_eq!(report.media_type, MediaKind::Video);
    assert_eq!(report.video_fake_prob, Some(0.9));
    assert_eq!(report.audio_fake_prob, Some(0.3));
    // 0.6 * 0.9 + 0.4 * 0.3
    assert!((report.fused_fake_prob - 0.66).abs() < 1e-12);
    assert!((report.trust_score - 34.0).abs() < 1e-9);
    let heatmaps = report.heatmaps.expect("heatmaps present");
    assert_eq!(heatmaps.len(), AnalysisSettings::default().max_heatmaps);
    assert!(report.melspec_image.is_some());
}

#[tokio::test]
async fn missing_audio_track_degrades_to_video_only() {
    let tmp = tempfile::tempdir().unwrap();
    let analyzer = analyzer(
        Arc::new(StubFrames { count: 4 }),
        Arc::new(NoTrackAudio),
        0.8,
        0.3,
    );

    let report = analyzer
        .analyze(Path::new("clip.mkv"), MediaKind::Video, &writer(tmp.path()))
        .await
        .unwrap();

    assert_eq!(report.video_fake_prob, Some(0.8));
    assert_eq!(report.audio_fake_prob, None);
    // Single available score passes through fusion untouched
    assert_eq!(report.fused_fake_prob, 0.8);
    assert!(report.melspec_image.is_none());
}

#[tokio::test]
async fn frame_extraction_failure_is_fatal() {
    let tmp = tempfile::tempdir().unwrap();
    let analyzer = analyzer(Arc::new(FailingFrames), Arc::new(StubAudio), 0.5, 0.5);

    let err = analyzer
        .analyze(Path::new("clip.mp4"), MediaKind::Video, &writer(tmp.path()))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        AnalyzeError::Extraction(ExtractionError::Tool(_))
    ));
}

#[tokio::test]
async fn audio_only_file_reports_single_modality() {
    let tmp = tempfile::tempdir().unwrap();
    let analyzer = analyzer(Arc::new(FailingFrames), Arc::new(StubAudio), 0.5, 0.7);

    let report = analyzer
        .analyze(Path::new("voice.wav"), MediaKind::Audio, &writer(tmp.path()))
        .await
        .unwrap();

    assert_eq!(report.media_type, MediaKind::Audio);
    assert_eq!(report.video_fake_prob, None);
    assert_eq!(report.audio_fake_prob, Some(0.7));
    assert_eq!(report.fused_fake_prob, 0.7);
    assert!(report.heatmaps.is_none());
    assert!(report.melspec_image.is_some());
}

#[tokio::test]
async fn audio_only_extraction_failure_is_fatal() {
    let tmp = tempfile::tempdir().unwrap();
    let analyzer = analyzer(Arc::new(StubFrames { count: 4 }), Arc::new(NoTrackAudio), 0.5, 0.5);

    let err = analyzer
        .analyze(Path::new("voice.wav"), MediaKind::Audio, &writer(tmp.path()))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        AnalyzeError::Extraction(ExtractionError::NoAudioTrack(_))
    ));
}

#[tokio::test]
async fn artifact_failures_do_not_fail_analysis() {
    let tmp = tempfile::tempdir().unwrap();
    // Point the writer at a folder that does not exist
    let missing = tmp.path().join("nope");
    let analyzer = analyzer(Arc::new(StubFrames { count: 4 }), Arc::new(StubAudio), 0.9, 0.1);

    let report = analyzer
        .analyze(Path::new("clip.mp4"), MediaKind::Video, &writer(&missing))
        .await
        .unwrap();

    assert_eq!(report.video_fake_prob, Some(0.9));
    assert_eq!(report.audio_fake_prob, Some(0.1));
    assert!(report.heatmaps.is_none());
    assert!(report.melspec_image.is_none());
}

#[tokio::test]
async fn unsupported_kind_is_rejected() {
    let tmp = tempfile::tempdir().unwrap();
    let analyzer = analyzer(Arc::new(StubFrames { count: 1 }), Arc::new(StubAudio), 0.5, 0.5);

    let err = analyzer
        .analyze(
            Path::new("doc.pdf"),
            MediaKind::Unsupported,
            &writer(tmp.path()),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, AnalyzeError::NoAnalyzableContent));
}
