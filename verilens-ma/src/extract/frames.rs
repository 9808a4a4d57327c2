//! Frame extraction via the ffmpeg CLI
//!
//! Decodes a bounded sequence of grayscale frames from a video file by
//! piping rawvideo out of an `ffmpeg` child process. Geometry is fixed at
//! 224x224; the sampling rate and cap come from configuration.

use crate::types::{ExtractionError, Frame, FrameSource};
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

/// Output geometry for extracted frames
pub const FRAME_WIDTH: u32 = 224;
/// Output geometry for extracted frames
pub const FRAME_HEIGHT: u32 = 224;

/// ffmpeg-backed frame source
#[derive(Debug, Clone, Default)]
pub struct FfmpegFrameSource {
    /// Binary to invoke; defaults to `ffmpeg` on PATH
    binary: Option<String>,
}

impl FfmpegFrameSource {
    /// Create a frame source using `ffmpeg` from PATH
    pub fn new() -> Self {
        Self { binary: None }
    }

    /// Create a frame source with an explicit ffmpeg binary path
    pub fn with_binary(binary: impl Into<String>) -> Self {
        Self {
            binary: Some(binary.into()),
        }
    }
}

#[async_trait::async_trait]
impl FrameSource for FfmpegFrameSource {
    async fn extract_frames(
        &self,
        path: &Path,
        fps: f64,
        max_frames: usize,
    ) -> Result<Vec<Frame>, ExtractionError> {
        let binary = self.binary.as_deref().unwrap_or("ffmpeg");
        debug!(
            "Extracting frames: {} (fps={}, max={})",
            path.display(),
            fps,
            max_frames
        );

        let output = Command::new(binary)
            .arg("-hide_banner")
            .arg("-loglevel")
            .arg("error")
            .arg("-i")
            .arg(path)
            .arg("-vf")
            .arg(format!(
                "fps={},scale={}:{},format=gray",
                fps, FRAME_WIDTH, FRAME_HEIGHT
            ))
            .arg("-frames:v")
            .arg(max_frames.to_string())
            .arg("-f")
            .arg("rawvideo")
            .arg("pipe:1")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => {
                    ExtractionError::Tool(format!("{} not found on PATH", binary))
                }
                _ => ExtractionError::Tool(format!("Failed to run {}: {}", binary, e)),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ExtractionError::Tool(format!(
                "{} exited with {}: {}",
                binary,
                output.status,
                stderr.trim()
            )));
        }

        let frame_len = (FRAME_WIDTH * FRAME_HEIGHT) as usize;
        let frames: Vec<Frame> = output
            .stdout
            .chunks_exact(frame_len)
            .map(|pixels| Frame {
                width: FRAME_WIDTH,
                height: FRAME_HEIGHT,
                pixels: pixels.to_vec(),
            })
            .collect();

        if frames.is_empty() {
            return Err(ExtractionError::Decode(format!(
                "No frames decoded from {}",
                path.display()
            )));
        }

        debug!("Extracted {} frames", frames.len());
        Ok(frames)
    }
}
