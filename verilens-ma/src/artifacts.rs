//! Explainability artifact rendering
//!
//! Heatmaps and spectrogram images are presentational only: every write is
//! best-effort, and callers degrade the corresponding report field to
//! `None` on failure instead of touching the score pipeline.

use crate::types::{ArtifactError, MelSpectrogram};
use image::GrayImage;
use std::path::PathBuf;
use tracing::debug;

/// Writes request-scoped artifact images and hands back their URL paths
#[derive(Debug, Clone)]
pub struct ArtifactWriter {
    /// Filesystem directory artifacts are written into
    dir: PathBuf,
    /// URL prefix the static file route serves `dir` under
    url_prefix: String,
}

impl ArtifactWriter {
    /// Create a writer rooted at `dir`, served under `url_prefix`
    pub fn new(dir: PathBuf, url_prefix: impl Into<String>) -> Self {
        Self {
            dir,
            url_prefix: url_prefix.into(),
        }
    }

    /// Render an energy map as a grayscale heatmap PNG (`heat_{index}.png`)
    pub fn save_heatmap(
        &self,
        map: &[f32],
        width: u32,
        height: u32,
        index: usize,
    ) -> Result<String, ArtifactError> {
        let pixels = contrast_stretch(map);
        let image = GrayImage::from_raw(width, height, pixels).ok_or_else(|| {
            ArtifactError::Encode(format!(
                "Energy map length {} does not match {}x{}",
                map.len(),
                width,
                height
            ))
        })?;
        self.save_png(image, &format!("heat_{}.png", index))
    }

    /// Render a mel spectrogram as a grayscale PNG (`melspec.png`)
    ///
    /// Time runs left to right, low mel bands at the bottom.
    pub fn save_melspec(&self, mel: &MelSpectrogram) -> Result<String, ArtifactError> {
        let width = mel.rows.len();
        let height = mel.n_mels;
        if width == 0 || height == 0 {
            return Err(ArtifactError::Encode("Empty mel spectrogram".into()));
        }

        let mut values = vec![0.0f32; width * height];
        for (x, row) in mel.rows.iter().enumerate() {
            for (band, &v) in row.iter().enumerate().take(height) {
                // Flip vertically: band 0 at the bottom row
                let y = height - 1 - band;
                values[y * width + x] = v;
            }
        }

        let pixels = contrast_stretch(&values);
        let image = GrayImage::from_raw(width as u32, height as u32, pixels)
            .ok_or_else(|| ArtifactError::Encode("Spectrogram buffer mismatch".into()))?;
        self.save_png(image, "melspec.png")
    }

    fn save_png(&self, image: GrayImage, file_name: &str) -> Result<String, ArtifactError> {
        let path = self.dir.join(file_name);
        image
            .save(&path)
            .map_err(|e| ArtifactError::Encode(format!("PNG encode failed: {}", e)))?;
        debug!("Saved artifact: {}", path.display());
        Ok(format!("{}/{}", self.url_prefix, file_name))
    }
}

/// Map float values onto the full 0-255 range
fn contrast_stretch(values: &[f32]) -> Vec<u8> {
    let max = values.iter().cloned().fold(0.0f32, f32::max);
    if max <= 0.0 {
        return vec![0u8; values.len()];
    }
    values
        .iter()
        .map(|&v| ((v.max(0.0) / max) * 255.0).round() as u8)
        .collect()
}
