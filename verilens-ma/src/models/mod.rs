//! Model implementations and configuration-driven selection

pub mod audio;
pub mod video;

pub use audio::{FixedAudioModel, SpectralAudioModel};
pub use video::{FixedVideoModel, SpectralVideoModel};

use crate::config::ModelSelection;
use crate::types::{AudioModel, VideoModel};
use std::sync::Arc;
use tracing::info;

/// Instantiate the configured model pair
pub fn build_models(selection: &ModelSelection) -> (Arc<dyn VideoModel>, Arc<dyn AudioModel>) {
    match selection {
        ModelSelection::Heuristic => {
            info!("Using heuristic spectral models");
            (
                Arc::new(SpectralVideoModel::new()),
                Arc::new(SpectralAudioModel::new()),
            )
        }
        ModelSelection::Fixed { video, audio } => {
            info!(video = video, audio = audio, "Using fixed-score models");
            (
                Arc::new(FixedVideoModel::new(*video)),
                Arc::new(FixedAudioModel::new(*audio)),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heuristic_selection_builds_spectral_models() {
        let (video, audio) = build_models(&ModelSelection::Heuristic);
        assert_eq!(video.name(), "spectral-video");
        assert_eq!(audio.name(), "spectral-audio");
    }

    #[test]
    fn fixed_selection_builds_fixed_models() {
        let (video, audio) = build_models(&ModelSelection::Fixed {
            video: 0.9,
            audio: 0.1,
        });
        assert_eq!(video.name(), "fixed-video");
        assert_eq!(audio.name(), "fixed-audio");
    }
}
