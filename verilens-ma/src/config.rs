//! Analysis settings for verilens-ma
//!
//! All tunables of the pipeline live here: fusion weighting, frame sampling
//! policy, audio target rate, timeout policy, and model selection. The
//! scratch folder is resolved separately (CLI → ENV → TOML → default) and
//! injected, so tests can redirect it per run.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use verilens_common::config::TomlConfig;

/// Environment variable overriding the scratch folder
pub const SCRATCH_ENV_VAR: &str = "VERILENS_SCRATCH_FOLDER";

/// Default bind address for the service
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:5841";

/// Behavior when neither modality produced a score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum NoSignalPolicy {
    /// Report maximal uncertainty (fused = 0.5); matches the historical
    /// behavior of the service
    #[default]
    Neutral,
    /// Fail the request: media with no analyzable content is an error
    Reject,
}

/// Which model implementations to run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelSelection {
    /// Deterministic spectral heuristics, no external weights
    Heuristic,
    /// Constant-score stand-ins, for demos and tests
    Fixed {
        /// Score the video model always returns
        video: f64,
        /// Score the audio model always returns
        audio: f64,
    },
}

impl Default for ModelSelection {
    fn default() -> Self {
        ModelSelection::Heuristic
    }
}

/// Pipeline settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisSettings {
    /// Video weight in fusion; audio gets `1 - alpha`
    pub alpha: f64,
    /// Frame sampling rate in frames per second
    pub frame_rate: f64,
    /// Hard cap on extracted frames per request
    pub max_frames: usize,
    /// Target sample rate for all audio analysis (Hz)
    pub target_sample_rate: u32,
    /// Maximum heatmap artifacts rendered per request
    pub max_heatmaps: usize,
    /// What to do when no modality produced a score
    pub no_signal_policy: NoSignalPolicy,
    /// Per-step timeout for extraction and inference (seconds)
    pub step_timeout_secs: u64,
    /// Model implementations to run
    pub model: ModelSelection,
    /// Scratch folder for uploads and artifacts
    pub scratch_dir: PathBuf,
    /// HTTP bind address
    pub bind_addr: String,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            alpha: 0.6,
            frame_rate: 5.0,
            max_frames: 32,
            target_sample_rate: 16_000,
            max_heatmaps: 6,
            no_signal_policy: NoSignalPolicy::Neutral,
            step_timeout_secs: 30,
            model: ModelSelection::default(),
            scratch_dir: std::env::temp_dir().join("verilens"),
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
        }
    }
}

impl AnalysisSettings {
    /// Build settings from an optional TOML config and CLI scratch override
    pub fn resolve(cli_scratch: Option<&str>, toml_config: Option<&TomlConfig>) -> Self {
        let mut settings = AnalysisSettings::default();

        settings.scratch_dir = verilens_common::config::resolve_scratch_folder(
            cli_scratch,
            SCRATCH_ENV_VAR,
            toml_config,
        );

        if let Some(addr) = toml_config.and_then(|c| c.bind_addr.as_deref()) {
            settings.bind_addr = addr.to_string();
        }

        settings
    }

    /// Step timeout as a [`std::time::Duration`]
    pub fn step_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.step_timeout_secs)
    }
}
