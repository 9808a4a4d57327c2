//! Extraction collaborators: frame decoding and audio loading

pub mod audio;
pub mod frames;

pub use audio::SymphoniaAudioSource;
pub use frames::FfmpegFrameSource;
