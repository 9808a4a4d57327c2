//! Modality classification from file names
//!
//! Total and side-effect-free: any name maps to exactly one [`MediaKind`].
//! The two allow-lists are disjoint; video is checked first so it would win
//! if they ever overlapped.

use serde::Serialize;

/// Supported video container extensions
const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mov", "mkv", "avi"];

/// Supported audio file extensions
const AUDIO_EXTENSIONS: &[&str] = &["wav", "mp3", "flac", "m4a"];

/// Declared media modality, from the file name only
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    /// Video container; runs the frame pipeline plus embedded-audio pipeline
    Video,
    /// Audio file; runs the audio pipeline only
    Audio,
    /// Neither allow-list matched; rejected before analysis
    Unsupported,
}

/// Classify a file name by extension, case-insensitively
pub fn classify(file_name: &str) -> MediaKind {
    let Some(ext) = file_name.rsplit_once('.').map(|(_, ext)| ext) else {
        return MediaKind::Unsupported;
    };
    let ext = ext.to_ascii_lowercase();

    if VIDEO_EXTENSIONS.contains(&ext.as_str()) {
        MediaKind::Video
    } else if AUDIO_EXTENSIONS.contains(&ext.as_str()) {
        MediaKind::Audio
    } else {
        MediaKind::Unsupported
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn video_extensions() {
        for name in ["clip.mp4", "clip.mov", "clip.mkv", "clip.avi"] {
            assert_eq!(classify(name), MediaKind::Video, "{}", name);
        }
    }

    #[test]
    fn audio_extensions() {
        for name in ["voice.wav", "voice.mp3", "voice.flac", "voice.m4a"] {
            assert_eq!(classify(name), MediaKind::Audio, "{}", name);
        }
    }

    #[test]
    fn matching_is_case_insensitive() {
        assert_eq!(classify("clip.MP4"), MediaKind::Video);
        assert_eq!(classify("voice.WaV"), MediaKind::Audio);
    }

    #[test]
    fn unsupported_inputs() {
        assert_eq!(classify("doc.pdf"), MediaKind::Unsupported);
        assert_eq!(classify("noextension"), MediaKind::Unsupported);
        assert_eq!(classify(""), MediaKind::Unsupported);
        // Extension must be the final suffix
        assert_eq!(classify("archive.mp4.gz"), MediaKind::Unsupported);
    }
}
