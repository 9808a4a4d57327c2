//! Mel spectrogram computation
//!
//! STFT with a Hann window via rustfft, then a triangular mel filterbank
//! and log compression. Output is a `frames x n_mels` matrix consumed by
//! the audio model and the spectrogram artifact renderer.

use crate::types::MelSpectrogram;
use rustfft::{num_complex::Complex, FftPlanner};

/// Spectrogram parameters
#[derive(Debug, Clone)]
pub struct MelConfig {
    /// FFT window size in samples
    pub n_fft: usize,
    /// Hop between consecutive windows in samples
    pub hop_length: usize,
    /// Number of mel bands
    pub n_mels: usize,
}

impl Default for MelConfig {
    fn default() -> Self {
        Self {
            n_fft: 1024,
            hop_length: 256,
            n_mels: 64,
        }
    }
}

/// Compute a log-magnitude mel spectrogram of mono PCM
pub fn mel_spectrogram(samples: &[f32], sample_rate: u32, config: &MelConfig) -> MelSpectrogram {
    let n_fft = config.n_fft;

    // Zero-pad clips shorter than one window so they still produce a frame
    let padded;
    let samples = if samples.len() < n_fft {
        padded = {
            let mut p = samples.to_vec();
            p.resize(n_fft, 0.0);
            p
        };
        &padded[..]
    } else {
        samples
    };

    let window = hann_window(n_fft);
    let filterbank = mel_filterbank(config.n_mels, n_fft, sample_rate);

    let mut planner = FftPlanner::<f32>::new();
    let fft = planner.plan_fft_forward(n_fft);

    let n_bins = n_fft / 2 + 1;
    let num_frames = (samples.len() - n_fft) / config.hop_length + 1;
    let mut rows = Vec::with_capacity(num_frames);
    let mut buffer = vec![Complex::new(0.0f32, 0.0f32); n_fft];

    for frame_idx in 0..num_frames {
        let start = frame_idx * config.hop_length;
        for (i, (&s, &w)) in samples[start..start + n_fft].iter().zip(&window).enumerate() {
            buffer[i] = Complex::new(s * w, 0.0);
        }
        fft.process(&mut buffer);

        // Power spectrum over the non-redundant bins
        let power: Vec<f32> = buffer[..n_bins].iter().map(|c| c.norm_sqr()).collect();

        // Mel projection with log compression
        let row: Vec<f32> = filterbank
            .iter()
            .map(|filter| {
                let energy: f32 = filter.iter().zip(&power).map(|(&f, &p)| f * p).sum();
                energy.ln_1p()
            })
            .collect();

        rows.push(row);
    }

    MelSpectrogram {
        rows,
        n_mels: config.n_mels,
    }
}

/// Hann window of length `n`
fn hann_window(n: usize) -> Vec<f32> {
    (0..n)
        .map(|i| {
            let x = std::f32::consts::PI * i as f32 / n as f32;
            x.sin() * x.sin()
        })
        .collect()
}

/// Triangular mel filterbank: `n_mels` filters over `n_fft / 2 + 1` bins
fn mel_filterbank(n_mels: usize, n_fft: usize, sample_rate: u32) -> Vec<Vec<f32>> {
    let n_bins = n_fft / 2 + 1;
    let f_max = sample_rate as f32 / 2.0;

    let mel_max = hz_to_mel(f_max);
    // n_mels + 2 equally spaced points on the mel scale, mapped to FFT bins
    let bin_points: Vec<f32> = (0..n_mels + 2)
        .map(|i| {
            let mel = mel_max * i as f32 / (n_mels + 1) as f32;
            mel_to_hz(mel) * n_fft as f32 / sample_rate as f32
        })
        .collect();

    (0..n_mels)
        .map(|m| {
            let (left, center, right) = (bin_points[m], bin_points[m + 1], bin_points[m + 2]);
            (0..n_bins)
                .map(|bin| {
                    let bin = bin as f32;
                    if bin > left && bin < center {
                        (bin - left) / (center - left)
                    } else if bin >= center && bin < right {
                        (right - bin) / (right - center)
                    } else {
                        0.0
                    }
                })
                .collect()
        })
        .collect()
}

/// Hz to mel scale
fn hz_to_mel(hz: f32) -> f32 {
    2595.0 * (1.0 + hz / 700.0).log10()
}

/// Mel scale to Hz
fn mel_to_hz(mel: f32) -> f32 {
    700.0 * (10.0f32.powf(mel / 2595.0) - 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mel_scale_roundtrip() {
        for hz in [0.0, 440.0, 1000.0, 8000.0] {
            let back = mel_to_hz(hz_to_mel(hz));
            assert!((back - hz).abs() < 0.01, "{} -> {}", hz, back);
        }
    }

    #[test]
    fn filterbank_shape() {
        let fb = mel_filterbank(64, 1024, 16_000);
        assert_eq!(fb.len(), 64);
        for filter in &fb {
            assert_eq!(filter.len(), 513);
        }
        // Every filter has some support
        for (i, filter) in fb.iter().enumerate() {
            assert!(
                filter.iter().any(|&v| v > 0.0),
                "filter {} has no support",
                i
            );
        }
    }

    #[test]
    fn spectrogram_frame_count() {
        let config = MelConfig::default();
        // One second at 16 kHz: (16000 - 1024) / 256 + 1 = 59 frames
        let samples = vec![0.0f32; 16_000];
        let mel = mel_spectrogram(&samples, 16_000, &config);
        assert_eq!(mel.rows.len(), 59);
        assert_eq!(mel.n_mels, 64);
        assert!(mel.rows.iter().all(|r| r.len() == 64));
    }

    #[test]
    fn short_clip_still_produces_one_frame() {
        let config = MelConfig::default();
        let mel = mel_spectrogram(&[0.1f32; 100], 16_000, &config);
        assert_eq!(mel.rows.len(), 1);
    }

    #[test]
    fn sine_concentrates_energy_in_matching_band() {
        let config = MelConfig::default();
        let sr = 16_000u32;
        // 1 kHz sine, 0.5 s
        let samples: Vec<f32> = (0..8_000)
            .map(|i| (2.0 * std::f32::consts::PI * 1000.0 * i as f32 / sr as f32).sin())
            .collect();
        let mel = mel_spectrogram(&samples, sr, &config);

        // Average each band over time; the peak band must carry well more
        // energy than the quietest band.
        let n = mel.rows.len() as f32;
        let mut band_means = vec![0.0f32; mel.n_mels];
        for row in &mel.rows {
            for (acc, &v) in band_means.iter_mut().zip(row) {
                *acc += v / n;
            }
        }
        let max = band_means.iter().cloned().fold(f32::MIN, f32::max);
        let min = band_means.iter().cloned().fold(f32::MAX, f32::min);
        assert!(max > min + 1.0, "no spectral contrast: {} vs {}", max, min);
    }
}
