//! Score fusion and trust normalization
//!
//! Both functions are pure. Fusion combines whatever modality scores are
//! present under a fixed weighting; the trust score is the user-facing
//! complement of the fused fake probability, scaled to [0, 100]. Neither
//! clamps its inputs: adapters guarantee scores are already in [0, 1].

/// Combine per-modality fake probabilities into one.
///
/// Presence matrix:
/// - both absent: 0.5 (maximal uncertainty, no signal)
/// - one present: that score, unchanged
/// - both present: `alpha * video + (1 - alpha) * audio`
pub fn fuse(video_score: Option<f64>, audio_score: Option<f64>, alpha: f64) -> f64 {
    match (video_score, audio_score) {
        (None, None) => 0.5,
        (Some(v), None) => v,
        (None, Some(a)) => a,
        (Some(v), Some(a)) => alpha * v + (1.0 - alpha) * a,
    }
}

/// Convert a fake probability into the 0-100 trust score.
///
/// Strictly decreasing in `fake_prob`; full float precision is preserved,
/// rounding is left to presentation layers.
pub fn trust_score(fake_prob: f64) -> f64 {
    (1.0 - fake_prob) * 100.0
}
