//! Channel mixing utilities (multi-channel to mono conversion)

use crate::error::AnalysisError;

/// Down-mix interleaved samples to mono by averaging channels
///
/// # Arguments
///
/// * `interleaved` - Interleaved samples (L R L R ... for stereo)
/// * `channels` - Number of interleaved channels
///
/// # Returns
///
/// Mono samples, one per frame. A trailing partial frame is dropped.
pub fn downmix_to_mono(interleaved: &[f32], channels: usize) -> Result<Vec<f32>, AnalysisError> {
    if channels == 0 {
        return Err(AnalysisError::InvalidInput(
            "Channel count must be non-zero".to_string(),
        ));
    }

    if channels == 1 {
        return Ok(interleaved.to_vec());
    }

    log::debug!(
        "Down-mixing {} interleaved samples from {} channels",
        interleaved.len(),
        channels
    );

    let scale = 1.0 / channels as f32;
    Ok(interleaved
        .chunks_exact(channels)
        .map(|frame| frame.iter().sum::<f32>() * scale)
        .collect())
}
