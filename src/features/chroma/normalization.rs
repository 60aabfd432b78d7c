//! Chroma normalization strategies

/// Scale a chroma vector so its largest component is 1.0
///
/// Returns `false` and leaves the vector untouched if the maximum is zero or
/// not finite.
pub fn normalize_max(chroma: &mut [f32; 12]) -> bool {
    let max = chroma.iter().copied().fold(0.0f32, f32::max);
    if !(max > 0.0) || !max.is_finite() {
        return false;
    }
    for x in chroma.iter_mut() {
        *x /= max;
    }
    true
}

/// Sharpen chroma vector to emphasize prominent semitones
///
/// Raises each component to `power`. A power of 1.0 returns the input
/// unchanged. The result is not renormalized.
///
/// # Arguments
///
/// * `chroma` - 12-element chroma vector
/// * `power` - Sharpening power (e.g., 1.5 or 2.0)
pub fn sharpen_chroma(chroma: &[f32; 12], power: f32) -> [f32; 12] {
    if (power - 1.0).abs() < f32::EPSILON {
        return *chroma;
    }
    log::debug!("Sharpening chroma with power {}", power);
    chroma.map(|x| x.max(0.0).powf(power))
}
