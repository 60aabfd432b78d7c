//! Key detection algorithm
//!
//! Correlates a pitch-class profile against the 24 Krumhansl-Schmuckler key
//! templates (12 rotations of the major and minor profiles) and keeps the key
//! with the highest Pearson correlation.
//!
//! # Reference
//!
//! Krumhansl, C. L. (1990). *Cognitive Foundations of Musical Pitch*.
//! Oxford University Press.

use super::{compute_key_clarity, templates::KeyTemplates, KeyEstimate};
use crate::analysis::result::{Key, Mode, PitchClassVector};

/// Correlation assigned when either operand has zero variance
pub const DEGENERATE_CORRELATION: f32 = -1.0;

/// Estimate the key of a pitch-class profile
///
/// Candidates are scored in a fixed order: major before minor, and within a
/// mode tonics C, C#, ..., B. A candidate replaces the current best only if
/// its correlation is strictly greater, so on exact ties the first candidate
/// in that order wins.
///
/// # Arguments
///
/// * `profile` - L1-normalized pitch-class vector
/// * `templates` - Key templates (Krumhansl-Kessler profiles)
///
/// # Returns
///
/// Key estimate with:
/// - Detected key (major or minor, 0-11)
/// - Confidence (correlation of the winning template)
/// - All 24 key scores in evaluation order
///
/// # Example
///
/// ```
/// use keytag::analysis::result::{Key, PitchClassVector};
/// use keytag::features::key::{estimate_key, KeyTemplates};
///
/// let templates = KeyTemplates::krumhansl();
/// let profile = PitchClassVector::from_energies(templates.rotated(keytag::Mode::Minor, 4))?;
/// let estimate = estimate_key(&profile, templates);
///
/// assert_eq!(estimate.key, Key::Minor(4));
/// assert_eq!(estimate.label(), "Em");
/// # Ok::<(), keytag::AnalysisError>(())
/// ```
pub fn estimate_key(profile: &PitchClassVector, templates: &KeyTemplates) -> KeyEstimate {
    let observed = profile.values();
    let mut scores = Vec::with_capacity(24);
    let mut best: Option<(Key, f32)> = None;

    for mode in Mode::ALL {
        for tonic in 0..12 {
            let rotated = templates.rotated(mode, tonic);
            let correlation = pearson_correlation(observed, &rotated);
            let key = Key::new(tonic as u32, mode);
            scores.push((key, correlation));

            match best {
                Some((_, best_score)) if correlation <= best_score => {}
                _ => best = Some((key, correlation)),
            }
        }
    }

    // Both loops are non-empty, so a best candidate always exists
    let (key, confidence) = best.unwrap_or((Key::Major(0), DEGENERATE_CORRELATION));
    let clarity = compute_key_clarity(&scores);

    log::debug!(
        "Estimated key: {}, correlation: {:.4}, clarity: {:.4}",
        key.name(),
        confidence,
        clarity
    );

    KeyEstimate {
        key,
        confidence,
        clarity,
        scores,
    }
}

/// Pearson correlation coefficient between two 12-element vectors
///
/// Accumulates in f64. Returns [`DEGENERATE_CORRELATION`] when either vector
/// has no variance relative to its magnitude or any input is non-finite, so
/// the result is always a finite value in [-1, 1]. The test is scale-free:
/// multiplying either vector by a positive constant never changes the result.
pub fn pearson_correlation(a: &[f32; 12], b: &[f32; 12]) -> f32 {
    let n = 12.0f64;
    let mean_a = a.iter().map(|&x| x as f64).sum::<f64>() / n;
    let mean_b = b.iter().map(|&x| x as f64).sum::<f64>() / n;

    let mut cov = 0.0f64;
    let mut var_a = 0.0f64;
    let mut var_b = 0.0f64;
    let mut energy_a = 0.0f64;
    let mut energy_b = 0.0f64;
    for (&x, &y) in a.iter().zip(b.iter()) {
        let dx = x as f64 - mean_a;
        let dy = y as f64 - mean_b;
        cov += dx * dy;
        var_a += dx * dx;
        var_b += dy * dy;
        energy_a += x as f64 * x as f64;
        energy_b += y as f64 * y as f64;
    }

    // Negated comparisons also catch NaN
    let flat_a = !(var_a > f64::EPSILON * energy_a);
    let flat_b = !(var_b > f64::EPSILON * energy_b);
    let denom = (var_a * var_b).sqrt();
    if flat_a || flat_b || !(denom > 0.0) || !denom.is_finite() || !cov.is_finite() {
        return DEGENERATE_CORRELATION;
    }

    (cov / denom).clamp(-1.0, 1.0) as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f32 = 1e-6;

    fn profile_for(templates: &KeyTemplates, mode: Mode, tonic: usize) -> PitchClassVector {
        PitchClassVector::from_energies(templates.rotated(mode, tonic)).unwrap()
    }

    #[test]
    fn test_exact_template_matches_every_key() {
        let templates = KeyTemplates::new();
        for mode in Mode::ALL {
            for tonic in 0..12 {
                let estimate = estimate_key(&profile_for(&templates, mode, tonic), &templates);
                assert_eq!(estimate.key, Key::new(tonic as u32, mode));
                assert!(
                    (estimate.confidence - 1.0).abs() < TOLERANCE,
                    "{:?} correlation {}",
                    estimate.key,
                    estimate.confidence
                );
            }
        }
    }

    #[test]
    fn test_e_minor_label() {
        let templates = KeyTemplates::krumhansl();
        let estimate = estimate_key(&profile_for(templates, Mode::Minor, 4), templates);
        assert_eq!(estimate.key.tonic_name(), "E");
        assert_eq!(estimate.key.mode(), Mode::Minor);
        assert_eq!(estimate.label(), "Em");
    }

    #[test]
    fn test_rotating_input_shifts_tonic() {
        let templates = KeyTemplates::new();
        for mode in Mode::ALL {
            let base = profile_for(&templates, mode, 2);
            let before = estimate_key(&base, &templates);
            let after = estimate_key(&base.rotated(1), &templates);

            assert_eq!(after.key.tonic(), (before.key.tonic() + 1) % 12);
            assert_eq!(after.key.mode(), before.key.mode());
            assert!((after.confidence - before.confidence).abs() < TOLERANCE);
        }
    }

    #[test]
    fn test_deterministic() {
        let templates = KeyTemplates::new();
        let mut energies = [0.02f32; 12];
        energies[0] = 0.3;
        energies[3] = 0.2;
        energies[7] = 0.25;
        let profile = PitchClassVector::from_energies(energies).unwrap();

        let first = estimate_key(&profile, &templates);
        let second = estimate_key(&profile, &templates);
        assert_eq!(first.key, second.key);
        assert_eq!(first.confidence, second.confidence);
        assert_eq!(first.scores, second.scores);
    }

    #[test]
    fn test_scores_in_evaluation_order() {
        let templates = KeyTemplates::new();
        let estimate = estimate_key(&profile_for(&templates, Mode::Major, 0), &templates);

        assert_eq!(estimate.scores.len(), 24);
        assert_eq!(estimate.scores[0].0, Key::Major(0));
        assert_eq!(estimate.scores[11].0, Key::Major(11));
        assert_eq!(estimate.scores[12].0, Key::Minor(0));
        assert_eq!(estimate.scores[23].0, Key::Minor(11));
        assert!(estimate.clarity > 0.0 && estimate.clarity <= 1.0);
    }

    #[test]
    fn test_ties_keep_first_candidate() {
        // Identical major and minor profiles make every minor score tie its
        // major counterpart; the major key must win
        let templates = KeyTemplates {
            major: KeyTemplates::new().major,
            minor: KeyTemplates::new().major,
        };
        let profile = PitchClassVector::from_energies(templates.rotated(Mode::Major, 5)).unwrap();
        let estimate = estimate_key(&profile, &templates);
        assert_eq!(estimate.key, Key::Major(5));
    }

    #[test]
    fn test_pearson_degenerate() {
        let flat = [1.0f32 / 12.0; 12];
        let templates = KeyTemplates::new();
        assert_eq!(
            pearson_correlation(&flat, &templates.major),
            DEGENERATE_CORRELATION
        );

        let mut nan = templates.major;
        nan[0] = f32::NAN;
        assert_eq!(
            pearson_correlation(&nan, &templates.minor),
            DEGENERATE_CORRELATION
        );
    }

    #[test]
    fn test_pearson_is_scale_free() {
        let templates = KeyTemplates::new();
        let tiny: [f32; 12] = std::array::from_fn(|i| templates.major[i] * 1e-9);
        assert!((pearson_correlation(&tiny, &templates.major) - 1.0).abs() < TOLERANCE);
        assert!((pearson_correlation(&tiny, &tiny) - 1.0).abs() < TOLERANCE);

        let tiny_minor: [f32; 12] = std::array::from_fn(|i| templates.minor[i] * 1e-9);
        let expected = pearson_correlation(&templates.major, &templates.minor);
        assert!((pearson_correlation(&tiny, &tiny_minor) - expected).abs() < TOLERANCE);

        let tiny_flat = [1e-9f32; 12];
        assert_eq!(
            pearson_correlation(&tiny_flat, &templates.major),
            DEGENERATE_CORRELATION
        );
    }

    #[test]
    fn test_pearson_anticorrelated() {
        let a: [f32; 12] = std::array::from_fn(|i| i as f32);
        let b: [f32; 12] = std::array::from_fn(|i| (11 - i) as f32);
        assert!((pearson_correlation(&a, &b) + 1.0).abs() < TOLERANCE);
        assert!((pearson_correlation(&a, &a) - 1.0).abs() < TOLERANCE);
    }
}
