//! Krumhansl-Schmuckler key templates
//!
//! Defines the major and minor tone profiles and their 12 rotations.

use once_cell::sync::Lazy;

use crate::analysis::result::Mode;

/// Krumhansl-Kessler major profile (probe-tone ratings, tonic = C)
pub const KRUMHANSL_MAJOR: [f32; 12] = [
    6.35, 2.23, 3.48, 2.33, 4.38, 4.09, 2.52, 5.19, 2.39, 3.66, 2.29, 2.88,
];

/// Krumhansl-Kessler minor profile (probe-tone ratings, tonic = C)
pub const KRUMHANSL_MINOR: [f32; 12] = [
    6.33, 2.68, 3.52, 5.38, 2.60, 3.53, 2.54, 4.75, 3.98, 2.69, 3.34, 3.17,
];

static KRUMHANSL: Lazy<KeyTemplates> = Lazy::new(KeyTemplates::new);

/// L1-normalized tone profiles for both modes
#[derive(Debug, Clone, PartialEq)]
pub struct KeyTemplates {
    /// Major profile with tonic at index 0 (sums to 1)
    pub major: [f32; 12],

    /// Minor profile with tonic at index 0 (sums to 1)
    pub minor: [f32; 12],
}

impl KeyTemplates {
    /// Create new key templates with Krumhansl-Kessler profiles
    pub fn new() -> Self {
        Self {
            major: l1_normalize(KRUMHANSL_MAJOR),
            minor: l1_normalize(KRUMHANSL_MINOR),
        }
    }

    /// Shared process-wide instance of the Krumhansl-Kessler templates
    pub fn krumhansl() -> &'static KeyTemplates {
        &KRUMHANSL
    }

    /// Profile for `mode` with its tonic at C
    pub fn profile(&self, mode: Mode) -> &[f32; 12] {
        match mode {
            Mode::Major => &self.major,
            Mode::Minor => &self.minor,
        }
    }

    /// Profile for `mode` rotated so its tonic lands on pitch class `tonic`
    ///
    /// `rotated[(j + tonic) % 12] == profile[j]`, i.e. a right rotation.
    pub fn rotated(&self, mode: Mode, tonic: usize) -> [f32; 12] {
        let mut rotated = *self.profile(mode);
        rotated.rotate_right(tonic % 12);
        rotated
    }
}

impl Default for KeyTemplates {
    fn default() -> Self {
        Self::new()
    }
}

fn l1_normalize(profile: [f32; 12]) -> [f32; 12] {
    let sum: f32 = profile.iter().sum();
    profile.map(|x| x / sum)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profiles_sum_to_one() {
        let templates = KeyTemplates::new();
        for mode in Mode::ALL {
            let sum: f32 = templates.profile(mode).iter().sum();
            assert!((sum - 1.0).abs() < 1e-6, "{:?} profile sums to {}", mode, sum);
        }
    }

    #[test]
    fn test_rotation_moves_tonic() {
        let templates = KeyTemplates::new();
        for tonic in 0..12 {
            let rotated = templates.rotated(Mode::Minor, tonic);
            assert_eq!(rotated[tonic], templates.minor[0]);
            assert_eq!(rotated[(tonic + 7) % 12], templates.minor[7]);
        }
    }

    #[test]
    fn test_shared_instance_matches_new() {
        assert_eq!(KeyTemplates::krumhansl(), &KeyTemplates::new());
    }
}
