//! Analysis result types

use serde::{Deserialize, Serialize};

use super::metadata::AnalysisMetadata;
use crate::error::AnalysisError;

/// Pitch class names in enumeration order (index 0 = C)
pub const PITCH_CLASS_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Tolerance used when checking that a profile sums to one
const SUM_TOLERANCE: f32 = 1e-4;

/// Smallest variance a pitch-class vector may have before it counts as flat
const MIN_VARIANCE: f64 = 1e-12;

/// Tonal mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Major mode
    Major,
    /// Minor mode
    Minor,
}

impl Mode {
    /// Modes in scoring order (major first)
    pub const ALL: [Mode; 2] = [Mode::Major, Mode::Minor];
}

/// Musical key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    /// Major key (0 = C, 1 = C#, ..., 11 = B)
    Major(u32),
    /// Minor key (0 = C, 1 = C#, ..., 11 = B)
    Minor(u32),
}

impl Key {
    /// Build a key from a tonic pitch class and a mode
    pub fn new(tonic: u32, mode: Mode) -> Self {
        match mode {
            Mode::Major => Key::Major(tonic % 12),
            Mode::Minor => Key::Minor(tonic % 12),
        }
    }

    /// Tonic pitch class (0 = C, ..., 11 = B)
    pub fn tonic(&self) -> u32 {
        match self {
            Key::Major(i) | Key::Minor(i) => *i % 12,
        }
    }

    /// Mode of the key
    pub fn mode(&self) -> Mode {
        match self {
            Key::Major(_) => Mode::Major,
            Key::Minor(_) => Mode::Minor,
        }
    }

    /// Tonic name (e.g., "C#")
    pub fn tonic_name(&self) -> &'static str {
        PITCH_CLASS_NAMES[self.tonic() as usize]
    }

    /// Get key name in musical notation (e.g., "C", "Am", "F#", "D#m")
    ///
    /// - Major keys: note name only (e.g., "C", "C#", "D", "F#")
    /// - Minor keys: note name + "m" (e.g., "Am", "C#m", "Dm", "F#m")
    ///
    /// # Example
    ///
    /// ```
    /// use keytag::analysis::result::Key;
    ///
    /// assert_eq!(Key::Major(0).name(), "C");
    /// assert_eq!(Key::Major(6).name(), "F#");
    /// assert_eq!(Key::Minor(9).name(), "Am");
    /// assert_eq!(Key::Minor(1).name(), "C#m");
    /// ```
    pub fn name(&self) -> String {
        match self.mode() {
            Mode::Major => self.tonic_name().to_string(),
            Mode::Minor => format!("{}m", self.tonic_name()),
        }
    }

    /// Parse a key name produced by [`Key::name`]
    ///
    /// Returns `None` for anything that is not a sharp-spelled tonic optionally
    /// followed by `m`.
    pub fn from_name(name: &str) -> Option<Self> {
        let (tonic, mode) = match name.strip_suffix('m') {
            Some(tonic) => (tonic, Mode::Minor),
            None => (name, Mode::Major),
        };
        PITCH_CLASS_NAMES
            .iter()
            .position(|&n| n == tonic)
            .map(|i| Key::new(i as u32, mode))
    }
}

impl std::fmt::Display for Key {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name())
    }
}

/// Time-averaged, L1-normalized pitch-class energy distribution
///
/// Index 0 is C, index 11 is B. All components are finite and
/// non-negative, they sum to 1, and the vector is never flat.
/// Deserialization goes through [`PitchClassVector::from_energies`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "[f32; 12]")]
pub struct PitchClassVector([f32; 12]);

impl PitchClassVector {
    /// L1-normalize raw pitch-class energies
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::DegenerateSignal`] if any energy is negative or
    /// non-finite, the energies sum to zero, or all twelve values are equal
    /// (no tonal information to correlate against).
    pub fn from_energies(energies: [f32; 12]) -> Result<Self, AnalysisError> {
        if energies.iter().any(|&e| !e.is_finite() || e < 0.0) {
            return Err(AnalysisError::DegenerateSignal(
                "pitch-class energies must be finite and non-negative".to_string(),
            ));
        }

        let sum: f32 = energies.iter().sum();
        if !(sum > f32::EPSILON) || !sum.is_finite() {
            return Err(AnalysisError::DegenerateSignal(format!(
                "pitch-class energy sum is {}",
                sum
            )));
        }

        let mut normalized = energies;
        for x in normalized.iter_mut() {
            *x /= sum;
        }

        let mean = 1.0 / 12.0;
        let variance: f64 = normalized
            .iter()
            .map(|&x| (x as f64 - mean).powi(2))
            .sum::<f64>()
            / 12.0;
        if variance < MIN_VARIANCE {
            return Err(AnalysisError::DegenerateSignal(
                "pitch-class energy is flat across all twelve classes".to_string(),
            ));
        }

        debug_assert!((normalized.iter().sum::<f32>() - 1.0).abs() < SUM_TOLERANCE);
        Ok(Self(normalized))
    }

    /// Normalized values, C..B
    pub fn values(&self) -> &[f32; 12] {
        &self.0
    }

    /// Cyclically shift the vector so that pitch class `i` moves to `i + steps`
    pub fn rotated(&self, steps: usize) -> Self {
        let mut values = self.0;
        values.rotate_right(steps % 12);
        Self(values)
    }
}

impl TryFrom<[f32; 12]> for PitchClassVector {
    type Error = AnalysisError;

    fn try_from(energies: [f32; 12]) -> Result<Self, Self::Error> {
        Self::from_energies(energies)
    }
}

/// Complete analysis result for one recording
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Detected key
    pub key: Key,

    /// Key confidence: Pearson correlation of the winning tone profile (-1.0 to 1.0)
    pub key_confidence: f32,

    /// Key clarity (0.0-1.0)
    ///
    /// Margin between the best and second-best key correlation. Low values
    /// mean neighbouring keys (relative or fifth-related) were nearly as good.
    pub key_clarity: f32,

    /// Averaged pitch-class profile the key was estimated from
    pub pitch_profile: PitchClassVector,

    /// Analysis metadata
    pub metadata: AnalysisMetadata,
}
