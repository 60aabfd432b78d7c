//! Configuration parameters for key analysis

use crate::error::AnalysisError;

/// Analysis configuration parameters
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    // STFT parameters
    /// Frame size for STFT (default: 8192)
    pub frame_size: usize,

    /// Hop size for STFT (default: 2048)
    pub hop_size: usize,

    // Preprocessing
    /// Silence threshold in dB (default: -60.0)
    /// Frames with RMS below this threshold are left out of the chroma average
    pub min_amplitude_db: f32,

    // Chroma extraction
    /// Reference frequency for A4 (default: 440.0 Hz)
    pub center_frequency: f32,

    /// Lowest frequency folded into chroma (default: 65.406 Hz, C2)
    pub min_frequency: f32,

    /// Highest frequency folded into chroma (default: 2093.0 Hz, C7)
    pub max_frequency: f32,

    /// Enable soft chroma mapping (default: true)
    /// Soft mapping spreads frequency bins to neighboring semitones for robustness
    pub soft_chroma_mapping: bool,

    /// Soft mapping standard deviation in semitones (default: 0.5)
    /// Lower values = sharper mapping, higher values = more spread
    pub soft_mapping_sigma: f32,

    /// Chroma sharpening power (default: 1.0 = no sharpening)
    /// Power > 1.0 emphasizes prominent semitones before L1 normalization
    pub chroma_sharpening_power: f32,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            frame_size: 8192,
            hop_size: 2048,
            min_amplitude_db: -60.0,
            center_frequency: 440.0,
            min_frequency: 65.406,
            max_frequency: 2093.0,
            soft_chroma_mapping: true,
            soft_mapping_sigma: 0.5,
            chroma_sharpening_power: 1.0,
        }
    }
}

impl AnalysisConfig {
    /// Check that parameters describe a usable analysis setup
    pub fn validate(&self) -> Result<(), AnalysisError> {
        if self.frame_size < 2 {
            return Err(AnalysisError::InvalidInput(format!(
                "frame_size must be at least 2, got {}",
                self.frame_size
            )));
        }
        if self.hop_size == 0 {
            return Err(AnalysisError::InvalidInput(
                "hop_size must be non-zero".to_string(),
            ));
        }
        if !(self.center_frequency > 0.0 && self.center_frequency.is_finite()) {
            return Err(AnalysisError::InvalidInput(format!(
                "center_frequency must be positive, got {}",
                self.center_frequency
            )));
        }
        if !(self.min_frequency > 0.0 && self.min_frequency < self.max_frequency) {
            return Err(AnalysisError::InvalidInput(format!(
                "frequency range must satisfy 0 < min < max, got {}..{}",
                self.min_frequency, self.max_frequency
            )));
        }
        if self.soft_chroma_mapping && !(self.soft_mapping_sigma > 0.0) {
            return Err(AnalysisError::InvalidInput(format!(
                "soft_mapping_sigma must be positive, got {}",
                self.soft_mapping_sigma
            )));
        }
        if !(self.chroma_sharpening_power > 0.0 && self.chroma_sharpening_power.is_finite()) {
            return Err(AnalysisError::InvalidInput(format!(
                "chroma_sharpening_power must be positive, got {}",
                self.chroma_sharpening_power
            )));
        }
        Ok(())
    }
}
