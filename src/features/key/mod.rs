//! Key detection modules
//!
//! Detect musical key using:
//! - Krumhansl-Kessler templates (24 keys)
//! - Pearson correlation template matching
//! - Key clarity scoring

pub mod detector;
pub mod key_clarity;
pub mod templates;

pub use detector::{estimate_key, pearson_correlation};
pub use key_clarity::compute_key_clarity;
pub use templates::KeyTemplates;

use crate::analysis::result::Key;

/// Key estimation result
#[derive(Debug, Clone)]
pub struct KeyEstimate {
    /// Detected key (best match)
    pub key: Key,

    /// Pearson correlation of the best-matching template
    pub confidence: f32,

    /// Gap between the best and second-best correlation (0.0-1.0)
    pub clarity: f32,

    /// All 24 key scores in evaluation order (major C..B, then minor C..B)
    pub scores: Vec<(Key, f32)>,
}

impl KeyEstimate {
    /// Key label used in file names ("C", "C#m", ...)
    pub fn label(&self) -> String {
        self.key.name()
    }
}
