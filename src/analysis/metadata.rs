//! Analysis metadata structures

use serde::{Deserialize, Serialize};

/// Analysis metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisMetadata {
    /// Audio duration in seconds
    pub duration_seconds: f32,

    /// Sample rate in Hz
    pub sample_rate: u32,

    /// Processing time in milliseconds
    pub processing_time_ms: f32,

    /// Number of frames that contributed to the pitch profile
    pub frames_analyzed: usize,

    /// Number of frames skipped as silent
    pub frames_skipped: usize,

    /// Algorithm version
    pub algorithm_version: String,
}

impl Default for AnalysisMetadata {
    fn default() -> Self {
        Self {
            duration_seconds: 0.0,
            sample_rate: 0,
            processing_time_ms: 0.0,
            frames_analyzed: 0,
            frames_skipped: 0,
            algorithm_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
