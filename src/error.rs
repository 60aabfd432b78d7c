//! Error types for key detection and file tagging

use std::fmt;

/// Errors that can occur while analysing or tagging audio files
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisError {
    /// Invalid input parameters
    InvalidInput(String),

    /// Audio decoding error (unreadable, unsupported or empty file)
    DecodingError(String),

    /// Silent or numerically degenerate input with no meaningful pitch content
    DegenerateSignal(String),

    /// Filesystem error while walking directories or renaming files
    IoError(String),
}

impl fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            AnalysisError::DecodingError(msg) => write!(f, "Decoding error: {}", msg),
            AnalysisError::DegenerateSignal(msg) => write!(f, "Degenerate signal: {}", msg),
            AnalysisError::IoError(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl std::error::Error for AnalysisError {}
