//! Analysis result types
//!
//! - Keys, modes and pitch-class profiles
//! - Result and metadata structures

pub mod metadata;
pub mod result;

pub use metadata::AnalysisMetadata;
pub use result::{AnalysisResult, Key, Mode, PitchClassVector, PITCH_CLASS_NAMES};
