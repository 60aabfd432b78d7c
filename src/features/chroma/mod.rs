//! Chroma extraction modules
//!
//! Extract pitch-class distribution (12 semitones) from audio:
//! - STFT to chroma folding
//! - Frame normalization and sharpening

pub mod extractor;
pub mod normalization;

pub use extractor::{
    average_chroma, extract_chroma, extract_pitch_profile, ChromaFilterBank, ChromaFrames,
};
