//! Feature extraction modules
//!
//! - Chroma extraction (pitch-class profile)
//! - Key detection

pub mod chroma;
pub mod key;
