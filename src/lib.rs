//! # keytag
//!
//! Musical key detection for short audio recordings, plus the file tagging
//! glue that renames recordings to carry their detected key.
//!
//! ## Features
//!
//! - **Pitch profile extraction**: STFT chroma folded onto 12 pitch classes,
//!   averaged over time and L1-normalized
//! - **Key estimation**: Krumhansl-Schmuckler template matching with Pearson
//!   correlation over 24 keys
//! - **Tagging**: `loop.wav` becomes `loop_Em.wav`
//!
//! ## Quick Start
//!
//! ```no_run
//! use keytag::{analyze_audio, AnalysisConfig};
//!
//! // Load audio samples (mono, f32, normalized)
//! let samples: Vec<f32> = vec![]; // Your audio data
//! let sample_rate = 44100;
//!
//! let result = analyze_audio(&samples, sample_rate, AnalysisConfig::default())?;
//! println!("Key: {} (correlation: {:.2})", result.key, result.key_confidence);
//! # Ok::<(), keytag::AnalysisError>(())
//! ```
//!
//! ## Architecture
//!
//! ```text
//! File → Decode (mono) → Chroma frames → Averaged profile → Key templates → Label
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod analysis;
pub mod config;
pub mod error;
pub mod features;
pub mod io;
pub mod preprocessing;
pub mod tagging;

use std::path::Path;
use std::time::Instant;

// Re-export main types
pub use analysis::metadata::AnalysisMetadata;
pub use analysis::result::{AnalysisResult, Key, Mode, PitchClassVector};
pub use config::AnalysisConfig;
pub use error::AnalysisError;
pub use features::key::{KeyEstimate, KeyTemplates};
pub use io::sample_buffer::AudioSignal;

/// Main analysis function
///
/// Extracts the pitch-class profile of mono samples and estimates its key.
///
/// # Arguments
///
/// * `samples` - Mono audio samples, normalized to [-1.0, 1.0]
/// * `sample_rate` - Sample rate in Hz (typically 44100 or 48000)
/// * `config` - Analysis configuration parameters
///
/// # Returns
///
/// `AnalysisResult` containing key, correlation, clarity and the pitch profile
///
/// # Errors
///
/// - `InvalidInput` for empty samples, a zero sample rate or a bad config
/// - `DegenerateSignal` for silent or non-finite audio
pub fn analyze_audio(
    samples: &[f32],
    sample_rate: u32,
    config: AnalysisConfig,
) -> Result<AnalysisResult, AnalysisError> {
    let signal = AudioSignal::new(samples.to_vec(), sample_rate)?;
    analyze_signal(&signal, &config)
}

/// Analyze an already decoded [`AudioSignal`]
pub fn analyze_signal(
    signal: &AudioSignal,
    config: &AnalysisConfig,
) -> Result<AnalysisResult, AnalysisError> {
    let start_time = Instant::now();

    log::debug!(
        "Starting key analysis: {} samples at {} Hz",
        signal.samples().len(),
        signal.sample_rate()
    );

    let chroma = features::chroma::extract_chroma(signal, config)?;
    let profile =
        features::chroma::average_chroma(&chroma.frames, config.chroma_sharpening_power)?;
    let estimate = features::key::estimate_key(&profile, KeyTemplates::krumhansl());

    let processing_time_ms = start_time.elapsed().as_secs_f32() * 1000.0;

    Ok(AnalysisResult {
        key: estimate.key,
        key_confidence: estimate.confidence,
        key_clarity: estimate.clarity,
        pitch_profile: profile,
        metadata: AnalysisMetadata {
            duration_seconds: signal.duration_seconds(),
            sample_rate: signal.sample_rate(),
            processing_time_ms,
            frames_analyzed: chroma.frames.len(),
            frames_skipped: chroma.skipped,
            ..Default::default()
        },
    })
}

/// Decode an audio file and analyze it
///
/// # Errors
///
/// `DecodingError` if the file cannot be read as audio, otherwise as
/// [`analyze_audio`].
pub fn analyze_file(
    path: &Path,
    config: &AnalysisConfig,
) -> Result<AnalysisResult, AnalysisError> {
    let signal = io::decoder::decode_audio(path)?;
    analyze_signal(&signal, config)
}

/// Detect the key of an audio file and return its label ("C", "C#m", ...)
///
/// Uses the default configuration.
pub fn detect_key(path: &Path) -> Result<String, AnalysisError> {
    Ok(analyze_file(path, &AnalysisConfig::default())?.key.name())
}
