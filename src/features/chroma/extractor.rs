//! Chroma vector extraction
//!
//! Converts audio to 12-element chroma vectors with a Hann-windowed STFT whose
//! magnitude bins are folded onto pitch classes by a log-frequency filter
//! bank, then averages the frames into a single pitch-class profile.

use std::f32::consts::PI;
use std::sync::Arc;

use rustfft::{num_complex::Complex, Fft, FftPlanner};

use super::normalization::{normalize_max, sharpen_chroma};
use crate::analysis::result::PitchClassVector;
use crate::config::AnalysisConfig;
use crate::error::AnalysisError;
use crate::io::sample_buffer::AudioSignal;

/// Semitones on either side of the nearest one that receive soft-mapped energy
const SOFT_MAPPING_RADIUS: i64 = 2;

/// MIDI note number of A4
const MIDI_A4: f32 = 69.0;

/// Per-frame chroma vectors extracted from a signal
#[derive(Debug, Clone)]
pub struct ChromaFrames {
    /// Chroma vectors (max-normalized), one per non-silent frame
    pub frames: Vec<[f32; 12]>,

    /// Frames left out because they were below the silence threshold
    pub skipped: usize,
}

/// Sparse mapping from FFT bins to pitch classes
#[derive(Debug, Clone)]
pub struct ChromaFilterBank {
    frame_size: usize,
    /// (FFT bin, pitch class, weight); weights of one bin sum to 1
    entries: Vec<(usize, usize, f32)>,
}

impl ChromaFilterBank {
    /// Build the filter bank for a sample rate and configuration
    ///
    /// Only bins inside `[min_frequency, max_frequency]` and below Nyquist
    /// contribute. Pitch class 0 is C, tuned relative to `center_frequency`.
    pub fn new(sample_rate: u32, config: &AnalysisConfig) -> Result<Self, AnalysisError> {
        let frame_size = config.frame_size;
        let bin_hz = sample_rate as f32 / frame_size as f32;
        let mut entries = Vec::new();

        for bin in 1..frame_size / 2 {
            let freq = bin as f32 * bin_hz;
            if freq < config.min_frequency || freq > config.max_frequency {
                continue;
            }

            let midi = MIDI_A4 + 12.0 * (freq / config.center_frequency).log2();
            let nearest = midi.round() as i64;

            if !config.soft_chroma_mapping {
                entries.push((bin, nearest.rem_euclid(12) as usize, 1.0));
                continue;
            }

            let sigma = config.soft_mapping_sigma;
            let start = entries.len();
            let mut total = 0.0f32;
            for note in (nearest - SOFT_MAPPING_RADIUS)..=(nearest + SOFT_MAPPING_RADIUS) {
                let d = (midi - note as f32) / sigma;
                let w = (-0.5 * d * d).exp();
                if w > 1e-6 {
                    entries.push((bin, note.rem_euclid(12) as usize, w));
                    total += w;
                }
            }
            for entry in &mut entries[start..] {
                entry.2 /= total;
            }
        }

        if entries.is_empty() {
            return Err(AnalysisError::InvalidInput(format!(
                "no FFT bins between {} Hz and {} Hz at {} Hz sample rate",
                config.min_frequency, config.max_frequency, sample_rate
            )));
        }

        Ok(Self {
            frame_size,
            entries,
        })
    }

    /// Fold a magnitude spectrum (at least `frame_size / 2` bins) into 12 pitch classes
    pub fn apply(&self, magnitudes: &[f32]) -> [f32; 12] {
        let mut chroma = [0.0f32; 12];
        for &(bin, pitch_class, weight) in &self.entries {
            chroma[pitch_class] += magnitudes[bin] * weight;
        }
        chroma
    }

    /// FFT frame size this filter bank was built for
    pub fn frame_size(&self) -> usize {
        self.frame_size
    }
}

/// Extract chroma vectors from an audio signal
///
/// # Arguments
///
/// * `signal` - Mono audio signal
/// * `config` - Frame/hop sizes, frequency range, tuning, silence threshold
///
/// # Returns
///
/// Max-normalized 12-element chroma vectors for each non-silent frame
///
/// # Errors
///
/// - `InvalidInput` if the configuration is invalid
/// - `DegenerateSignal` if samples are non-finite or every frame is silent
pub fn extract_chroma(
    signal: &AudioSignal,
    config: &AnalysisConfig,
) -> Result<ChromaFrames, AnalysisError> {
    config.validate()?;

    let samples = signal.samples();
    log::debug!(
        "Extracting chroma: {} samples at {} Hz",
        samples.len(),
        signal.sample_rate()
    );

    if samples.iter().any(|s| !s.is_finite()) {
        return Err(AnalysisError::DegenerateSignal(
            "audio contains non-finite samples".to_string(),
        ));
    }

    let filter_bank = ChromaFilterBank::new(signal.sample_rate(), config)?;
    let window = hann_window(config.frame_size);
    let fft: Arc<dyn Fft<f32>> = FftPlanner::new().plan_fft_forward(config.frame_size);

    let mut buffer = vec![Complex::new(0.0f32, 0.0); config.frame_size];
    let mut magnitudes = vec![0.0f32; config.frame_size / 2];
    let mut frames = Vec::new();
    let mut skipped = 0usize;

    for frame in signal.frames(config.frame_size, config.hop_size) {
        if rms_db(&frame) < config.min_amplitude_db {
            skipped += 1;
            continue;
        }

        for ((slot, &s), &w) in buffer.iter_mut().zip(frame.iter()).zip(window.iter()) {
            *slot = Complex::new(s * w, 0.0);
        }
        fft.process(&mut buffer);

        for (mag, c) in magnitudes.iter_mut().zip(buffer.iter()) {
            *mag = c.norm();
        }

        let mut chroma = filter_bank.apply(&magnitudes);
        if normalize_max(&mut chroma) {
            frames.push(chroma);
        } else {
            skipped += 1;
        }
    }

    log::debug!(
        "Extracted {} chroma frames ({} skipped as silent)",
        frames.len(),
        skipped
    );

    if frames.is_empty() {
        return Err(AnalysisError::DegenerateSignal(format!(
            "all {} frames are below {} dB",
            skipped, config.min_amplitude_db
        )));
    }

    Ok(ChromaFrames { frames, skipped })
}

/// Average chroma frames into an L1-normalized pitch-class profile
///
/// # Arguments
///
/// * `frames` - Per-frame chroma vectors
/// * `sharpening_power` - Power applied to the averaged chroma (1.0 = none)
pub fn average_chroma(
    frames: &[[f32; 12]],
    sharpening_power: f32,
) -> Result<PitchClassVector, AnalysisError> {
    if frames.is_empty() {
        return Err(AnalysisError::DegenerateSignal(
            "no chroma frames to average".to_string(),
        ));
    }

    let mut mean = [0.0f32; 12];
    for frame in frames {
        for (acc, &x) in mean.iter_mut().zip(frame.iter()) {
            *acc += x;
        }
    }
    let n = frames.len() as f32;
    for x in mean.iter_mut() {
        *x /= n;
    }

    PitchClassVector::from_energies(sharpen_chroma(&mean, sharpening_power))
}

/// Extract the time-averaged pitch-class profile of a signal
///
/// Runs [`extract_chroma`] and [`average_chroma`]. The result sums to 1 and
/// has no negative components.
///
/// # Example
///
/// ```
/// use keytag::{AnalysisConfig, AudioSignal};
/// use keytag::features::chroma::extract_pitch_profile;
///
/// // One second of A4
/// let samples: Vec<f32> = (0..22050)
///     .map(|i| (2.0 * std::f32::consts::PI * 440.0 * i as f32 / 22050.0).sin() * 0.5)
///     .collect();
/// let signal = AudioSignal::new(samples, 22050)?;
/// let profile = extract_pitch_profile(&signal, &AnalysisConfig::default())?;
///
/// let strongest = profile
///     .values()
///     .iter()
///     .enumerate()
///     .max_by(|a, b| a.1.total_cmp(b.1))
///     .map(|(i, _)| i);
/// assert_eq!(strongest, Some(9)); // A
/// # Ok::<(), keytag::AnalysisError>(())
/// ```
pub fn extract_pitch_profile(
    signal: &AudioSignal,
    config: &AnalysisConfig,
) -> Result<PitchClassVector, AnalysisError> {
    let chroma = extract_chroma(signal, config)?;
    average_chroma(&chroma.frames, config.chroma_sharpening_power)
}

/// Periodic Hann window
fn hann_window(size: usize) -> Vec<f32> {
    (0..size)
        .map(|n| 0.5 - 0.5 * (2.0 * PI * n as f32 / size as f32).cos())
        .collect()
}

/// RMS level of a frame in dBFS (`-inf` for digital silence)
fn rms_db(frame: &[f32]) -> f32 {
    if frame.is_empty() {
        return f32::NEG_INFINITY;
    }
    let mean_sq = frame.iter().map(|&s| s * s).sum::<f32>() / frame.len() as f32;
    10.0 * mean_sq.log10()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tone(freqs: &[(f32, f32)], seconds: f32, sample_rate: u32) -> Vec<f32> {
        let n = (seconds * sample_rate as f32) as usize;
        (0..n)
            .map(|i| {
                let t = i as f32 / sample_rate as f32;
                freqs
                    .iter()
                    .map(|&(f, a)| a * (2.0 * PI * f * t).sin())
                    .sum::<f32>()
            })
            .collect()
    }

    fn argmax(values: &[f32; 12]) -> usize {
        values
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(i, _)| i)
            .unwrap()
    }

    #[test]
    fn test_filter_bank_weights_sum_per_bin() {
        let config = AnalysisConfig::default();
        let bank = ChromaFilterBank::new(44100, &config).unwrap();
        assert_eq!(bank.frame_size(), config.frame_size);

        let mut per_bin = std::collections::BTreeMap::new();
        for &(bin, pc, w) in &bank.entries {
            assert!(pc < 12);
            *per_bin.entry(bin).or_insert(0.0f32) += w;
        }
        for (_, total) in per_bin {
            assert!((total - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_hard_mapping_single_class_per_bin() {
        let config = AnalysisConfig {
            soft_chroma_mapping: false,
            ..Default::default()
        };
        let bank = ChromaFilterBank::new(22050, &config).unwrap();
        assert!(bank.entries.iter().all(|&(_, _, w)| w == 1.0));
    }

    #[test]
    fn test_filter_bank_rejects_empty_range() {
        let config = AnalysisConfig {
            min_frequency: 20000.0,
            max_frequency: 21000.0,
            ..Default::default()
        };
        assert!(matches!(
            ChromaFilterBank::new(8000, &config),
            Err(AnalysisError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_pure_tones_map_to_pitch_class() {
        let config = AnalysisConfig::default();
        // C4, E4, G4 individually
        for (freq, expected) in [(261.63f32, 0usize), (329.63, 4), (392.0, 7)] {
            let signal = AudioSignal::new(tone(&[(freq, 0.5)], 1.0, 22050), 22050).unwrap();
            let profile = extract_pitch_profile(&signal, &config).unwrap();
            assert_eq!(argmax(profile.values()), expected, "tone at {} Hz", freq);
        }
    }

    #[test]
    fn test_profile_sums_to_one() {
        let config = AnalysisConfig::default();
        let samples = tone(&[(220.0, 0.3), (277.18, 0.2), (329.63, 0.2)], 2.0, 44100);
        let signal = AudioSignal::new(samples, 44100).unwrap();
        let profile = extract_pitch_profile(&signal, &config).unwrap();

        let sum: f32 = profile.values().iter().sum();
        assert!((sum - 1.0).abs() < 1e-5);
        assert!(profile.values().iter().all(|&x| x >= 0.0));
    }

    #[test]
    fn test_silence_is_degenerate() {
        let config = AnalysisConfig::default();
        let signal = AudioSignal::new(vec![0.0; 44100], 44100).unwrap();
        assert!(matches!(
            extract_pitch_profile(&signal, &config),
            Err(AnalysisError::DegenerateSignal(_))
        ));
    }

    #[test]
    fn test_non_finite_samples_are_degenerate() {
        let config = AnalysisConfig::default();
        let mut samples = tone(&[(440.0, 0.5)], 0.5, 22050);
        samples[100] = f32::NAN;
        let signal = AudioSignal::new(samples, 22050).unwrap();
        assert!(matches!(
            extract_chroma(&signal, &config),
            Err(AnalysisError::DegenerateSignal(_))
        ));
    }

    #[test]
    fn test_silent_frames_are_skipped() {
        let config = AnalysisConfig::default();
        let mut samples = vec![0.0f32; 22050];
        samples.extend(tone(&[(440.0, 0.5)], 1.0, 22050));
        let signal = AudioSignal::new(samples, 22050).unwrap();

        let chroma = extract_chroma(&signal, &config).unwrap();
        assert!(chroma.skipped > 0);
        assert!(!chroma.frames.is_empty());

        let profile = average_chroma(&chroma.frames, 1.0).unwrap();
        assert_eq!(argmax(profile.values()), 9);
    }

    #[test]
    fn test_average_chroma_empty() {
        assert!(average_chroma(&[], 1.0).is_err());
    }

    #[test]
    fn test_rms_db() {
        assert_eq!(rms_db(&[0.0; 8]), f32::NEG_INFINITY);
        assert!((rms_db(&[1.0; 8]) - 0.0).abs() < 1e-6);
    }
}
