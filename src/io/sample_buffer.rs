//! Decoded audio signal and frame windowing

use crate::error::AnalysisError;

/// Mono audio samples plus their sample rate
///
/// Immutable once constructed. Construction checks that the buffer is
/// non-empty and the sample rate is non-zero.
#[derive(Debug, Clone)]
pub struct AudioSignal {
    samples: Vec<f32>,
    sample_rate: u32,
}

impl AudioSignal {
    /// Wrap mono samples at the given sample rate
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Result<Self, AnalysisError> {
        if samples.is_empty() {
            return Err(AnalysisError::InvalidInput(
                "Empty audio samples".to_string(),
            ));
        }
        if sample_rate == 0 {
            return Err(AnalysisError::InvalidInput(
                "Invalid sample rate".to_string(),
            ));
        }
        Ok(Self {
            samples,
            sample_rate,
        })
    }

    /// Mono samples
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Sample rate in Hz
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Duration in seconds
    pub fn duration_seconds(&self) -> f32 {
        self.samples.len() as f32 / self.sample_rate as f32
    }

    /// Iterate over analysis frames of `frame_size` samples, advancing by `hop_size`
    pub fn frames(&self, frame_size: usize, hop_size: usize) -> FrameIter<'_> {
        FrameIter::new(&self.samples, frame_size, hop_size)
    }
}

/// Iterator over overlapping, zero-padded analysis frames
///
/// Frames start at 0, hop, 2*hop, ... for as long as the start lies inside
/// the buffer. Frames running past the end are zero-padded, so a buffer
/// shorter than one frame still yields a single frame.
#[derive(Debug)]
pub struct FrameIter<'a> {
    data: &'a [f32],
    frame_size: usize,
    hop_size: usize,
    position: usize,
}

impl<'a> FrameIter<'a> {
    /// Create a frame iterator over `data`
    ///
    /// A zero `hop_size` is treated as 1.
    pub fn new(data: &'a [f32], frame_size: usize, hop_size: usize) -> Self {
        Self {
            data,
            frame_size,
            hop_size: hop_size.max(1),
            position: 0,
        }
    }
}

impl Iterator for FrameIter<'_> {
    type Item = Vec<f32>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.position >= self.data.len() || self.frame_size == 0 {
            return None;
        }

        let end = (self.position + self.frame_size).min(self.data.len());
        let mut frame = Vec::with_capacity(self.frame_size);
        frame.extend_from_slice(&self.data[self.position..end]);
        frame.resize(self.frame_size, 0.0);

        self.position += self.hop_size;
        Some(frame)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = if self.frame_size == 0 {
            0
        } else {
            self.data.len().saturating_sub(self.position).div_ceil(self.hop_size)
        };
        (remaining, Some(remaining))
    }
}
