//! Audio decoding using Symphonia

use std::fs::File;
use std::path::Path;

use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use super::sample_buffer::AudioSignal;
use crate::error::AnalysisError;
use crate::preprocessing::channel_mixer::downmix_to_mono;

/// Decode an audio file to a mono signal
///
/// The container is probed using the file extension as a hint. The first
/// track with a known codec is decoded; multi-channel audio is averaged down
/// to mono. Corrupt packets are skipped, everything else that prevents
/// decoding is reported as [`AnalysisError::DecodingError`].
///
/// # Arguments
///
/// * `path` - Path to audio file
///
/// # Returns
///
/// Mono [`AudioSignal`] at the file's native sample rate
pub fn decode_audio(path: &Path) -> Result<AudioSignal, AnalysisError> {
    log::debug!("Decoding audio file: {}", path.display());

    let src = File::open(path).map_err(|e| {
        AnalysisError::DecodingError(format!("cannot open {}: {}", path.display(), e))
    })?;
    let mss = MediaSourceStream::new(Box::new(src), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let meta_opts: MetadataOptions = Default::default();
    let fmt_opts: FormatOptions = Default::default();

    let probed = symphonia::default::get_probe()
        .format(&hint, mss, &fmt_opts, &meta_opts)
        .map_err(|e| AnalysisError::DecodingError(format!("unrecognized format: {}", e)))?;
    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| AnalysisError::DecodingError("no supported audio tracks".to_string()))?;

    let track_id = track.id;
    let sample_rate = track
        .codec_params
        .sample_rate
        .ok_or_else(|| AnalysisError::DecodingError("unknown sample rate".to_string()))?;

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|e| AnalysisError::DecodingError(format!("unsupported codec: {}", e)))?;

    let mut mono: Vec<f32> = Vec::new();
    let mut skipped_packets = 0usize;

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                break
            }
            Err(SymphoniaError::ResetRequired) => break,
            Err(e) => return Err(AnalysisError::DecodingError(e.to_string())),
        };

        if packet.track_id() != track_id {
            continue;
        }

        match decoder.decode(&packet) {
            Ok(decoded) => {
                let spec = *decoded.spec();
                let channels = spec.channels.count();
                let mut buf = SampleBuffer::<f32>::new(decoded.capacity() as u64, spec);
                buf.copy_interleaved_ref(decoded);
                mono.extend(downmix_to_mono(buf.samples(), channels)?);
            }
            Err(SymphoniaError::DecodeError(msg)) => {
                // Corrupted packets are skipped
                skipped_packets += 1;
                log::warn!("Skipping undecodable packet in {}: {}", path.display(), msg);
            }
            Err(e) => return Err(AnalysisError::DecodingError(e.to_string())),
        }
    }

    if mono.is_empty() {
        return Err(AnalysisError::DecodingError(format!(
            "{} contains no audio samples",
            path.display()
        )));
    }

    log::debug!(
        "Decoded {} mono samples at {} Hz ({} packets skipped)",
        mono.len(),
        sample_rate,
        skipped_packets
    );

    AudioSignal::new(mono, sample_rate)
}
