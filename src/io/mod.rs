//! Audio I/O modules
//!
//! Audio decoding using Symphonia and sample framing.

pub mod decoder;
pub mod sample_buffer;

pub use decoder::decode_audio;
pub use sample_buffer::{AudioSignal, FrameIter};
